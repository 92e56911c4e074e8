//! Clause decomposition.
//!
//! A query is split into its six clauses by one anchored, case-insensitive match over
//! the whole clause sequence:
//!
//! ```text
//! SELECT <select> FROM <from> [WHERE <where>] [ORDER [BY] <order>] [LIMIT <limit>] [OFFSET <offset>]
//! ```
//!
//! The pattern runs over a copy of the text with single-quoted literals masked, so a
//! keyword inside a literal never ends a clause. Each clause is then cut from the
//! original text at the matched range. An unterminated literal is malformed.
//!
//! Only clause boundaries are located. Clause contents are not validated, and nested
//! sub-selects or multiple statements are not supported.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::QueryError;
use crate::literal::mask_closed_literals;

static CLAUSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^\s*SELECT\s+(?P<select>.+?)\s+FROM\s+(?P<from>[^\s;]+)(?:\s+WHERE\s+(?P<where>.+?))?(?:\s+ORDER\s+(?:BY\s+)?(?P<order>.+?))?(?:\s+LIMIT\s+(?P<limit>[^\s;]+))?(?:\s+OFFSET\s+(?P<offset>[^\s;]+))?\s*;?\s*$",
    )
    .expect("clause pattern is a valid regex")
});

/// One of the six clauses the decomposer locates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    Select,
    From,
    Where,
    Order,
    Limit,
    Offset,
}

impl Clause {
    pub const ALL: [Clause; 6] = [
        Clause::Select,
        Clause::From,
        Clause::Where,
        Clause::Order,
        Clause::Limit,
        Clause::Offset,
    ];

    /// Capture group name in the clause pattern.
    fn group_name(self) -> &'static str {
        match self {
            Clause::Select => "select",
            Clause::From => "from",
            Clause::Where => "where",
            Clause::Order => "order",
            Clause::Limit => "limit",
            Clause::Offset => "offset",
        }
    }

    /// Whether the clause must be present for the query to be well-formed.
    pub fn is_mandatory(self) -> bool {
        matches!(self, Clause::Select | Clause::From)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Select => write!(f, "SELECT"),
            Clause::From => write!(f, "FROM"),
            Clause::Where => write!(f, "WHERE"),
            Clause::Order => write!(f, "ORDER"),
            Clause::Limit => write!(f, "LIMIT"),
            Clause::Offset => write!(f, "OFFSET"),
        }
    }
}

/// The raw text of each clause, keyword stripped, with the original case preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuerySegments {
    /// The selection list.
    pub select: String,
    /// The target object name.
    pub from: String,
    /// The filter predicate, if present.
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,
    /// The ordering specification, without the `BY` keyword.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

impl QuerySegments {
    /// Get the text of a clause, `None` if the clause is absent.
    pub fn get(&self, clause: Clause) -> Option<&str> {
        match clause {
            Clause::Select => Some(&self.select),
            Clause::From => Some(&self.from),
            Clause::Where => self.where_clause.as_deref(),
            Clause::Order => self.order.as_deref(),
            Clause::Limit => self.limit.as_deref(),
            Clause::Offset => self.offset.as_deref(),
        }
    }
}

/// Splits query text into its clauses.
#[derive(Debug, Clone, Default)]
pub struct QueryDecomposer;

impl QueryDecomposer {
    /// Create a new decomposer.
    pub fn new() -> Self {
        Self
    }

    /// Decompose a query into all six clauses with a single match.
    pub fn decompose(&self, text: &str) -> Result<QuerySegments, QueryError> {
        let clauses = self.locate(text)?;

        let segments = QuerySegments {
            select: clauses.mandatory(Clause::Select)?,
            from: clauses.mandatory(Clause::From)?,
            where_clause: clauses.optional(Clause::Where),
            order: clauses.optional(Clause::Order),
            limit: clauses.optional(Clause::Limit),
            offset: clauses.optional(Clause::Offset),
        };

        tracing::debug!(
            from = %segments.from,
            has_where = segments.where_clause.is_some(),
            "Decomposed query"
        );

        Ok(segments)
    }

    /// Extract a single clause.
    ///
    /// Mandatory clauses are always `Some` on success; a missing mandatory clause
    /// fails even when another clause was requested, since the text is malformed.
    pub fn extract(&self, text: &str, clause: Clause) -> Result<Option<String>, QueryError> {
        let clauses = self.locate(text)?;
        for required in [Clause::Select, Clause::From] {
            clauses.mandatory(required)?;
        }
        Ok(clauses.optional(clause))
    }

    fn locate<'t>(&self, text: &'t str) -> Result<ClauseTexts<'t>, QueryError> {
        let masked = mask_closed_literals(text)
            .ok_or_else(|| QueryError::malformed("unterminated string literal"))?;
        let captures = CLAUSE_PATTERN
            .captures(&masked)
            .ok_or_else(|| QueryError::malformed("expected SELECT <fields> FROM <object>"))?;

        let mut clauses = ClauseTexts([None; 6]);
        for clause in Clause::ALL {
            let Some(m) = captures.name(clause.group_name()) else {
                continue;
            };
            // Masking keeps byte offsets, so the range is valid in the original text.
            let original = text.get(m.range()).ok_or_else(|| {
                QueryError::malformed(format!("{} clause splits a character", clause))
            })?;
            clauses.0[clause as usize] = Some(original);
        }
        Ok(clauses)
    }
}

/// Clause texts cut from the original query, indexed by [`Clause`].
struct ClauseTexts<'t>([Option<&'t str>; 6]);

impl ClauseTexts<'_> {
    fn optional(&self, clause: Clause) -> Option<String> {
        self.0[clause as usize]
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn mandatory(&self, clause: Clause) -> Result<String, QueryError> {
        debug_assert!(clause.is_mandatory());
        self.optional(clause)
            .ok_or_else(|| QueryError::malformed(format!("{} clause is empty", clause)))
    }
}
