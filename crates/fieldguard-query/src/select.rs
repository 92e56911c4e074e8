//! Selection-list field extraction.

use std::sync::LazyLock;

use fieldguard_core::FieldSet;
use regex::Regex;

static SELECT_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*").expect("separator pattern is a valid regex"));

static ROW_COUNT_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^COUNT\s*\(").expect("row count pattern is a valid regex"));

/// Fields named by a selection list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectFields {
    /// Raw, upper-cased field tokens (not yet normalized).
    pub fields: FieldSet,
    /// The selection is a bare row count, so it reads no field values.
    pub row_count: bool,
}

/// Turns a selection list into raw field tokens.
#[derive(Debug, Clone, Default)]
pub struct SelectFieldExtractor;

impl SelectFieldExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Split the selection list on commas.
    ///
    /// A list made of a single `COUNT(...)` call yields no fields: the query returns a
    /// count, not field values. Commas inside function arguments are not understood.
    pub fn extract(&self, selection: &str) -> SelectFields {
        let tokens: Vec<String> = SELECT_SEPARATOR
            .split(selection.trim())
            .map(|token| token.trim().to_uppercase())
            .filter(|token| !token.is_empty())
            .collect();

        if tokens.len() == 1 && ROW_COUNT_CALL.is_match(&tokens[0]) {
            tracing::debug!("Selection is a bare row count");
            return SelectFields {
                fields: FieldSet::new(),
                row_count: true,
            };
        }

        SelectFields {
            fields: tokens.into_iter().collect(),
            row_count: false,
        }
    }
}
