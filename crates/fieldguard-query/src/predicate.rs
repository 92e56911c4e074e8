//! Filter-predicate field extraction.
//!
//! Predicates can be arbitrarily nested boolean expressions, but only the names of the
//! fields they reference matter here. Instead of parsing an expression tree, a single
//! left-to-right scan collects every identifier that sits directly before a comparison
//! operator or one of the `LIKE` / `IN` family of keywords.

use std::sync::LazyLock;

use fieldguard_core::{FieldSet, QueryConfig};
use regex::Regex;

use crate::literal::mask_string_literals;

static FIELD_BEFORE_OPERATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<field>[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*\)?)(?:\s*(?:!=|<=|>=|=|<|>)|\s+(?:NOT\s+)?(?:LIKE|IN|INCLUDES|EXCLUDES)\b)",
    )
    .expect("predicate pattern is a valid regex")
});

/// Collects the field tokens referenced by a filter predicate.
#[derive(Debug, Clone)]
pub struct WhereFieldExtractor {
    mask_string_literals: bool,
}

impl Default for WhereFieldExtractor {
    fn default() -> Self {
        Self::new(&QueryConfig::default())
    }
}

impl WhereFieldExtractor {
    pub fn new(config: &QueryConfig) -> Self {
        Self {
            mask_string_literals: config.mask_string_literals,
        }
    }

    /// Extract raw, upper-cased field tokens from an optional predicate.
    pub fn extract(&self, predicate: Option<&str>) -> FieldSet {
        let Some(predicate) = predicate else {
            return FieldSet::new();
        };

        let scanned = if self.mask_string_literals {
            mask_string_literals(predicate)
        } else {
            predicate.to_string()
        };

        let fields: FieldSet = FIELD_BEFORE_OPERATOR
            .captures_iter(&scanned)
            .filter_map(|caps| caps.name("field"))
            .map(|m| m.as_str().to_uppercase())
            .collect();

        tracing::trace!(fields = %fields, "Extracted predicate fields");
        fields
    }
}
