//! Field token normalization.
//!
//! Relationship traversals are collapsed to the local field whose read permission
//! gates the traversal:
//!
//! | Token | Normalized |
//! |-------|------------|
//! | `Owner__r.Name` | `OWNER__C` (custom lookup field) |
//! | `Manager.Name` | `MANAGERID` (standard id field) |
//! | `MAX(Amount)` | `MAXAMOUNT` (parentheses stripped) |

use std::sync::LazyLock;

use fieldguard_core::FieldSet;
use regex::Regex;

static CUSTOM_TRAVERSAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<relation>[A-Z0-9_]+?)__R\..+$").expect("custom traversal pattern is valid")
});

static STANDARD_TRAVERSAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<relation>[A-Z0-9_]+)\..+$").expect("standard traversal pattern is valid")
});

/// Rewrites raw field tokens into locally-checkable field identifiers.
///
/// Normalizing an already-normalized set returns the same set.
#[derive(Debug, Clone, Default)]
pub struct FieldNormalizer;

impl FieldNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize every token of a set, dropping blanks and merging duplicates.
    pub fn normalize(&self, fields: FieldSet) -> FieldSet {
        fields
            .into_iter()
            .filter_map(|token| self.normalize_token(&token))
            .collect()
    }

    /// Normalize a single token. Returns `None` if nothing checkable remains.
    pub fn normalize_token(&self, token: &str) -> Option<String> {
        let cleaned: String = token
            .trim()
            .to_uppercase()
            .chars()
            .filter(|c| *c != '(' && *c != ')')
            .collect();
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return None;
        }

        let normalized = if let Some(caps) = CUSTOM_TRAVERSAL.captures(cleaned) {
            format!("{}__C", &caps["relation"])
        } else if let Some(caps) = STANDARD_TRAVERSAL.captures(cleaned) {
            format!("{}ID", &caps["relation"])
        } else {
            cleaned.to_string()
        };

        if normalized != token {
            tracing::trace!(token, normalized = %normalized, "Normalized field token");
        }
        Some(normalized)
    }
}
