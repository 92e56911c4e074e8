//! # fieldguard-core
//!
//! Types shared by every Fieldguard crate: the field sets recovered from query text,
//! the resolved object identity handed to authorization, and the YAML configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// Configuration types shared across all Fieldguard crates
pub mod config;

pub use config::{
    ConfigError, GuardConfig, NamespaceConfig, ObjectPermissions, QueryConfig, ReadableFields,
};

/// A deduplicated set of upper-cased field tokens.
///
/// An empty set is meaningful: it means the query reads no field values at all
/// (for example a bare row count), so no field-level check is required.
///
/// Blank tokens are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldSet(BTreeSet<String>);

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token, ignoring blank ones. Returns `true` if the token was new.
    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        let token = token.into();
        if token.trim().is_empty() {
            return false;
        }
        self.0.insert(token)
    }

    /// Merge another set into this one.
    pub fn union(mut self, other: FieldSet) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The tokens as a sorted list, in the shape handed to an authorization oracle.
    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

impl FromIterator<String> for FieldSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        set.extend(iter);
        set
    }
}

impl<'a> FromIterator<&'a str> for FieldSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl Extend<String> for FieldSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for token in iter {
            self.insert(token);
        }
    }
}

impl IntoIterator for FieldSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<&str> = self.iter().collect();
        write!(f, "{{{}}}", tokens.join(", "))
    }
}

/// The target object of a query, as resolved by a schema collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectIdentity {
    /// Canonical object name (namespace qualifier included when packaged).
    pub name: String,
}

impl ObjectIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_set_drops_blank_tokens() {
        let mut set = FieldSet::new();
        assert!(!set.insert(""));
        assert!(!set.insert("   "));
        assert!(set.insert("NAME"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_field_set_deduplicates() {
        let set: FieldSet = ["ID", "NAME", "ID"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.into_vec(), vec!["ID".to_string(), "NAME".to_string()]);
    }

    #[test]
    fn test_field_set_union() {
        let select: FieldSet = ["NAME"].into_iter().collect();
        let filter: FieldSet = ["EMAIL", "NAME"].into_iter().collect();
        let all = select.union(filter);
        assert_eq!(all.to_string(), "{EMAIL, NAME}");
    }

    #[test]
    fn test_field_set_serializes_as_list() {
        let set: FieldSet = ["B", "A"].into_iter().collect();
        let yaml = serde_yaml::to_string(&set).unwrap();
        assert_eq!(yaml.trim(), "- A\n- B");
    }
}
