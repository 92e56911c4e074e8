//! Configuration types for Fieldguard.
//!
//! Configuration is loaded from YAML (`fieldguard.yaml`, optionally pointing at a
//! separate objects file) and combined into a single `GuardConfig` structure.
//!
//! # Configuration Files
//!
//! - **fieldguard.yaml**: namespace settings, query scanning options and inline objects
//! - **objects.yaml**: per-object readable field lists, merged over the inline objects

pub mod namespace;
pub mod objects;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub use namespace::NamespaceConfig;
pub use objects::{ObjectPermissions, ObjectsFile, ReadableFields};

/// Complete Fieldguard configuration loaded from files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Namespace (package qualifier) settings.
    #[serde(default)]
    pub namespace: NamespaceConfig,

    /// Query scanning options.
    #[serde(default)]
    pub query: QueryConfig,

    /// Inline object permissions, keyed by object name.
    #[serde(default)]
    pub objects: HashMap<String, ObjectPermissions>,

    /// Path to an objects file (alternative or addition to inline objects).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objects_file: Option<PathBuf>,
}

/// Options for the filter-predicate scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Blank out single-quoted string literals before scanning predicates.
    #[serde(default = "default_true")]
    pub mask_string_literals: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            mask_string_literals: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GuardConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration and resolve the external objects file.
    ///
    /// A relative `objects_file` is resolved against the directory of `path`.
    /// Objects from the file override inline objects of the same name.
    pub fn load_with_context(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_file(path)?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(objects_file) = &config.objects_file {
            let objects = ObjectsFile::load_from_path(objects_file, &base_dir)?;
            tracing::debug!(
                count = objects.objects.len(),
                "Loaded object permissions from objects file"
            );
            config.objects.extend(objects.objects);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE: &str = r#"
namespace:
  qualifier: Acme
query:
  mask_string_literals: false
objects:
  Account:
    readable: "*"
  Task__c:
    readable: [Id, Name, Owner__c]
"#;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = GuardConfig::from_yaml("{}").unwrap();
        assert!(config.namespace.qualifier.is_none());
        assert!(config.query.mask_string_literals);
        assert!(config.objects.is_empty());
        assert_eq!(config.namespace.custom_suffixes, vec!["__c", "__r"]);
    }

    #[test]
    fn test_parse_sample() {
        let config = GuardConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.namespace.qualifier.as_deref(), Some("Acme"));
        assert!(!config.query.mask_string_literals);
        assert!(config.objects["Account"].readable.is_all());
        assert!(config.objects["Task__c"].readable.contains("OWNER__C"));
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let err = GuardConfig::from_yaml("objects: [not, a, map]").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_load_with_context_merges_objects_file() {
        let dir = tempfile::tempdir().unwrap();

        let mut objects = fs::File::create(dir.path().join("objects.yaml")).unwrap();
        writeln!(
            objects,
            "objects:\n  Contact:\n    readable: [Id, Email]\n  Account:\n    readable: [Id]"
        )
        .unwrap();

        let main_path = dir.path().join("fieldguard.yaml");
        let mut main = fs::File::create(&main_path).unwrap();
        writeln!(
            main,
            "objects_file: objects.yaml\nobjects:\n  Account:\n    readable: \"*\""
        )
        .unwrap();

        let config = GuardConfig::load_with_context(&main_path).unwrap();
        assert_eq!(config.objects.len(), 2);
        assert!(config.objects["Contact"].readable.contains("email"));
        // The objects file wins over the inline definition.
        assert!(!config.objects["Account"].readable.is_all());
    }

    #[test]
    fn test_load_with_context_missing_objects_file() {
        let dir = tempfile::tempdir().unwrap();
        let main_path = dir.path().join("fieldguard.yaml");
        fs::write(&main_path, "objects_file: missing.yaml\n").unwrap();

        let err = GuardConfig::load_with_context(&main_path).unwrap_err();
        assert!(matches!(err, ConfigError::Config(_)));
    }
}
