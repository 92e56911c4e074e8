//! Per-object read permissions.
//!
//! These back the config-driven schema resolver and authorization oracle. Field
//! names are compared case-insensitively, matching how query tokens are normalized.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::ConfigError;

/// Permission configuration for a single object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectPermissions {
    /// Fields that can be read. Use "*" for all fields.
    #[serde(default)]
    pub readable: ReadableFields,
}

/// Readable fields can be a list or "*" for all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadableFields {
    /// All fields are readable.
    All(String), // "*"
    /// Specific fields are readable.
    List(Vec<String>),
}

impl Default for ReadableFields {
    fn default() -> Self {
        ReadableFields::List(Vec::new())
    }
}

impl ReadableFields {
    /// Check if a field is readable.
    pub fn contains(&self, field: &str) -> bool {
        match self {
            ReadableFields::All(s) => s == "*",
            ReadableFields::List(fields) => fields.iter().any(|f| f.eq_ignore_ascii_case(field)),
        }
    }

    /// Check if this represents "all fields".
    pub fn is_all(&self) -> bool {
        matches!(self, ReadableFields::All(s) if s == "*")
    }
}

/// A standalone objects file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectsFile {
    #[serde(default)]
    pub objects: HashMap<String, ObjectPermissions>,
}

impl ObjectsFile {
    /// Load an objects file from YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse an objects file from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load an objects file relative to a base directory.
    ///
    /// If the path is absolute it is used directly. A missing file is an error.
    pub fn load_from_path(
        objects_file: impl AsRef<Path>,
        base_dir: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let objects_file = objects_file.as_ref();
        let objects_path = if objects_file.is_absolute() {
            objects_file.to_path_buf()
        } else {
            base_dir.as_ref().join(objects_file)
        };

        if objects_path.exists() {
            Self::from_file(&objects_path)
        } else {
            Err(ConfigError::Config(format!(
                "Objects file not found: {}",
                objects_path.display()
            )))
        }
    }
}
