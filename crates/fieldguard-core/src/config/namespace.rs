//! Namespace (package qualifier) configuration.
//!
//! Two ways to supply the qualifier are supported (in order of precedence):
//! 1. `qualifier_env` - reference an environment variable
//! 2. `qualifier` - provide the qualifier directly

use serde::{Deserialize, Serialize};

/// Configuration for the package namespace of a deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// Environment variable name containing the qualifier.
    /// Highest precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier_env: Option<String>,

    /// The qualifier itself, with or without the trailing `__` separator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,

    /// Name suffixes that mark custom schema elements.
    #[serde(default = "default_custom_suffixes")]
    pub custom_suffixes: Vec<String>,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            qualifier_env: None,
            qualifier: None,
            custom_suffixes: default_custom_suffixes(),
        }
    }
}

impl NamespaceConfig {
    /// Resolve the configured qualifier.
    ///
    /// An environment variable that is named but unset falls back to `qualifier`.
    pub fn resolve_qualifier(&self) -> Option<String> {
        if let Some(env_var) = &self.qualifier_env {
            match std::env::var(env_var) {
                Ok(value) => return Some(value),
                Err(_) => {
                    tracing::warn!(
                        env_var = %env_var,
                        "Namespace qualifier environment variable is not set"
                    );
                }
            }
        }
        self.qualifier.clone()
    }
}

fn default_custom_suffixes() -> Vec<String> {
    vec!["__c".to_string(), "__r".to_string()]
}
