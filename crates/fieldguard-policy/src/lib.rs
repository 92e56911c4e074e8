//! Fieldguard Policy Enforcement
//!
//! Field-level read pre-authorization for a restricted, read-only query language.
//! Every field a query touches is recovered from its text (see `fieldguard-query`),
//! rewritten for the active package namespace, and handed to an authorization oracle
//! before the query is ever executed.
//!
//! The actual permission decision, schema metadata and namespace lookup belong to the
//! surrounding platform and are reached through the collaborator traits below.
//! [`permissions`] provides config-backed implementations of them.

pub mod error;
pub mod namespace;
pub mod permissions;
pub mod validator;

pub use error::{ValidationError, ValidationErrorKind};
pub use fieldguard_core::{FieldSet, ObjectIdentity};
pub use namespace::{NamespaceResolver, NamespaceRewriter};
pub use permissions::{PermissionTable, StaticNamespaceProvider};
pub use validator::{QueryAnalysis, QueryValidator};

/// Resolves an object name to its schema identity.
pub trait SchemaResolver: Send + Sync {
    /// Returns `None` if the object does not exist.
    fn resolve_object(&self, name: &str) -> Option<ObjectIdentity>;
}

/// Decides whether the current principal may read a set of fields.
pub trait AuthorizationOracle: Send + Sync {
    fn is_authorized_to_view(&self, object: &ObjectIdentity, fields: &[String]) -> bool;
}

/// Reports the package qualifier of the active deployment.
///
/// Queried at most once per [`NamespaceResolver`].
pub trait NamespaceProvider: Send + Sync {
    fn current_package_qualifier(&self) -> Option<String>;
}
