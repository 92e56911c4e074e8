//! Config-backed collaborators.
//!
//! `PermissionTable` answers schema lookups and read checks from the `objects` section of
//! a [`GuardConfig`], and `StaticNamespaceProvider` reports the configured qualifier.
//! They let the validator run standalone and in tests; platform integrations supply
//! their own implementations of the collaborator traits.

use std::collections::HashMap;

use fieldguard_core::{GuardConfig, NamespaceConfig, ObjectIdentity, ObjectPermissions};

use crate::{AuthorizationOracle, NamespaceProvider, SchemaResolver};

/// Object permissions keyed by object name.
///
/// Object names match case-insensitively and resolve to the configured spelling.
/// A read check passes only if every requested field is readable.
#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    objects: HashMap<String, ObjectPermissions>,
}

impl PermissionTable {
    pub fn new(objects: HashMap<String, ObjectPermissions>) -> Self {
        Self { objects }
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(config.objects.clone())
    }

    fn lookup(&self, name: &str) -> Option<(&str, &ObjectPermissions)> {
        self.objects
            .iter()
            .find(|(configured, _)| configured.eq_ignore_ascii_case(name))
            .map(|(configured, perms)| (configured.as_str(), perms))
    }
}

impl SchemaResolver for PermissionTable {
    fn resolve_object(&self, name: &str) -> Option<ObjectIdentity> {
        self.lookup(name)
            .map(|(configured, _)| ObjectIdentity::new(configured))
    }
}

impl AuthorizationOracle for PermissionTable {
    fn is_authorized_to_view(&self, object: &ObjectIdentity, fields: &[String]) -> bool {
        let Some((_, perms)) = self.lookup(&object.name) else {
            tracing::debug!(object = %object, "No permissions configured for object");
            return false;
        };

        if let Some(denied) = fields.iter().find(|field| !perms.readable.contains(field)) {
            tracing::debug!(object = %object, field = %denied, "Field is not readable");
            return false;
        }
        true
    }
}

/// Reports the qualifier from a [`NamespaceConfig`].
///
/// The environment is read when the qualifier is requested, which a
/// [`NamespaceResolver`](crate::NamespaceResolver) does only once.
#[derive(Debug, Clone, Default)]
pub struct StaticNamespaceProvider {
    config: NamespaceConfig,
}

impl StaticNamespaceProvider {
    pub fn new(config: NamespaceConfig) -> Self {
        Self { config }
    }

    /// A provider reporting a fixed qualifier.
    pub fn fixed(qualifier: impl Into<String>) -> Self {
        Self::new(NamespaceConfig {
            qualifier: Some(qualifier.into()),
            ..Default::default()
        })
    }
}

impl NamespaceProvider for StaticNamespaceProvider {
    fn current_package_qualifier(&self) -> Option<String> {
        self.config.resolve_qualifier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PermissionTable {
        let config = GuardConfig::from_yaml(
            r#"
objects:
  Account:
    readable: "*"
  Acme__Task__c:
    readable: [Id, Name, Acme__Owner__c]
  Locked__c:
    readable: []
"#,
        )
        .unwrap();
        PermissionTable::from_config(&config)
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_object_case_insensitive() {
        let table = table();
        assert_eq!(
            table.resolve_object("ACME__TASK__C"),
            Some(ObjectIdentity::new("Acme__Task__c"))
        );
        assert_eq!(table.resolve_object("Contact"), None);
    }

    #[test]
    fn test_all_fields_readable() {
        let table = table();
        let account = ObjectIdentity::new("Account");
        assert!(table.is_authorized_to_view(&account, &fields(&["ID", "ANNUALREVENUE"])));
    }

    #[test]
    fn test_listed_fields_readable() {
        let table = table();
        let task = ObjectIdentity::new("Acme__Task__c");
        assert!(table.is_authorized_to_view(&task, &fields(&["ID", "ACME__OWNER__C"])));
        assert!(!table.is_authorized_to_view(&task, &fields(&["ID", "SECRET__C"])));
    }

    #[test]
    fn test_empty_readable_list_denies() {
        let table = table();
        let locked = ObjectIdentity::new("Locked__c");
        assert!(!table.is_authorized_to_view(&locked, &fields(&["ID"])));
    }

    #[test]
    fn test_unconfigured_object_denies() {
        let table = table();
        let contact = ObjectIdentity::new("Contact");
        assert!(!table.is_authorized_to_view(&contact, &fields(&["ID"])));
    }

    #[test]
    fn test_static_provider() {
        assert_eq!(
            StaticNamespaceProvider::fixed("Acme").current_package_qualifier(),
            Some("Acme".to_string())
        );
        assert_eq!(StaticNamespaceProvider::default().current_package_qualifier(), None);
    }
}
