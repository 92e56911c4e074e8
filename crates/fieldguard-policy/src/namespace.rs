//! Namespace qualifier resolution and rewriting.
//!
//! Under a packaged deployment every custom schema element's canonical name carries the
//! package qualifier (`Task__c` is really `Acme__Task__c`). Object and field tokens are
//! rewritten to that canonical form before schema lookups and authorization checks.

use std::sync::OnceLock;

use fieldguard_core::FieldSet;

use crate::NamespaceProvider;

const QUALIFIER_SEPARATOR: &str = "__";

/// Caches the package qualifier reported by a [`NamespaceProvider`].
///
/// The provider is consulted at most once, even under concurrent first use; every
/// later read observes the same, fully initialized value.
pub struct NamespaceResolver {
    provider: Box<dyn NamespaceProvider>,
    qualifier: OnceLock<Option<String>>,
}

impl NamespaceResolver {
    pub fn new(provider: impl NamespaceProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            qualifier: OnceLock::new(),
        }
    }

    /// The canonical qualifier (ending in `__`), or `None` outside a packaged deployment.
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier
            .get_or_init(|| {
                let qualifier = canonical_qualifier(self.provider.current_package_qualifier());
                tracing::debug!(qualifier = ?qualifier, "Resolved namespace qualifier");
                qualifier
            })
            .as_deref()
    }
}

/// Normalize a reported qualifier: blank is absent, and `Acme` / `Acme__` both
/// become `Acme__`.
pub fn canonical_qualifier(raw: Option<String>) -> Option<String> {
    let raw = raw?;
    let name = raw.trim().trim_end_matches('_');
    if name.is_empty() {
        return None;
    }
    Some(format!("{}{}", name, QUALIFIER_SEPARATOR))
}

/// Prefixes custom object and field names with the cached qualifier.
#[derive(Debug, Clone)]
pub struct NamespaceRewriter {
    qualifier: Option<String>,
    custom_suffixes: Vec<String>,
}

impl NamespaceRewriter {
    /// Build a rewriter from a resolver, reading the qualifier once.
    pub fn new(resolver: &NamespaceResolver, custom_suffixes: &[String]) -> Self {
        Self::with_qualifier(resolver.qualifier().map(str::to_string), custom_suffixes)
    }

    /// Build a rewriter from an already resolved qualifier.
    pub fn with_qualifier(qualifier: Option<String>, custom_suffixes: &[String]) -> Self {
        Self {
            qualifier: canonical_qualifier(qualifier),
            custom_suffixes: custom_suffixes.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    pub fn custom_suffixes(&self) -> &[String] {
        &self.custom_suffixes
    }

    /// Whether a name carries one of the custom-element suffixes.
    pub fn is_custom(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.custom_suffixes
            .iter()
            .any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// Qualify a custom object name. The object name keeps its original case.
    pub fn rewrite_object(&self, name: &str) -> String {
        match &self.qualifier {
            Some(qualifier) => self.qualify(name, qualifier),
            None => name.to_string(),
        }
    }

    /// Qualify a custom field token. Tokens are upper-case, so the qualifier is too.
    pub fn rewrite_field(&self, token: &str) -> String {
        match &self.qualifier {
            Some(qualifier) => self.qualify(token, &qualifier.to_uppercase()),
            None => token.to_string(),
        }
    }

    /// Qualify every custom token of a field set.
    pub fn rewrite_fields(&self, fields: FieldSet) -> FieldSet {
        if self.qualifier.is_none() {
            return fields;
        }
        fields
            .into_iter()
            .map(|token| self.rewrite_field(&token))
            .collect()
    }

    fn qualify(&self, name: &str, qualifier: &str) -> String {
        if !self.is_custom(name) || starts_with_ignore_case(name, qualifier) {
            return name.to_string();
        }
        let qualified = format!("{}{}", qualifier, name);
        tracing::trace!(name, qualified = %qualified, "Applied namespace qualifier");
        qualified
    }
}

fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
