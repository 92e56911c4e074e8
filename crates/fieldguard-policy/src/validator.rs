//! Main validator that composes decomposition, extraction, normalization and
//! namespace rewriting, then asks the authorization oracle for a verdict.
//!
//! The `QueryValidator` is built once at application startup and shared by callers.
//! Each call is a single deterministic pass:
//!
//! 1. **Decompose** - locate the clauses of the query text
//! 2. **Extract** - selection-list fields, plus filter-predicate fields when present
//! 3. **Normalize** - collapse relationship traversals to local fields
//! 4. **Rewrite** - qualify custom object and field names with the package namespace
//! 5. **Authorize** - resolve the object and consult the oracle

use std::sync::Arc;

use fieldguard_core::{FieldSet, GuardConfig, NamespaceConfig, QueryConfig};
use fieldguard_query::{
    FieldNormalizer, QueryDecomposer, QuerySegments, SelectFieldExtractor, WhereFieldExtractor,
};
use serde::Serialize;

use crate::error::ValidationError;
use crate::namespace::{NamespaceResolver, NamespaceRewriter};
use crate::permissions::{PermissionTable, StaticNamespaceProvider};
use crate::{AuthorizationOracle, SchemaResolver};

/// The fields and object a query touches, ready for authorization.
#[derive(Debug, Clone, Serialize)]
pub struct QueryAnalysis {
    /// The original query text.
    pub query: String,
    /// The clauses located in the query text.
    pub segments: QuerySegments,
    /// The target object name, namespace-qualified.
    pub object: String,
    /// The normalized, namespace-qualified fields requiring a read check.
    pub fields: FieldSet,
    /// The selection list is a bare row count.
    pub row_count: bool,
}

impl QueryAnalysis {
    /// Whether any field needs a read check. A query touching no field is granted.
    pub fn requires_field_check(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Render the analysis as JSON (for explain-style tooling and logs).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "query": self.query,
            "segments": self.segments,
            "object": self.object,
            "fields": self.fields,
            "row_count": self.row_count,
        })
    }
}

/// Pre-authorizes read-only queries at field level.
///
/// Stateless per call apart from the namespace qualifier read at construction, so a
/// single instance can be shared across threads.
pub struct QueryValidator {
    decomposer: QueryDecomposer,
    select_extractor: SelectFieldExtractor,
    where_extractor: WhereFieldExtractor,
    normalizer: FieldNormalizer,
    rewriter: NamespaceRewriter,
    schema: Arc<dyn SchemaResolver>,
    oracle: Arc<dyn AuthorizationOracle>,
}

impl QueryValidator {
    /// Create a new validator.
    ///
    /// The namespace qualifier is read from `namespace` here, once, and kept for the
    /// validator's lifetime.
    pub fn new(
        schema: Arc<dyn SchemaResolver>,
        oracle: Arc<dyn AuthorizationOracle>,
        namespace: &NamespaceResolver,
    ) -> Self {
        let defaults = NamespaceConfig::default();
        Self {
            decomposer: QueryDecomposer::new(),
            select_extractor: SelectFieldExtractor::new(),
            where_extractor: WhereFieldExtractor::default(),
            normalizer: FieldNormalizer::new(),
            rewriter: NamespaceRewriter::new(namespace, &defaults.custom_suffixes),
            schema,
            oracle,
        }
    }

    /// Build a standalone validator from configuration, using the config-backed
    /// permission table as both schema resolver and oracle.
    pub fn from_config(config: &GuardConfig) -> Self {
        let table = Arc::new(PermissionTable::from_config(config));
        let namespace =
            NamespaceResolver::new(StaticNamespaceProvider::new(config.namespace.clone()));

        Self::new(table.clone(), table, &namespace)
            .with_query_config(&config.query)
            .with_custom_suffixes(&config.namespace.custom_suffixes)
    }

    /// Apply predicate scanning options.
    pub fn with_query_config(mut self, config: &QueryConfig) -> Self {
        self.where_extractor = WhereFieldExtractor::new(config);
        self
    }

    /// Replace the suffixes that mark custom schema elements.
    pub fn with_custom_suffixes(mut self, custom_suffixes: &[String]) -> Self {
        let qualifier = self.rewriter.qualifier().map(str::to_string);
        self.rewriter = NamespaceRewriter::with_qualifier(qualifier, custom_suffixes);
        self
    }

    /// The namespace qualifier applied to custom names, if any.
    pub fn qualifier(&self) -> Option<&str> {
        self.rewriter.qualifier()
    }

    /// Recover the object and fields a query touches, without consulting any
    /// collaborator.
    pub fn analyze(&self, query: Option<&str>) -> Result<QueryAnalysis, ValidationError> {
        let query = query.ok_or_else(ValidationError::null_input)?;
        let segments = self.decomposer.decompose(query)?;

        // The row-count exemption covers the selection list only; filter fields are
        // always checked.
        let select = self.select_extractor.extract(&segments.select);
        let filter_fields = self
            .where_extractor
            .extract(segments.where_clause.as_deref());

        let fields = self.normalizer.normalize(select.fields.union(filter_fields));
        let fields = self.rewriter.rewrite_fields(fields);
        let object = self.rewriter.rewrite_object(&segments.from);

        Ok(QueryAnalysis {
            query: query.to_string(),
            segments,
            object,
            fields,
            row_count: select.row_count,
        })
    }

    /// Validate that the current principal may read every field the query touches.
    ///
    /// Returns the oracle's verdict unchanged. A query touching no field at all is
    /// granted without consulting the schema or the oracle.
    pub fn validate(&self, query: Option<&str>) -> Result<bool, ValidationError> {
        let analysis = self.analyze(query)?;

        if !analysis.requires_field_check() {
            tracing::debug!(object = %analysis.object, "No fields to check, granting");
            return Ok(true);
        }

        let identity = self
            .schema
            .resolve_object(&analysis.object)
            .ok_or_else(|| {
                tracing::warn!(object = %analysis.object, "Query targets an unknown object");
                ValidationError::unknown_object(&analysis.object)
            })?;

        let fields = analysis.fields.into_vec();
        let allowed = self.oracle.is_authorized_to_view(&identity, &fields);

        tracing::debug!(
            object = %identity,
            fields = ?fields,
            allowed,
            "Field-level read check"
        );

        Ok(allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrorKind;
    use fieldguard_core::ObjectIdentity;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Oracle that records every call and answers with a fixed verdict.
    struct RecordingOracle {
        verdict: bool,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl RecordingOracle {
        fn new(verdict: bool) -> Self {
            Self {
                verdict,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl AuthorizationOracle for RecordingOracle {
        fn is_authorized_to_view(&self, object: &ObjectIdentity, fields: &[String]) -> bool {
            self.calls
                .lock()
                .unwrap()
                .push((object.name.clone(), fields.to_vec()));
            self.verdict
        }
    }

    /// Schema that knows every object.
    struct OpenSchema;

    impl SchemaResolver for OpenSchema {
        fn resolve_object(&self, name: &str) -> Option<ObjectIdentity> {
            Some(ObjectIdentity::new(name))
        }
    }

    /// Schema that knows no object.
    struct EmptySchema;

    impl SchemaResolver for EmptySchema {
        fn resolve_object(&self, _name: &str) -> Option<ObjectIdentity> {
            None
        }
    }

    fn validator(
        schema: Arc<dyn SchemaResolver>,
        oracle: Arc<RecordingOracle>,
        qualifier: Option<&str>,
    ) -> QueryValidator {
        let provider = match qualifier {
            Some(q) => StaticNamespaceProvider::fixed(q),
            None => StaticNamespaceProvider::default(),
        };
        QueryValidator::new(schema, oracle, &NamespaceResolver::new(provider))
    }

    #[test]
    fn test_null_input() {
        let oracle = Arc::new(RecordingOracle::new(true));
        let validator = validator(Arc::new(OpenSchema), oracle.clone(), None);

        let err = validator.validate(None).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NullInput);
        assert!(oracle.calls().is_empty());
    }

    #[test]
    fn test_malformed_query() {
        let oracle = Arc::new(RecordingOracle::new(true));
        let validator = validator(Arc::new(OpenSchema), oracle.clone(), None);

        let err = validator.validate(Some("SELECT Name Account")).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MalformedQuery);
        assert!(oracle.calls().is_empty());
    }

    #[test]
    fn test_oracle_receives_fields() {
        let oracle = Arc::new(RecordingOracle::new(true));
        let validator = validator(Arc::new(OpenSchema), oracle.clone(), None);

        assert!(validator.validate(Some("SELECT Id, Name FROM Account")).unwrap());
        assert_eq!(oracle.calls(), vec![(
            "Account".to_string(),
            vec!["ID".to_string(), "NAME".to_string()]
        )]);
    }

    #[test]
    fn test_verdict_returned_unchanged() {
        let oracle = Arc::new(RecordingOracle::new(false));
        let validator = validator(Arc::new(OpenSchema), oracle.clone(), None);

        assert!(!validator.validate(Some("SELECT Name FROM Account")).unwrap());
        assert_eq!(oracle.calls().len(), 1);
    }

    #[test]
    fn test_row_count_skips_oracle_and_schema() {
        let oracle = Arc::new(RecordingOracle::new(false));
        let validator = validator(Arc::new(EmptySchema), oracle.clone(), None);

        assert!(validator.validate(Some("SELECT COUNT() FROM Opportunity")).unwrap());
        assert!(oracle.calls().is_empty());
    }

    #[test]
    fn test_row_count_still_checks_filter_fields() {
        let oracle = Arc::new(RecordingOracle::new(false));
        let validator = validator(Arc::new(OpenSchema), oracle.clone(), None);

        let query = "SELECT COUNT() FROM Opportunity WHERE Amount > 1000";
        assert!(!validator.validate(Some(query)).unwrap());
        assert_eq!(oracle.calls(), vec![(
            "Opportunity".to_string(),
            vec!["AMOUNT".to_string()]
        )]);
    }

    #[test]
    fn test_unknown_object() {
        let oracle = Arc::new(RecordingOracle::new(true));
        let validator = validator(Arc::new(EmptySchema), oracle.clone(), None);

        let err = validator.validate(Some("SELECT Id FROM Nope__c")).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownObject);
        assert!(oracle.calls().is_empty());
    }

    #[test]
    fn test_namespace_applied_to_object_and_fields() {
        let oracle = Arc::new(RecordingOracle::new(true));
        let validator = validator(Arc::new(OpenSchema), oracle.clone(), Some("Acme"));

        assert!(validator.validate(Some("SELECT Owner__r.Name FROM Task__c")).unwrap());
        assert_eq!(oracle.calls(), vec![(
            "Acme__Task__c".to_string(),
            vec!["ACME__OWNER__C".to_string()]
        )]);
    }

    #[test]
    fn test_analyze_reports_pipeline_result() {
        let oracle = Arc::new(RecordingOracle::new(true));
        let validator = validator(Arc::new(OpenSchema), oracle.clone(), None);

        let analysis = validator
            .analyze(Some(
                "SELECT Name, Manager.Name FROM Contact WHERE Email LIKE '%x%' LIMIT 5",
            ))
            .unwrap();
        assert_eq!(analysis.object, "Contact");
        assert_eq!(analysis.fields.into_vec(), vec!["EMAIL", "MANAGERID", "NAME"]);
        assert_eq!(analysis.segments.limit.as_deref(), Some("5"));
        assert!(!analysis.row_count);
        assert!(oracle.calls().is_empty());
    }

    #[test]
    fn test_analysis_json() {
        let oracle = Arc::new(RecordingOracle::new(true));
        let validator = validator(Arc::new(OpenSchema), oracle, None);

        let json = validator
            .analyze(Some("SELECT COUNT() FROM Lead WHERE Status = 'Open'"))
            .unwrap()
            .to_json();
        assert_eq!(json["object"], "Lead");
        assert_eq!(json["fields"], serde_json::json!(["STATUS"]));
        assert_eq!(json["row_count"], true);
        assert_eq!(json["segments"]["where"], "Status = 'Open'");
        assert!(json["segments"].get("order").is_none());
    }

    #[test]
    fn test_from_config() {
        let config = GuardConfig::from_yaml(
            r#"
namespace:
  qualifier: Acme
objects:
  Acme__Task__c:
    readable: [Id, Acme__Owner__c]
"#,
        )
        .unwrap();
        let validator = QueryValidator::from_config(&config);

        assert_eq!(validator.qualifier(), Some("Acme__"));
        assert!(validator.validate(Some("SELECT Id, Owner__r.Name FROM Task__c")).unwrap());
        assert!(!validator.validate(Some("SELECT Id, Subject FROM Task__c")).unwrap());
    }
}
