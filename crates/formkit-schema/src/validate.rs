//! # Record Validation
//!
//! Checks every top-level key of a record against the matching fragment
//! under the record schema's `properties`, and reports the keys that
//! fail together with structured violations.
//!
//! ## Schema Resolution
//!
//! Property fragments are compiled on their own, so a fragment containing
//! `{"$ref": "#/definitions/money"}` would lose the root it points into.
//! [`RecordSchema`] therefore carries the root's `definitions` and `$defs`
//! into each fragment before compiling it.
//!
//! Cross-record `$ref`s (`"https://forms.example/person.json"`) resolve
//! against the schemas handed to [`SchemaValidator::new`], indexed by their
//! `$id` (or Draft 4 `id`). Any other URI resolves to `{}` so validation
//! never reaches for the network.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jsonschema::{Retrieve, Uri, ValidationOptions, Validator};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::draft::SchemaDraft;

/// Keywords holding reusable sub-schemas that local `$ref`s point into.
const DEFINITION_KEYWORDS: [&str; 2] = ["definitions", "$defs"];

/// Resolves `$ref` URIs against the registered record schemas.
struct LocalSchemaRetriever {
    schemas_by_uri: Arc<HashMap<String, Value>>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        // Tolerate a trailing empty fragment (`.../person.json#`).
        if let Some(value) = self.schemas_by_uri.get(uri_str.trim_end_matches('#')) {
            return Ok(value.clone());
        }

        tracing::warn!(uri = %uri_str, "unresolved schema reference, accepting any value");
        Ok(serde_json::json!({}))
    }
}

/// Error in the schema itself, as opposed to a value failing it.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The record schema has no `properties` object.
    #[error("schema for record type '{record_type}' has no 'properties' object")]
    MissingProperties {
        /// Record type the schema is registered under.
        record_type: String,
    },

    /// A property fragment could not be compiled.
    #[error("schema for property '{key}' does not compile: {reason}")]
    Compile {
        /// Property whose fragment is invalid.
        key: String,
        /// Reason reported by the validator.
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating value, relative to the property.
    pub instance_path: String,
    /// JSON Pointer path within the property fragment.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(value): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// A top-level key that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFailure {
    /// The failing top-level key.
    pub key: String,
    /// Violations reported for the key's value. Empty when the key was
    /// failed explicitly rather than by the schema.
    pub violations: Vec<Violation>,
}

impl KeyFailure {
    /// A failure that did not come from schema validation.
    pub fn forced(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            violations: Vec::new(),
        }
    }
}

impl fmt::Display for KeyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "{}: marked as failed", self.key);
        }
        write!(f, "{}:", self.key)?;
        for v in &self.violations {
            write!(f, "\n  {v}")?;
        }
        Ok(())
    }
}

/// A record schema split into its property fragments.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    record_type: String,
    properties: Map<String, Value>,
    definitions: Map<String, Value>,
}

impl RecordSchema {
    /// Split `schema` into per-property fragments.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingProperties`] if `schema.properties`
    /// is absent or not an object.
    pub fn from_value(record_type: &str, schema: &Value) -> Result<Self, SchemaError> {
        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| SchemaError::MissingProperties {
                record_type: record_type.to_string(),
            })?;

        let mut definitions = Map::new();
        for keyword in DEFINITION_KEYWORDS {
            if let Some(defs) = schema.get(keyword) {
                definitions.insert(keyword.to_string(), defs.clone());
            }
        }

        Ok(Self {
            record_type: record_type.to_string(),
            properties,
            definitions,
        })
    }

    /// Returns the record type this schema belongs to.
    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// Returns the names of all declared properties.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Returns the fragment for `key`, with the root's definitions carried
    /// along so local `$ref`s keep resolving.
    pub fn fragment(&self, key: &str) -> Option<Value> {
        let mut fragment = self.properties.get(key)?.clone();
        if let Value::Object(obj) = &mut fragment {
            for (keyword, defs) in &self.definitions {
                obj.entry(keyword.clone()).or_insert_with(|| defs.clone());
            }
        }
        Some(fragment)
    }
}

/// Compiles property fragments and validates record values against them.
///
/// Cheap to clone; the registered schemas are shared.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    draft: SchemaDraft,
    schemas_by_uri: Arc<HashMap<String, Value>>,
}

impl SchemaValidator {
    /// Create a validator that resolves `$ref`s against `schemas`.
    ///
    /// Schemas without `$id` (or `id`) are not addressable and are skipped.
    pub fn new<'a>(schemas: impl IntoIterator<Item = &'a Value>, draft: SchemaDraft) -> Self {
        let mut schemas_by_uri = HashMap::new();
        for schema in schemas {
            for id_keyword in ["$id", "id"] {
                if let Some(id) = schema.get(id_keyword).and_then(Value::as_str) {
                    schemas_by_uri.insert(id.trim_end_matches('#').to_string(), schema.clone());
                }
            }
        }
        Self {
            draft,
            schemas_by_uri: Arc::new(schemas_by_uri),
        }
    }

    /// Returns the draft fragments are compiled against.
    pub fn draft(&self) -> SchemaDraft {
        self.draft
    }

    /// Returns the number of addressable schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas_by_uri.len()
    }

    fn build_options(&self) -> ValidationOptions {
        let mut opts = jsonschema::options();
        opts.with_draft(self.draft.into());
        opts.with_retriever(LocalSchemaRetriever {
            schemas_by_uri: Arc::clone(&self.schemas_by_uri),
        });
        opts
    }

    /// Compile the fragment for one property.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] if the fragment is not a valid schema.
    pub fn compile(&self, key: &str, fragment: &Value) -> Result<Validator, SchemaError> {
        self.build_options()
            .build(fragment)
            .map_err(|e| SchemaError::Compile {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    /// Validate every top-level key of `data` against its fragment.
    ///
    /// Keys listed in `skip` are not validated. Keys without a fragment are
    /// logged and pass. Failures are returned in the key order of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] if a fragment that is needed does not
    /// compile.
    pub fn failed_keys(
        &self,
        schema: &RecordSchema,
        data: &Map<String, Value>,
        skip: &[String],
    ) -> Result<Vec<KeyFailure>, SchemaError> {
        let mut failures = Vec::new();

        for (key, value) in data {
            if skip.iter().any(|s| s == key) {
                continue;
            }
            let Some(fragment) = schema.fragment(key) else {
                tracing::warn!(
                    record_type = %schema.record_type(),
                    key = %key,
                    "no schema for property"
                );
                continue;
            };

            let validator = self.compile(key, &fragment)?;
            let violations: Vec<Violation> = validator
                .iter_errors(value)
                .map(|e| Violation {
                    instance_path: e.instance_path.to_string(),
                    schema_path: e.schema_path.to_string(),
                    message: e.to_string(),
                })
                .collect();

            if !violations.is_empty() {
                tracing::debug!(key = %key, value = %value, "property failed schema validation");
                failures.push(KeyFailure {
                    key: key.clone(),
                    violations,
                });
            }
        }

        Ok(failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(schema: Value) -> RecordSchema {
        RecordSchema::from_value("person", &schema).unwrap()
    }

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn validator() -> SchemaValidator {
        SchemaValidator::new([], SchemaDraft::Draft4)
    }

    #[test]
    fn test_missing_properties_rejected() {
        let err = RecordSchema::from_value("person", &json!({"type": "object"})).unwrap_err();
        assert!(matches!(err, SchemaError::MissingProperties { .. }));
        assert!(err.to_string().contains("person"));
    }

    #[test]
    fn test_wrong_type_fails_key() {
        let schema = record(json!({
            "type": "object",
            "properties": { "age": { "type": "integer" } }
        }));
        let failures = validator()
            .failed_keys(&schema, &data(json!({"age": "abc"})), &[])
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].key, "age");
        assert!(!failures[0].violations.is_empty());
    }

    #[test]
    fn test_valid_record_passes() {
        let schema = record(json!({
            "type": "object",
            "properties": {
                "age": { "type": "integer", "minimum": 0 },
                "name": { "type": "string", "minLength": 1 }
            }
        }));
        let failures = validator()
            .failed_keys(&schema, &data(json!({"age": 30, "name": "Ada"})), &[])
            .unwrap();
        assert!(failures.is_empty());
    }

    #[test]
    fn test_key_without_fragment_passes() {
        let schema = record(json!({"type": "object", "properties": {}}));
        let failures = validator()
            .failed_keys(&schema, &data(json!({"anything": null})), &[])
            .unwrap();
        assert!(failures.is_empty());
    }

    #[test]
    fn test_failures_follow_record_order() {
        let schema = record(json!({
            "type": "object",
            "properties": {
                "a": { "type": "integer" },
                "b": { "type": "integer" }
            }
        }));
        let failures = validator()
            .failed_keys(&schema, &data(json!({"b": "x", "a": "y"})), &[])
            .unwrap();
        let keys: Vec<&str> = failures.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_skipped_keys_are_not_validated() {
        let schema = record(json!({
            "type": "object",
            "properties": { "age": { "type": "integer" } }
        }));
        let failures = validator()
            .failed_keys(&schema, &data(json!({"age": "abc"})), &["age".to_string()])
            .unwrap();
        assert!(failures.is_empty());
    }

    #[test]
    fn test_nested_object_validated_by_top_level_fragment() {
        let schema = record(json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "object",
                    "required": ["city"],
                    "properties": { "city": { "type": "string" } }
                }
            }
        }));
        let failures = validator()
            .failed_keys(&schema, &data(json!({"address": {"zip": "00100"}})), &[])
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].key, "address");
    }

    #[test]
    fn test_local_definitions_resolve() {
        let schema = record(json!({
            "type": "object",
            "definitions": {
                "ratio": { "type": "number", "minimum": 0, "maximum": 1 }
            },
            "properties": { "share": { "$ref": "#/definitions/ratio" } }
        }));
        let v = validator();
        assert!(v
            .failed_keys(&schema, &data(json!({"share": 0.25})), &[])
            .unwrap()
            .is_empty());
        let failures = v
            .failed_keys(&schema, &data(json!({"share": 2.5})), &[])
            .unwrap();
        assert_eq!(failures.len(), 1);
    }

    #[test]
    fn test_cross_record_ref_resolves_locally() {
        let address = json!({
            "$id": "https://forms.example/address.json",
            "type": "object",
            "required": ["city"],
            "properties": { "city": { "type": "string" } }
        });
        let v = SchemaValidator::new([&address], SchemaDraft::Draft7);
        assert_eq!(v.schema_count(), 1);

        let schema = record(json!({
            "type": "object",
            "properties": {
                "home": { "$ref": "https://forms.example/address.json" }
            }
        }));
        let failures = v
            .failed_keys(&schema, &data(json!({"home": {}})), &[])
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].key, "home");
    }

    #[test]
    fn test_invalid_fragment_is_compile_error() {
        let schema = record(json!({
            "type": "object",
            "properties": { "age": { "type": 12 } }
        }));
        let err = validator()
            .failed_keys(&schema, &data(json!({"age": 1})), &[])
            .unwrap_err();
        match err {
            SchemaError::Compile { key, .. } => assert_eq!(key, "age"),
            other => panic!("Expected Compile, got: {other}"),
        }
    }

    #[test]
    fn test_violation_display_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/type".to_string(),
            message: r#""abc" is not of type "integer""#.to_string(),
        };
        assert!(v.to_string().starts_with("(value)"));
    }

    #[test]
    fn test_forced_failure_display() {
        assert_eq!(KeyFailure::forced("plan").to_string(), "plan: marked as failed");
    }
}
