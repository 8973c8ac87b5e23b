//! # Parse Options
//!
//! Configuration for one or many [`parse_form`](crate::parse_form) calls.
//! Every field has a default, so an empty YAML or JSON document is a valid
//! configuration:
//!
//! ```yaml
//! record_type_attribute: data-nopg-type
//! datatype_attribute: data-type
//! draft: draft4
//! types:
//!   person:
//!     $schema:
//!       type: object
//!       properties:
//!         age: { type: integer }
//! ```

use std::collections::BTreeMap;

use formkit_schema::{SchemaDraft, SchemaValidator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::convert::{Converter, ConverterRegistry};

/// Default form attribute naming the record type.
pub const DEFAULT_RECORD_TYPE_ATTRIBUTE: &str = "data-nopg-type";
/// Default element attribute naming the datatype.
pub const DEFAULT_DATATYPE_ATTRIBUTE: &str = "data-type";

/// A record type: what a form's record-type attribute refers to.
///
/// Other keys of the type descriptor are accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordType {
    /// JSON Schema the record is validated against.
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl RecordType {
    /// A record type validated against `schema`.
    pub fn with_schema(schema: Value) -> Self {
        Self {
            schema: Some(schema),
        }
    }
}

/// Options controlling extraction and validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Record types by identifier.
    pub types: BTreeMap<String, RecordType>,
    /// Form attribute holding the record type identifier.
    pub record_type_attribute: String,
    /// Element attribute holding the datatype tag.
    pub datatype_attribute: String,
    /// JSON Schema draft for property fragments.
    pub draft: SchemaDraft,
    /// Datatype converters. Not part of the serialized form.
    #[serde(skip)]
    pub converters: ConverterRegistry,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            types: BTreeMap::new(),
            record_type_attribute: DEFAULT_RECORD_TYPE_ATTRIBUTE.to_string(),
            datatype_attribute: DEFAULT_DATATYPE_ATTRIBUTE.to_string(),
            draft: SchemaDraft::default(),
            converters: ConverterRegistry::builtin(),
        }
    }
}

impl ParseOptions {
    /// Options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record type.
    pub fn with_type(mut self, id: impl Into<String>, record_type: RecordType) -> Self {
        self.types.insert(id.into(), record_type);
        self
    }

    /// Register a custom datatype converter.
    pub fn with_converter(mut self, tag: impl Into<String>, converter: Converter) -> Self {
        self.converters.register(tag, converter);
        self
    }

    /// Use a different JSON Schema draft.
    pub fn with_draft(mut self, draft: SchemaDraft) -> Self {
        self.draft = draft;
        self
    }

    /// Returns the schema registered for `record_type`, if any.
    pub fn schema_for(&self, record_type: &str) -> Option<&Value> {
        self.types.get(record_type)?.schema.as_ref()
    }

    /// A validator that resolves `$ref`s against every registered schema.
    pub fn schema_validator(&self) -> SchemaValidator {
        SchemaValidator::new(
            self.types.values().filter_map(|t| t.schema.as_ref()),
            self.draft,
        )
    }
}
