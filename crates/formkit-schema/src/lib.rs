//! # formkit-schema: Per-Property Record Validation
//!
//! Validates an extracted form record against the JSON Schema registered
//! for its record type. Unlike whole-document validation, each top-level
//! key is checked on its own against `properties[key]`, so the caller
//! learns exactly which fields to flag.
//!
//! ## Policy
//!
//! - A key without a schema fragment passes (logged, not failed).
//! - Nested objects produced by dotted keys are validated as a whole by
//!   their top-level fragment, never key by key.
//! - No network access: `$ref`s resolve against the registered record
//!   schemas, anything else resolves to an accept-all schema.

pub mod draft;
pub mod validate;

pub use draft::SchemaDraft;
pub use validate::{KeyFailure, RecordSchema, SchemaError, SchemaValidator, Violation};
