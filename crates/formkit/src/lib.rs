//! # formkit: Form Extraction and Validation
//!
//! Turns the fields of a form into a typed JSON record:
//!
//! 1. Read the record type from the form (`data-nopg-type` by default).
//! 2. Walk every input element in document order, derive its key from
//!    `name` (falling back to `id`), skip unselected radios, and convert
//!    its raw value using the datatype tag from `data-type`.
//! 3. Store the value, expanding dotted keys (`"address.city"`) into
//!    nested objects.
//! 4. Hand the record to an optional post-processing hook, which may
//!    mutate it, replace it, or flag keys with [`FormData::fail`].
//! 5. Validate each top-level key against the record type's JSON Schema,
//!    mark the elements of failing keys, and fail with their names.
//!
//! ## Element Access
//!
//! The DOM is abstracted behind [`Form`] and [`FormElement`]. The
//! [`headless`] module provides an in-memory implementation used by the
//! tests and the CLI.
//!
//! ## Concurrency
//!
//! Each call owns its record and field index. The only suspension point
//! is the post-processing hook. Running the pipeline concurrently over the
//! same form leaves the error markers in an unspecified state.

pub mod convert;
pub mod data;
pub mod element;
pub mod error;
pub mod extract;
pub mod headless;
pub mod options;
pub mod pipeline;

// Re-export primary types for ergonomic imports.
pub use convert::{Converter, ConverterRegistry, Datatype, RawValue};
pub use data::FormData;
pub use element::{Form, FormElement, InputKind};
pub use error::FormError;
pub use extract::{extract, Extraction, FieldIndex};
pub use headless::{HeadlessElement, HeadlessForm};
pub use options::{ParseOptions, RecordType};
pub use pipeline::{parse_form, parse_form_with, validate, PostProcess};

pub use formkit_schema::{KeyFailure, SchemaDraft, SchemaError, Violation};
