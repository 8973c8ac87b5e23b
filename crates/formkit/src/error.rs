//! # Error Types

use formkit_schema::{KeyFailure, SchemaError};
use thiserror::Error;

/// Terminal failure of [`parse_form`](crate::parse_form).
#[derive(Error, Debug)]
pub enum FormError {
    /// One or more top-level keys failed validation or were flagged by the
    /// post-processing hook. Their elements are marked before this is
    /// returned.
    #[error("Input parsing failed for keys: {}", .keys.join(", "))]
    InputFailed {
        /// Failing keys: flagged keys first, then schema failures.
        keys: Vec<String>,
        /// Per-key details.
        failures: Vec<KeyFailure>,
    },

    /// The record type's schema is malformed.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl FormError {
    pub(crate) fn input_failed(failures: Vec<KeyFailure>) -> Self {
        Self::InputFailed {
            keys: failures.iter().map(|f| f.key.clone()).collect(),
            failures,
        }
    }

    /// Returns the failing keys, or an empty slice for schema errors.
    pub fn failed_keys(&self) -> &[String] {
        match self {
            Self::InputFailed { keys, .. } => keys,
            Self::Schema(_) => &[],
        }
    }
}
