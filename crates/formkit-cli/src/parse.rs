//! # Parse Subcommand
//!
//! Runs the pipeline over a form snapshot and reports either the record or
//! the failing keys together with the elements that ended up marked.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Args;
use formkit::{parse_form, FormError, KeyFailure};
use serde_json::Value;

use crate::config::{load_form, load_options};

/// Arguments for the parse subcommand.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Form snapshot (JSON, or YAML by extension).
    #[arg(long)]
    pub form: PathBuf,

    /// Parse options with record types and schemas (JSON, or YAML by extension).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Record type to use instead of the one on the form.
    #[arg(long)]
    pub record_type: Option<String>,
}

/// Result of running the pipeline.
#[derive(Debug)]
pub enum ParseOutcome {
    /// The record passed validation.
    Valid(Value),
    /// One or more keys failed.
    Invalid {
        /// Per-key failures in report order.
        failures: Vec<KeyFailure>,
        /// Keys of the elements carrying the error marker.
        marked: Vec<String>,
    },
}

impl ParseOutcome {
    /// Process exit code: 0 for a valid record, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Valid(_) => 0,
            Self::Invalid { .. } => 1,
        }
    }

    /// Human-readable rendering; a valid record renders as pretty JSON.
    pub fn render(&self) -> String {
        match self {
            Self::Valid(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Self::Invalid { failures, marked } => {
                let keys: Vec<&str> = failures.iter().map(|f| f.key.as_str()).collect();
                let mut out = format!("Input parsing failed for keys: {}", keys.join(", "));
                for failure in failures {
                    let _ = write!(out, "\n{failure}");
                }
                if !marked.is_empty() {
                    let _ = write!(out, "\nmarked fields: {}", marked.join(", "));
                }
                out
            }
        }
    }
}

/// Run the parse subcommand.
///
/// # Errors
///
/// Fails if the form or options cannot be loaded, or if the record type's
/// schema is malformed. Validation failures are an [`ParseOutcome::Invalid`]
/// outcome, not an error.
pub async fn run_parse(args: &ParseArgs) -> anyhow::Result<ParseOutcome> {
    let options = load_options(args.config.as_deref())?;
    let mut form = load_form(&args.form)?;

    if let Some(record_type) = &args.record_type {
        form.attributes
            .insert(options.record_type_attribute.clone(), record_type.clone());
    }

    match parse_form(&form, &options).await {
        Ok(data) => Ok(ParseOutcome::Valid(data.into_value())),
        Err(FormError::InputFailed { failures, .. }) => Ok(ParseOutcome::Invalid {
            failures,
            marked: form.marked_keys().into_iter().map(String::from).collect(),
        }),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &tempfile::TempDir, name: &str, value: &Value) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    fn fixtures(age: &str) -> (tempfile::TempDir, ParseArgs) {
        let dir = tempfile::tempdir().unwrap();
        let form = write(
            &dir,
            "form.json",
            &json!({
                "attributes": {},
                "elements": [
                    { "attributes": { "name": "age", "data-type": "int" }, "value": age },
                    { "attributes": { "name": "vat", "data-type": "percent" }, "value": "24" }
                ]
            }),
        );
        let config = write(
            &dir,
            "options.json",
            &json!({
                "types": {
                    "person": {
                        "$schema": {
                            "type": "object",
                            "properties": { "age": { "type": "integer" } }
                        }
                    }
                }
            }),
        );
        let args = ParseArgs {
            form,
            config: Some(config),
            record_type: Some("person".to_string()),
        };
        (dir, args)
    }

    #[tokio::test]
    async fn test_valid_form_renders_record() {
        let (_dir, args) = fixtures("42");
        let outcome = run_parse(&args).await.unwrap();
        assert_eq!(outcome.exit_code(), 0);
        match &outcome {
            ParseOutcome::Valid(value) => assert_eq!(value, &json!({"age": 42, "vat": 0.24})),
            other => panic!("Expected Valid, got: {other:?}"),
        }
        assert!(outcome.render().contains("\"age\": 42"));
    }

    #[tokio::test]
    async fn test_invalid_form_lists_keys_and_marks() {
        let (_dir, args) = fixtures("forty-two");
        let outcome = run_parse(&args).await.unwrap();
        assert_eq!(outcome.exit_code(), 1);
        let rendered = outcome.render();
        assert!(rendered.starts_with("Input parsing failed for keys: age"));
        assert!(rendered.contains("marked fields: age"));
    }

    #[tokio::test]
    async fn test_without_record_type_nothing_is_validated() {
        let (_dir, mut args) = fixtures("forty-two");
        args.record_type = None;
        let outcome = run_parse(&args).await.unwrap();
        assert_eq!(outcome.exit_code(), 0);
    }
}
