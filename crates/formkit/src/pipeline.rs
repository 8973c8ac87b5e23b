//! # Parse Pipeline
//!
//! extract → post-process → validate → mark. Extraction and validation
//! are synchronous; the post-processing hook is the only await point.

use std::future::{self, Future};

use formkit_schema::{KeyFailure, RecordSchema};

use crate::data::FormData;
use crate::element::Form;
use crate::error::FormError;
use crate::extract::{extract, Extraction};
use crate::options::ParseOptions;

/// A post-processing step run between extraction and validation.
///
/// The hook receives the extracted record and resolves to the record to
/// validate: the same value (possibly mutated, possibly with keys flagged
/// through [`FormData::fail`]) or a replacement.
///
/// Any `FnOnce(FormData) -> impl Future<Output = FormData>` is a hook;
/// wrap synchronous logic in [`std::future::ready`].
pub trait PostProcess {
    /// Future resolving to the record to validate.
    type Future: Future<Output = FormData>;

    /// Run the hook.
    fn post_process(self, data: FormData) -> Self::Future;
}

impl<F, Fut> PostProcess for F
where
    F: FnOnce(FormData) -> Fut,
    Fut: Future<Output = FormData>,
{
    type Future = Fut;

    fn post_process(self, data: FormData) -> Fut {
        self(data)
    }
}

/// Parse `form` into a validated record.
///
/// # Errors
///
/// See [`parse_form_with`].
pub async fn parse_form<F>(form: &F, options: &ParseOptions) -> Result<FormData, FormError>
where
    F: Form + ?Sized,
{
    parse_form_with(form, options, future::ready).await
}

/// Parse `form` into a validated record, running `hook` before validation.
///
/// # Errors
///
/// Returns [`FormError::InputFailed`] when keys fail their schema fragment
/// or were flagged by the hook; the elements of those keys carry the error
/// marker afterwards. Returns [`FormError::Schema`] when the record type's
/// schema is malformed.
pub async fn parse_form_with<F, P>(
    form: &F,
    options: &ParseOptions,
    hook: P,
) -> Result<FormData, FormError>
where
    F: Form + ?Sized,
    P: PostProcess,
{
    let Extraction {
        record_type,
        data,
        index,
    } = extract(form, options);

    let data = hook.post_process(data).await;

    if let Err(err) = validate(&data, record_type.as_deref(), options) {
        if let FormError::InputFailed { keys, .. } = &err {
            index.mark_failed(keys.as_slice());
        }
        return Err(err);
    }
    Ok(data)
}

/// Validate a record against the schema of `record_type`.
///
/// Keys flagged with [`FormData::fail`] always fail and are not validated
/// again. Without a record type, or when the type has no schema, only
/// flagged keys can fail.
///
/// # Errors
///
/// Returns [`FormError::InputFailed`] listing flagged keys followed by
/// schema failures, or [`FormError::Schema`] for a malformed schema.
pub fn validate(
    data: &FormData,
    record_type: Option<&str>,
    options: &ParseOptions,
) -> Result<(), FormError> {
    let forced = data.failed_keys();
    let mut failures: Vec<KeyFailure> = forced.iter().map(KeyFailure::forced).collect();

    if let Some((record_type, schema)) =
        record_type.and_then(|rt| options.schema_for(rt).map(|schema| (rt, schema)))
    {
        let record_schema = RecordSchema::from_value(record_type, schema)?;
        failures.extend(
            options
                .schema_validator()
                .failed_keys(&record_schema, data.values(), forced)?,
        );
    } else if let Some(record_type) = record_type {
        tracing::debug!(record_type = %record_type, "no schema registered for record type");
    }

    if failures.is_empty() {
        return Ok(());
    }

    tracing::info!(
        keys = ?failures.iter().map(|f| f.key.as_str()).collect::<Vec<_>>(),
        "form input failed validation"
    );
    Err(FormError::input_failed(failures))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RecordType;
    use serde_json::json;

    fn person_options() -> ParseOptions {
        ParseOptions::new().with_type(
            "person",
            RecordType::with_schema(json!({
                "type": "object",
                "properties": { "age": { "type": "integer" } }
            })),
        )
    }

    fn record(value: serde_json::Value) -> FormData {
        FormData::from(value.as_object().cloned().unwrap())
    }

    #[test]
    fn schema_failure_lists_key() {
        let err = validate(&record(json!({"age": "abc"})), Some("person"), &person_options()).unwrap_err();
        assert_eq!(err.failed_keys(), ["age"]);
        assert!(err.to_string().contains("age"));
    }

    #[test]
    fn valid_record_passes() {
        validate(&record(json!({"age": 30})), Some("person"), &person_options()).unwrap();
    }

    #[test]
    fn unknown_record_type_skips_validation() {
        validate(&record(json!({"age": "abc"})), Some("invoice"), &person_options()).unwrap();
        validate(&record(json!({"age": "abc"})), None, &person_options()).unwrap();
    }

    #[test]
    fn flagged_key_fails_without_schema() {
        let mut data = record(json!({"plan": "pro"}));
        data.fail("plan");
        let err = validate(&data, None, &ParseOptions::new()).unwrap_err();
        assert_eq!(err.failed_keys(), ["plan"]);
    }

    #[test]
    fn flagged_keys_come_first_without_duplicates() {
        let mut data = record(json!({"age": "abc", "name": "x"}));
        data.fail("name");
        data.fail("age");
        let options = person_options();
        let err = validate(&data, Some("person"), &options).unwrap_err();
        assert_eq!(err.failed_keys(), ["name", "age"]);
    }

    #[test]
    fn malformed_schema_is_schema_error() {
        let options = ParseOptions::new().with_type("person", RecordType::with_schema(json!({"type": "object"})));
        let err = validate(&record(json!({"age": 1})), Some("person"), &options).unwrap_err();
        assert!(matches!(err, FormError::Schema(_)));
    }
}
