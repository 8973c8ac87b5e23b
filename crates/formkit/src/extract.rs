//! # Field Extraction
//!
//! The synchronous first half of the pipeline: read the record type,
//! walk the elements, convert and store their values, and remember which
//! element produced which key so failures can be marked later.

use std::collections::HashMap;

use crate::convert::RawValue;
use crate::data::FormData;
use crate::element::{non_empty_attribute, Form, FormElement, InputKind, ID_ATTRIBUTE, NAME_ATTRIBUTE};
use crate::options::ParseOptions;

/// Key to originating element, for marking failed fields.
///
/// When several elements share a key, the last one wins.
pub struct FieldIndex<'f, E> {
    elements: HashMap<String, &'f E>,
}

impl<'f, E: FormElement> FieldIndex<'f, E> {
    fn new() -> Self {
        Self {
            elements: HashMap::new(),
        }
    }

    /// Returns the element that produced `key`.
    pub fn get(&self, key: &str) -> Option<&'f E> {
        self.elements.get(key).copied()
    }

    /// Returns the number of indexed keys.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if no key was indexed.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Set the error marker on the element of each key. Keys without an
    /// element (added by a post-processing hook) are ignored.
    pub fn mark_failed<S: AsRef<str>>(&self, keys: &[S]) {
        for key in keys {
            if let Some(element) = self.get(key.as_ref()) {
                element.set_error_marker(true);
            }
        }
    }
}

/// The outcome of reading a form.
pub struct Extraction<'f, E> {
    /// Record type read from the form, if it has one.
    pub record_type: Option<String>,
    /// The extracted record.
    pub data: FormData,
    /// Elements by key.
    pub index: FieldIndex<'f, E>,
}

/// Read every element of `form` into a record.
///
/// Clears the error marker of every element it visits, including
/// unselected radio buttons. Elements with neither `name` nor `id` are
/// logged and dropped, as are dotted keys whose path runs through a
/// non-object value.
pub fn extract<'f, F>(form: &'f F, options: &ParseOptions) -> Extraction<'f, F::Element>
where
    F: Form + ?Sized,
{
    let record_type = form
        .attribute(&options.record_type_attribute)
        .filter(|t| !t.is_empty());

    let mut data = FormData::new();
    let mut index = FieldIndex::new();

    for element in form.elements() {
        element.set_error_marker(false);

        let kind = InputKind::of(element);
        if kind == InputKind::Radio && !element.is_checked() {
            continue;
        }

        let raw = match kind {
            InputKind::Checkbox => RawValue::Checked(element.is_checked()),
            InputKind::Radio | InputKind::Text => RawValue::Text(element.value()),
        };
        let datatype = non_empty_attribute(element, &options.datatype_attribute)
            .unwrap_or_else(|| kind.default_datatype().as_str().to_string());
        let value = options.converters.convert(&datatype, &raw);

        let key = non_empty_attribute(element, NAME_ATTRIBUTE)
            .or_else(|| non_empty_attribute(element, ID_ATTRIBUTE));
        let Some(key) = key else {
            tracing::warn!(value = %value, "no key detected for form field, dropping value");
            continue;
        };

        if key.contains('.') {
            if !data.insert_path(&key, value) {
                tracing::warn!(key = %key, "dotted key runs through a non-object value, dropping value");
            }
        } else {
            data.insert(key.clone(), value);
        }
        index.elements.insert(key, element);
    }

    tracing::debug!(
        record_type = record_type.as_deref().unwrap_or(""),
        fields = index.len(),
        "extracted form fields"
    );

    Extraction {
        record_type,
        data,
        index,
    }
}
