//! # Headless Forms
//!
//! An in-memory [`Form`] for tests and tooling. A snapshot can be built in
//! code or deserialized from JSON/YAML:
//!
//! ```json
//! {
//!   "attributes": { "data-nopg-type": "person" },
//!   "elements": [
//!     { "attributes": { "name": "age", "data-type": "int" }, "value": "42" },
//!     { "attributes": { "name": "subscribe", "type": "checkbox" }, "checked": true }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::element::{Form, FormElement, ID_ATTRIBUTE, NAME_ATTRIBUTE, TYPE_ATTRIBUTE};
use crate::options::DEFAULT_DATATYPE_ATTRIBUTE;

/// An in-memory input element with an observable error marker.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HeadlessElement {
    /// Element attributes (`name`, `id`, `type`, `data-type`, ...).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Current textual value.
    #[serde(default)]
    pub value: String,
    /// Checked state for checkboxes and radio buttons.
    #[serde(default)]
    pub checked: bool,
    #[serde(skip)]
    error_marker: AtomicBool,
}

impl HeadlessElement {
    /// An element with no attributes and an empty value.
    pub fn new() -> Self {
        Self::default()
    }

    /// A text input.
    pub fn text(name: &str, value: &str) -> Self {
        Self::new().with_attribute(NAME_ATTRIBUTE, name).with_value(value)
    }

    /// A checkbox.
    pub fn checkbox(name: &str, checked: bool) -> Self {
        Self::new()
            .with_attribute(NAME_ATTRIBUTE, name)
            .with_attribute(TYPE_ATTRIBUTE, "checkbox")
            .with_value("on")
            .with_checked(checked)
    }

    /// A radio button.
    pub fn radio(name: &str, value: &str, checked: bool) -> Self {
        Self::new()
            .with_attribute(NAME_ATTRIBUTE, name)
            .with_attribute(TYPE_ATTRIBUTE, "radio")
            .with_value(value)
            .with_checked(checked)
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Set the datatype tag under the default datatype attribute.
    pub fn with_datatype(self, datatype: &str) -> Self {
        self.with_attribute(DEFAULT_DATATYPE_ATTRIBUTE, datatype)
    }

    /// Set the value.
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    /// Set the checked state.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Returns the field key: `name`, or `id` when `name` is absent.
    pub fn key(&self) -> Option<&str> {
        [NAME_ATTRIBUTE, ID_ATTRIBUTE]
            .iter()
            .filter_map(|attr| self.attributes.get(*attr))
            .map(String::as_str)
            .find(|k| !k.is_empty())
    }

    /// Returns true if the error marker is set.
    pub fn has_error_marker(&self) -> bool {
        self.error_marker.load(Ordering::Relaxed)
    }
}

impl FormElement for HeadlessElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn value(&self) -> String {
        self.value.clone()
    }

    fn is_checked(&self) -> bool {
        self.checked
    }

    fn set_error_marker(&self, failed: bool) {
        self.error_marker.store(failed, Ordering::Relaxed);
    }
}

/// An in-memory form.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HeadlessForm {
    /// Form attributes (the record type attribute lives here).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Elements in document order.
    #[serde(default)]
    pub elements: Vec<HeadlessElement>,
}

impl HeadlessForm {
    /// An empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a form attribute.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Append an element.
    pub fn with_element(mut self, element: HeadlessElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Returns the elements carrying the error marker.
    pub fn marked(&self) -> impl Iterator<Item = &HeadlessElement> {
        self.elements.iter().filter(|el| el.has_error_marker())
    }

    /// Returns the keys of the elements carrying the error marker.
    pub fn marked_keys(&self) -> Vec<&str> {
        self.marked().filter_map(HeadlessElement::key).collect()
    }
}

impl Form for HeadlessForm {
    type Element = HeadlessElement;

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn elements(&self) -> Vec<&HeadlessElement> {
        self.elements.iter().collect()
    }
}
