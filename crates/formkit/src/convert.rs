//! # Datatype Converters
//!
//! An explicit registry from datatype tag to a pure conversion function.
//! The built-in tags:
//!
//! | Tag | Conversion |
//! |-----|------------|
//! | `string` | text as-is; checkboxes become `"true"`/`"false"` |
//! | `int` | [`parse_smart_int`] |
//! | `number`, `float` | [`parse_smart_number`] |
//! | `percent` | [`parse_smart_percent`] |
//! | `boolean` | checked state, or non-empty text |
//!
//! A parser that finds no value stores `null`. Unknown tags convert like
//! `string`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use formkit_smart::{parse_smart_int, parse_smart_number, parse_smart_percent};
use serde_json::{Number, Value};

/// The raw value read from an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Text of an input, select or textarea.
    Text(String),
    /// Checked state of a checkbox.
    Checked(bool),
}

impl RawValue {
    /// Textual form: checkbox states render as `"true"`/`"false"`.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Checked(b) => b.to_string(),
        }
    }
}

/// A conversion from raw element value to a JSON value.
pub type Converter = fn(&RawValue) -> Value;

/// Built-in datatype tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    /// Plain text.
    String,
    /// Integer, with floored percentages.
    Int,
    /// Decimal number.
    Number,
    /// Alias of [`Datatype::Number`].
    Float,
    /// Percentage as a fraction.
    Percent,
    /// Truthiness of the raw value.
    Boolean,
}

impl Datatype {
    /// Returns all built-in datatypes.
    pub fn all() -> &'static [Datatype] {
        &[
            Self::String,
            Self::Int,
            Self::Number,
            Self::Float,
            Self::Percent,
            Self::Boolean,
        ]
    }

    /// Returns the tag as written in the datatype attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Number => "number",
            Self::Float => "float",
            Self::Percent => "percent",
            Self::Boolean => "boolean",
        }
    }

    fn converter(&self) -> Converter {
        match self {
            Self::String => convert_string,
            Self::Int => convert_int,
            Self::Number | Self::Float => convert_number,
            Self::Percent => convert_percent,
            Self::Boolean => convert_boolean,
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Datatype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown datatype: {s}"))
    }
}

fn convert_string(raw: &RawValue) -> Value {
    Value::String(raw.as_text())
}

fn convert_int(raw: &RawValue) -> Value {
    parse_smart_int(raw.as_text().as_str()).map_or(Value::Null, Value::from)
}

fn convert_number(raw: &RawValue) -> Value {
    parse_smart_number(raw.as_text().as_str()).map_or(Value::Null, number_value)
}

fn convert_percent(raw: &RawValue) -> Value {
    parse_smart_percent(raw.as_text().as_str()).map_or(Value::Null, number_value)
}

fn convert_boolean(raw: &RawValue) -> Value {
    match raw {
        RawValue::Checked(b) => Value::Bool(*b),
        RawValue::Text(s) => Value::Bool(!s.is_empty()),
    }
}

/// Largest integer an `f64` represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Store integral numbers as JSON integers so `"type": "integer"` accepts
/// them under every draft. Non-finite values have no JSON form.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Value::from(n as i64);
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

/// Mapping from datatype tag to converter.
#[derive(Clone)]
pub struct ConverterRegistry {
    converters: HashMap<String, Converter>,
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

impl ConverterRegistry {
    /// A registry holding only the built-in datatypes.
    pub fn builtin() -> Self {
        let converters = Datatype::all()
            .iter()
            .map(|d| (d.as_str().to_string(), d.converter()))
            .collect();
        Self { converters }
    }

    /// Register a converter under `tag`, returning the one it replaces.
    pub fn register(&mut self, tag: impl Into<String>, converter: Converter) -> Option<Converter> {
        self.converters.insert(tag.into(), converter)
    }

    /// Returns true if `tag` has a converter.
    pub fn contains(&self, tag: &str) -> bool {
        self.converters.contains_key(tag)
    }

    /// Returns the registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Convert `raw` using the converter for `tag`, falling back to the
    /// string conversion for unknown tags.
    pub fn convert(&self, tag: &str, raw: &RawValue) -> Value {
        match self.converters.get(tag) {
            Some(converter) => converter(raw),
            None => {
                tracing::debug!(datatype = %tag, "unknown datatype, converting as string");
                convert_string(raw)
            }
        }
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
