//! # Form Record
//!
//! [`FormData`] is the record built from a form: an insertion-ordered JSON
//! object plus the set of keys a post-processing hook flagged as failed.
//!
//! ## Dotted Keys
//!
//! A key such as `"address.city"` stores into `{"address": {"city": ..}}`.
//! Missing intermediate objects are created; existing ones are reused, so
//! `"address.zip"` lands next to `"address.city"`. A `null` intermediate
//! (a field that parsed to no value) is replaced by an object. Any other
//! non-object intermediate makes the write fail.
//!
//! ## Failure Marker
//!
//! [`FormData::fail`] replaces a top-level value with `null` and records
//! the key. Recorded keys fail the record whatever the schema says.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The record extracted from a form.
///
/// Serializes as the plain JSON object; failure flags are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    values: Map<String, Value>,
    #[serde(skip)]
    failed: Vec<String>,
}

impl FormData {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of top-level keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the record has no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value under a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns a mutable reference to the value under a top-level key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.values.get_mut(key)
    }

    /// Returns the value under a dotted path.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.values.get(first)?, |current, segment| current.get(segment))
    }

    /// Insert a value under a top-level key, returning the previous one.
    ///
    /// The key is taken literally, dots included.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    /// Insert a value under a dotted path.
    ///
    /// Returns false, leaving the record unchanged, when an intermediate
    /// segment holds something other than an object or `null`.
    pub fn insert_path(&mut self, path: &str, value: Value) -> bool {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(name) = segments.pop() else {
            return false;
        };

        let mut current = &mut self.values;
        for segment in segments {
            let slot = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if slot.is_null() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(obj) => obj,
                _ => return false,
            };
        }
        current.insert(name.to_string(), value);
        true
    }

    /// Remove a top-level key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    /// Flag a top-level key as failed, replacing its value with `null`.
    ///
    /// The key is added if the record does not hold it yet.
    pub fn fail(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.values.insert(key.clone(), Value::Null);
        if !self.failed.contains(&key) {
            self.failed.push(key);
        }
    }

    /// Returns true if `key` was flagged with [`FormData::fail`].
    pub fn is_failed(&self, key: &str) -> bool {
        self.failed.iter().any(|k| k == key)
    }

    /// Returns the flagged keys in the order they were flagged.
    pub fn failed_keys(&self) -> &[String] {
        &self.failed
    }

    /// Returns the top-level keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the underlying JSON object.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Returns the underlying JSON object mutably.
    pub fn values_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.values
    }

    /// Consumes the record and returns it as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

impl From<Map<String, Value>> for FormData {
    fn from(values: Map<String, Value>) -> Self {
        Self {
            values,
            failed: Vec::new(),
        }
    }
}

impl From<FormData> for Value {
    fn from(data: FormData) -> Self {
        data.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dotted_key_creates_nested_object() {
        let mut data = FormData::new();
        assert!(data.insert_path("address.city", json!("Helsinki")));
        assert_eq!(data.into_value(), json!({"address": {"city": "Helsinki"}}));
    }

    #[test]
    fn dotted_keys_merge_siblings() {
        let mut data = FormData::new();
        data.insert_path("address.city", json!("Helsinki"));
        data.insert_path("address.zip", json!("00100"));
        assert_eq!(
            data.into_value(),
            json!({"address": {"city": "Helsinki", "zip": "00100"}})
        );
    }

    #[test]
    fn deep_paths() {
        let mut data = FormData::new();
        data.insert_path("a.b.c", json!(1));
        data.insert_path("a.b.d", json!(2));
        data.insert_path("a.e", json!(3));
        assert_eq!(data.get_path("a.b.d"), Some(&json!(2)));
        assert_eq!(data.into_value(), json!({"a": {"b": {"c": 1, "d": 2}, "e": 3}}));
    }

    #[test]
    fn plain_key_is_top_level() {
        let mut data = FormData::new();
        data.insert_path("name", json!("Ada"));
        assert_eq!(data.get("name"), Some(&json!("Ada")));
    }

    #[test]
    fn non_object_intermediate_rejects_write() {
        let mut data = FormData::new();
        data.insert("address", json!("Main St 1"));
        assert!(!data.insert_path("address.city", json!("Helsinki")));
        assert_eq!(data.get("address"), Some(&json!("Main St 1")));
    }

    #[test]
    fn null_intermediate_becomes_object() {
        let mut data = FormData::new();
        data.insert("address", Value::Null);
        assert!(data.insert_path("address.city", json!("Helsinki")));
        assert_eq!(data.get_path("address.city"), Some(&json!("Helsinki")));
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut data = FormData::new();
        data.insert("zeta", json!(1));
        data.insert("alpha", json!(2));
        assert_eq!(data.keys().collect::<Vec<_>>(), ["zeta", "alpha"]);
    }

    #[test]
    fn fail_replaces_value_and_records_key_once() {
        let mut data = FormData::new();
        data.insert("age", json!(12));
        data.fail("age");
        data.fail("age");
        data.fail("invented");
        assert_eq!(data.get("age"), Some(&Value::Null));
        assert!(data.is_failed("age"));
        assert!(data.is_failed("invented"));
        assert_eq!(data.failed_keys(), ["age", "invented"]);
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut data = FormData::new();
        data.insert("plan", json!("pro"));
        data.fail("age");
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"plan": "pro", "age": null})
        );
    }

    #[test]
    fn remove_keeps_order_of_rest() {
        let mut data = FormData::from(json!({"a": 1, "b": 2, "c": 3}).as_object().cloned().unwrap());
        assert_eq!(data.remove("b"), Some(json!(2)));
        assert_eq!(data.keys().collect::<Vec<_>>(), ["a", "c"]);
    }
}
