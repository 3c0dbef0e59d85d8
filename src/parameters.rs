//! Ordered key/value parameter store.
//!
//! [`Parameters`] carries the options of checks, formatters, caches and the
//! report. Keys keep their insertion order, which the template engine relies
//! on when it maps named placeholders to argument positions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered key/value store with default-fallback lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    values: Map<String, Value>,
}

impl Parameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build parameters from a JSON value.
    ///
    /// Objects become parameters as-is; anything else yields an empty set.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self { values: map.clone() },
            _ => Self::default(),
        }
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get a value, falling back to `default` when the key is missing or null.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        match self.values.get(key) {
            Some(Value::Null) | None => default,
            Some(value) => value.clone(),
        }
    }

    /// Get a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Get a boolean value, falling back to `default`.
    ///
    /// Accepts JSON booleans, numbers and the usual on/off words so that
    /// values coming from XML or the command line behave the same.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "1" | "on" | "yes" | "true" => true,
                "" | "0" | "off" | "no" | "false" => false,
                _ => default,
            },
            _ => default,
        }
    }

    /// Check whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Set a value, keeping the key's original position if it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Convert into a JSON object value.
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}
