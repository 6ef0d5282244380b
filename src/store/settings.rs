// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! The bound, type-cast values of a store.

use crate::config::Value;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

/// Bound values keyed by their bound name (`count`, `network_port`, ...).
///
/// Rebuilt as a whole on every load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    values: BTreeMap<String, Value>,
}

impl Settings {
    pub(crate) fn insert(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn list(&self, name: &str) -> Option<&[JsonValue]> {
        self.get(name).and_then(Value::as_list)
    }

    pub fn map(&self, name: &str) -> Option<&Map<String, JsonValue>> {
        self.get(name).and_then(Value::as_map)
    }

    pub fn tuple(&self, name: &str) -> Option<&[JsonValue]> {
        self.get(name).and_then(Value::as_tuple)
    }

    /// Bound names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
