// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Schema definitions.
//!
//! A schema is an ordered list of sections, each holding options with a
//! typed default. The default's variant is the option's kind: every value
//! read from disk is cast to it.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;
use std::fmt;

use super::options::StoreOptions;

/// The declared kind of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Integer,
    Float,
    Boolean,
    String,
    List,
    Map,
    Tuple,
}

impl OptionKind {
    /// Get the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Integer => "integer",
            OptionKind::Float => "float",
            OptionKind::Boolean => "boolean",
            OptionKind::String => "string",
            OptionKind::List => "list",
            OptionKind::Map => "map",
            OptionKind::Tuple => "tuple",
        }
    }

    /// Whether values of this kind are stored as JSON text.
    pub fn is_composite(&self) -> bool {
        matches!(self, OptionKind::List | OptionKind::Map | OptionKind::Tuple)
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    List(Vec<JsonValue>),
    Map(Map<String, JsonValue>),
    Tuple(Vec<JsonValue>),
}

impl Value {
    /// Build a tuple-like sequence value.
    pub fn tuple<T: Into<JsonValue>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// The kind this value declares when used as a default.
    pub fn kind(&self) -> OptionKind {
        match self {
            Value::Integer(_) => OptionKind::Integer,
            Value::Float(_) => OptionKind::Float,
            Value::Boolean(_) => OptionKind::Boolean,
            Value::String(_) => OptionKind::String,
            Value::List(_) => OptionKind::List,
            Value::Map(_) => OptionKind::Map,
            Value::Tuple(_) => OptionKind::Tuple,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[JsonValue]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map<String, JsonValue>> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[JsonValue]> {
        match self {
            Value::Tuple(v) => Some(v),
            _ => None,
        }
    }

    /// The text stored in an INI value slot.
    ///
    /// Composite values are JSON; floats always keep a fractional part so an
    /// integral float does not read back as an integer-looking string.
    pub fn to_ini_string(&self) -> String {
        match self {
            Value::Integer(v) => v.to_string(),
            Value::Float(v) => format_float(*v),
            Value::Boolean(v) => v.to_string(),
            Value::String(v) => v.clone(),
            Value::List(items) | Value::Tuple(items) => JsonValue::from(items.clone()).to_string(),
            Value::Map(map) => JsonValue::Object(map.clone()).to_string(),
        }
    }
}

fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ini_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<JsonValue>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Map<String, JsonValue>> for Value {
    fn from(map: Map<String, JsonValue>) -> Self {
        Value::Map(map)
    }
}

impl TryFrom<&JsonValue> for Value {
    type Error = ConfigError;

    fn try_from(json: &JsonValue) -> std::result::Result<Self, Self::Error> {
        match json {
            JsonValue::Bool(b) => Ok(Value::Boolean(*b)),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Integer(i)),
                None => n.as_f64().map(Value::Float).ok_or_else(|| {
                    ConfigError::InvalidSchema {
                        message: format!("number {} is out of range", n),
                    }
                }),
            },
            JsonValue::String(s) => Ok(Value::String(s.clone())),
            JsonValue::Array(items) => Ok(Value::List(items.clone())),
            JsonValue::Object(map) => Ok(Value::Map(map.clone())),
            JsonValue::Null => Err(ConfigError::InvalidSchema {
                message: "null is not a valid default value".to_string(),
            }),
        }
    }
}

/// A single option with its default.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    name: String,
    default: Value,
}

impl OptionSpec {
    /// Create an option; its kind is the default's kind.
    pub fn new(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
        }
    }

    /// Option name as declared, protection marker included.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn kind(&self) -> OptionKind {
        self.default.kind()
    }
}

/// A schema section.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSection {
    name: String,
    options: Vec<OptionSpec>,
}

impl SchemaSection {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    /// Add an option with its default.
    pub fn option(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.options.push(OptionSpec::new(name, default));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }
}

/// The declarative default schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    sections: Vec<SchemaSection>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or extend) a section.
    pub fn section(
        mut self,
        name: impl Into<String>,
        build: impl FnOnce(SchemaSection) -> SchemaSection,
    ) -> Self {
        let name = name.into();
        match self.sections.iter().position(|s| s.name == name) {
            Some(index) => {
                let existing = self.sections.remove(index);
                self.sections.insert(index, build(existing));
            }
            None => self.sections.push(build(SchemaSection::new(name))),
        }
        self
    }

    /// Build a schema from a JSON object of objects, e.g.
    /// `{"GENERAL": {"count": 1, "_locked": 0}}`.
    ///
    /// Integers become integer options, other numbers floats, arrays lists
    /// and objects maps. Tuples can only be declared through the builder.
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        let sections = json.as_object().ok_or_else(|| ConfigError::InvalidSchema {
            message: "schema must be a JSON object of sections".to_string(),
        })?;

        let mut schema = Schema::new();
        for (section_name, options) in sections {
            let options = options.as_object().ok_or_else(|| ConfigError::InvalidSchema {
                message: format!("section '{}' must be a JSON object", section_name),
            })?;

            let mut section = SchemaSection::new(section_name.as_str());
            for (option, default) in options {
                let default = Value::try_from(default).map_err(|e| ConfigError::InvalidSchema {
                    message: format!("option '{}' in section '{}': {}", option, section_name, e),
                })?;
                section.options.push(OptionSpec::new(option.as_str(), default));
            }
            schema.sections.push(section);
        }

        Ok(schema)
    }

    pub fn sections(&self) -> &[SchemaSection] {
        &self.sections
    }

    /// Total number of options across all sections.
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.options.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that every option has a usable name and a unique bound name.
    pub fn validate(&self, options: &StoreOptions) -> Result<()> {
        let mut seen = HashSet::new();

        for section in &self.sections {
            for spec in &section.options {
                if options.strip_marker(&spec.name).trim().is_empty() {
                    return Err(ConfigError::InvalidSchema {
                        message: format!("empty option name in section '{}'", section.name),
                    }
                    .into());
                }

                let bound = options.bound_name(&section.name, &spec.name);
                if !seen.insert(bound.clone()) {
                    return Err(ConfigError::InvalidSchema {
                        message: format!(
                            "option '{}' in section '{}' collides with another option bound as '{}'",
                            spec.name, section.name, bound
                        ),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_keeps_order() {
        let schema = Schema::new()
            .section("GENERAL", |s| s.option("count", 1).option("_locked", 0))
            .section("NET", |s| s.option("hosts", vec!["a", "b"]));

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.sections()[0].name(), "GENERAL");
        assert_eq!(schema.sections()[0].options()[1].name(), "_locked");
        assert_eq!(schema.sections()[1].options()[0].kind(), OptionKind::List);
    }

    #[test]
    fn test_builder_extends_existing_section() {
        let schema = Schema::new()
            .section("GENERAL", |s| s.option("count", 1))
            .section("NET", |s| s.option("port", 80))
            .section("GENERAL", |s| s.option("name", "x"));

        assert_eq!(schema.sections().len(), 2);
        assert_eq!(schema.sections()[0].options().len(), 2);
    }

    #[test]
    fn test_from_json_infers_kinds() {
        let schema = Schema::from_json(&json!({
            "GENERAL": {
                "count": 1,
                "ratio": 0.5,
                "debug": false,
                "name": "easyfig",
                "hosts": ["a"],
                "limits": {"max": 3}
            }
        }))
        .unwrap();

        let kinds: Vec<OptionKind> = schema.sections()[0]
            .options()
            .iter()
            .map(|o| o.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                OptionKind::Integer,
                OptionKind::Float,
                OptionKind::Boolean,
                OptionKind::String,
                OptionKind::List,
                OptionKind::Map,
            ]
        );
    }

    #[test]
    fn test_from_json_rejects_bad_shapes() {
        assert!(Schema::from_json(&json!([1, 2])).is_err());
        assert!(Schema::from_json(&json!({"GENERAL": 1})).is_err());
        assert!(Schema::from_json(&json!({"GENERAL": {"x": null}})).is_err());
    }

    #[test]
    fn test_validate_rejects_bound_name_collision() {
        let options = StoreOptions::default();
        let schema = Schema::new().section("GENERAL", |s| s.option("locked", 1).option("_locked", 0));
        assert!(schema.validate(&options).is_err());

        let schema = Schema::new()
            .section("GENERAL", |s| s.option("net_port", 1))
            .section("NET", |s| s.option("port", 2));
        assert!(schema.validate(&options).is_err());

        let schema = Schema::new().section("GENERAL", |s| s.option("_", 1));
        assert!(schema.validate(&options).is_err());
    }

    #[test]
    fn test_value_ini_strings() {
        assert_eq!(Value::from(7).to_ini_string(), "7");
        assert_eq!(Value::from(2.0).to_ini_string(), "2.0");
        assert_eq!(Value::from(0.25).to_ini_string(), "0.25");
        assert_eq!(Value::from(true).to_ini_string(), "true");
        assert_eq!(Value::from(vec![1, 2]).to_ini_string(), "[1,2]");
        assert_eq!(Value::tuple(["a", "b"]).to_ini_string(), "[\"a\",\"b\"]");

        let mut map = Map::new();
        map.insert("max".to_string(), json!(3));
        assert_eq!(Value::from(map).to_ini_string(), "{\"max\":3}");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(OptionKind::Tuple.to_string(), "tuple");
        assert!(OptionKind::Map.is_composite());
        assert!(!OptionKind::Boolean.is_composite());
    }
}
