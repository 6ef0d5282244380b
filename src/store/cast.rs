// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Casting raw INI strings to the kind of their default.

use crate::config::Value;
use crate::error::ConfigError;
use serde_json::Value as JsonValue;

/// Cast `raw` to the kind of `default`, keeping the default on failure.
pub fn bind(varname: &str, raw: &str, default: &Value) -> Value {
    match cast(varname, raw, default) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("{}; keeping default value: {}", e, default);
            default.clone()
        }
    }
}

/// Cast `raw` to the kind of `default`.
pub fn cast(varname: &str, raw: &str, default: &Value) -> Result<Value, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: varname.to_string(),
        message,
    };

    match default {
        Value::Integer(_) => raw
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|e| invalid(format!("expected an integer, got {:?}: {}", raw, e))),
        Value::Float(_) => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| invalid(format!("expected a float, got {:?}: {}", raw, e))),
        Value::Boolean(_) => parse_bool(raw)
            .map(Value::Boolean)
            .ok_or_else(|| invalid(format!("expected a boolean, got {:?}", raw))),
        Value::String(_) => Ok(Value::String(raw.to_string())),
        Value::List(_) | Value::Tuple(_) | Value::Map(_) => {
            parse_composite(raw, default).map_err(invalid)
        }
    }
}

/// Boolean spellings accepted in INI files.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Composite values are JSON. Text that is not valid JSON as written is
/// retried with single quotes read as double quotes.
fn parse_composite(raw: &str, default: &Value) -> Result<Value, String> {
    let json: JsonValue = serde_json::from_str(raw)
        .or_else(|_| serde_json::from_str(&raw.replace('\'', "\"")))
        .map_err(|e| format!("expected JSON {}, got {:?}: {}", default.kind(), raw, e))?;

    match (default, json) {
        (Value::List(_), JsonValue::Array(items)) => Ok(Value::List(items)),
        (Value::Tuple(_), JsonValue::Array(items)) => Ok(Value::Tuple(items)),
        (Value::Map(_), JsonValue::Object(map)) => Ok(Value::Map(map)),
        (_, other) => Err(format!(
            "expected JSON {}, got {}",
            default.kind(),
            json_type(&other)
        )),
    }
}

fn json_type(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
