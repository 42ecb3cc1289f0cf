//! Per-element animation configuration.
//!
//! A config is a flat, ordered key/value map supplied by the host, either as
//! JSON or in the compact attribute form `key:value|key:value`. Accessors use
//! lenient coercion: a missing or non-numeric number reads as `NaN`, and flags
//! use truthiness. Nothing here fails on odd values; only structurally broken
//! JSON is an error.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ConfigError;
use crate::numbers::{format_number, parse_float};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationConfig {
    entries: IndexMap<String, JsonValue>,
}

impl AnimationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object into a config.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let value: JsonValue = serde_json::from_str(s)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: JsonValue) -> Result<Self, ConfigError> {
        match value {
            JsonValue::Object(map) => Ok(Self {
                entries: map.into_iter().collect(),
            }),
            other => Err(ConfigError::NotAnObject(kind_name(&other).to_string())),
        }
    }

    /// Parse the compact attribute form, e.g. `translateType:left|translate:40|duration:800`.
    ///
    /// Values that look numeric become numbers, `true`/`false`/`null` become the
    /// matching literals, anything else is kept as text. Pairs without a `:` are
    /// skipped.
    pub fn from_strx(s: &str) -> Self {
        let mut entries = IndexMap::new();
        for pair in s.split('|') {
            if pair.is_empty() {
                continue;
            }
            let Some((key, raw)) = pair.split_once(':') else {
                log::warn!("config pair '{pair}' has no value; skipping");
                continue;
            };
            entries.insert(key.to_string(), strx_value(raw));
        }
        Self { entries }
    }

    /// Inverse of [`AnimationConfig::from_strx`] for scalar values.
    pub fn to_strx(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    JsonValue::String(s) => s.clone(),
                    JsonValue::Number(n) => n
                        .as_f64()
                        .map(format_number)
                        .unwrap_or_else(|| n.to_string()),
                    other => other.to_string(),
                };
                format!("{key}:{text}")
            })
            .collect::<Vec<_>>()
            .join("|")
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.entries.shift_remove(key)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// True when the key is present and not `null`.
    pub fn is_present(&self, key: &str) -> bool {
        !matches!(self.entries.get(key), None | Some(JsonValue::Null))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Numeric value of a key; `NaN` when missing or not a number.
    pub fn number(&self, key: &str) -> f64 {
        self.entries.get(key).map(coerce_number).unwrap_or(f64::NAN)
    }

    /// Numeric value of a key, or `fallback` when the key is falsy.
    pub fn number_or(&self, key: &str, fallback: f64) -> f64 {
        if self.flag(key) {
            self.number(key)
        } else {
            fallback
        }
    }

    /// Text value of a key (strings only).
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(JsonValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Truthiness of a key: missing, `null`, `false`, `0`, `NaN` and `""` are false.
    pub fn flag(&self, key: &str) -> bool {
        self.entries.get(key).map(is_truthy).unwrap_or(false)
    }
}

impl FromIterator<(String, JsonValue)> for AnimationConfig {
    fn from_iter<T: IntoIterator<Item = (String, JsonValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Lenient number coercion used by every numeric accessor.
pub fn coerce_number(value: &JsonValue) -> f64 {
    match value {
        JsonValue::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        JsonValue::String(s) => parse_float(s),
        JsonValue::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => f64::NAN,
    }
}

pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

fn strx_value(raw: &str) -> JsonValue {
    match raw {
        "true" => return JsonValue::Bool(true),
        "false" => return JsonValue::Bool(false),
        "null" => return JsonValue::Null,
        _ => {}
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return JsonValue::from(0);
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        if let Some(num) = serde_json::Number::from_f64(n) {
            return JsonValue::Number(num);
        }
    }
    JsonValue::String(raw.to_string())
}

fn kind_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
