//! Typed, insertion-ordered index configuration.
//!
//! Backends are configured through a flat map of string keys to scalar
//! values. The keys this crate interprets are `nlist`, `nprobe`, `nbits`,
//! `gpu_id`, `metric_type`, `dim`, `knng`, `search_length`, `out_degree`,
//! and `candidate_pool_size`; anything else is passed through untouched for
//! backend-specific use.
//!
//! Iteration yields entries in insertion order, and overwriting a key keeps
//! its original position, so a configuration prints and logs the way the
//! caller built it.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

/// Insertion-ordered map of parameter name to typed scalar value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexParams {
    entries: Vec<(String, ParamValue)>,
}

impl IndexParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Assign a value, keeping the key's original position on overwrite.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style [`IndexParams::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Integer value for `key`, or `default` if absent or non-numeric.
    /// Float values are truncated.
    pub fn get_int_or(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(ParamValue::Int(v)) => *v,
            Some(ParamValue::Float(v)) => *v as i64,
            _ => default,
        }
    }

    /// Float value for `key`, or `default` if absent or non-numeric.
    pub fn get_f64_or(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            Some(ParamValue::Float(v)) => *v,
            Some(ParamValue::Int(v)) => *v as f64,
            _ => default,
        }
    }

    /// String value for `key`, or `default` if absent or not a string.
    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.get(key) {
            Some(ParamValue::Str(v)) => v,
            _ => default,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for IndexParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Display for IndexParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str("{}"),
        }
    }
}
