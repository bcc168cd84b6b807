//! Metadata values and conversions.
//!
//! Remote metadata arrives as loosely typed JSON. Numbers may be strings and
//! booleans are the strings `"true"`/`"false"`. Conversions here are explicit
//! so nothing relies on implicit truthiness.

use serde_json::{Map, Value};

use crate::metadata::playback::Playback;
use crate::storage::models::RecordingStatus;

/// A remote metadata snapshot for one recording, keyed by remote field name.
pub type MetadataSnapshot = Map<String, Value>;

/// A field value as seen by callers of the synchronizer.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Int(i64),
    Bool(bool),
    Playbacks(Vec<Playback>),
    Status(RecordingStatus),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_playbacks(&self) -> Option<&[Playback]> {
        match self {
            FieldValue::Playbacks(p) => Some(p),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Vec<Playback>> for FieldValue {
    fn from(value: Vec<Playback>) -> Self {
        FieldValue::Playbacks(value)
    }
}

impl From<RecordingStatus> for FieldValue {
    fn from(value: RecordingStatus) -> Self {
        FieldValue::Status(value)
    }
}

/// Convert a JSON value to a string representation.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}

/// Convert a JSON value to an integer if possible.
pub fn value_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The remote API's spelling of a boolean flag.
pub fn wire_flag(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}

/// Encode a boolean the way the remote API stores it.
pub fn encode_wire_bool(flag: bool) -> Value {
    Value::String(wire_flag(flag).to_string())
}

/// Decode a remote boolean flag.
///
/// Only the exact string `"true"` is true; any other string is false.
/// Native JSON booleans are taken as-is. Other shapes are not booleans.
pub fn decode_wire_bool(value: &Value) -> Option<bool> {
    match value {
        Value::String(s) => Some(s == "true"),
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}
