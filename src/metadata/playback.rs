//! Playback format descriptors.

use serde_json::{Map, Value};

use crate::metadata::values::{encode_wire_bool, value_to_string};

/// One way of playing a recording back (presentation, video, statistics...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    pub kind: String,
    pub url: String,
    pub restricted: Option<bool>,
}

impl Playback {
    pub fn new(kind: &str, url: &str) -> Self {
        Self {
            kind: kind.to_string(),
            url: url.to_string(),
            restricted: None,
        }
    }

    pub fn restricted(mut self, restricted: bool) -> Self {
        self.restricted = Some(restricted);
        self
    }

    /// Decode a playback from the remote representation.
    ///
    /// Returns `None` when the entry has no `type`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let kind = obj.get("type").map(value_to_string)?;
        if kind.is_empty() {
            return None;
        }
        let url = obj.get("url").map(value_to_string).unwrap_or_default();
        let restricted = obj.get("restricted").and_then(decode_restricted);

        Some(Self {
            kind,
            url,
            restricted,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".to_string(), Value::String(self.kind.clone()));
        obj.insert("url".to_string(), Value::String(self.url.clone()));
        if let Some(restricted) = self.restricted {
            obj.insert("restricted".to_string(), encode_wire_bool(restricted));
        }
        Value::Object(obj)
    }
}

/// Only an explicit false lifts the restriction; any other value keeps it.
fn decode_restricted(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(flag) => Some(*flag),
        Value::String(s) => Some(!s.eq_ignore_ascii_case("false")),
        _ => Some(true),
    }
}

/// Decode a list of playbacks, skipping malformed entries.
pub fn playbacks_from_value(value: &Value) -> Option<Vec<Playback>> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Playback::from_value).collect())
}

pub fn playbacks_to_value(playbacks: &[Playback]) -> Value {
    Value::Array(playbacks.iter().map(Playback::to_value).collect())
}
