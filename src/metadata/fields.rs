//! Mirrored recording fields.
//!
//! A mirrored field lives in the remote metadata, not in the local record.
//! Each one has an ordered list of remote key aliases (historical and
//! current) plus explicit decode/encode functions for its value.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::metadata::playback::{playbacks_from_value, playbacks_to_value};
use crate::metadata::values::{
    decode_wire_bool, encode_wire_bool, value_to_int, value_to_string, FieldValue,
    MetadataSnapshot,
};

/// Fields whose value of record is the remote metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirroredField {
    Name,
    Description,
    StartTime,
    EndTime,
    Published,
    Protected,
    Playbacks,
    Tags,
}

/// How a mirrored field maps onto remote metadata.
pub struct FieldDescriptor {
    pub field: MirroredField,
    pub name: &'static str,
    /// Remote key names, oldest convention first.
    pub aliases: &'static [&'static str],
    /// Shape accepted by `encode`, for error messages.
    pub expected: &'static str,
    decode: fn(&Value) -> FieldValue,
    encode: fn(&FieldValue) -> Option<Value>,
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .finish()
    }
}

impl FieldDescriptor {
    pub fn decode(&self, value: &Value) -> FieldValue {
        (self.decode)(value)
    }

    /// Encode a value for the remote snapshot. `None` if the shape is wrong.
    pub fn encode(&self, value: &FieldValue) -> Option<Value> {
        match value {
            FieldValue::Null => Some(Value::Null),
            other => (self.encode)(other),
        }
    }
}

pub const MIRRORED_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor {
        field: MirroredField::Name,
        name: "name",
        aliases: &["meta_bbb-recording-name", "meta_contextactivity", "meetingName"],
        expected: "text",
        decode: decode_trimmed_text,
        encode: encode_trimmed_text,
    },
    FieldDescriptor {
        field: MirroredField::Description,
        name: "description",
        aliases: &["meta_bbb-recording-description", "meta_contextactivitydescription"],
        expected: "text",
        decode: decode_trimmed_text,
        encode: encode_trimmed_text,
    },
    FieldDescriptor {
        field: MirroredField::StartTime,
        name: "starttime",
        aliases: &["startTime"],
        expected: "integer",
        decode: decode_int,
        encode: encode_int,
    },
    FieldDescriptor {
        field: MirroredField::EndTime,
        name: "endtime",
        aliases: &["endTime"],
        expected: "integer",
        decode: decode_int,
        encode: encode_int,
    },
    FieldDescriptor {
        field: MirroredField::Published,
        name: "published",
        aliases: &["published"],
        expected: "boolean",
        decode: decode_flag,
        encode: encode_flag,
    },
    FieldDescriptor {
        field: MirroredField::Protected,
        name: "protected",
        aliases: &["protect"],
        expected: "boolean",
        decode: decode_flag,
        encode: encode_flag,
    },
    FieldDescriptor {
        field: MirroredField::Playbacks,
        name: "playbacks",
        aliases: &["playbacks"],
        expected: "playback list",
        decode: decode_playbacks,
        encode: encode_playbacks,
    },
    FieldDescriptor {
        field: MirroredField::Tags,
        name: "tags",
        aliases: &["meta_bbb-recording-tags"],
        expected: "text",
        decode: decode_text,
        encode: encode_text,
    },
];

impl MirroredField {
    pub const ALL: [MirroredField; 8] = [
        MirroredField::Name,
        MirroredField::Description,
        MirroredField::StartTime,
        MirroredField::EndTime,
        MirroredField::Published,
        MirroredField::Protected,
        MirroredField::Playbacks,
        MirroredField::Tags,
    ];

    pub fn descriptor(self) -> &'static FieldDescriptor {
        // MIRRORED_FIELDS is declared in the same order as the enum.
        &MIRRORED_FIELDS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl fmt::Display for MirroredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MirroredField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MIRRORED_FIELDS
            .iter()
            .find(|d| d.name == s)
            .map(|d| d.field)
            .ok_or_else(|| format!("unknown mirrored field: {}", s))
    }
}

/// Pick the remote key a field currently lives under in `metadata`.
///
/// The last alias (in declared order) present in the snapshot wins. When
/// none is present, the first alias is the canonical name for writes.
pub fn resolve_alias(field: MirroredField, metadata: &MetadataSnapshot) -> &'static str {
    let aliases = field.descriptor().aliases;
    aliases
        .iter()
        .rev()
        .find(|alias| metadata.contains_key(**alias))
        .or_else(|| aliases.first())
        .copied()
        .unwrap_or_else(|| field.name())
}

/// Read a mirrored field through alias resolution.
pub fn read_field(metadata: &MetadataSnapshot, field: MirroredField) -> FieldValue {
    let key = resolve_alias(field, metadata);
    match metadata.get(key) {
        Some(Value::Null) | None => FieldValue::Null,
        Some(value) => field.descriptor().decode(value),
    }
}

/// Write a mirrored field under its resolved alias.
///
/// Returns the key written, or `None` when the value has the wrong shape.
pub fn write_field(
    metadata: &mut MetadataSnapshot,
    field: MirroredField,
    value: &FieldValue,
) -> Option<&'static str> {
    let encoded = field.descriptor().encode(value)?;
    let key = resolve_alias(field, metadata);
    metadata.insert(key.to_string(), encoded);
    Some(key)
}

fn decode_text(value: &Value) -> FieldValue {
    FieldValue::Text(value_to_string(value))
}

fn encode_text(value: &FieldValue) -> Option<Value> {
    value.as_str().map(|s| Value::String(s.to_string()))
}

fn decode_trimmed_text(value: &Value) -> FieldValue {
    FieldValue::Text(value_to_string(value).trim().to_string())
}

fn encode_trimmed_text(value: &FieldValue) -> Option<Value> {
    value.as_str().map(|s| Value::String(s.trim().to_string()))
}

fn decode_int(value: &Value) -> FieldValue {
    value_to_int(value).map_or(FieldValue::Null, FieldValue::Int)
}

fn encode_int(value: &FieldValue) -> Option<Value> {
    value.as_i64().map(Value::from)
}

fn decode_flag(value: &Value) -> FieldValue {
    decode_wire_bool(value).map_or(FieldValue::Null, FieldValue::Bool)
}

fn encode_flag(value: &FieldValue) -> Option<Value> {
    value.as_bool().map(encode_wire_bool)
}

fn decode_playbacks(value: &Value) -> FieldValue {
    playbacks_from_value(value).map_or(FieldValue::Null, FieldValue::Playbacks)
}

fn encode_playbacks(value: &FieldValue) -> Option<Value> {
    value.as_playbacks().map(playbacks_to_value)
}
