//! Payload shape sniffing.
//!
//! An ordered table of probes, each recognising one upstream shape. The
//! first probe that yields at least one object record wins. No match is not
//! an error: the payload simply has no channels.

use serde_json::Value;

use crate::extraction::json_path::resolve_json_path;
use crate::extraction::keys::{SINGLE_CHANNEL_MARKERS, TOP_LEVEL_CHANNEL_KEYS, TOP_LEVEL_SCHEDULE_KEYS};
use crate::extraction::picker::{object_records, Record};
use crate::logging::structured::LogContext;

/// One recognised upstream shape.
pub struct ShapeProbe {
    pub name: &'static str,
    probe: fn(&Value) -> Vec<&Record>,
}

/// Probes in evaluation order.
pub const SHAPE_PROBES: &[ShapeProbe] = &[
    ShapeProbe {
        name: "data.programs",
        probe: data_programs,
    },
    ShapeProbe {
        name: "top_level_channels",
        probe: top_level_channels,
    },
    ShapeProbe {
        name: "data_list",
        probe: data_list,
    },
    ShapeProbe {
        name: "top_level_schedule",
        probe: top_level_schedule,
    },
    ShapeProbe {
        name: "payload_list",
        probe: payload_list,
    },
    ShapeProbe {
        name: "single_channel",
        probe: single_channel,
    },
];

fn list_at<'a>(payload: &'a Value, path: &str) -> Vec<&'a Record> {
    resolve_json_path(payload, path)
        .and_then(Value::as_array)
        .map(|list| object_records(list))
        .unwrap_or_default()
}

fn first_list<'a>(payload: &'a Value, keys: &[&str]) -> Vec<&'a Record> {
    if !payload.is_object() {
        return Vec::new();
    }
    keys.iter()
        .map(|key| list_at(payload, key))
        .find(|records| !records.is_empty())
        .unwrap_or_default()
}

fn data_programs(payload: &Value) -> Vec<&Record> {
    list_at(payload, "data.programs")
}

fn top_level_channels(payload: &Value) -> Vec<&Record> {
    first_list(payload, TOP_LEVEL_CHANNEL_KEYS)
}

fn data_list(payload: &Value) -> Vec<&Record> {
    first_list(payload, &["data"])
}

fn top_level_schedule(payload: &Value) -> Vec<&Record> {
    first_list(payload, TOP_LEVEL_SCHEDULE_KEYS)
}

fn payload_list(payload: &Value) -> Vec<&Record> {
    payload
        .as_array()
        .map(|list| object_records(list))
        .unwrap_or_default()
}

fn single_channel(payload: &Value) -> Vec<&Record> {
    match payload.as_object() {
        Some(obj) if SINGLE_CHANNEL_MARKERS.iter().any(|k| obj.contains_key(*k)) => vec![obj],
        _ => Vec::new(),
    }
}

/// Run the probes in order; return the winning probe's name and records.
pub fn resolve_shape(payload: &Value) -> Option<(&'static str, Vec<&Record>)> {
    SHAPE_PROBES.iter().find_map(|shape| {
        let records = (shape.probe)(payload);
        (!records.is_empty()).then_some((shape.name, records))
    })
}

/// Locate the ordered channel records in `payload`. Empty when nothing matches.
pub fn resolve_channels<'a>(payload: &'a Value, ctx: &LogContext) -> Vec<&'a Record> {
    match resolve_shape(payload) {
        Some((shape, records)) => {
            log::info!(
                "{} SHAPE_RESOLVED shape={} channels={}",
                ctx,
                shape,
                records.len()
            );
            records
        }
        None => {
            log::warn!(
                "{} SHAPE_UNRESOLVED payload_type={}",
                ctx,
                json_type(payload)
            );
            Vec::new()
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
