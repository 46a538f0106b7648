//! Output sanitization.
//!
//! Nothing this crate writes may point at a remote host: image and logo
//! references that carry an http(s) scheme are blanked, and the raw event
//! kept for debugging loses its image-bearing keys and oversized fields.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use crate::extraction::keys::EVENT_IMAGE_KEYS;

/// Raw string fields longer than this are dropped from `raw`.
pub const MAX_RAW_FIELD_SIZE: usize = 10_000;

lazy_static! {
    /// Remote reference detection
    static ref REMOTE_REFERENCE: Regex = Regex::new(r"(?i)^\s*https?://").unwrap();
}

/// True when `reference` starts with an http or https scheme.
pub fn is_remote_reference(reference: &str) -> bool {
    REMOTE_REFERENCE.is_match(reference)
}

/// Replace a remote reference with the empty string; local references pass through.
pub fn scrub_remote_reference(reference: &str) -> String {
    if is_remote_reference(reference) {
        String::new()
    } else {
        reference.to_string()
    }
}

/// Counts of what [`strip_raw_event`] removed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StripResult {
    pub image_keys_removed: usize,
    pub oversized_removed: usize,
}

impl StripResult {
    pub fn has_removals(&self) -> bool {
        self.image_keys_removed + self.oversized_removed > 0
    }
}

/// Copy an upstream event for the `raw` field with image keys and oversized
/// strings removed at every depth.
pub fn strip_raw_event(event: &Map<String, Value>) -> (Value, StripResult) {
    let mut result = StripResult::default();
    let stripped = strip_object(event, &mut result);
    (Value::Object(stripped), result)
}

fn strip_object(obj: &Map<String, Value>, result: &mut StripResult) -> Map<String, Value> {
    let mut out = Map::with_capacity(obj.len());
    for (key, val) in obj {
        if EVENT_IMAGE_KEYS.contains(&key.as_str()) {
            result.image_keys_removed += 1;
            continue;
        }
        if let Some(kept) = strip_value(val, result) {
            out.insert(key.clone(), kept);
        }
    }
    out
}

fn strip_value(value: &Value, result: &mut StripResult) -> Option<Value> {
    match value {
        Value::String(s) if s.chars().count() > MAX_RAW_FIELD_SIZE => {
            result.oversized_removed += 1;
            None
        }
        Value::Object(obj) => Some(Value::Object(strip_object(obj, result))),
        Value::Array(arr) => Some(Value::Array(
            arr.iter().filter_map(|v| strip_value(v, result)).collect(),
        )),
        other => Some(other.clone()),
    }
}
