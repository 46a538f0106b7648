//! Ranked field lookup.
//!
//! Upstream records spell the same field many ways. A lookup walks an
//! ordered key table and stops at the first key that holds a usable value.

use serde_json::{Map, Value};

use crate::extraction::json_path::scalar_to_string;

/// A raw upstream object.
pub type Record = Map<String, Value>;

/// Return the value of the first key in `keys` present with a non-null value.
///
/// Absence is a normal outcome; callers supply their own default.
pub fn pick<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

/// Return the first key's value that `convert` accepts.
///
/// Keys holding null, or a value of the wrong kind, are skipped rather than
/// ending the search.
pub fn pick_map<'a, T, F>(record: &'a Record, keys: &[&str], convert: F) -> Option<T>
where
    F: Fn(&'a Value) -> Option<T>,
{
    keys.iter()
        .filter_map(|key| record.get(*key))
        .filter(|value| !value.is_null())
        .find_map(convert)
}

/// First scalar among `keys` as a trimmed string; blank strings count as absent.
pub fn pick_text(record: &Record, keys: &[&str]) -> Option<String> {
    pick_map(record, keys, |value| {
        scalar_to_string(value)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Return the first list-valued field among `keys`.
pub fn pick_list<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Vec<Value>> {
    pick_map(record, keys, Value::as_array)
}

/// Keep only the object elements of a list.
pub fn object_records(list: &[Value]) -> Vec<&Record> {
    list.iter().filter_map(Value::as_object).collect()
}
