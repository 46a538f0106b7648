//! JSON path resolution.
//!
//! Resolves dot-notation paths like "data.programs" to values in JSON.

use serde_json::Value;

/// Resolve a dot-notation path to a value in JSON.
///
/// Only objects are walked; a path segment never indexes into an array.
///
/// # Examples
/// ```
/// use guide_normalizer::extraction::resolve_json_path;
/// use serde_json::json;
/// let data = json!({"data": {"programs": []}});
/// let value = resolve_json_path(&data, "data.programs");
/// assert_eq!(value, Some(&json!([])));
/// ```
pub fn resolve_json_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(data, |current, part| current.as_object()?.get(part))
}

/// Convert a scalar JSON value to a string; null and containers yield `None`.
///
/// Upstream ids are sometimes numbers, so `7` and `"7"` both become `"7"`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Convert a JSON value to a float if possible.
pub fn value_to_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_path() {
        let data = json!({"status": "ok"});
        assert_eq!(resolve_json_path(&data, "status"), Some(&json!("ok")));
    }

    #[test]
    fn test_nested_path() {
        let data = json!({
            "data": {
                "programs": [{"id": "1"}]
            }
        });
        assert_eq!(
            resolve_json_path(&data, "data.programs"),
            Some(&json!([{"id": "1"}]))
        );
    }

    #[test]
    fn test_arrays_are_not_walked() {
        let data = json!({"data": [{"programs": []}]});
        assert_eq!(resolve_json_path(&data, "data.programs"), None);
    }

    #[test]
    fn test_missing_path() {
        let data = json!({"data": "flat"});
        assert_eq!(resolve_json_path(&data, "missing"), None);
        assert_eq!(resolve_json_path(&data, "data.programs"), None);
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(value_to_float(&json!(1.5)), Some(1.5));
        assert_eq!(value_to_float(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(value_to_float(&json!("NaN")), None);
        assert_eq!(scalar_to_string(&json!(7)), Some("7".to_string()));
        assert_eq!(scalar_to_string(&json!({"a": 1})), None);
        assert_eq!(scalar_to_string(&Value::Null), None);
    }
}
