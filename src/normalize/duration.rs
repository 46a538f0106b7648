//! Duration normalization.
//!
//! Upstream durations arrive as minutes, seconds, ISO-8601 `PT..` strings,
//! or not at all. Everything is reduced to whole minutes.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::extraction::json_path::value_to_float;

/// Numeric durations above this are taken to be seconds.
pub const SECONDS_THRESHOLD: f64 = 600.0;

lazy_static! {
    /// `PT[nH][nM][nS]`, each component optional, order fixed
    static ref ISO_DURATION: Regex =
        Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").unwrap();
}

/// Normalize a duration to integer minutes.
///
/// Rules, first match wins:
/// 1. numeric (or numeric string): above 600 is seconds, rounded to minutes;
///    otherwise already minutes
/// 2. ISO-8601 `PT1H15M30S`: summed to seconds, floored to minutes
/// 3. both `start` and `end` numeric: `round((end - start) / 60)`
/// 4. otherwise `None`
pub fn normalize_duration(
    raw: Option<&Value>,
    start: Option<&Value>,
    end: Option<&Value>,
) -> Option<i64> {
    if let Some(minutes) = raw.and_then(duration_from_value) {
        return Some(minutes);
    }

    let start = start.and_then(value_to_float)?;
    let end = end.and_then(value_to_float)?;
    let minutes = ((end - start) / 60.0).round();
    (minutes >= 0.0).then_some(minutes as i64)
}

fn duration_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(_) => value_to_float(value).and_then(minutes_from_number),
        Value::String(s) => {
            let s = s.trim();
            parse_iso_duration(s).or_else(|| value_to_float(value).and_then(minutes_from_number))
        }
        _ => None,
    }
}

/// Half-minute ties round away from zero: 5430 seconds is 91 minutes.
fn minutes_from_number(n: f64) -> Option<i64> {
    if n < 0.0 {
        return None;
    }
    if n > SECONDS_THRESHOLD {
        Some((n / 60.0).round() as i64)
    } else {
        Some(n.round() as i64)
    }
}

/// Parse `PT[nH][nM][nS]` into whole minutes, discarding leftover seconds.
///
/// A bare `PT` with no components does not count as a match.
pub fn parse_iso_duration(s: &str) -> Option<i64> {
    let caps = ISO_DURATION.captures(s)?;
    if caps.get(1).is_none() && caps.get(2).is_none() && caps.get(3).is_none() {
        return None;
    }

    let component = |idx: usize| -> Option<i64> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse::<i64>().ok(),
            None => Some(0),
        }
    };

    let seconds = component(1)?
        .checked_mul(3600)?
        .checked_add(component(2)?.checked_mul(60)?)?
        .checked_add(component(3)?)?;
    Some(seconds / 60)
}
