//! Event normalization.
//!
//! Builds one [`CanonicalEvent`] from a raw upstream event. Never fails:
//! fields that cannot be resolved come out empty or null.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::extraction::keys::{
    EVENT_DURATION_KEYS, EVENT_END_KEYS, EVENT_IMAGE_KEYS, EVENT_SECONDARY_TITLE_KEYS,
    EVENT_START_KEYS, EVENT_SYNOPSIS_KEYS, EVENT_TITLE_KEYS,
};
use crate::extraction::picker::{pick, pick_map, pick_text, Record};
use crate::logging::structured::LogContext;
use crate::normalize::duration::normalize_duration;
use crate::normalize::text::{truncate_chars, MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS};
use crate::security::sanitizer::{scrub_remote_reference, strip_raw_event};
use crate::storage::models::CanonicalEvent;

/// How the primary and secondary titles map onto `name` and `description`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitlePolicy {
    /// `name` is the primary title; the secondary title is the description,
    /// with synopsis keys as fallback.
    #[default]
    Separate,
    /// `name` is `"<title>: <secondary>"`; description from synopsis keys only.
    Concatenate,
}

impl fmt::Display for TitlePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitlePolicy::Separate => write!(f, "separate"),
            TitlePolicy::Concatenate => write!(f, "concatenate"),
        }
    }
}

impl FromStr for TitlePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "separate" => Ok(TitlePolicy::Separate),
            "concatenate" | "concat" => Ok(TitlePolicy::Concatenate),
            other => Err(format!(
                "unknown title policy '{}', expected 'separate' or 'concatenate'",
                other
            )),
        }
    }
}

/// Options for event normalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    pub title_policy: TitlePolicy,
}

/// Normalize one raw upstream event.
pub fn normalize_event(
    raw: &Record,
    options: &NormalizeOptions,
    ctx: &LogContext,
) -> CanonicalEvent {
    let title = pick_text(raw, EVENT_TITLE_KEYS);
    let secondary = pick_text(raw, EVENT_SECONDARY_TITLE_KEYS);
    let synopsis = pick_text(raw, EVENT_SYNOPSIS_KEYS);

    let (name, description) = match options.title_policy {
        TitlePolicy::Separate => (title.unwrap_or_default(), secondary.or(synopsis)),
        TitlePolicy::Concatenate => {
            let name = match (title, secondary) {
                (Some(t), Some(s)) if t != s => format!("{}: {}", t, s),
                (Some(t), _) => t,
                (None, Some(s)) => s,
                (None, None) => String::new(),
            };
            (name, synopsis)
        }
    };

    let start = pick(raw, EVENT_START_KEYS);
    let duration = normalize_duration(
        pick(raw, EVENT_DURATION_KEYS),
        start,
        pick(raw, EVENT_END_KEYS),
    );

    let image = pick_map(raw, EVENT_IMAGE_KEYS, Value::as_str)
        .map(scrub_remote_reference)
        .unwrap_or_default();

    let (stripped, removed) = strip_raw_event(raw);
    if removed.has_removals() {
        crate::log_debug!(
            ctx,
            "RAW_STRIPPED",
            image_keys = removed.image_keys_removed,
            oversized = removed.oversized_removed,
        );
    }

    CanonicalEvent {
        start_time: start.cloned().unwrap_or(Value::Null),
        duration,
        name: truncate_chars(&name, MAX_TITLE_CHARS),
        description: truncate_chars(&description.unwrap_or_default(), MAX_DESCRIPTION_CHARS),
        image,
        raw: stripped,
    }
}
