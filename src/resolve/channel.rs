//! Channel extraction.
//!
//! Pulls a stable id, display name, optional logo and the raw event list out
//! of one channel record.

use serde_json::Value;

use crate::extraction::keys::{
    CHANNEL_ID_KEYS, CHANNEL_LOGO_KEYS, CHANNEL_NAME_KEYS, EVENT_LIST_KEYS, NESTED_EVENT_LIST_KEYS,
};
use crate::extraction::picker::{object_records, pick_list, pick_text, Record};
use crate::logging::structured::LogContext;
use crate::normalize::event::{normalize_event, NormalizeOptions};
use crate::normalize::text::{is_filename_safe, slugify};
use crate::security::sanitizer::is_remote_reference;
use crate::storage::models::{CanonicalChannel, CanonicalEvent};

/// Display name used when a record carries none.
pub const UNKNOWN_CHANNEL_NAME: &str = "Unknown";

/// Where a channel's events were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSource {
    TopLevel,
    /// Inside the object held by this key.
    Nested(String),
    Missing,
}

/// A channel record broken into its parts, events still raw.
#[derive(Debug)]
pub struct ExtractedChannel<'a> {
    pub channel: CanonicalChannel,
    pub raw_events: Vec<&'a Record>,
    pub source: EventSource,
}

/// Extract identity, logo and raw events from one channel record.
pub fn extract_channel<'a>(record: &'a Record, ctx: &LogContext) -> ExtractedChannel<'a> {
    let name = pick_text(record, CHANNEL_NAME_KEYS)
        .unwrap_or_else(|| UNKNOWN_CHANNEL_NAME.to_string());
    let id = channel_id(record, &name);
    let ctx = ctx.with_channel(&id);

    let logo = pick_text(record, CHANNEL_LOGO_KEYS).and_then(|logo| {
        if is_remote_reference(&logo) {
            log::debug!("{} LOGO_DROPPED reason=remote_reference", ctx);
            None
        } else {
            Some(logo)
        }
    });

    let (events, source) = find_events(record);
    let raw_events = events.map(|list| object_records(list)).unwrap_or_default();

    if let EventSource::Nested(parent) = &source {
        crate::log_debug!(ctx, "EVENTS_NESTED", parent = parent);
    }
    crate::log_debug!(
        ctx,
        "CHANNEL_EXTRACTED",
        name = name,
        events = raw_events.len(),
        has_logo = logo.is_some(),
    );

    ExtractedChannel {
        channel: CanonicalChannel { id, name, logo },
        raw_events,
        source,
    }
}

/// Extract a channel and normalize all of its events.
pub fn normalize_channel(
    record: &Record,
    options: &NormalizeOptions,
    ctx: &LogContext,
) -> (CanonicalChannel, Vec<CanonicalEvent>) {
    let extracted = extract_channel(record, ctx);
    let ctx = ctx.with_channel(&extracted.channel.id);
    let events = extracted
        .raw_events
        .iter()
        .map(|raw| normalize_event(raw, options, &ctx))
        .collect();
    (extracted.channel, events)
}

/// Explicit id when present and usable, otherwise a slug of the id or name.
///
/// Unsafe or overlong explicit ids are slugified, which also caps them.
fn channel_id(record: &Record, name: &str) -> String {
    match pick_text(record, CHANNEL_ID_KEYS) {
        Some(id) if is_filename_safe(&id) => id,
        Some(id) => slugify(&id),
        None => slugify(name),
    }
}

/// Top-level list first; then one level down inside object-valued keys.
fn find_events(record: &Record) -> (Option<&Vec<Value>>, EventSource) {
    if let Some(list) = pick_list(record, EVENT_LIST_KEYS) {
        return (Some(list), EventSource::TopLevel);
    }

    record
        .iter()
        .find_map(|(key, value)| {
            let nested = value.as_object()?;
            pick_list(nested, NESTED_EVENT_LIST_KEYS).map(|list| (key, list))
        })
        .map(|(key, list)| (Some(list), EventSource::Nested(key.clone())))
        .unwrap_or((None, EventSource::Missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::text::MAX_ID_BYTES;
    use serde_json::json;

    fn extract(value: &Value) -> ExtractedChannel<'_> {
        let ctx = LogContext::new("test-run");
        extract_channel(value.as_object().unwrap(), &ctx)
    }

    #[test]
    fn test_explicit_id_and_name() {
        let record = json!({"id": "1", "name": "Ch1", "events": [{"name": "Show"}]});
        let ch = extract(&record);
        assert_eq!(ch.channel.id, "1");
        assert_eq!(ch.channel.name, "Ch1");
        assert_eq!(ch.raw_events.len(), 1);
        assert_eq!(ch.source, EventSource::TopLevel);
    }

    #[test]
    fn test_service_specific_keys() {
        let record = json!({"serviceId": 4164, "serviceName": "BBC ONE Lon", "programmes": []});
        let ch = extract(&record);
        assert_eq!(ch.channel.id, "4164");
        assert_eq!(ch.channel.name, "BBC ONE Lon");
        assert_eq!(ch.source, EventSource::TopLevel);
    }

    #[test]
    fn test_id_falls_back_to_slug() {
        let record = json!({"name": "BBC One!", "events": []});
        assert_eq!(extract(&record).channel.id, "bbc-one");

        let nameless = json!({"events": []});
        let ch = extract(&nameless);
        assert_eq!(ch.channel.name, "Unknown");
        assert_eq!(ch.channel.id, "unknown");
    }

    #[test]
    fn test_unsafe_explicit_id_is_slugified() {
        let record = json!({"id": "../BBC Two", "name": "BBC Two"});
        assert_eq!(extract(&record).channel.id, "bbc-two");
    }

    #[test]
    fn test_blank_id_ignored() {
        let record = json!({"id": "  ", "name": "Film4"});
        assert_eq!(extract(&record).channel.id, "film4");
    }

    #[test]
    fn test_blank_id_falls_through_to_next_key() {
        let record = json!({"id": "", "serviceId": 4164, "name": "BBC"});
        assert_eq!(extract(&record).channel.id, "4164");
    }

    #[test]
    fn test_long_ids_are_capped() {
        let unnamed = json!({"name": "a".repeat(300), "events": []});
        let ch = extract(&unnamed);
        assert_eq!(ch.channel.id.len(), MAX_ID_BYTES);
        assert!(is_filename_safe(&ch.channel.id));

        let explicit = json!({"id": format!("{}-x", "Z".repeat(200))});
        let ch = extract(&explicit);
        assert!(ch.channel.id.len() <= MAX_ID_BYTES);
        assert!(!ch.channel.id.ends_with('-'));
        assert!(is_filename_safe(&ch.channel.id));
    }

    #[test]
    fn test_logo_keys_and_remote_drop() {
        let local = json!({"id": "a", "logo_url": "logos/a.png"});
        assert_eq!(extract(&local).channel.logo.as_deref(), Some("logos/a.png"));

        let generic = json!({"id": "b", "image": "logos/b.png"});
        assert_eq!(extract(&generic).channel.logo.as_deref(), Some("logos/b.png"));

        let remote = json!({"id": "c", "logo": "https://cdn.example.com/c.png"});
        assert_eq!(extract(&remote).channel.logo, None);
    }

    #[test]
    fn test_nested_schedule_found() {
        let record = json!({
            "id": "n1",
            "meta": {"region": "London"},
            "listing": {"schedule": [{"title": "A"}, {"title": "B"}, 7]}
        });
        let ch = extract(&record);
        assert_eq!(ch.raw_events.len(), 2);
        assert_eq!(ch.source, EventSource::Nested("listing".to_string()));
    }

    #[test]
    fn test_nesting_is_one_level_only() {
        let record = json!({"id": "deep", "outer": {"inner": {"events": [{"title": "A"}]}}});
        let ch = extract(&record);
        assert!(ch.raw_events.is_empty());
        assert_eq!(ch.source, EventSource::Missing);
    }

    #[test]
    fn test_normalize_channel() {
        let record = json!({
            "id": "1",
            "name": "Ch1",
            "events": [{"name": "Show", "startTime": 100, "duration": 30}]
        });
        let ctx = LogContext::new("test-run");
        let (channel, events) =
            normalize_channel(record.as_object().unwrap(), &NormalizeOptions::default(), &ctx);
        assert_eq!(channel.id, "1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].duration, Some(30));
        assert_eq!(events[0].name, "Show");
    }
}
