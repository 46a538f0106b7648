//! Ranked key tables.
//!
//! Order matters: earlier keys win. Extend a table by appending unless the
//! new spelling should take precedence.

/// Keys holding the list of channel records at the top of a payload.
pub const TOP_LEVEL_CHANNEL_KEYS: &[&str] = &["channels", "results", "items"];

/// Secondary top-level list keys tried after the primary ones.
pub const TOP_LEVEL_SCHEDULE_KEYS: &[&str] = &["schedule", "schedules", "guide"];

/// Keys that mark a bare object as a single channel record.
pub const SINGLE_CHANNEL_MARKERS: &[&str] = &["events", "event", "schedule"];

pub const CHANNEL_ID_KEYS: &[&str] = &[
    "id",
    "channelId",
    "channel_id",
    "serviceId",
    "service_id",
    "sid",
    "uid",
    "service",
];

pub const CHANNEL_NAME_KEYS: &[&str] = &[
    "name",
    "channelName",
    "channel_name",
    "title",
    "serviceName",
    "service_name",
];

/// The trailing `image` is the generic fallback.
pub const CHANNEL_LOGO_KEYS: &[&str] = &[
    "logo",
    "logoUrl",
    "logo_url",
    "channelLogo",
    "channel_logo",
    "image",
];

pub const EVENT_LIST_KEYS: &[&str] = &[
    "events",
    "event",
    "schedule",
    "schedules",
    "programmes",
    "programs",
];

/// Keys searched inside one level of nested objects.
pub const NESTED_EVENT_LIST_KEYS: &[&str] = &["events", "event", "schedule"];

pub const EVENT_TITLE_KEYS: &[&str] = &[
    "main_title",
    "mainTitle",
    "title",
    "name",
    "programme_title",
    "programmeTitle",
];

pub const EVENT_SECONDARY_TITLE_KEYS: &[&str] = &[
    "secondary_title",
    "secondaryTitle",
    "subtitle",
    "episode_title",
    "episodeTitle",
];

pub const EVENT_SYNOPSIS_KEYS: &[&str] = &[
    "synopsis",
    "description",
    "short_synopsis",
    "shortSynopsis",
    "summary",
    "desc",
];

pub const EVENT_START_KEYS: &[&str] = &["start_time", "startTime", "start", "begin", "startDate"];

pub const EVENT_END_KEYS: &[&str] = &["end_time", "endTime", "end", "stop", "endDate"];

pub const EVENT_DURATION_KEYS: &[&str] = &[
    "duration",
    "durationMinutes",
    "duration_minutes",
    "length",
];

/// Every key that may carry an image reference. Also stripped from `raw`.
pub const EVENT_IMAGE_KEYS: &[&str] = &[
    "image_url",
    "imageUrl",
    "image",
    "img",
    "poster",
    "thumbnail",
    "fallback_image_url",
];
