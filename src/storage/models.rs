//! Output models.
//!
//! These models represent the structure of the documents written to disk.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A channel as written to `channels/<id>.json` and the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalChannel {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// One scheduled programme in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEvent {
    /// Whatever upstream used for the start, unconverted.
    pub start_time: Value,
    /// Whole minutes, or null when it could not be determined.
    pub duration: Option<i64>,
    pub name: String,
    pub description: String,
    /// Local reference or empty. Never a remote URL.
    pub image: String,
    /// Upstream event with image keys and oversized fields stripped.
    pub raw: Value,
}

/// Per-channel document.
///
/// Serializes as `{channel, events, compat: {freesat_card: [{event}]}}`.
/// The compat block is written from the same `events` slice, so the two
/// copies cannot diverge.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDoc {
    pub channel: CanonicalChannel,
    pub events: Vec<CanonicalEvent>,
}

#[derive(Serialize)]
struct CompatBlock<'a> {
    freesat_card: [CompatCard<'a>; 1],
}

#[derive(Serialize)]
struct CompatCard<'a> {
    event: &'a [CanonicalEvent],
}

impl Serialize for ChannelDoc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut doc = serializer.serialize_struct("ChannelDoc", 3)?;
        doc.serialize_field("channel", &self.channel)?;
        doc.serialize_field("events", &self.events)?;
        doc.serialize_field(
            "compat",
            &CompatBlock {
                freesat_card: [CompatCard {
                    event: &self.events,
                }],
            },
        )?;
        doc.end()
    }
}

/// One line of `index.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// `index.json`: the requested day start plus channels in resolution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub start: i64,
    pub channels: Vec<IndexEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(name: &str) -> CanonicalEvent {
        CanonicalEvent {
            start_time: json!(100),
            duration: Some(30),
            name: name.to_string(),
            description: String::new(),
            image: String::new(),
            raw: json!({"name": name}),
        }
    }

    #[test]
    fn test_event_field_names() {
        let value = serde_json::to_value(event("Show")).unwrap();
        assert_eq!(
            value,
            json!({
                "startTime": 100,
                "duration": 30,
                "name": "Show",
                "description": "",
                "image": "",
                "raw": {"name": "Show"}
            })
        );
    }

    #[test]
    fn test_missing_duration_serializes_null() {
        let mut ev = event("Show");
        ev.duration = None;
        let value = serde_json::to_value(ev).unwrap();
        assert_eq!(value["duration"], Value::Null);
    }

    #[test]
    fn test_channel_doc_compat_mirrors_events() {
        let doc = ChannelDoc {
            channel: CanonicalChannel {
                id: "1".to_string(),
                name: "Ch1".to_string(),
                logo: None,
            },
            events: vec![event("A"), event("B")],
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["compat"]["freesat_card"][0]["event"], value["events"]);
        assert_eq!(value["channel"], json!({"id": "1", "name": "Ch1"}));
        assert_eq!(value["compat"]["freesat_card"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_index_entry_logo_only_when_present() {
        let with_logo = IndexEntry {
            id: "a".to_string(),
            name: "A".to_string(),
            path: "channels/a.json".to_string(),
            logo: Some("logos/a.png".to_string()),
        };
        let without_logo = IndexEntry {
            logo: None,
            ..with_logo.clone()
        };
        assert_eq!(serde_json::to_value(&with_logo).unwrap()["logo"], json!("logos/a.png"));
        assert!(serde_json::to_value(&without_logo).unwrap().get("logo").is_none());
    }
}
