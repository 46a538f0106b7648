//! Output assembly.
//!
//! Combines normalized channels into per-channel documents and the index,
//! keeping resolution order and making ids unique within the run.

use std::collections::HashSet;

use crate::logging::structured::LogContext;
use crate::storage::models::{CanonicalChannel, CanonicalEvent, ChannelDoc, Index, IndexEntry};

/// Documents ready to be written for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub index: Index,
    pub documents: Vec<ChannelDoc>,
}

impl Assembly {
    /// Look up a channel document by its (final) id.
    pub fn document(&self, id: &str) -> Option<&ChannelDoc> {
        self.documents.iter().find(|doc| doc.channel.id == id)
    }
}

/// Relative path of a channel document under the output root.
pub fn channel_path(id: &str) -> String {
    format!("channels/{}.json", id)
}

/// Build the index and channel documents.
pub fn assemble(
    channels: Vec<(CanonicalChannel, Vec<CanonicalEvent>)>,
    start: i64,
    ctx: &LogContext,
) -> Assembly {
    let mut used: HashSet<String> = HashSet::with_capacity(channels.len());
    let mut entries = Vec::with_capacity(channels.len());
    let mut documents = Vec::with_capacity(channels.len());

    for (mut channel, events) in channels {
        let id = unique_id(&channel.id, &used);
        if id != channel.id {
            crate::log_warn!(
                ctx,
                "CHANNEL_ID_COLLISION",
                original = channel.id,
                assigned = id,
            );
            channel.id = id;
        }
        used.insert(channel.id.clone());

        entries.push(IndexEntry {
            id: channel.id.clone(),
            name: channel.name.clone(),
            path: channel_path(&channel.id),
            logo: channel.logo.clone(),
        });
        documents.push(ChannelDoc { channel, events });
    }

    Assembly {
        index: Index {
            start,
            channels: entries,
        },
        documents,
    }
}

fn unique_id(id: &str, used: &HashSet<String>) -> String {
    if !used.contains(id) {
        return id.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", id, n))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| id.to_string())
}
