//! NIP-01 event structure.
//!
//! Events are the unit of content on the relay network. Everything in an
//! event is relay-supplied and therefore untrusted: the tag helpers here
//! bounds-check every access instead of assuming well-formed shapes.

use serde::{Deserialize, Serialize};

/// A signed Nostr event as carried on the relay wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// 32-bytes lowercase hex-encoded sha256 of the serialized event data
    pub id: String,
    /// 32-bytes lowercase hex-encoded public key of the event creator
    pub pubkey: String,
    /// Unix timestamp in seconds
    pub created_at: u64,
    /// Event kind (integer between 0 and 65535)
    pub kind: u16,
    /// Array of arrays of strings (tags)
    pub tags: Vec<Vec<String>>,
    /// Arbitrary string content
    pub content: String,
    /// 64-bytes lowercase hex signature
    pub sig: String,
}

impl Event {
    /// First tag whose first element equals `name`, if any.
    pub fn tag(&self, name: &str) -> Option<&[String]> {
        self.tags
            .iter()
            .find(|tag| tag.first().map(String::as_str) == Some(name))
            .map(Vec::as_slice)
    }

    /// Value (second element) of the first tag named `name`.
    ///
    /// Returns `None` when the tag is absent or has no value element.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tag(name).and_then(|tag| tag.get(1)).map(String::as_str)
    }
}
