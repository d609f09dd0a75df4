//! Server records extracted from announcement events.

use nostr::{Event, TAG_IDENTIFIER};
use serde::{Deserialize, Serialize};

/// Announced endpoints must use secure HTTP; anything else is rejected
/// at parse time.
pub const SERVER_URL_SCHEME: &str = "https://";

/// One discovered server endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    /// Canonical identity: the announced server URL.
    pub url: String,
    /// Advisory display name, if announced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Advisory description, if announced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Pubkey of the announcing party.
    pub publisher: String,
    /// Publisher-claimed timestamp in seconds; conflict resolution key.
    pub created_at: u64,
    /// Source event id, for traceability.
    pub event_id: String,
}

impl ServerRecord {
    /// Extract a server record from one announcement event.
    ///
    /// Returns `None` for anything that is not a well-formed announcement:
    /// missing or empty `d` tag, or a URL outside the secure-HTTP scheme.
    /// Every tag is relay-supplied, so no shape is assumed; a malformed
    /// event yields `None` rather than aborting the caller's stream.
    pub fn from_event(event: &Event) -> Option<Self> {
        let url = event.tag_value(TAG_IDENTIFIER)?;
        if url.is_empty() || !url.starts_with(SERVER_URL_SCHEME) {
            return None;
        }

        Some(Self {
            url: url.to_string(),
            name: event.tag_value("name").map(str::to_string),
            description: event.tag_value("description").map(str::to_string),
            publisher: event.pubkey.clone(),
            created_at: event.created_at,
            event_id: event.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn announcement(tags: Vec<Vec<String>>) -> Event {
        Event {
            id: "event1".to_string(),
            pubkey: "publisher1".to_string(),
            created_at: 1700000000,
            kind: nostr::KIND_SERVER_ANNOUNCEMENT,
            tags,
            content: String::new(),
            sig: "sig".to_string(),
        }
    }

    fn tag(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_valid_announcement() {
        let event = announcement(vec![
            tag(&["d", "https://server.example"]),
            tag(&["name", "Example"]),
            tag(&["description", "An example server"]),
        ]);

        let record = ServerRecord::from_event(&event).unwrap();
        assert_eq!(record.url, "https://server.example");
        assert_eq!(record.name.as_deref(), Some("Example"));
        assert_eq!(record.description.as_deref(), Some("An example server"));
        assert_eq!(record.publisher, "publisher1");
        assert_eq!(record.created_at, 1700000000);
        assert_eq!(record.event_id, "event1");
    }

    #[test]
    fn test_parse_without_metadata_tags() {
        let event = announcement(vec![tag(&["d", "https://x.example"])]);

        let record = ServerRecord::from_event(&event).unwrap();
        assert_eq!(record.url, "https://x.example");
        assert_eq!(record.name, None);
        assert_eq!(record.description, None);
    }

    #[test]
    fn test_parse_rejects_missing_d_tag() {
        let event = announcement(vec![tag(&["name", "no identity"])]);
        assert_eq!(ServerRecord::from_event(&event), None);
    }

    #[test]
    fn test_parse_rejects_d_tag_without_value() {
        let event = announcement(vec![tag(&["d"])]);
        assert_eq!(ServerRecord::from_event(&event), None);
    }

    #[test]
    fn test_parse_rejects_empty_url() {
        let event = announcement(vec![tag(&["d", ""])]);
        assert_eq!(ServerRecord::from_event(&event), None);
    }

    #[test]
    fn test_parse_rejects_insecure_scheme() {
        for url in ["http://server.example", "wss://server.example", "ftp://x"] {
            let event = announcement(vec![tag(&["d", url])]);
            assert_eq!(ServerRecord::from_event(&event), None, "accepted {}", url);
        }
    }

    #[test]
    fn test_parse_uses_first_d_tag() {
        let event = announcement(vec![
            tag(&["d", "https://first.example"]),
            tag(&["d", "https://second.example"]),
        ]);

        let record = ServerRecord::from_event(&event).unwrap();
        assert_eq!(record.url, "https://first.example");
    }

    #[test]
    fn test_parse_tolerates_ragged_tags() {
        let event = announcement(vec![
            vec![],
            tag(&["name"]),
            tag(&["d", "https://x.example", "extra"]),
        ]);

        let record = ServerRecord::from_event(&event).unwrap();
        assert_eq!(record.url, "https://x.example");
        assert_eq!(record.name, None);
    }

    #[test]
    fn test_record_serializes_without_empty_metadata() {
        let event = announcement(vec![tag(&["d", "https://x.example"])]);
        let record = ServerRecord::from_event(&event).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("name"));
        assert!(!json.contains("description"));
    }
}
