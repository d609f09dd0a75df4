//! Merge, dedup, and sort of per-relay results.
//!
//! Last-writer-wins keyed on publisher-claimed freshness: for each URL
//! the record with the greatest `created_at` survives, regardless of
//! which relay delivered it or in what order. Max-by-timestamp is
//! commutative and associative, so the merge is insensitive to relay
//! response races by construction.

use crate::record::ServerRecord;
use crate::relay::RelayQueryResult;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Combine all relay results into one canonical list: unique by `url`,
/// descending by `created_at`.
///
/// On equal timestamps the first-processed record is kept; the final
/// sort breaks timestamp ties by `url` so the output shape is
/// deterministic.
pub fn merge(results: Vec<RelayQueryResult>) -> Vec<ServerRecord> {
    let mut by_url: HashMap<String, ServerRecord> = HashMap::new();

    for record in results.into_iter().flat_map(|r| r.records) {
        match by_url.entry(record.url.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => {
                if record.created_at > slot.get().created_at {
                    slot.insert(record);
                }
            }
        }
    }

    let mut merged: Vec<ServerRecord> = by_url.into_values().collect();
    merged.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.url.cmp(&b.url))
    });
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::QueryOutcome;
    use rand::seq::SliceRandom;

    fn record(url: &str, created_at: u64) -> ServerRecord {
        ServerRecord {
            url: url.to_string(),
            name: None,
            description: None,
            publisher: "pk".to_string(),
            created_at,
            event_id: format!("{}@{}", url, created_at),
        }
    }

    fn result(records: Vec<ServerRecord>) -> RelayQueryResult {
        RelayQueryResult {
            relay_url: "ws://relay.test".to_string(),
            records,
            outcome: QueryOutcome::Eose,
        }
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge(vec![]).is_empty());
        assert!(merge(vec![result(vec![])]).is_empty());
    }

    #[test]
    fn test_merge_newer_record_wins() {
        let merged = merge(vec![
            result(vec![record("https://a.example", 100)]),
            result(vec![record("https://a.example", 200)]),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].created_at, 200);
    }

    #[test]
    fn test_merge_older_record_does_not_replace() {
        let merged = merge(vec![
            result(vec![record("https://a.example", 200)]),
            result(vec![record("https://a.example", 100)]),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].created_at, 200);
    }

    #[test]
    fn test_merge_equal_timestamps_keep_exactly_one() {
        let merged = merge(vec![
            result(vec![record("https://a.example", 100)]),
            result(vec![record("https://a.example", 100)]),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].created_at, 100);
    }

    #[test]
    fn test_merge_sorted_descending_unique() {
        let merged = merge(vec![
            result(vec![record("https://b.example", 50)]),
            result(vec![
                record("https://a.example", 100),
                record("https://c.example", 75),
            ]),
            result(vec![record("https://a.example", 40)]),
        ]);

        let urls: Vec<&str> = merged.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://a.example", "https://c.example", "https://b.example"]
        );
        for pair in merged.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn test_merge_idempotent() {
        let input = vec![
            result(vec![
                record("https://a.example", 100),
                record("https://b.example", 50),
            ]),
            result(vec![record("https://a.example", 200)]),
        ];
        let mut doubled = input.clone();
        doubled.extend(input.clone());

        assert_eq!(merge(input), merge(doubled));
    }

    #[test]
    fn test_merge_commutative_over_input_order() {
        let input = vec![
            result(vec![
                record("https://a.example", 100),
                record("https://b.example", 50),
            ]),
            result(vec![
                record("https://a.example", 200),
                record("https://c.example", 75),
            ]),
            result(vec![record("https://d.example", 75)]),
            result(vec![]),
        ];

        let expected = merge(input.clone());
        let mut rng = rand::rng();
        for _ in 0..20 {
            let mut shuffled = input.clone();
            shuffled.shuffle(&mut rng);
            assert_eq!(merge(shuffled), expected);
        }
    }
}
