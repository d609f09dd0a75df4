//! Bounded fan-out across a relay list.
//!
//! The list is walked in consecutive chunks of the concurrency limit,
//! with a barrier between chunks: every query in a chunk runs as its own
//! task and the whole chunk is joined before the next starts. That keeps
//! the number of open connections at or below the limit for any list
//! length, at the cost of some throughput. No relay is retried within a
//! session.

use crate::relay::{self, QueryConfig, RelayQueryResult};
use tracing::{debug, warn};

/// Query every relay in `relays`, at most `concurrency` at a time.
///
/// Returns one result per input relay, in input order. A relay that
/// fails or times out contributes an empty result; nothing here can
/// abort the batch.
pub async fn query_all(
    relays: &[String],
    config: &QueryConfig,
    concurrency: usize,
) -> Vec<RelayQueryResult> {
    let concurrency = concurrency.max(1);
    let mut results = Vec::with_capacity(relays.len());

    for chunk in relays.chunks(concurrency) {
        debug!("querying chunk of {} relays", chunk.len());

        let handles: Vec<_> = chunk
            .iter()
            .map(|url| {
                let url = url.clone();
                let config = config.clone();
                tokio::spawn(async move { relay::query(&url, &config).await })
            })
            .collect();

        for (url, handle) in chunk.iter().zip(handles) {
            match handle.await {
                Ok(result) => results.push(result),
                // The query contract rules this out; a panicked task is
                // still just one relay lost.
                Err(e) => {
                    warn!("query task for {} failed: {}", url, e);
                    results.push(RelayQueryResult::failed(url.clone()));
                }
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::QueryOutcome;
    use std::time::Duration;

    #[tokio::test]
    async fn test_query_all_empty_list() {
        let results = query_all(&[], &QueryConfig::default(), 6).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_query_all_returns_result_per_relay() {
        // Unreachable relays; every one still yields a (failed) result,
        // in input order, even with a concurrency limit below the list
        // length and a zero limit guarded up to one.
        let relays: Vec<String> = (0..5).map(|_| "ws://127.0.0.1:1/".to_string()).collect();
        let config = QueryConfig {
            timeout: Duration::from_millis(200),
            ..Default::default()
        };

        let results = query_all(&relays, &config, 0).await;
        assert_eq!(results.len(), 5);
        for result in &results {
            assert_eq!(result.outcome, QueryOutcome::TransportError);
            assert!(result.records.is_empty());
        }
    }
}
