//! One end-to-end discovery run.
//!
//! A session is constructed per invocation, fully consumed, and not
//! persisted: fan out over the relay list, merge the results, emit a
//! report. The session always succeeds with best-effort data; the caller
//! reads `relays_searched` to gauge confidence. Zero servers from
//! all-failing relays is a valid outcome.

use crate::directory::CORE_RELAYS;
use crate::error::{DiscoveryError, Result};
use crate::merge::merge;
use crate::pool;
use crate::record::ServerRecord;
use crate::relay::{QueryConfig, QueryOutcome};
use chrono::{DateTime, Utc};
use nostr::KIND_SERVER_ANNOUNCEMENT;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

/// Default per-relay timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default bound on concurrently open relay connections.
pub const DEFAULT_CONCURRENCY: usize = 6;

/// Default per-relay result cap.
pub const DEFAULT_RESULT_CAP: u64 = 500;

/// Discovery session configuration.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Relays to query.
    pub relays: Vec<String>,
    /// Per-relay timeout.
    pub timeout: Duration,
    /// Bound on concurrently open connections.
    pub concurrency: usize,
    /// Per-relay result cap.
    pub limit: u64,
    /// Announcement event kind.
    pub kind: u16,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            relays: CORE_RELAYS.iter().map(|s| s.to_string()).collect(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            concurrency: DEFAULT_CONCURRENCY,
            limit: DEFAULT_RESULT_CAP,
            kind: KIND_SERVER_ANNOUNCEMENT,
        }
    }
}

/// The canonical snapshot a session produces.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryReport {
    /// Always true for a session that ran; failing relays do not fail
    /// the session.
    pub success: bool,
    /// Number of unique servers discovered.
    pub total_servers: usize,
    /// How many relays were queried, for confidence gauging.
    pub relays_searched: usize,
    /// Unique servers, descending by announcement timestamp.
    pub servers: Vec<ServerRecord>,
    /// Sorted URL list, same order as `servers`.
    pub urls: Vec<String>,
    /// When this snapshot was generated.
    pub generated_at: DateTime<Utc>,
}

/// Run one discovery session.
///
/// The only fatal condition is an empty relay list; everything a relay
/// can do wrong degrades to fewer records.
pub async fn discover(config: &DiscoveryConfig) -> Result<DiscoveryReport> {
    if config.relays.is_empty() {
        return Err(DiscoveryError::NoRelays);
    }

    let query_config = QueryConfig {
        timeout: config.timeout,
        limit: config.limit,
        kind: config.kind,
    };

    info!(
        "discovering kind {} announcements across {} relays",
        config.kind,
        config.relays.len()
    );

    let results = pool::query_all(&config.relays, &query_config, config.concurrency).await;

    let relays_searched = results.len();
    let complete = results
        .iter()
        .filter(|r| r.outcome == QueryOutcome::Eose)
        .count();
    let total_records: usize = results.iter().map(|r| r.records.len()).sum();
    info!(
        "{} of {} relays answered fully, {} records before merge",
        complete, relays_searched, total_records
    );

    let servers = merge(results);
    let urls = servers.iter().map(|s| s.url.clone()).collect();

    Ok(DiscoveryReport {
        success: true,
        total_servers: servers.len(),
        relays_searched,
        servers,
        urls,
        generated_at: Utc::now(),
    })
}
