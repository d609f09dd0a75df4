//! Relay directory bootstrap with a fixed-core fallback.
//!
//! The directory is an HTTP API listing currently reachable relays. It
//! is a best-effort diversity source: a session always carries the core
//! set, and on any directory failure proceeds with the core set alone.
//! That degraded path is expected operation, not an error.

use rand::seq::IndexedRandom;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Relays every session queries regardless of directory availability.
pub const CORE_RELAYS: &[&str] = &[
    "wss://relay.damus.io",
    "wss://nos.lol",
    "wss://relay.nostr.band",
    "wss://nostr.wine",
];

/// Default relay directory endpoint, returning a JSON array of relay URLs.
pub const DEFAULT_DIRECTORY_URL: &str = "https://api.nostr.watch/v1/online";

/// Default number of directory relays sampled per session.
pub const DEFAULT_SAMPLE_SIZE: usize = 8;

/// Directory bootstrap configuration.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Directory endpoint URL.
    pub url: String,
    /// How many directory-listed relays to sample, uniformly without
    /// replacement.
    pub sample_size: usize,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DIRECTORY_URL.to_string(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Error)]
enum DirectoryError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

async fn fetch_directory(config: &DirectoryConfig) -> Result<Vec<String>, DirectoryError> {
    let client = reqwest::Client::builder().timeout(config.timeout).build()?;
    let listed: Vec<String> = client
        .get(&config.url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(listed)
}

/// Resolve the relay list for a session: the core set plus a random
/// sample of directory-listed relays.
///
/// Directory output is untrusted: entries are filtered to `wss://` and
/// deduplicated before sampling. Any fetch or decode failure falls back
/// to the core set alone.
pub async fn bootstrap_relays(config: &DirectoryConfig) -> Vec<String> {
    let mut relays: Vec<String> = CORE_RELAYS.iter().map(|s| s.to_string()).collect();

    let listed = match fetch_directory(config).await {
        Ok(listed) => listed,
        Err(e) => {
            warn!(
                "relay directory {} unavailable, using core set: {}",
                config.url, e
            );
            return relays;
        }
    };
    debug!("directory listed {} relays", listed.len());

    let mut candidates: Vec<String> = listed
        .into_iter()
        .filter(|url| url.starts_with("wss://"))
        .filter(|url| !relays.contains(url))
        .collect();
    candidates.sort();
    candidates.dedup();

    let mut rng = rand::rng();
    for url in candidates.choose_multiple(&mut rng, config.sample_size) {
        relays.push(url.clone());
    }

    info!(
        "relay list ready: {} core + {} sampled",
        CORE_RELAYS.len(),
        relays.len() - CORE_RELAYS.len()
    );
    relays
}
