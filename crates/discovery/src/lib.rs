//! Concurrent multi-relay discovery of servers announced on Nostr.
//!
//! Servers publish announcement events whose `d` tag carries their URL;
//! this crate fans out over a set of relays, collects those events
//! within a per-relay time budget, and merges everything into one
//! deduplicated, sorted snapshot. Discovery is best-effort by design:
//! slow, absent, or malformed relays cost records, never the session.
//!
//! # Example
//!
//! ```rust,no_run
//! use nostr_discovery::{bootstrap_relays, discover, DirectoryConfig, DiscoveryConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Core relays plus a random sample from the public directory;
//!     // falls back to the core set if the directory is unreachable.
//!     let relays = bootstrap_relays(&DirectoryConfig::default()).await;
//!
//!     let config = DiscoveryConfig {
//!         relays,
//!         ..Default::default()
//!     };
//!
//!     let report = discover(&config).await.unwrap();
//!     println!(
//!         "{} servers from {} relays",
//!         report.total_servers, report.relays_searched
//!     );
//!     for server in &report.servers {
//!         println!("{} ({})", server.url, server.created_at);
//!     }
//! }
//! ```

pub mod directory;
pub mod error;
pub mod merge;
pub mod pool;
pub mod record;
pub mod relay;
pub mod session;

pub use directory::{bootstrap_relays, DirectoryConfig, CORE_RELAYS, DEFAULT_DIRECTORY_URL};
pub use error::{DiscoveryError, Result};
pub use merge::merge;
pub use pool::query_all;
pub use record::{ServerRecord, SERVER_URL_SCHEME};
pub use relay::{generate_subscription_id, query, QueryConfig, QueryOutcome, RelayQueryResult};
pub use session::{
    discover, DiscoveryConfig, DiscoveryReport, DEFAULT_CONCURRENCY, DEFAULT_RESULT_CAP,
    DEFAULT_TIMEOUT_MS,
};
