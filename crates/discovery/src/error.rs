//! Discovery error types.

use thiserror::Error;

/// Discovery error type.
///
/// Individual relay failures are never errors; they surface as per-relay
/// outcomes. The only fatal condition is a session that cannot be
/// constructed at all.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No relays to search: nothing configured and no core fallback.
    #[error("no relays configured")]
    NoRelays,
}

/// Discovery result type.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
