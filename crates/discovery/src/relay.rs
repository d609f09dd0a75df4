//! Single-relay query: one bounded subscription over one WebSocket.
//!
//! A query opens a connection, sends one REQ for announcement events,
//! drains matching events through the record parser, and finalizes on
//! whichever comes first: EOSE, the per-relay deadline, a close, or a
//! transport error. It always resolves with whatever was collected; a
//! failing relay is invisible to the rest of the batch.

use crate::record::ServerRecord;
use futures::{SinkExt, StreamExt};
use nostr::{ClientMessage, Filter, RelayMessage, KIND_SERVER_ANNOUNCEMENT};
use std::time::Duration;
use tokio::time::{timeout, timeout_at, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, warn};
use uuid::Uuid;

/// Grace period for the closing handshake after finalization. A relay
/// that sits on the close frame must not stall the batch.
const CLOSE_GRACE: Duration = Duration::from_millis(250);

/// Per-relay query configuration.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Hard bound on the whole conversation, connect included.
    pub timeout: Duration,
    /// Result-count cap, sent to the relay and enforced locally.
    pub limit: u64,
    /// Announcement event kind to subscribe to.
    pub kind: u16,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5000),
            limit: 500,
            kind: KIND_SERVER_ANNOUNCEMENT,
        }
    }
}

/// How a relay query reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Relay signalled end of stored events (or the result cap was hit).
    Eose,
    /// The per-relay deadline fired first.
    Timeout,
    /// Relay closed the connection or the stream ended.
    Closed,
    /// Connect or transport failure.
    TransportError,
}

/// Records collected from one relay, plus how the query ended.
///
/// Ephemeral: consumed by the merge step and discarded.
#[derive(Debug, Clone)]
pub struct RelayQueryResult {
    /// The relay this result came from.
    pub relay_url: String,
    /// Records parsed from matching events, in receipt order.
    pub records: Vec<ServerRecord>,
    /// Terminal state of the query.
    pub outcome: QueryOutcome,
}

impl RelayQueryResult {
    pub(crate) fn failed(relay_url: impl Into<String>) -> Self {
        Self {
            relay_url: relay_url.into(),
            records: Vec::new(),
            outcome: QueryOutcome::TransportError,
        }
    }
}

/// Generate a unique subscription ID.
pub fn generate_subscription_id() -> String {
    Uuid::new_v4().to_string()[..8].to_string()
}

/// Query one relay for server announcements.
///
/// Never fails from the caller's perspective: every connect, send, and
/// receive shares one absolute deadline, and any failure mode finalizes
/// with the records accumulated so far.
pub async fn query(relay_url: &str, config: &QueryConfig) -> RelayQueryResult {
    let deadline = Instant::now() + config.timeout;
    let mut records: Vec<ServerRecord> = Vec::new();

    let mut ws = match timeout_at(deadline, connect_async(relay_url)).await {
        Ok(Ok((stream, _))) => stream,
        Ok(Err(e)) => {
            warn!("connection to {} failed: {}", relay_url, e);
            return RelayQueryResult::failed(relay_url);
        }
        Err(_) => {
            warn!("connection to {} timed out", relay_url);
            return RelayQueryResult {
                relay_url: relay_url.to_string(),
                records,
                outcome: QueryOutcome::Timeout,
            };
        }
    };

    let subscription_id = generate_subscription_id();
    let req = ClientMessage::Req {
        subscription_id: subscription_id.clone(),
        filters: vec![Filter::new().kinds(vec![config.kind]).limit(config.limit)],
    };
    let subscribed = match req.to_json() {
        Ok(json) => matches!(
            timeout_at(deadline, ws.send(Message::text(json))).await,
            Ok(Ok(()))
        ),
        Err(e) => {
            warn!("failed to encode REQ for {}: {}", relay_url, e);
            false
        }
    };
    if !subscribed {
        let _ = timeout(CLOSE_GRACE, ws.close(None)).await;
        return RelayQueryResult::failed(relay_url);
    }

    debug!("subscribed to {} as {}", relay_url, subscription_id);

    let outcome = loop {
        let frame = match timeout_at(deadline, ws.next()).await {
            Err(_) => break QueryOutcome::Timeout,
            Ok(None) => break QueryOutcome::Closed,
            Ok(Some(Err(e))) => {
                warn!("transport error from {}: {}", relay_url, e);
                break QueryOutcome::TransportError;
            }
            Ok(Some(Ok(frame))) => frame,
        };

        match frame {
            Message::Text(text) => match RelayMessage::from_json(text.as_str()) {
                Ok(RelayMessage::Event {
                    subscription_id: sid,
                    event,
                }) if sid == subscription_id => {
                    if let Some(record) = ServerRecord::from_event(&event) {
                        records.push(record);
                        if records.len() as u64 >= config.limit {
                            break QueryOutcome::Eose;
                        }
                    }
                }
                Ok(RelayMessage::Eose {
                    subscription_id: sid,
                }) if sid == subscription_id => break QueryOutcome::Eose,
                Ok(RelayMessage::Closed {
                    subscription_id: sid,
                    message,
                }) if sid == subscription_id => {
                    debug!("{} closed subscription: {}", relay_url, message);
                    break QueryOutcome::Closed;
                }
                Ok(msg) => debug!("ignoring message from {}: {:?}", relay_url, msg),
                // One undecodable frame never kills the stream.
                Err(e) => debug!("undecodable frame from {}: {}", relay_url, e),
            },
            Message::Ping(payload) => {
                let _ = timeout_at(deadline, ws.send(Message::Pong(payload))).await;
            }
            Message::Close(_) => break QueryOutcome::Closed,
            _ => {}
        }
    };

    debug!(
        "finalized {} with {} records ({:?})",
        relay_url,
        records.len(),
        outcome
    );

    let _ = timeout(CLOSE_GRACE, ws.close(None)).await;

    RelayQueryResult {
        relay_url: relay_url.to_string(),
        records,
        outcome,
    }
}
