//! NIP-01 protocol types shared across the workspace.
//!
//! This crate is a pure data layer: the signed event structure, the
//! client/relay wire messages, and subscription filters. No I/O lives
//! here; everything deserializes from and serializes to the tagged-array
//! wire form relays speak.

pub mod event;
pub mod message;

pub use event::Event;
pub use message::{ClientMessage, Filter, MessageError, RelayMessage};

/// Addressable server announcement events. The `d` tag carries the
/// announced server's canonical URL.
pub const KIND_SERVER_ANNOUNCEMENT: u16 = 31990;

/// Identity tag of addressable events (NIP-33 `d` tag).
pub const TAG_IDENTIFIER: &str = "d";
