//! # Formats Module
//!
//! Wire formats at the engine boundary: repository envelopes and snapshots.
//! Fetching the bytes (files, HTTP) is the app layer's concern.

mod envelope;
mod snapshot;

pub use envelope::{ApiEnvelope, check_payload_size, parse_list};
pub use snapshot::Snapshot;
