//! # Repository Envelope
//!
//! The member repository answers every list request with
//! `{ "success": bool, "data": [...] }`. The engine only consumes `data`.
//!
//! Payload size is validated BEFORE deserialization so an oversized
//! payload is never parsed.

use crate::RelgraphError;
use crate::primitives::MAX_SNAPSHOT_BYTES;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A repository list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, alias = "message", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Wrap a successful payload.
    #[must_use]
    pub fn ok(data: Vec<T>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    /// Unwrap the payload, turning `success: false` into an upstream error.
    ///
    /// `what` names the collection for the error message.
    pub fn into_data(self, what: &str) -> Result<Vec<T>, RelgraphError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(RelgraphError::Upstream(format!(
                "{} request failed: {}",
                what,
                self.error.as_deref().unwrap_or("no error message")
            )))
        }
    }
}

/// Reject payloads above [`MAX_SNAPSHOT_BYTES`].
pub fn check_payload_size(len: usize) -> Result<(), RelgraphError> {
    if len > MAX_SNAPSHOT_BYTES {
        return Err(RelgraphError::PayloadTooLarge {
            size: len,
            limit: MAX_SNAPSHOT_BYTES,
        });
    }
    Ok(())
}

/// Parse a list payload.
///
/// Accepts either the repository envelope or a bare JSON array (the shape of
/// a hand-exported snapshot file).
pub fn parse_list<T: DeserializeOwned>(bytes: &[u8], what: &str) -> Result<Vec<T>, RelgraphError> {
    check_payload_size(bytes.len())?;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListPayload<T> {
        Envelope(ApiEnvelope<T>),
        Bare(Vec<T>),
    }

    let payload: ListPayload<T> = serde_json::from_slice(bytes)
        .map_err(|e| RelgraphError::DeserializationError(format!("{}: {}", what, e)))?;

    match payload {
        ListPayload::Envelope(envelope) => envelope.into_data(what),
        ListPayload::Bare(items) => Ok(items),
    }
}

// =============================================================================
// TESTS
// =============================================================================
