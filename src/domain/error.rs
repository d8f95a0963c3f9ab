//! Domain Error Types
//!
//! Errors raised by domain types independent of any transport.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Event payload could not be decoded or encoded
    #[error("Malformed event: {0}")]
    MalformedEvent(#[from] serde_json::Error),
}
