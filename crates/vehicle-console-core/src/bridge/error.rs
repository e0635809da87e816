//! Bridge errors

use thiserror::Error;

/// Errors raised by a live vehicle bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bridge returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Command rejected: {0}")]
    Rejected(String),

    #[error("Vehicle bridge unavailable")]
    Unavailable,

    #[error("Invalid bridge URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
