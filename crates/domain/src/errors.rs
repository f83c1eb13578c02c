//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the gantry client
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum GantryError {
    /// A required element of the login handshake could not be extracted
    /// from the returned HTML or script body. Fatal, never retried.
    #[error("Auth parse error: {0}")]
    AuthParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    /// The server kept answering `ratelimited` after the configured
    /// number of re-login attempts.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for gantry operations
pub type Result<T> = std::result::Result<T, GantryError>;
