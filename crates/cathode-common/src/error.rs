//! Common error types used throughout cathode.
//!
//! This module provides a unified error type covering the failure cases the
//! scheduler actually distinguishes: oversized content, a query instant that
//! no persisted row covers, database failures, and bad input. An empty
//! candidate pool is deliberately *not* an error — strategies and the packer
//! treat it as a normal terminal condition and return what they accumulated.

/// Common error type for cathode.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Content runtime exceeds the largest slot bucket (240 minutes).
    #[error("No slot size fits a runtime of {runtime_secs}s")]
    NoSizeFits { runtime_secs: u32 },

    /// No persisted schedule row contains the queried instant.
    #[error("Channel {channel}: nothing scheduled at the queried time")]
    NoActiveSlot { channel: u32 },

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration is missing or malformed.
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
