//! Error types for Drawbook
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Drawbook operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, provider interactions, image downloads,
/// and session storage.
#[derive(Error, Debug)]
pub enum DrawbookError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, malformed responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// The API credential was rejected by the provider
    #[error("Credential rejected by provider: {0}")]
    CredentialRejected(String),

    /// Image download errors (HTTP failures, size limits, bad payloads)
    #[error("Download error: {0}")]
    Download(String),

    /// Session storage errors (unwritable directory, serialization)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Session name is empty or contains unsafe characters
    #[error("Invalid session name: {0}")]
    InvalidSessionName(String),

    /// Idea list and image path list lengths do not match
    #[error("Session has {ideas} ideas but {images} image paths")]
    MismatchedImageCount {
        /// Number of idea strings in the session
        ideas: usize,
        /// Number of image paths in the session
        images: usize,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Drawbook operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
