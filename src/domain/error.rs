//! Error types for the conda metadata browser.
//!
//! This module defines the centralized error type [`BrowseError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Errors fall into four families:
//!
//! - **Gateway**: the channel or one of its subdirs could not be reached or decoded.
//!   Always recovered by the controller with a status message.
//! - **Configuration**: invalid input at startup, reported before the UI starts.
//! - **Download**: transfer failures, reported as a notification.
//! - **Infrastructure**: IO, HTTP and JSON failures wrapped via `#[from]`.

use std::time::Duration;
use thiserror::Error;

/// The main error type for browser operations.
///
/// Most variants carry a human-readable description because errors eventually
/// surface as status text in the UI.
///
/// # Examples
///
/// ```
/// use conda_browse::domain::BrowseError;
///
/// fn validate_channel(name: &str) -> Result<(), BrowseError> {
///     if name.is_empty() {
///         return Err(BrowseError::Config("Channel cannot be empty.".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(validate_channel("").is_err());
/// ```
#[derive(Debug, Error)]
pub enum BrowseError {
    /// The metadata gateway failed to answer a query.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Platform discovery found no reachable subdir for the channel.
    #[error("No reachable platform repodata endpoints found.")]
    NoPlatforms,

    /// A platform name given on the command line is not a known conda subdir.
    #[error("Invalid platform: {0}")]
    InvalidPlatform(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An artifact transfer failed.
    #[error("Download error: {0}")]
    Download(String),

    /// No data arrived within the transfer timeout.
    #[error("Transfer timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// HTTP request failed.
    ///
    /// Automatically converts from `reqwest::Error`.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Repodata could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Theme parsing failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with a background task failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Filesystem or terminal I/O operation failed.
    ///
    /// Automatically converts from `std::io::Error`.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias used across the crate.
pub type Result<T> = std::result::Result<T, BrowseError>;
