//! Error types for Cinematch.
//!
//! This module defines the centralized error type [`CinematchError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented with the
//! `thiserror` crate.
//!
//! None of these errors is fatal to a browsing session: catalog failures become
//! "no new data" for the pagination engine, and persistence failures degrade the
//! favorites set instead of aborting.

use thiserror::Error;

/// The main error type for Cinematch operations.
///
/// # Examples
///
/// ```
/// use cinematch::CinematchError;
///
/// fn load_config() -> Result<(), CinematchError> {
///     Err(CinematchError::Config("missing api token".to_string()))
/// }
///
/// assert!(load_config().is_err());
/// ```
#[derive(Debug, Error)]
pub enum CinematchError {
    /// Reading from or writing to the key-value store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A request to the remote catalog failed at the transport level or
    /// returned a non-success status.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A catalog response or persisted document could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Communication with the background catalog worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for Cinematch operations.
pub type Result<T> = std::result::Result<T, CinematchError>;
