//! Custom error types for the application.
//!
//! This module defines the primary error type, `SentinelError`, for the
//! entire application. Using the `thiserror` crate, it provides a
//! centralized and consistent way to handle the different kinds of errors
//! that can occur, from I/O and configuration issues to malformed device
//! telemetry.
//!
//! ## Error Taxonomy
//!
//! - **`Config`** / **`Configuration`**: parsing failures from the
//!   `figment` loader, and semantic errors (invalid values that parse but
//!   are logically wrong) caught during validation.
//! - **`Io`**: wraps standard `std::io::Error` for file and port I/O.
//! - **`Parse`**: a malformed numeric field on a telemetry line. Always
//!   recovered inside the ingest loop; never terminates the stream.
//! - **`InvalidMode`**: an unknown mission-mode name, surfaced
//!   synchronously to the caller of the mode-change operation with no
//!   effect on stored state.
//! - **`Source`**: the reading source could not be opened or dropped.
//!   Reconnection policy lives with the caller; previously recorded
//!   history stays queryable and exportable.
//! - **`Export`**: a failure while rendering the retained history.

use thiserror::Error;

pub use crate::telemetry::sample::ParseError;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, SentinelError>;

/// Central application error type.
#[derive(Error, Debug)]
pub enum SentinelError {
    /// Configuration file or environment could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    /// Configuration loaded but failed semantic validation.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A telemetry line contained a malformed numeric field.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Unknown mission-mode name; state is unchanged.
    #[error("Invalid mission mode: {0}")]
    InvalidMode(String),

    /// The reading source cannot be opened or dropped mid-stream.
    #[error("Reading source error: {0}")]
    Source(String),

    /// History export failed.
    #[error("Export error: {0}")]
    Export(String),
}
