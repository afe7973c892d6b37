//! Beatstream Core - audio library listing and range streaming
//!
//! This crate provides the building blocks behind the Beatstream HTTP API:
//! byte-range parsing, filename validation, directory scanning with sidecar
//! metadata, cursor pagination, chunked file streaming and configuration.

pub mod config;
pub mod filename;
pub mod library;
pub mod metadata;
pub mod range;
pub mod streaming;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::BeatstreamConfig;
pub use filename::is_valid_filename;
pub use library::{AudioFileEntry, AudioLibrary, LibraryError, Page, PageRequest, paginate};
pub use metadata::{Metadata, MetadataStore};
pub use range::{ByteRange, RangeError, parse_range_header};
pub use streaming::{AudioFile, StreamingError};

/// Errors surfaced by the server and CLI entry points.
///
/// HTTP handlers map the per-module errors to status codes themselves.
#[derive(Debug, thiserror::Error)]
pub enum BeatstreamError {
    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BeatstreamError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            BeatstreamError::Library(e) => match e {
                LibraryError::InvalidLimit { value } => format!("Invalid page limit: {value}"),
                LibraryError::InvalidCursor { value } => format!("Invalid cursor: {value}"),
                LibraryError::DirectoryRead { path, .. } => {
                    format!("Could not read audio directory {}", path.display())
                }
            },
            BeatstreamError::Configuration { reason } => format!("Configuration error: {reason}"),
            BeatstreamError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            BeatstreamError::Configuration { .. }
                | BeatstreamError::Library(
                    LibraryError::InvalidLimit { .. } | LibraryError::InvalidCursor { .. }
                )
        )
    }
}

pub type Result<T> = std::result::Result<T, BeatstreamError>;
