//! HTTP request handlers organized by functionality

pub mod api;
pub mod download;
pub mod error;
pub mod range;
pub mod streaming;

// Re-export handler functions
pub use api::{ListQuery, list_audio};
pub use download::download_audio;
pub use error::ApiError;
pub use range::{partial_content_response, range_header};
pub use streaming::stream_audio;
