//! JSON error responses

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use beatstream_core::{LibraryError, RangeError, StreamingError};
use serde_json::json;
use tracing::error;

/// Every failure a handler can report, rendered as `{"error": message}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid file name")]
    InvalidFilename,

    #[error("File not found")]
    FileNotFound,

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Streaming(#[from] StreamingError),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("Could not build response")]
    Response(#[from] axum::http::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidFilename => StatusCode::BAD_REQUEST,
            ApiError::FileNotFound => StatusCode::NOT_FOUND,
            ApiError::Library(LibraryError::InvalidLimit { .. })
            | ApiError::Library(LibraryError::InvalidCursor { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Library(LibraryError::DirectoryRead { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Streaming(StreamingError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Streaming(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Range(_) => StatusCode::RANGE_NOT_SATISFIABLE,
            ApiError::Response(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match std::error::Error::source(&self) {
                Some(source) => error!("{self}: {source}"),
                None => error!("{self}"),
            }
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::InvalidFilename.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(LibraryError::InvalidLimit {
                value: "0".to_string()
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(LibraryError::DirectoryRead {
                path: PathBuf::from("audio_files"),
                source: std::io::Error::other("boom"),
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(RangeError::InvalidEnd).status(),
            StatusCode::RANGE_NOT_SATISFIABLE
        );
        assert_eq!(
            ApiError::from(StreamingError::Stat(std::io::Error::other("stat"))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_pass_through() {
        assert_eq!(
            ApiError::from(RangeError::Malformed).to_string(),
            "invalid range header"
        );
        assert_eq!(
            ApiError::from(LibraryError::InvalidCursor {
                value: "x".to_string()
            })
            .to_string(),
            "Invalid cursor format"
        );
    }
}
