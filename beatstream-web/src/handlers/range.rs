//! HTTP Range request plumbing for audio streaming
//!
//! Parsing lives in `beatstream_core::range`; this module reads the header
//! off the request and builds the 206 response around a body.

use axum::body::Body;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Response;
use beatstream_core::{ByteRange, RangeError};

/// Extract the Range header value, if any.
///
/// An empty header counts as absent.
///
/// # Errors
///
/// - `RangeError::Malformed` - Header value is not valid visible ASCII
pub fn range_header(headers: &HeaderMap) -> Result<Option<&str>, RangeError> {
    match headers.get(header::RANGE) {
        None => Ok(None),
        Some(value) => {
            let value = value.to_str().map_err(|_| RangeError::Malformed)?;
            Ok(Some(value).filter(|v| !v.is_empty()))
        }
    }
}

/// Build a 206 Partial Content response for `range` of a `file_size` byte file.
///
/// # Errors
///
/// - `axum::http::Error` - A header value could not be encoded
pub fn partial_content_response(
    range: ByteRange,
    file_size: u64,
    content_type: &str,
    body: Body,
) -> Result<Response<Body>, axum::http::Error> {
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_RANGE, range.content_range(file_size))
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_LENGTH, range.len())
        .body(body)
}
