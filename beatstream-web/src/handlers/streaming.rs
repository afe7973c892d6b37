//! Audio streaming handler with single byte-range support

use std::io;

use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::Response;
use beatstream_core::{AudioFile, StreamingError, is_valid_filename, parse_range_header};
use futures::TryStreamExt;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, error};

use super::error::ApiError;
use super::range::{partial_content_response, range_header};
use crate::server::AppState;

/// `GET /api/audio/{id}`
///
/// Without a Range header the whole file is returned with status 200.
/// With one, exactly the requested bytes are streamed with status 206.
///
/// # Errors
///
/// - `ApiError::InvalidFilename` - Name fails traversal or extension checks (400)
/// - `ApiError::Streaming` - File missing (404) or unreadable (500)
/// - `ApiError::Range` - Range header cannot be satisfied (416)
pub async fn stream_audio(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    if !is_valid_filename(&name) {
        debug!("Rejected stream request for {name:?}");
        return Err(ApiError::InvalidFilename);
    }

    let file = AudioFile::open(state.library.resolve(&name)).await?;
    let content_type = state.config.streaming.content_type;

    let raw_range = range_header(request.headers())?.map(str::to_owned);
    let Some(raw_range) = raw_range else {
        debug!("Streaming full file {name} ({} bytes)", file.size());
        return serve_full_file(file, &name, request, content_type).await;
    };

    let file_size = file.size();
    let range = parse_range_header(&raw_range, file_size)?;
    debug!("Streaming {name} bytes {range}/{file_size}");

    let chunks = file
        .into_range_stream(range, state.config.streaming.chunk_size)
        .await?
        .inspect_err(move |e| error!("Error reading {name}: {e}"));

    Ok(partial_content_response(
        range,
        file_size,
        content_type,
        Body::from_stream(chunks),
    )?)
}

/// Hand the full body to `ServeFile`, which also answers conditional
/// requests such as `If-Modified-Since`.
async fn serve_full_file(
    file: AudioFile,
    name: &str,
    mut request: Request,
    content_type: &'static str,
) -> Result<Response, ApiError> {
    let path = file.path().to_path_buf();
    let size = file.size();
    drop(file);

    // ServeFile treats an empty Range header as unsatisfiable.
    request.headers_mut().remove(header::RANGE);

    let Ok(response) = ServeFile::new(path).oneshot(request).await;
    let mut response = response.map(Body::new);

    check_served_status(response.status(), name)?;
    if response.status() == StatusCode::OK {
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));
    }
    Ok(response)
}

/// `ServeFile` reports failures as bare status codes; turn the ones that
/// can follow a successful open into JSON errors.
fn check_served_status(status: StatusCode, name: &str) -> Result<(), ApiError> {
    if status == StatusCode::NOT_FOUND {
        return Err(StreamingError::NotFound {
            name: name.to_string(),
            source: io::ErrorKind::NotFound.into(),
        }
        .into());
    }
    if status.is_server_error() {
        let source = io::Error::other(format!("file server returned {status}"));
        return Err(StreamingError::Io(source).into());
    }
    Ok(())
}
