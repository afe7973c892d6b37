//! Attachment download handler

use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::Response;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, warn};

use super::error::ApiError;
use crate::server::AppState;

const CONTENT_DESCRIPTION: HeaderName = HeaderName::from_static("content-description");

/// `GET /api/download/{filename}`
///
/// Serves the file as an `application/octet-stream` attachment. Only
/// registered when downloads are enabled in the server configuration.
///
/// The name is joined onto the audio directory without the traversal checks
/// the streaming endpoint applies.
///
/// # Errors
///
/// - `ApiError::FileNotFound` - Path is missing or is a directory (404)
/// - `ApiError::InvalidFilename` - Name cannot be placed in a header (400)
pub async fn download_audio(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    if name.contains("..") || name.contains('\\') || name.contains('/') {
        warn!("Download request for {name:?} is not a plain file name");
    }

    // Join like a path segment: a leading separator must not replace the root.
    let path = state.library.resolve(name.trim_start_matches(['/', '\\']));
    match tokio::fs::metadata(&path).await {
        Ok(stat) if !stat.is_dir() => {}
        _ => {
            debug!("Download target {} not found", path.display());
            return Err(ApiError::FileNotFound);
        }
    }

    let disposition = HeaderValue::from_str(&format!("attachment; filename={name}"))
        .map_err(|_| ApiError::InvalidFilename)?;

    let Ok(response) = ServeFile::new(&path).oneshot(request).await;
    let mut response = response.map(Body::new);

    if matches!(
        response.status(),
        StatusCode::OK | StatusCode::PARTIAL_CONTENT
    ) {
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );
        headers.insert(header::CONTENT_DISPOSITION, disposition);
        headers.insert(CONTENT_DESCRIPTION, HeaderValue::from_static("File Transfer"));
    }

    Ok(response)
}
