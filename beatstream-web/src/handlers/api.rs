//! Library listing API

use axum::Json;
use axum::extract::{Query, State};
use beatstream_core::{Page, PageRequest};
use serde::Deserialize;
use tracing::debug;

use super::error::ApiError;
use crate::server::AppState;

/// Raw query string of the listing endpoint. Values are validated by
/// `PageRequest::parse` so bad input gets the JSON error body.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub cursor: Option<String>,
    pub limit: Option<String>,
}

/// `GET /api/audio?cursor=<RFC3339>&limit=<int>`
///
/// # Errors
///
/// - `ApiError::Library` - Bad cursor or limit (400), unreadable directory (500)
pub async fn list_audio(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page>, ApiError> {
    let request = PageRequest::parse(
        query.cursor.as_deref(),
        query.limit.as_deref(),
        state.config.library.default_page_limit,
    )?;

    let page = state.library.page(&request).await?;
    debug!(
        "Listed {} files (cursor={:?}, limit={}, more={})",
        page.files.len(),
        request.cursor,
        request.limit,
        !page.next_cursor.is_empty()
    );

    Ok(Json(page))
}
