//! Integration tests for Beatstream
//!
//! Each test builds the real axum router over a temporary library and
//! drives it in process with `tower::ServiceExt::oneshot`.

#[path = "integration/support.rs"]
mod support;

#[path = "integration/download.rs"]
mod download;
#[path = "integration/listing.rs"]
mod listing;
#[path = "integration/streaming.rs"]
mod streaming;
