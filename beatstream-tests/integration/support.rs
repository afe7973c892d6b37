//! Shared harness for in-process API tests

use std::path::PathBuf;

use axum::body::{Body, Bytes};
use axum::http::{Request, Response};
use beatstream_core::BeatstreamConfig;
use beatstream_core::test_fixtures::create_temp_library_dirs;
use beatstream_web::{AppState, router};
use tempfile::TempDir;
use tower::ServiceExt;

/// Temporary library plus the configuration pointing at it.
pub struct TestLibrary {
    _temp_dir: TempDir,
    pub audio_dir: PathBuf,
    pub metadata_dir: PathBuf,
    pub config: BeatstreamConfig,
}

impl TestLibrary {
    pub fn new() -> Self {
        let (temp_dir, audio_dir, metadata_dir) = create_temp_library_dirs();
        let config = BeatstreamConfig::for_library(&audio_dir, &metadata_dir);
        Self {
            _temp_dir: temp_dir,
            audio_dir,
            metadata_dir,
            config,
        }
    }

    pub fn with_downloads(mut self) -> Self {
        self.config.server.enable_downloads = true;
        self
    }

    /// Send a GET for `uri` with optional extra headers through a fresh router.
    pub async fn get(&self, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
        let mut request = Request::builder().uri(uri);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let request = request.body(Body::empty()).expect("valid request");

        router(AppState::new(self.config.clone()))
            .oneshot(request)
            .await
            .expect("router is infallible")
    }
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}
