//! Integration tests for `GET /api/download/{filename}`

use axum::http::{StatusCode, header};
use beatstream_core::test_fixtures::{base_time, write_audio_file};

use crate::support::{TestLibrary, body_bytes, body_json};

#[tokio::test]
async fn test_download_is_not_routed_by_default() {
    let library = TestLibrary::new();
    write_audio_file(&library.audio_dir, "track.mp3", b"abc", base_time());

    let response = library.get("/api/download/track.mp3", &[]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_serves_attachment() {
    let library = TestLibrary::new().with_downloads();
    write_audio_file(&library.audio_dir, "track.mp3", b"abcdef", base_time());

    let response = library.get("/api/download/track.mp3", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=track.mp3"
    );
    assert_eq!(headers[header::CONTENT_TYPE], "application/octet-stream");
    assert_eq!(headers["content-description"], "File Transfer");
    assert_eq!(&body_bytes(response).await[..], b"abcdef");
}

#[tokio::test]
async fn test_download_missing_file() {
    let library = TestLibrary::new().with_downloads();

    let response = library.get("/api/download/ghost.mp3", &[]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "File not found");
}

#[tokio::test]
async fn test_download_directory_is_not_found() {
    let library = TestLibrary::new().with_downloads();
    std::fs::create_dir(library.audio_dir.join("albums")).unwrap();

    let response = library.get("/api/download/albums", &[]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_does_not_filter_extensions() {
    let library = TestLibrary::new().with_downloads();
    write_audio_file(&library.audio_dir, "liner-notes.txt", b"notes", base_time());

    let response = library.get("/api/download/liner-notes.txt", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&body_bytes(response).await[..], b"notes");
}

#[tokio::test]
async fn test_download_not_modified_has_no_attachment_headers() {
    let library = TestLibrary::new().with_downloads();
    write_audio_file(&library.audio_dir, "track.mp3", b"abcdef", base_time());

    let response = library
        .get(
            "/api/download/track.mp3",
            &[("if-modified-since", "Wed, 01 Jan 2031 00:00:00 GMT")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    let headers = response.headers();
    assert!(!headers.contains_key(header::CONTENT_DISPOSITION));
    assert!(!headers.contains_key("content-description"));
    assert_ne!(
        headers.get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
        Some(&b"application/octet-stream"[..])
    );
}
