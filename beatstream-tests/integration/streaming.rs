//! Integration tests for `GET /api/audio/{id}`

use axum::http::{StatusCode, header};
use beatstream_core::test_fixtures::{base_time, patterned_bytes, write_audio_file};

use crate::support::{TestLibrary, body_bytes, body_json};

fn library_with_track(len: usize) -> (TestLibrary, Vec<u8>) {
    let library = TestLibrary::new();
    let data = patterned_bytes(len);
    write_audio_file(&library.audio_dir, "track.mp3", &data, base_time());
    (library, data)
}

#[tokio::test]
async fn test_range_request_returns_partial_content() {
    let (library, data) = library_with_track(100);

    let response = library
        .get("/api/audio/track.mp3", &[("range", "bytes=50-59")])
        .await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_RANGE], "bytes 50-59/100");
    assert_eq!(headers[header::CONTENT_LENGTH], "10");
    assert_eq!(headers[header::ACCEPT_RANGES], "bytes");
    assert_eq!(headers[header::CONTENT_TYPE], "audio/mpeg");

    let body = body_bytes(response).await;
    assert_eq!(&body[..], &data[50..60]);
}

#[tokio::test]
async fn test_open_ended_range_spans_many_chunks() {
    let (library, data) = library_with_track(40_000);

    let response = library
        .get("/api/audio/track.mp3", &[("range", "bytes=1000-")])
        .await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers()[header::CONTENT_RANGE],
        "bytes 1000-39999/40000"
    );
    let body = body_bytes(response).await;
    assert_eq!(body.len(), 39_000);
    assert_eq!(&body[..], &data[1000..]);
}

#[tokio::test]
async fn test_full_file_without_range() {
    let (library, data) = library_with_track(100);

    let response = library.get("/api/audio/track.mp3", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "100");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert!(response.headers().contains_key(header::LAST_MODIFIED));

    let body = body_bytes(response).await;
    assert_eq!(&body[..], &data[..]);
}

#[tokio::test]
async fn test_empty_range_header_returns_full_file() {
    let (library, data) = library_with_track(10);

    let response = library.get("/api/audio/track.mp3", &[("range", "")]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "10");
    let body = body_bytes(response).await;
    assert_eq!(&body[..], &data[..]);
}

#[tokio::test]
async fn test_full_file_honours_if_modified_since() {
    let (library, _) = library_with_track(100);

    let response = library
        .get(
            "/api/audio/track.mp3",
            &[("if-modified-since", "Wed, 01 Jan 2031 00:00:00 GMT")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn test_unsatisfiable_ranges() {
    let (library, _) = library_with_track(100);

    for (range, message) in [
        ("bytes=0-100", "invalid end range"),
        ("bytes=60-50", "invalid end range"),
        ("bytes=-10", "invalid start range"),
        ("bytes=100-", "invalid start range"),
        ("items=0-10", "invalid range header"),
        ("bytes=0-10,20-30", "invalid range header"),
    ] {
        let response = library
            .get("/api/audio/track.mp3", &[("range", range)])
            .await;
        assert_eq!(
            response.status(),
            StatusCode::RANGE_NOT_SATISFIABLE,
            "range {range}"
        );
        assert_eq!(body_json(response).await["error"], message, "range {range}");
    }
}

#[tokio::test]
async fn test_invalid_filenames_are_rejected() {
    let (library, _) = library_with_track(10);

    for uri in [
        "/api/audio/track.exe",
        "/api/audio/..%2F..%2Fetc%2Fpasswd",
        "/api/audio/notes.txt",
    ] {
        let response = library.get(uri, &[]).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["error"], "Invalid file name");
    }
}

#[tokio::test]
async fn test_uppercase_extension_is_streamed() {
    let library = TestLibrary::new();
    write_audio_file(&library.audio_dir, "LOUD.WAV", b"RIFF", base_time());

    let response = library.get("/api/audio/LOUD.WAV", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&body_bytes(response).await[..], b"RIFF");
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let library = TestLibrary::new();

    let response = library.get("/api/audio/ghost.mp3", &[]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Audio file not found");
}
