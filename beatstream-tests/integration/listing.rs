//! Integration tests for `GET /api/audio`

use std::time::Duration;

use axum::http::StatusCode;
use beatstream_core::test_fixtures::{base_time, write_audio_file};

use crate::support::{TestLibrary, body_json};

fn populate(library: &TestLibrary, count: u64) {
    for i in 0..count {
        write_audio_file(
            &library.audio_dir,
            &format!("session{i:02}.mp3"),
            b"ID3",
            base_time() + Duration::from_secs(i * 3600),
        );
    }
}

#[tokio::test]
async fn test_two_pages_cover_fifteen_files() {
    let library = TestLibrary::new();
    populate(&library, 15);

    let response = library.get("/api/audio?limit=10", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;

    let files = first["files"].as_array().unwrap();
    assert_eq!(files.len(), 10);
    assert_eq!(files[0]["name"], "session14.mp3");
    assert_eq!(files[9]["name"], "session05.mp3");
    let cursor = first["next_cursor"].as_str().unwrap();
    assert!(!cursor.is_empty());

    let second = body_json(
        library
            .get(&format!("/api/audio?limit=10&cursor={cursor}"), &[])
            .await,
    )
    .await;

    let names: Vec<&str> = second["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "session04.mp3",
            "session03.mp3",
            "session02.mp3",
            "session01.mp3",
            "session00.mp3"
        ]
    );
    assert_eq!(second["next_cursor"], "");
}

#[tokio::test]
async fn test_default_limit_is_ten() {
    let library = TestLibrary::new();
    populate(&library, 12);

    let page = body_json(library.get("/api/audio", &[]).await).await;
    assert_eq!(page["files"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_entries_carry_metadata() {
    let library = TestLibrary::new();
    write_audio_file(&library.audio_dir, "delta.wav", &[0u8; 64], base_time());
    write_audio_file(&library.audio_dir, "gamma.wav", &[0u8; 32], base_time());
    std::fs::write(
        library.metadata_dir.join("delta.wav.json"),
        r#"{"id":"d1","name":"Delta Sleep","author":"Beat Lab","fft":"[]","cover_img":"delta.png"}"#,
    )
    .unwrap();
    std::fs::write(library.metadata_dir.join("gamma.wav.json"), "not json").unwrap();

    let page = body_json(library.get("/api/audio", &[]).await).await;
    let files = page["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);

    let delta = &files[0];
    assert_eq!(delta["name"], "delta.wav");
    assert_eq!(delta["size"], 64);
    assert_eq!(delta["last_modified"], "2023-11-14T22:13:20Z");
    assert_eq!(delta["metadata"]["name"], "Delta Sleep");
    assert_eq!(delta["metadata"]["cover_img"], "delta.png");

    let gamma = &files[1];
    assert_eq!(gamma["name"], "gamma.wav");
    assert_eq!(gamma["metadata"]["id"], "");
}

#[tokio::test]
async fn test_bad_limit_is_rejected() {
    let library = TestLibrary::new();

    for limit in ["0", "-1", "ten"] {
        let response = library.get(&format!("/api/audio?limit={limit}"), &[]).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "limit={limit}");
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid limit parameter");
    }
}

#[tokio::test]
async fn test_bad_cursor_is_rejected() {
    let library = TestLibrary::new();

    let response = library.get("/api/audio?cursor=last-tuesday", &[]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid cursor format");
}

#[tokio::test]
async fn test_missing_audio_directory_is_server_error() {
    let mut library = TestLibrary::new();
    library.config.library.audio_dir = library.audio_dir.join("missing");

    let response = library.get("/api/audio", &[]).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["error"],
        "Unable to read audio files"
    );
}
