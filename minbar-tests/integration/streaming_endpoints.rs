//! End-to-end tests for `/stream/{id}` and `/stream/{id}/info`.

use axum::http::StatusCode;
use minbar_core::lecture::LectureId;

use crate::common::{body_bytes, byte_pattern, get, harness, lecture, wait_for_count};

#[tokio::test]
async fn test_whole_file_stream_is_200_with_delivery_headers() {
    let audio = byte_pattern(5000);
    let h = harness(
        vec![lecture("L1", "Lesson One", "l1.mp3", 5000)],
        &[("l1.mp3", &audio)],
    )
    .await;

    let response = get(&h.router, "/stream/L1", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-length"], "5000");
    assert_eq!(response.headers()["content-type"], "audio/mpeg");
    assert_eq!(response.headers()["accept-ranges"], "bytes");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(
        response.headers()["content-disposition"],
        "inline; filename=\"Lesson One.mp3\""
    );
    assert!(
        response.headers()["cache-control"]
            .to_str()
            .unwrap()
            .contains("max-age=31536000")
    );

    assert_eq!(body_bytes(response).await, audio);
}

#[tokio::test]
async fn test_open_ended_range_returns_tail() {
    let audio = byte_pattern(1000);
    let h = harness(
        vec![lecture("L1", "Lesson One", "l1.mp3", 1000)],
        &[("l1.mp3", &audio)],
    )
    .await;

    let response = get(&h.router, "/stream/L1", Some("bytes=900-")).await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.headers()["content-range"], "bytes 900-999/1000");
    assert_eq!(response.headers()["content-length"], "100");

    let body = body_bytes(response).await;
    assert_eq!(body.len(), 100);
    assert_eq!(body, &audio[900..]);
}

#[tokio::test]
async fn test_range_beyond_file_size_is_416() {
    let audio = byte_pattern(1000);
    let h = harness(
        vec![lecture("L1", "Lesson One", "l1.mp3", 1000)],
        &[("l1.mp3", &audio)],
    )
    .await;

    let response = get(&h.router, "/stream/L1", Some("bytes=1000-1010")).await;

    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(response.headers()["content-range"], "bytes */1000");
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_malformed_range_is_416_not_crash() {
    let audio = byte_pattern(100);
    let h = harness(
        vec![lecture("L1", "Lesson One", "l1.mp3", 100)],
        &[("l1.mp3", &audio)],
    )
    .await;

    for bad in ["bytes=abc-10", "bytes=-", "bytes=10", "chunks=0-10"] {
        let response = get(&h.router, "/stream/L1", Some(bad)).await;
        assert_eq!(
            response.status(),
            StatusCode::RANGE_NOT_SATISFIABLE,
            "header {bad:?}"
        );
    }
}

#[tokio::test]
async fn test_repeated_range_requests_are_byte_identical() {
    let audio = byte_pattern(2000);
    let h = harness(
        vec![lecture("L1", "Lesson One", "l1.mp3", 2000)],
        &[("l1.mp3", &audio)],
    )
    .await;

    let first = body_bytes(get(&h.router, "/stream/L1", Some("bytes=100-299")).await).await;
    let second = body_bytes(get(&h.router, "/stream/L1", Some("bytes=100-299")).await).await;

    assert_eq!(first, second);
    assert_eq!(first, &audio[100..300]);
}

#[tokio::test]
async fn test_unknown_lecture_is_404_json() {
    let h = harness(vec![], &[]).await;

    let response = get(&h.router, "/stream/unknown", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).expect("json body");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Lecture not found");
}

#[tokio::test]
async fn test_lecture_without_audio_file_is_404() {
    let mut bare = lecture("L1", "Lesson One", "l1.mp3", 0);
    bare.audio_file = None;
    let h = harness(vec![bare], &[]).await;

    for uri in ["/stream/L1", "/download/L1"] {
        let response = get(&h.router, uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {uri}");

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).expect("json body");
        assert_eq!(body["success"], false);
        assert_ne!(body["message"], "Lecture not found");
    }
}

#[tokio::test]
async fn test_missing_storage_file_is_404_with_distinct_message() {
    // Lecture exists but nothing was written to storage.
    let h = harness(vec![lecture("L1", "Lesson One", "l1.mp3", 1000)], &[]).await;

    let response = get(&h.router, "/stream/L1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).expect("json body");
    assert_eq!(body["message"], "Audio file not found on server");
}

#[tokio::test]
async fn test_stream_increments_play_count_only() {
    let audio = byte_pattern(100);
    let h = harness(
        vec![lecture("L1", "Lesson One", "l1.mp3", 100)],
        &[("l1.mp3", &audio)],
    )
    .await;
    let id = LectureId::new("L1");

    get(&h.router, "/stream/L1", None).await;
    get(&h.router, "/stream/L1", Some("bytes=0-49")).await;

    // Every stream request counts, including range requests from one
    // seek session.
    let plays = wait_for_count(|| h.counters.play_count(&id), 2).await;
    assert_eq!(plays, 2);
    assert_eq!(h.counters.download_count(&id), 0);
}

#[tokio::test]
async fn test_info_endpoint_reports_metadata_without_body() {
    let audio = byte_pattern(4096);
    let h = harness(
        vec![lecture("L1", "Lesson One", "l1.m4a", 4096)],
        &[("l1.m4a", &audio)],
    )
    .await;

    let response = get(&h.router, "/stream/L1/info", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).expect("json body");
    assert_eq!(body["success"], true);
    assert_eq!(body["id"], "L1");
    assert_eq!(body["size"], 4096);
    assert_eq!(body["mime_type"], "audio/mp4");
    assert_eq!(body["stream_url"], "/stream/L1");
    assert_eq!(body["download_url"], "/download/L1");
}

#[tokio::test]
async fn test_mime_extension_matching_is_case_insensitive() {
    let audio = byte_pattern(10);
    let h = harness(
        vec![lecture("L1", "Lesson One", "l1.MP3", 10)],
        &[("l1.MP3", &audio)],
    )
    .await;

    let response = get(&h.router, "/stream/L1", None).await;
    assert_eq!(response.headers()["content-type"], "audio/mpeg");
}
