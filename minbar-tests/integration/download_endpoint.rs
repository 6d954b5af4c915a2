//! End-to-end tests for `/download/{id}`.

use axum::http::StatusCode;
use minbar_core::lecture::{LectureId, LocalizedText};

use crate::common::{body_bytes, byte_pattern, get, harness, lecture, wait_for_count, with_series};

#[tokio::test]
async fn test_download_serves_attachment_with_descriptive_filename() {
    let audio = byte_pattern(1000);
    let series_lecture = with_series(
        lecture("L1", "The Book of Purification", "l1.mp3", 1000),
        "Umdat al-Ahkam",
        4,
    );
    let h = harness(vec![series_lecture], &[("l1.mp3", &audio)]).await;

    let response = get(&h.router, "/download/L1", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-length"], "1000");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"Umdat al-Ahkam - Part 4 - The Book of Purification.mp3\""
    );
    // Attachments skip the streaming cache policy and nosniff marker.
    assert!(response.headers().get("cache-control").is_none());
    assert!(response.headers().get("x-content-type-options").is_none());

    assert_eq!(body_bytes(response).await, audio);
}

#[tokio::test]
async fn test_download_without_series_uses_sheikh_name() {
    let audio = byte_pattern(100);
    let h = harness(
        vec![lecture("L1", "Friday Khutbah", "l1.mp3", 100)],
        &[("l1.mp3", &audio)],
    )
    .await;

    let response = get(&h.router, "/download/L1", None).await;
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"Sheikh Example - Friday Khutbah.mp3\""
    );
}

#[tokio::test]
async fn test_download_arabic_filename_is_percent_encoded() {
    let audio = byte_pattern(100);
    let mut arabic = lecture("L1", "unused", "l1.mp3", 100);
    arabic.title = LocalizedText::arabic_only("خطبة الجمعة");
    arabic.sheikh = None;
    let h = harness(vec![arabic], &[("l1.mp3", &audio)]).await;

    let response = get(&h.router, "/download/L1", None).await;
    let disposition = response.headers()["content-disposition"].to_str().unwrap();

    assert!(disposition.starts_with("attachment;"));
    assert!(disposition.contains("filename*=UTF-8''"));
    assert!(disposition.is_ascii());
}

#[tokio::test]
async fn test_download_ignores_range_header() {
    let audio = byte_pattern(1000);
    let h = harness(
        vec![lecture("L1", "Lesson One", "l1.mp3", 1000)],
        &[("l1.mp3", &audio)],
    )
    .await;

    let response = get(&h.router, "/download/L1", Some("bytes=0-99")).await;

    // Whole file, correct framing, no partial-content semantics.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-length"], "1000");
    assert!(response.headers().get("content-range").is_none());
    assert_eq!(body_bytes(response).await.len(), 1000);
}

#[tokio::test]
async fn test_download_content_length_trusts_live_stat() {
    // Stored metadata disagrees with the file on disk; the live size wins.
    let audio = byte_pattern(750);
    let h = harness(
        vec![lecture("L1", "Lesson One", "l1.mp3", 9999)],
        &[("l1.mp3", &audio)],
    )
    .await;

    let response = get(&h.router, "/download/L1", None).await;
    assert_eq!(response.headers()["content-length"], "750");
    assert_eq!(body_bytes(response).await.len(), 750);
}

#[tokio::test]
async fn test_download_increments_download_count_only() {
    let audio = byte_pattern(100);
    let h = harness(
        vec![lecture("L1", "Lesson One", "l1.mp3", 100)],
        &[("l1.mp3", &audio)],
    )
    .await;
    let id = LectureId::new("L1");

    get(&h.router, "/download/L1", None).await;

    let downloads = wait_for_count(|| h.counters.download_count(&id), 1).await;
    assert_eq!(downloads, 1);
    assert_eq!(h.counters.play_count(&id), 0);
}

#[tokio::test]
async fn test_download_unknown_lecture_is_404() {
    let h = harness(vec![], &[]).await;

    let response = get(&h.router, "/download/unknown", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).expect("json body");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Lecture not found");
}
