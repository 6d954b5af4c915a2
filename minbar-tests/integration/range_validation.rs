//! Range semantics through the full stack: exact byte counts, boundary
//! positions, and unsatisfiable requests.

use axum::http::StatusCode;

use crate::common::{body_bytes, byte_pattern, get, harness, lecture};

const FILE_SIZE: usize = 10_000;

async fn range_harness() -> crate::common::TestHarness {
    let audio = byte_pattern(FILE_SIZE);
    harness(
        vec![lecture("L1", "Lesson One", "l1.mp3", FILE_SIZE as u64)],
        &[("l1.mp3", &audio)],
    )
    .await
}

#[tokio::test]
async fn test_bounded_ranges_return_exact_byte_counts() {
    let h = range_harness().await;
    let audio = byte_pattern(FILE_SIZE);

    for (start, end) in [(0u64, 0u64), (0, 999), (500, 1499), (9_000, 9_999)] {
        let header = format!("bytes={start}-{end}");
        let response = get(&h.router, "/stream/L1", Some(&header)).await;

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT, "{header}");
        assert_eq!(
            response.headers()["content-range"],
            format!("bytes {start}-{end}/{FILE_SIZE}"),
            "{header}"
        );

        let body = body_bytes(response).await;
        assert_eq!(body.len() as u64, end - start + 1, "{header}");
        assert_eq!(body, &audio[start as usize..=end as usize], "{header}");
    }
}

#[tokio::test]
async fn test_last_byte_range() {
    let h = range_harness().await;

    let response = get(&h.router, "/stream/L1", Some("bytes=9999-")).await;
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.headers()["content-length"], "1");
    assert_eq!(body_bytes(response).await.len(), 1);
}

#[tokio::test]
async fn test_start_at_file_size_is_416() {
    let h = range_harness().await;

    let response = get(&h.router, "/stream/L1", Some("bytes=10000-")).await;
    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(
        response.headers()["content-range"],
        format!("bytes */{FILE_SIZE}")
    );
}

#[tokio::test]
async fn test_end_past_file_size_is_416() {
    let h = range_harness().await;

    let response = get(&h.router, "/stream/L1", Some("bytes=0-10000")).await;
    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
}

#[tokio::test]
async fn test_inverted_range_is_416() {
    let h = range_harness().await;

    let response = get(&h.router, "/stream/L1", Some("bytes=500-100")).await;
    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
}

#[tokio::test]
async fn test_multi_range_falls_back_to_whole_file() {
    let h = range_harness().await;

    let response = get(&h.router, "/stream/L1", Some("bytes=0-10,20-30")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-length"],
        FILE_SIZE.to_string().as_str()
    );
}

#[tokio::test]
async fn test_sequential_chunks_reassemble_the_file() {
    let h = range_harness().await;
    let audio = byte_pattern(FILE_SIZE);

    let chunk = 1024u64;
    let mut reassembled = Vec::with_capacity(FILE_SIZE);
    let mut position = 0u64;

    while position < FILE_SIZE as u64 {
        let end = (position + chunk - 1).min(FILE_SIZE as u64 - 1);
        let header = format!("bytes={position}-{end}");
        let response = get(&h.router, "/stream/L1", Some(&header)).await;

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT, "{header}");
        reassembled.extend(body_bytes(response).await);
        position += chunk;
    }

    assert_eq!(reassembled, audio);
}
