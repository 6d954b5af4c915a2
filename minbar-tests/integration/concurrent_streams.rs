//! Concurrent delivery: independent requests must never interleave or
//! corrupt each other's byte ranges.

use axum::http::StatusCode;
use minbar_core::lecture::LectureId;

use crate::common::{body_bytes, byte_pattern, get, harness, lecture, wait_for_count};

#[tokio::test]
async fn test_fifty_concurrent_range_requests_stay_independent() {
    const FILE_SIZE: usize = 50_000;
    let audio = byte_pattern(FILE_SIZE);
    let h = harness(
        vec![lecture("L1", "Lesson One", "l1.mp3", FILE_SIZE as u64)],
        &[("l1.mp3", &audio)],
    )
    .await;

    let mut tasks = Vec::new();
    for i in 0..50u64 {
        let router = h.router.clone();
        let expected = audio[(i * 1000) as usize..((i + 1) * 1000) as usize].to_vec();
        tasks.push(tokio::spawn(async move {
            let header = format!("bytes={}-{}", i * 1000, (i + 1) * 1000 - 1);
            let response = get(&router, "/stream/L1", Some(&header)).await;
            assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT, "{header}");

            let body = body_bytes(response).await;
            assert_eq!(body.len(), 1000, "{header}");
            assert_eq!(body, expected, "{header}");
        }));
    }

    for task in tasks {
        task.await.expect("request task");
    }

    // Each of the 50 requests counted one play.
    let id = LectureId::new("L1");
    let plays = wait_for_count(|| h.counters.play_count(&id), 50).await;
    assert_eq!(plays, 50);
}

#[tokio::test]
async fn test_concurrent_whole_file_and_range_requests() {
    const FILE_SIZE: usize = 20_000;
    let audio = byte_pattern(FILE_SIZE);
    let h = harness(
        vec![lecture("L1", "Lesson One", "l1.mp3", FILE_SIZE as u64)],
        &[("l1.mp3", &audio)],
    )
    .await;

    let whole = {
        let router = h.router.clone();
        let expected = audio.clone();
        tokio::spawn(async move {
            let response = get(&router, "/stream/L1", None).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_bytes(response).await, expected);
        })
    };

    let tail = {
        let router = h.router.clone();
        let expected = audio[19_000..].to_vec();
        tokio::spawn(async move {
            let response = get(&router, "/stream/L1", Some("bytes=19000-")).await;
            assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
            assert_eq!(body_bytes(response).await, expected);
        })
    };

    whole.await.expect("whole-file task");
    tail.await.expect("tail task");
}
