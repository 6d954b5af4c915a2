//! Shared fixtures: a router over tempdir-backed storage and in-memory
//! lookup/counter collaborators.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use minbar_core::config::DeliveryConfig;
use minbar_core::counters::InMemoryCounterSink;
use minbar_core::lecture::{
    Lecture, LectureId, LocalizedText, ManifestLectureStore, SeriesRef, SheikhRef,
};
use minbar_core::storage::LocalFileStorage;
use minbar_web::{AppState, build_router};
use tower::ServiceExt;

/// Router plus the handles tests assert against.
pub struct TestHarness {
    pub router: Router,
    pub counters: Arc<InMemoryCounterSink>,
    _dir: tempfile::TempDir,
}

/// Builds a harness from lectures and on-disk audio files.
pub async fn harness(lectures: Vec<Lecture>, files: &[(&str, &[u8])]) -> TestHarness {
    let dir = tempfile::tempdir().expect("tempdir");
    for (name, contents) in files {
        tokio::fs::write(dir.path().join(name), contents)
            .await
            .expect("write fixture file");
    }

    let counters = Arc::new(InMemoryCounterSink::new());
    let state = AppState::new(
        Arc::new(ManifestLectureStore::from_lectures(lectures)),
        Arc::new(LocalFileStorage::new(dir.path().to_path_buf())),
        counters.clone(),
        // Small chunks so multi-read streaming is exercised end to end.
        DeliveryConfig {
            read_buffer_size: 1024,
            ..DeliveryConfig::default()
        },
    );

    TestHarness {
        router: build_router(state),
        counters,
        _dir: dir,
    }
}

/// One in-process GET request against the router.
pub async fn get(router: &Router, uri: &str, range: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().method("GET").uri(uri);
    if let Some(range) = range {
        request = request.header("Range", range);
    }

    router
        .clone()
        .oneshot(request.body(Body::empty()).expect("request"))
        .await
        .expect("router response")
}

/// Collects a response body into bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes()
        .to_vec()
}

/// Deterministic non-repeating byte pattern for range assertions.
pub fn byte_pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// A bilingual lecture with an attached audio file.
pub fn lecture(id: &str, english_title: &str, audio_file: &str, file_size: u64) -> Lecture {
    Lecture {
        id: LectureId::new(id),
        title: LocalizedText::bilingual("درس", english_title),
        audio_file: Some(audio_file.to_string()),
        file_size: Some(file_size),
        sheikh: Some(SheikhRef {
            name: LocalizedText::bilingual("الشيخ", "Sheikh Example"),
        }),
        series: None,
        play_count: 0,
        download_count: 0,
    }
}

/// Attaches a series with a part number to a lecture.
pub fn with_series(mut lecture: Lecture, series_title: &str, part: u32) -> Lecture {
    lecture.series = Some(SeriesRef {
        title: LocalizedText::bilingual("سلسلة", series_title),
        part: Some(part),
    });
    lecture
}

/// Polls a counter until it reaches `expected` or a bounded number of
/// yields elapses; the increments run on detached tasks.
pub async fn wait_for_count(read: impl Fn() -> u64, expected: u64) -> u64 {
    for _ in 0..100 {
        if read() == expected {
            return expected;
        }
        tokio::task::yield_now().await;
    }
    read()
}
