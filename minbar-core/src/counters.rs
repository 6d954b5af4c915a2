//! Usage counter collaborator.
//!
//! Play and download counts live in the external persistence layer; the
//! handlers emit increments as detached background tasks and never wait
//! for or act on the result. A failed increment is a log line, not an
//! HTTP error.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::warn;

use crate::lecture::LectureId;

/// Counter backend failures. Only ever logged; never surfaced to clients.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("Counter backend failure: {reason}")]
    Backend { reason: String },
}

/// Atomic usage-counter increments, implemented by the persistence layer.
#[async_trait]
pub trait CounterSink: Send + Sync {
    /// Records one playback of a lecture.
    ///
    /// # Errors
    ///
    /// - `CounterError::Backend` - The backing store rejected the update
    async fn increment_play_count(&self, id: &LectureId) -> Result<(), CounterError>;

    /// Records one download of a lecture.
    ///
    /// # Errors
    ///
    /// - `CounterError::Backend` - The backing store rejected the update
    async fn increment_download_count(&self, id: &LectureId) -> Result<(), CounterError>;
}

/// Which counter a detached increment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Play,
    Download,
}

/// Fires a counter increment on a detached task.
///
/// The spawned task owns its clone of the sink and the id; the calling
/// request proceeds immediately and is never delayed or failed by the
/// counter path.
pub fn spawn_increment(sink: Arc<dyn CounterSink>, id: LectureId, kind: CounterKind) {
    tokio::spawn(async move {
        let result = match kind {
            CounterKind::Play => sink.increment_play_count(&id).await,
            CounterKind::Download => sink.increment_download_count(&id).await,
        };

        if let Err(e) = result {
            warn!("Counter update failed for lecture {id} ({kind:?}): {e}");
        }
    });
}

/// In-memory counter sink for the standalone server and tests.
#[derive(Debug, Default)]
pub struct InMemoryCounterSink {
    plays: Mutex<HashMap<LectureId, u64>>,
    downloads: Mutex<HashMap<LectureId, u64>>,
}

impl InMemoryCounterSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play_count(&self, id: &LectureId) -> u64 {
        self.plays.lock().get(id).copied().unwrap_or(0)
    }

    pub fn download_count(&self, id: &LectureId) -> u64 {
        self.downloads.lock().get(id).copied().unwrap_or(0)
    }
}

#[async_trait]
impl CounterSink for InMemoryCounterSink {
    async fn increment_play_count(&self, id: &LectureId) -> Result<(), CounterError> {
        *self.plays.lock().entry(id.clone()).or_insert(0) += 1;
        Ok(())
    }

    async fn increment_download_count(&self, id: &LectureId) -> Result<(), CounterError> {
        *self.downloads.lock().entry(id.clone()).or_insert(0) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_counts_independently() {
        let sink = InMemoryCounterSink::new();
        let id = LectureId::new("L1");

        sink.increment_play_count(&id).await.unwrap();
        sink.increment_play_count(&id).await.unwrap();
        sink.increment_download_count(&id).await.unwrap();

        assert_eq!(sink.play_count(&id), 2);
        assert_eq!(sink.download_count(&id), 1);
        assert_eq!(sink.play_count(&LectureId::new("other")), 0);
    }

    #[tokio::test]
    async fn test_spawn_increment_is_detached() {
        let sink = Arc::new(InMemoryCounterSink::new());
        let id = LectureId::new("L1");

        spawn_increment(sink.clone(), id.clone(), CounterKind::Play);
        spawn_increment(sink.clone(), id.clone(), CounterKind::Download);

        // Yield until the detached tasks have run.
        for _ in 0..10 {
            if sink.play_count(&id) == 1 && sink.download_count(&id) == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert_eq!(sink.play_count(&id), 1);
        assert_eq!(sink.download_count(&id), 1);
    }

    /// Sink that always fails, proving failures stay on the detached task.
    struct FailingSink;

    #[async_trait]
    impl CounterSink for FailingSink {
        async fn increment_play_count(&self, _id: &LectureId) -> Result<(), CounterError> {
            Err(CounterError::Backend {
                reason: "unreachable backend".to_string(),
            })
        }

        async fn increment_download_count(&self, _id: &LectureId) -> Result<(), CounterError> {
            Err(CounterError::Backend {
                reason: "unreachable backend".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_spawn_increment_swallows_failures() {
        // Must not panic the caller or the runtime.
        spawn_increment(Arc::new(FailingSink), LectureId::new("L1"), CounterKind::Play);
        tokio::task::yield_now().await;
    }
}
