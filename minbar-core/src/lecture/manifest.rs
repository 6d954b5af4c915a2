//! JSON-manifest-backed lecture store.
//!
//! The production platform resolves lectures from its database; the
//! standalone delivery server and the test suites use this in-memory
//! implementation loaded from a `lectures.json` manifest next to the
//! audio library.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Lecture, LectureId, LectureLookup, LookupError};

/// Manifest file layout: a flat list of lectures.
#[derive(Debug, Deserialize)]
struct Manifest {
    lectures: Vec<Lecture>,
}

/// In-memory lecture lookup populated from a JSON manifest.
///
/// The map is immutable after construction, so lookups need no locking.
#[derive(Debug, Default)]
pub struct ManifestLectureStore {
    lectures: HashMap<LectureId, Lecture>,
}

impl ManifestLectureStore {
    /// Builds a store from already-constructed lectures, for tests and
    /// programmatic setups.
    pub fn from_lectures(lectures: impl IntoIterator<Item = Lecture>) -> Self {
        Self {
            lectures: lectures
                .into_iter()
                .map(|lecture| (lecture.id.clone(), lecture))
                .collect(),
        }
    }

    /// Loads a manifest file from disk.
    ///
    /// # Errors
    ///
    /// - `LookupError::Backend` - Manifest missing, unreadable, or not
    ///   valid JSON
    pub async fn load(manifest_path: &Path) -> Result<Self, LookupError> {
        let raw = tokio::fs::read_to_string(manifest_path)
            .await
            .map_err(|e| LookupError::Backend {
                reason: format!("cannot read manifest {}: {e}", manifest_path.display()),
            })?;

        let manifest: Manifest =
            serde_json::from_str(&raw).map_err(|e| LookupError::Backend {
                reason: format!("invalid manifest {}: {e}", manifest_path.display()),
            })?;

        Ok(Self::from_lectures(manifest.lectures))
    }

    /// Number of lectures in the store.
    pub fn len(&self) -> usize {
        self.lectures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lectures.is_empty()
    }
}

#[async_trait]
impl LectureLookup for ManifestLectureStore {
    async fn find_by_id(&self, id: &LectureId) -> Result<Option<Lecture>, LookupError> {
        Ok(self.lectures.get(id).cloned())
    }
}
