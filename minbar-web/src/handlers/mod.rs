//! HTTP request handlers organized by functionality

pub mod download;
pub mod streaming;

use minbar_core::delivery::{ContentDescriptor, mime_for_filename};
use minbar_core::lecture::{Lecture, LectureId};
use minbar_core::storage::StorageError;
use tracing::{error, warn};

use crate::error::ApiError;
use crate::server::AppState;

// Re-export handler functions
pub use download::download_lecture;
pub use streaming::{stream_info, stream_lecture};

/// Lecture plus its resolved, request-scoped content descriptor.
pub(crate) struct ResolvedAudio {
    pub lecture: Lecture,
    pub descriptor: ContentDescriptor,
}

/// Shared resolve pipeline: lecture lookup, file-presence check, stat,
/// MIME resolution.
///
/// `context` is the path-free message used for unexpected failures, so
/// each endpoint reports its own 500 text without leaking internals.
pub(crate) async fn resolve_audio(
    state: &AppState,
    id: &LectureId,
    context: &'static str,
) -> Result<ResolvedAudio, ApiError> {
    let lecture = state
        .lectures
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Lecture lookup failed for {id}: {e}");
            ApiError::internal(context)
        })?
        .ok_or(ApiError::LectureNotFound)?;

    let Some(file_ref) = lecture.audio_file.clone() else {
        return Err(ApiError::NoAudioFile);
    };

    if !state.storage.exists(&file_ref).await {
        // Lecture row exists but its audio does not: data-integrity
        // drift. Log the reference server-side only.
        warn!("Lecture {id} references missing audio file {file_ref}");
        return Err(ApiError::AudioFileMissing);
    }

    let path = state.storage.resolve(&file_ref).map_err(|e| {
        error!("Failed to resolve audio file for lecture {id}: {e}");
        ApiError::internal(context)
    })?;

    let stat = match state.storage.stat(&path).await {
        Ok(stat) => stat,
        Err(StorageError::NotFound { .. }) => {
            // Vanished between the existence check and the stat.
            warn!("Audio file for lecture {id} disappeared before stat");
            return Err(ApiError::AudioFileMissing);
        }
        Err(e) => {
            error!("Failed to stat audio file for lecture {id}: {e}");
            return Err(ApiError::internal(context));
        }
    };

    Ok(ResolvedAudio {
        descriptor: ContentDescriptor {
            path,
            size: stat.size,
            mime: mime_for_filename(&file_ref),
            modified: stat.modified,
        },
        lecture,
    })
}

/// Maps responder failures to the JSON envelope, logging server-side.
pub(crate) fn map_serve_error(
    e: crate::responder::ServeError,
    id: &LectureId,
    context: &'static str,
) -> ApiError {
    match e {
        crate::responder::ServeError::Storage(StorageError::NotFound { .. }) => {
            warn!("Audio file for lecture {id} disappeared before open");
            ApiError::AudioFileMissing
        }
        other => {
            error!("Failed to serve audio for lecture {id}: {other}");
            ApiError::internal(context)
        }
    }
}
