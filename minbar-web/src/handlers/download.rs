//! Download handler: whole-file attachment delivery.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::Response;
use minbar_core::counters::{CounterKind, spawn_increment};
use minbar_core::delivery::RangeOutcome;
use minbar_core::lecture::{LectureId, download_filename};
use tracing::warn;

use super::{map_serve_error, resolve_audio};
use crate::error::ApiError;
use crate::responder::{Disposition, serve_content};
use crate::server::AppState;

const DOWNLOAD_FAILED: &str = "Failed to prepare download";

/// `GET /download/{id}` - the entire file as an attachment.
///
/// `Range` headers are ignored here; the response is always a full-file
/// 200 whose Content-Length comes from the live stat, so stored metadata
/// can never corrupt the framing.
pub async fn download_lecture(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let id = LectureId::new(id);
    let resolved = resolve_audio(&state, &id, DOWNLOAD_FAILED).await?;

    // The stored size is advisory. A divergence is a data-integrity bug
    // to report, not something to silently serve.
    if let Some(recorded) = resolved.lecture.file_size {
        if recorded != resolved.descriptor.size {
            warn!(
                "Lecture {id} records file size {recorded} but storage reports {}",
                resolved.descriptor.size
            );
        }
    }

    spawn_increment(state.counters.clone(), id.clone(), CounterKind::Download);

    let disposition = Disposition::Attachment {
        filename: download_filename(&resolved.lecture, &resolved.lecture.audio_extension()),
    };

    serve_content(
        state.storage.as_ref(),
        &resolved.descriptor,
        RangeOutcome::None,
        &disposition,
        &state.delivery,
    )
    .await
    .map_err(|e| map_serve_error(e, &id, DOWNLOAD_FAILED))
}
