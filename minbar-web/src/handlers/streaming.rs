//! Streaming handlers: inline audio with byte-range support, plus the
//! diagnostic info endpoint.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Response, header};
use axum::response::Json;
use minbar_core::counters::{CounterKind, spawn_increment};
use minbar_core::delivery::parse_range;
use minbar_core::lecture::{LectureId, inline_filename};
use serde_json::json;
use tracing::debug;

use super::{map_serve_error, resolve_audio};
use crate::error::ApiError;
use crate::responder::{Disposition, serve_content};
use crate::server::AppState;

const STREAM_FAILED: &str = "Failed to stream audio";
const INFO_FAILED: &str = "Failed to load lecture info";

/// `GET /stream/{id}` - inline audio playback with seeking.
///
/// Honors single-range `Range` headers; every request counts one play,
/// including repeated range requests from the same scrub session.
pub async fn stream_lecture(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response<Body>, ApiError> {
    let id = LectureId::new(id);
    let resolved = resolve_audio(&state, &id, STREAM_FAILED).await?;

    // Fire-and-forget: the byte stream never waits on the counter.
    spawn_increment(state.counters.clone(), id.clone(), CounterKind::Play);

    let range_header = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());
    let outcome = parse_range(range_header, resolved.descriptor.size);
    debug!(
        "Streaming lecture {id}: range={range_header:?}, outcome={outcome:?}, size={}",
        resolved.descriptor.size
    );

    let disposition = Disposition::Inline {
        filename: inline_filename(&resolved.lecture, &resolved.lecture.audio_extension()),
    };

    serve_content(
        state.storage.as_ref(),
        &resolved.descriptor,
        outcome,
        &disposition,
        &state.delivery,
    )
    .await
    .map_err(|e| map_serve_error(e, &id, STREAM_FAILED))
}

/// `GET /stream/{id}/info` - diagnostic metadata, no binary body.
///
/// Shares the resolve pipeline with the stream endpoint so it reports the
/// same view of storage.
pub async fn stream_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = LectureId::new(id);
    let resolved = resolve_audio(&state, &id, INFO_FAILED).await?;
    let lecture = &resolved.lecture;

    Ok(Json(json!({
        "success": true,
        "id": lecture.id,
        "title": lecture.title,
        "sheikh": lecture.sheikh,
        "series": lecture.series,
        "mime_type": resolved.descriptor.mime,
        "size": resolved.descriptor.size,
        "play_count": lecture.play_count,
        "download_count": lecture.download_count,
        "stream_url": format!("/stream/{id}"),
        "download_url": format!("/download/{id}"),
    })))
}
