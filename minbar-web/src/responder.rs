//! Content responder: turns a resolved descriptor and range outcome into
//! exactly one HTTP response.
//!
//! Bodies are streamed from storage, never buffered whole: hyper polls the
//! underlying `ReaderStream` only as fast as the client consumes, and drops
//! it (closing the file handle) if the client disconnects mid-stream.

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;
use futures::TryStreamExt;
use minbar_core::config::DeliveryConfig;
use minbar_core::delivery::{ContentDescriptor, RangeOutcome};
use minbar_core::storage::{FileStorage, StorageError};
use tokio_util::io::ReaderStream;
use tracing::warn;

/// Failures while assembling a response, before any header is sent.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Response build error: {0}")]
    Http(#[from] axum::http::Error),
}

/// How the response asks the browser to handle the content.
#[derive(Debug, Clone)]
pub enum Disposition {
    /// Render in place (the audio player). Adds `nosniff` and the
    /// long-lived cache policy.
    Inline { filename: String },
    /// Save to disk. One-shot; no long-lived cache header.
    Attachment { filename: String },
}

/// Writes the single HTTP response for a resolved request.
///
/// | Outcome | Status | Body |
/// |---|---|---|
/// | `None` | 200 | whole file, streamed |
/// | `Satisfiable(s,e)` | 206 | bytes `s..=e`, streamed |
/// | `Unsatisfiable` | 416 | empty |
///
/// # Errors
///
/// - `ServeError::Storage` - Byte source could not be opened; no header
///   has been sent yet, so the caller can still respond 404/500
/// - `ServeError::Http` - Header assembly failed
pub async fn serve_content(
    storage: &dyn FileStorage,
    descriptor: &ContentDescriptor,
    outcome: RangeOutcome,
    disposition: &Disposition,
    delivery: &DeliveryConfig,
) -> Result<Response<Body>, ServeError> {
    if outcome == RangeOutcome::Unsatisfiable {
        // Client-driven and expected during aggressive seeking; header
        // only, no body, not an error.
        return Ok(Response::builder()
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .header(header::CONTENT_RANGE, format!("bytes */{}", descriptor.size))
            .body(Body::empty())?);
    }

    let range = match outcome {
        RangeOutcome::Satisfiable { start, end } => Some((start, end)),
        _ => None,
    };

    let reader = storage.open_read(&descriptor.path, range).await?;

    let path_name = descriptor
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stream =
        ReaderStream::with_capacity(reader, delivery.read_buffer_size).inspect_err(move |e| {
            // Headers are committed by now; the connection just aborts.
            warn!("Stream aborted while serving {path_name}: {e}");
        });

    let mut response = Response::builder()
        .header(header::CONTENT_TYPE, descriptor.mime)
        .header(
            header::CONTENT_LENGTH,
            outcome.content_length(descriptor.size).to_string(),
        );

    if delivery.accept_ranges {
        response = response.header(header::ACCEPT_RANGES, "bytes");
    }

    if let Some(last_modified) = descriptor.last_modified_header() {
        response = response.header(header::LAST_MODIFIED, last_modified);
    }

    response = match disposition {
        Disposition::Inline { filename } => response
            .header(
                header::CONTENT_DISPOSITION,
                content_disposition("inline", filename),
            )
            .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
            .header(
                header::CACHE_CONTROL,
                format!(
                    "public, max-age={}, immutable",
                    delivery.cache_max_age.as_secs()
                ),
            ),
        Disposition::Attachment { filename } => response.header(
            header::CONTENT_DISPOSITION,
            content_disposition("attachment", filename),
        ),
    };

    if let RangeOutcome::Satisfiable { start, end } = outcome {
        response = response.status(StatusCode::PARTIAL_CONTENT).header(
            header::CONTENT_RANGE,
            format!("bytes {start}-{end}/{}", descriptor.size),
        );
    } else {
        response = response.status(StatusCode::OK);
    }

    Ok(response.body(Body::from_stream(stream))?)
}

/// Builds a `Content-Disposition` value that stays within header-safe
/// ASCII. Non-ASCII filenames (Arabic titles) get an underscore fallback
/// in `filename=` plus the RFC 5987 percent-encoded `filename*` form.
fn content_disposition(kind: &str, filename: &str) -> String {
    if filename.is_ascii() {
        format!("{kind}; filename=\"{filename}\"")
    } else {
        let fallback: String = filename
            .chars()
            .map(|c| if c.is_ascii() { c } else { '_' })
            .collect();
        format!(
            "{kind}; filename=\"{fallback}\"; filename*=UTF-8''{}",
            urlencoding::encode(filename)
        )
    }
}
