//! JSON error envelope for the delivery endpoints.
//!
//! Every handler failure maps to one of these variants; the response body
//! is always `{"success": false, "message": "..."}` and never carries
//! filesystem paths or error chains. Those stay in the server log.

use axum::Json;
use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Client-visible delivery errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    /// Lecture identifier unknown to the lookup backend.
    #[error("Lecture not found")]
    LectureNotFound,

    /// Lecture exists but has no audio file attached.
    #[error("Lecture has no audio file")]
    NoAudioFile,

    /// Lecture references an audio file the storage layer cannot find.
    /// Indicates data-integrity drift; logged at warning level upstream.
    #[error("Audio file not found on server")]
    AudioFileMissing,

    /// Anything unexpected. The context string is a fixed, path-free
    /// message chosen by the failing handler.
    #[error("{context}")]
    Internal { context: &'static str },
}

impl ApiError {
    pub fn internal(context: &'static str) -> Self {
        ApiError::Internal { context }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::LectureNotFound | ApiError::NoAudioFile | ApiError::AudioFileMissing => {
                StatusCode::NOT_FOUND
            }
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response<Body> {
        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::LectureNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::NoAudioFile.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::AudioFileMissing.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::internal("Failed to stream audio").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_are_distinct_and_path_free() {
        assert_eq!(ApiError::LectureNotFound.to_string(), "Lecture not found");
        assert_eq!(
            ApiError::AudioFileMissing.to_string(),
            "Audio file not found on server"
        );
        assert_ne!(
            ApiError::LectureNotFound.to_string(),
            ApiError::AudioFileMissing.to_string()
        );
    }
}
