//! Minbar Core - Audio lecture domain and delivery primitives
//!
//! This crate provides the building blocks for HTTP audio delivery:
//! the lecture domain model, collaborator traits for lookup, storage
//! and usage counters, byte-range parsing, MIME resolution, and
//! configuration management.

pub mod config;
pub mod counters;
pub mod delivery;
pub mod lecture;
pub mod storage;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::MinbarConfig;
pub use counters::{CounterError, CounterSink};
pub use delivery::{ContentDescriptor, RangeOutcome};
pub use lecture::{Lecture, LectureId, LectureLookup, LookupError};
pub use storage::{FileStorage, StorageError};

/// Process-level failures: configuration and server lifecycle.
///
/// Request-path failures keep their own error types ([`LookupError`],
/// [`StorageError`], [`CounterError`]) and are mapped to HTTP responses
/// by the web layer; they never pass through here.
#[derive(Debug, thiserror::Error)]
pub enum MinbarError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MinbarError>;
