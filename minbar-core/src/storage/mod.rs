//! File storage collaborator for lecture audio.
//!
//! The delivery handlers never touch the filesystem directly; they go
//! through [`FileStorage`], which resolves opaque file references to
//! paths, stats them, and opens readable byte streams, optionally
//! limited to a byte range.

mod local;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::io::AsyncRead;

pub use local::LocalFileStorage;

/// Readable byte source handed to the HTTP responder.
///
/// Boxed so storage implementations can return plain files, seek-limited
/// files, or in-memory cursors (tests) behind one object-safe type.
pub type AudioReader = Box<dyn AsyncRead + Send + Unpin>;

/// Result of a storage stat call.
#[derive(Debug, Clone, Copy)]
pub struct FileStat {
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// Storage layer failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {file_ref}")]
    NotFound { file_ref: String },

    #[error("Invalid file reference: {file_ref}")]
    InvalidFileRef { file_ref: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only access to stored audio files.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Reports whether the referenced file exists in storage.
    ///
    /// Invalid references (traversal attempts) report `false` rather
    /// than erroring; the caller treats both the same way.
    async fn exists(&self, file_ref: &str) -> bool;

    /// Resolves a file reference to an on-disk path.
    ///
    /// # Errors
    ///
    /// - `StorageError::InvalidFileRef` - Reference contains path
    ///   separators, parent components, or is otherwise unsafe
    fn resolve(&self, file_ref: &str) -> Result<PathBuf, StorageError>;

    /// Stats a resolved path.
    ///
    /// # Errors
    ///
    /// - `StorageError::NotFound` - Path vanished since resolution
    /// - `StorageError::Io` - Underlying filesystem failure
    async fn stat(&self, path: &Path) -> Result<FileStat, StorageError>;

    /// Opens a readable stream over the file, limited to `start..=end`
    /// when a range is given.
    ///
    /// # Errors
    ///
    /// - `StorageError::NotFound` - File vanished between stat and open
    /// - `StorageError::Io` - Open or seek failure
    async fn open_read(
        &self,
        path: &Path,
        range: Option<(u64, u64)>,
    ) -> Result<AudioReader, StorageError>;
}
