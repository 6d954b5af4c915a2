//! Local-filesystem storage implementation.

use std::io::SeekFrom;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::{AudioReader, FileStat, FileStorage, StorageError};

/// Audio file storage rooted at a single library directory.
///
/// File references are bare filenames inside the library; anything that
/// would escape the root (separators, `..`, absolute paths) is rejected
/// before touching the filesystem.
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Creates storage over an existing library directory.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn validate_ref(file_ref: &str) -> Result<(), StorageError> {
        let path = Path::new(file_ref);
        let mut components = path.components();

        let is_plain = matches!(components.next(), Some(Component::Normal(_)))
            && components.next().is_none();

        // Component::Normal still admits names like "a\\b" on unix; reject
        // both separators explicitly so refs behave the same everywhere.
        if !is_plain || file_ref.contains('/') || file_ref.contains('\\') {
            return Err(StorageError::InvalidFileRef {
                file_ref: file_ref.to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn exists(&self, file_ref: &str) -> bool {
        match self.resolve(file_ref) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    fn resolve(&self, file_ref: &str) -> Result<PathBuf, StorageError> {
        Self::validate_ref(file_ref)?;
        Ok(self.root.join(file_ref))
    }

    async fn stat(&self, path: &Path) -> Result<FileStat, StorageError> {
        let metadata = match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound {
                    file_ref: file_name_of(path),
                });
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        Ok(FileStat {
            size: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }

    async fn open_read(
        &self,
        path: &Path,
        range: Option<(u64, u64)>,
    ) -> Result<AudioReader, StorageError> {
        let mut file = match fs::File::open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound {
                    file_ref: file_name_of(path),
                });
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        match range {
            Some((start, end)) => {
                file.seek(SeekFrom::Start(start)).await?;
                Ok(Box::new(file.take(end - start + 1)))
            }
            None => Ok(Box::new(file)),
        }
    }
}

/// Last path component for error reporting; never the full path.
fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;

    use super::*;

    async fn storage_with_file(name: &str, contents: &[u8]) -> (tempfile::TempDir, LocalFileStorage) {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(name), contents).await.unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf());
        (dir, storage)
    }

    #[tokio::test]
    async fn test_exists_and_stat() {
        let (_dir, storage) = storage_with_file("lecture.mp3", b"0123456789").await;

        assert!(storage.exists("lecture.mp3").await);
        assert!(!storage.exists("missing.mp3").await);

        let path = storage.resolve("lecture.mp3").unwrap();
        let stat = storage.stat(&path).await.unwrap();
        assert_eq!(stat.size, 10);
        assert!(stat.modified.is_some());
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let (_dir, storage) = storage_with_file("lecture.mp3", b"x").await;

        for bad in ["../etc/passwd", "a/b.mp3", "..", "/abs.mp3", "a\\b.mp3", ""] {
            let result = storage.resolve(bad);
            assert!(
                matches!(result, Err(StorageError::InvalidFileRef { .. })),
                "expected InvalidFileRef for {bad:?}"
            );
            assert!(!storage.exists(bad).await);
        }
    }

    #[tokio::test]
    async fn test_open_read_full_file() {
        let (_dir, storage) = storage_with_file("lecture.mp3", b"0123456789").await;
        let path = storage.resolve("lecture.mp3").unwrap();

        let mut reader = storage.open_read(&path, None).await.unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"0123456789");
    }

    #[tokio::test]
    async fn test_open_read_range_is_seeked_and_limited() {
        let (_dir, storage) = storage_with_file("lecture.mp3", b"0123456789").await;
        let path = storage.resolve("lecture.mp3").unwrap();

        let mut reader = storage.open_read(&path, Some((3, 6))).await.unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"3456");
    }

    #[tokio::test]
    async fn test_open_read_missing_file_is_not_found() {
        let (_dir, storage) = storage_with_file("lecture.mp3", b"x").await;
        let path = storage.resolve("gone.mp3").unwrap();

        let result = storage.open_read(&path, None).await;
        assert!(matches!(result, Err(StorageError::NotFound { .. })));

        let stat = storage.stat(&path).await;
        assert!(matches!(stat, Err(StorageError::NotFound { .. })));
    }
}
