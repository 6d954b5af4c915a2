//! Per-request delivery primitives: byte-range parsing, MIME resolution,
//! and the resolved content descriptor handed to the HTTP responder.

pub mod mime;
pub mod range;

use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

pub use mime::mime_for_filename;
pub use range::{RangeOutcome, parse_range};

/// Everything the responder needs to know about one audio file, resolved
/// once per request. Immutable for the lifetime of the request.
#[derive(Debug, Clone)]
pub struct ContentDescriptor {
    /// Absolute path of the audio file on disk
    pub path: PathBuf,
    /// Total file size in bytes, from a live stat
    pub size: u64,
    /// Resolved audio content type
    pub mime: &'static str,
    /// Filesystem modification time, when the platform reports one
    pub modified: Option<SystemTime>,
}

impl ContentDescriptor {
    /// Formats the modification time as an IMF-fixdate `Last-Modified` value.
    pub fn last_modified_header(&self) -> Option<String> {
        self.modified.map(|modified| {
            DateTime::<Utc>::from(modified)
                .format("%a, %d %b %Y %H:%M:%S GMT")
                .to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    #[test]
    fn test_last_modified_is_imf_fixdate() {
        let descriptor = ContentDescriptor {
            path: PathBuf::from("/library/lecture.mp3"),
            size: 1000,
            mime: "audio/mpeg",
            modified: Some(UNIX_EPOCH + Duration::from_secs(784_111_777)),
        };

        assert_eq!(
            descriptor.last_modified_header().as_deref(),
            Some("Sun, 06 Nov 1994 08:49:37 GMT")
        );
    }

    #[test]
    fn test_last_modified_absent() {
        let descriptor = ContentDescriptor {
            path: PathBuf::from("/library/lecture.mp3"),
            size: 1000,
            mime: "audio/mpeg",
            modified: None,
        };

        assert!(descriptor.last_modified_header().is_none());
    }
}
