//! Lecture domain model and the lookup collaborator seam.
//!
//! The delivery layer never owns lecture persistence; it consumes the
//! read-only [`LectureLookup`] trait and treats everything behind it
//! (database, admin pipeline, import scripts) as external.

pub mod filename;
pub mod manifest;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use filename::{download_filename, inline_filename, sanitize_filename};
pub use manifest::ManifestLectureStore;

/// Opaque lecture identifier.
///
/// The delivery layer makes no assumption about the format; whatever the
/// lookup backend uses (ObjectId hex, slug, integer) passes through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LectureId(pub String);

impl LectureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LectureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bilingual text with Arabic as the source language and English as an
/// optional translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub arabic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
}

impl LocalizedText {
    pub fn arabic_only(arabic: impl Into<String>) -> Self {
        Self {
            arabic: arabic.into(),
            english: None,
        }
    }

    pub fn bilingual(arabic: impl Into<String>, english: impl Into<String>) -> Self {
        Self {
            arabic: arabic.into(),
            english: Some(english.into()),
        }
    }

    /// English if present, otherwise Arabic.
    ///
    /// English is preferred only because it is typically filesystem-safer;
    /// Arabic text is fully supported downstream and survives filename
    /// sanitization unchanged.
    pub fn preferred(&self) -> &str {
        match &self.english {
            Some(english) if !english.trim().is_empty() => english,
            _ => &self.arabic,
        }
    }
}

/// Reference to the sheikh who delivered a lecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheikhRef {
    pub name: LocalizedText,
}

/// Reference to the series a lecture belongs to, with its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRef {
    pub title: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<u32>,
}

/// One audio recording with associated metadata, as provided by the
/// external persistence layer. Read-only input to the delivery handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    pub id: LectureId,
    pub title: LocalizedText,
    /// Storage key of the audio file; `None` means no audio is attached
    /// and the lecture is neither streamable nor downloadable.
    #[serde(default)]
    pub audio_file: Option<String>,
    /// File size recorded at upload time. Advisory: the live stat wins
    /// when the two diverge.
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub sheikh: Option<SheikhRef>,
    #[serde(default)]
    pub series: Option<SeriesRef>,
    #[serde(default)]
    pub play_count: u64,
    #[serde(default)]
    pub download_count: u64,
}

impl Lecture {
    /// Extension of the attached audio file including the leading dot,
    /// empty when there is no extension or no file.
    pub fn audio_extension(&self) -> String {
        self.audio_file
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| format!(".{ext}"))
            .unwrap_or_default()
    }
}

/// Errors from the lecture lookup backend.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Lookup backend failure: {reason}")]
    Backend { reason: String },
}

/// Read-only lecture resolution, implemented by the persistence layer.
#[async_trait]
pub trait LectureLookup: Send + Sync {
    /// Resolves a lecture by its opaque identifier.
    ///
    /// `Ok(None)` means the identifier is unknown; `Err` is reserved for
    /// backend failures.
    ///
    /// # Errors
    ///
    /// - `LookupError::Backend` - The backing store could not be queried
    async fn find_by_id(&self, id: &LectureId) -> Result<Option<Lecture>, LookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_title_english_first() {
        let title = LocalizedText::bilingual("شرح كتاب التوحيد", "Explanation of Kitab at-Tawhid");
        assert_eq!(title.preferred(), "Explanation of Kitab at-Tawhid");
    }

    #[test]
    fn test_preferred_title_falls_back_to_arabic() {
        let title = LocalizedText::arabic_only("شرح كتاب التوحيد");
        assert_eq!(title.preferred(), "شرح كتاب التوحيد");

        let blank_english = LocalizedText::bilingual("الأربعون النووية", "   ");
        assert_eq!(blank_english.preferred(), "الأربعون النووية");
    }

    #[test]
    fn test_audio_extension() {
        let mut lecture = Lecture {
            id: LectureId::new("L1"),
            title: LocalizedText::arabic_only("درس"),
            audio_file: Some("tawhid-01.mp3".to_string()),
            file_size: None,
            sheikh: None,
            series: None,
            play_count: 0,
            download_count: 0,
        };
        assert_eq!(lecture.audio_extension(), ".mp3");

        lecture.audio_file = Some("noextension".to_string());
        assert_eq!(lecture.audio_extension(), "");

        lecture.audio_file = None;
        assert_eq!(lecture.audio_extension(), "");
    }
}
