//! Human-readable filename construction for audio responses.
//!
//! Download filenames describe the lecture (series, part, sheikh) so the
//! saved file remains identifiable outside the platform. Sanitization
//! strips only characters that are illegal in filenames; Arabic text
//! passes through untouched.

use super::Lecture;

/// Characters that are illegal in filenames on at least one supported
/// platform.
const ILLEGAL_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strips illegal filename characters and control characters, collapses
/// whitespace runs, and trims. Non-Latin characters are preserved.
pub fn sanitize_filename(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !c.is_control())
        .collect();

    let mut collapsed = String::with_capacity(stripped.len());
    let mut last_was_space = false;
    for c in stripped.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                collapsed.push(' ');
            }
            last_was_space = true;
        } else {
            collapsed.push(c);
            last_was_space = false;
        }
    }

    collapsed.trim().to_string()
}

/// Builds the descriptive attachment filename for a lecture download.
///
/// Series lectures with a part number become
/// `"<SeriesTitle> - Part <N> - <LectureTitle><ext>"`; standalone lectures
/// become `"<SheikhName> - <LectureTitle><ext>"`, or just the title when no
/// sheikh is attached. Each component prefers the English text when present.
pub fn download_filename(lecture: &Lecture, extension: &str) -> String {
    let title = sanitize_filename(lecture.title.preferred());

    let stem = match (&lecture.series, &lecture.sheikh) {
        (Some(series), _) if series.part.is_some() => {
            let series_title = sanitize_filename(series.title.preferred());
            let part = series.part.unwrap_or(0);
            format!("{series_title} - Part {part} - {title}")
        }
        (_, Some(sheikh)) => {
            let sheikh_name = sanitize_filename(sheikh.name.preferred());
            format!("{sheikh_name} - {title}")
        }
        _ => title,
    };

    format!("{stem}{extension}")
}

/// Builds the inline filename used by the stream endpoint: the lecture
/// title plus the original extension.
pub fn inline_filename(lecture: &Lecture, extension: &str) -> String {
    let title = sanitize_filename(lecture.title.preferred());
    format!("{title}{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lecture::{LectureId, LocalizedText, SeriesRef, SheikhRef};

    fn lecture_fixture() -> Lecture {
        Lecture {
            id: LectureId::new("L1"),
            title: LocalizedText::bilingual("شرح الأصول الثلاثة", "The Three Fundamental Principles"),
            audio_file: Some("usool-03.mp3".to_string()),
            file_size: Some(1000),
            sheikh: Some(SheikhRef {
                name: LocalizedText::bilingual("محمد بن عثيمين", "Ibn Uthaymeen"),
            }),
            series: None,
            play_count: 0,
            download_count: 0,
        }
    }

    #[test]
    fn test_sanitize_strips_illegal_characters() {
        let dirty = r#"Tafsir: Surah <Al-Fatiha> / "Part 1"?*"#;
        let clean = sanitize_filename(dirty);
        for c in ILLEGAL_CHARS {
            assert!(!clean.contains(c), "found illegal char {c:?} in {clean:?}");
        }
        assert_eq!(clean, "Tafsir Surah Al-Fatiha Part 1");
    }

    #[test]
    fn test_sanitize_preserves_arabic() {
        assert_eq!(
            sanitize_filename("شرح / كتاب: التوحيد"),
            "شرح كتاب التوحيد"
        );
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize_filename("  a   b\t c  "), "a b c");
    }

    #[test]
    fn test_download_filename_with_series_and_part() {
        let mut lecture = lecture_fixture();
        lecture.series = Some(SeriesRef {
            title: LocalizedText::bilingual("سلسلة العقيدة", "Aqeedah Series"),
            part: Some(3),
        });

        assert_eq!(
            download_filename(&lecture, ".mp3"),
            "Aqeedah Series - Part 3 - The Three Fundamental Principles.mp3"
        );
    }

    #[test]
    fn test_download_filename_series_without_part_uses_sheikh() {
        let mut lecture = lecture_fixture();
        lecture.series = Some(SeriesRef {
            title: LocalizedText::bilingual("سلسلة", "Some Series"),
            part: None,
        });

        assert_eq!(
            download_filename(&lecture, ".mp3"),
            "Ibn Uthaymeen - The Three Fundamental Principles.mp3"
        );
    }

    #[test]
    fn test_download_filename_standalone_lecture() {
        let lecture = lecture_fixture();
        assert_eq!(
            download_filename(&lecture, ".mp3"),
            "Ibn Uthaymeen - The Three Fundamental Principles.mp3"
        );
    }

    #[test]
    fn test_download_filename_arabic_fallback() {
        let mut lecture = lecture_fixture();
        lecture.title = LocalizedText::arabic_only("شرح الأصول الثلاثة");
        lecture.sheikh = Some(SheikhRef {
            name: LocalizedText::arabic_only("محمد بن عثيمين"),
        });

        assert_eq!(
            download_filename(&lecture, ".mp3"),
            "محمد بن عثيمين - شرح الأصول الثلاثة.mp3"
        );
    }

    #[test]
    fn test_download_filename_without_sheikh_or_series() {
        let mut lecture = lecture_fixture();
        lecture.sheikh = None;
        assert_eq!(
            download_filename(&lecture, ".mp3"),
            "The Three Fundamental Principles.mp3"
        );
    }

    #[test]
    fn test_inline_filename() {
        let lecture = lecture_fixture();
        assert_eq!(
            inline_filename(&lecture, ".mp3"),
            "The Three Fundamental Principles.mp3"
        );
    }
}
