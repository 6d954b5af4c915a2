//! Audio content-type resolution from filename extensions.

/// Fallback content type for unrecognized or missing extensions.
pub const FALLBACK_AUDIO_MIME: &str = "audio/mpeg";

/// Maps a filename to a canonical audio MIME type.
///
/// Total over all strings: unrecognized extensions, missing extensions and
/// empty names all resolve to `audio/mpeg`. Extension matching is
/// case-insensitive.
pub fn mime_for_filename(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "mp3" => "audio/mpeg",
        "m4a" | "mp4" => "audio/mp4",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "webm" => "audio/webm",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        _ => FALLBACK_AUDIO_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(mime_for_filename("khutbah.mp3"), "audio/mpeg");
        assert_eq!(mime_for_filename("tafsir.m4a"), "audio/mp4");
        assert_eq!(mime_for_filename("seerah.mp4"), "audio/mp4");
        assert_eq!(mime_for_filename("recitation.wav"), "audio/wav");
        assert_eq!(mime_for_filename("lecture.ogg"), "audio/ogg");
        assert_eq!(mime_for_filename("lecture.webm"), "audio/webm");
        assert_eq!(mime_for_filename("lecture.aac"), "audio/aac");
        assert_eq!(mime_for_filename("lecture.flac"), "audio/flac");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(mime_for_filename("x.MP3"), mime_for_filename("x.mp3"));
        assert_eq!(mime_for_filename("x.Flac"), "audio/flac");
    }

    #[test]
    fn test_fallback_for_unknown_or_missing_extension() {
        assert_eq!(mime_for_filename("lecture.opus"), FALLBACK_AUDIO_MIME);
        assert_eq!(mime_for_filename("lecture"), FALLBACK_AUDIO_MIME);
        assert_eq!(mime_for_filename(""), FALLBACK_AUDIO_MIME);
        assert_eq!(mime_for_filename("trailing."), FALLBACK_AUDIO_MIME);
    }

    #[test]
    fn test_only_last_extension_counts() {
        assert_eq!(mime_for_filename("archive.mp3.wav"), "audio/wav");
    }
}
