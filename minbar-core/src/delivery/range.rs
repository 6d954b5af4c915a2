//! HTTP Range request parsing for audio streaming
//!
//! Implements the single-range subset of RFC 7233 that audio players
//! actually send, validated against a known total file size.

/// Result of parsing a `Range` request header against a file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Header absent; serve the whole file as 200 OK.
    None,
    /// Valid sub-range; serve 206 Partial Content for bytes `start..=end`.
    Satisfiable { start: u64, end: u64 },
    /// Header present but cannot be satisfied; respond 416 with
    /// `Content-Range: bytes */<file_size>` and no body.
    Unsatisfiable,
}

impl RangeOutcome {
    /// Byte count of the response body for this outcome.
    pub fn content_length(&self, file_size: u64) -> u64 {
        match self {
            RangeOutcome::None => file_size,
            RangeOutcome::Satisfiable { start, end } => end - start + 1,
            RangeOutcome::Unsatisfiable => 0,
        }
    }
}

/// Parse an HTTP `Range` header value against a known file size.
///
/// Handles the `bytes=<start>-[<end>]` form; a missing `<end>` defaults to
/// `file_size - 1`. Multi-range requests are unsupported and fall through to
/// whole-file delivery. Any malformed or out-of-bounds single range yields
/// `Unsatisfiable` rather than an error; this function never panics on
/// untrusted input.
///
/// # Examples
/// ```
/// use minbar_core::delivery::{RangeOutcome, parse_range};
///
/// let outcome = parse_range(Some("bytes=900-"), 1000);
/// assert_eq!(outcome, RangeOutcome::Satisfiable { start: 900, end: 999 });
/// ```
pub fn parse_range(header: Option<&str>, file_size: u64) -> RangeOutcome {
    let Some(header) = header else {
        return RangeOutcome::None;
    };

    let Some(spec) = header.strip_prefix("bytes=") else {
        return RangeOutcome::Unsatisfiable;
    };

    // Multi-range requests are out of scope; serve the whole file.
    if spec.contains(',') {
        return RangeOutcome::None;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Unsatisfiable;
    };

    let Ok(start) = start_str.trim().parse::<u64>() else {
        return RangeOutcome::Unsatisfiable;
    };

    let end = if end_str.trim().is_empty() {
        file_size.saturating_sub(1)
    } else {
        match end_str.trim().parse::<u64>() {
            Ok(end) => end,
            Err(_) => return RangeOutcome::Unsatisfiable,
        }
    };

    if start >= file_size || end >= file_size || start > end {
        return RangeOutcome::Unsatisfiable;
    }

    RangeOutcome::Satisfiable { start, end }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_header_serves_whole_file() {
        assert_eq!(parse_range(None, 5000), RangeOutcome::None);
    }

    #[test]
    fn test_explicit_range() {
        assert_eq!(
            parse_range(Some("bytes=100-199"), 1000),
            RangeOutcome::Satisfiable {
                start: 100,
                end: 199
            }
        );
    }

    #[test]
    fn test_open_ended_range_defaults_to_last_byte() {
        assert_eq!(
            parse_range(Some("bytes=900-"), 1000),
            RangeOutcome::Satisfiable {
                start: 900,
                end: 999
            }
        );
    }

    #[test]
    fn test_range_at_file_size_is_unsatisfiable() {
        assert_eq!(
            parse_range(Some("bytes=1000-1010"), 1000),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_end_beyond_file_size_is_unsatisfiable() {
        assert_eq!(
            parse_range(Some("bytes=0-1000"), 1000),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_inverted_range_is_unsatisfiable() {
        assert_eq!(
            parse_range(Some("bytes=200-100"), 1000),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_missing_bytes_prefix_is_unsatisfiable() {
        assert_eq!(
            parse_range(Some("items=0-10"), 1000),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_non_numeric_start_is_unsatisfiable() {
        assert_eq!(
            parse_range(Some("bytes=abc-100"), 1000),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_suffix_range_is_unsatisfiable() {
        // Suffix form "bytes=-500" has an empty start component, which the
        // delivery layer treats as invalid input.
        assert_eq!(
            parse_range(Some("bytes=-500"), 1000),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_missing_dash_is_unsatisfiable() {
        assert_eq!(
            parse_range(Some("bytes=100"), 1000),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_multi_range_falls_through_to_whole_file() {
        assert_eq!(
            parse_range(Some("bytes=0-10,20-30"), 1000),
            RangeOutcome::None
        );
    }

    #[test]
    fn test_empty_file_rejects_any_range() {
        assert_eq!(parse_range(Some("bytes=0-"), 0), RangeOutcome::Unsatisfiable);
        assert_eq!(parse_range(None, 0), RangeOutcome::None);
    }

    #[test]
    fn test_single_byte_range_at_end() {
        assert_eq!(
            parse_range(Some("bytes=999-"), 1000),
            RangeOutcome::Satisfiable {
                start: 999,
                end: 999
            }
        );
    }

    #[test]
    fn test_content_length_per_outcome() {
        assert_eq!(RangeOutcome::None.content_length(5000), 5000);
        assert_eq!(
            RangeOutcome::Satisfiable {
                start: 900,
                end: 999
            }
            .content_length(1000),
            100
        );
        assert_eq!(RangeOutcome::Unsatisfiable.content_length(1000), 0);
    }
}
