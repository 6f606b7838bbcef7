//! Filename convention shared by the splitter and the analyzer.
//!
//! Chunks are written as `<base> - chunk_<n>.<ext>` with a 1-based `n`. The
//! analyzer reads `n` back to place each figure on one continuous timeline.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

/// Chunk marker: literal `chunk_` followed by one or more digits.
const CHUNK_PATTERN: &str = r"chunk_(\d+)";

/// Default analysis window in seconds (10 minutes).
pub const DEFAULT_OFFSET_WINDOW_SECS: f64 = 600.0;

static CHUNK_REGEX: OnceLock<Regex> = OnceLock::new();

#[allow(clippy::expect_used)]
fn chunk_regex() -> &'static Regex {
    CHUNK_REGEX.get_or_init(|| Regex::new(CHUNK_PATTERN).expect("invalid chunk pattern"))
}

/// File stem of `path`, or an empty string when it has none.
///
/// # Example
/// ```
/// use cs_core::naming::base_name;
/// use std::path::Path;
/// assert_eq!(base_name(Path::new("/audio/talk.mp3")), "talk");
/// ```
#[must_use]
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Output filename for chunk `index` (1-based).
///
/// # Example
/// ```
/// use cs_core::naming::chunk_file_name;
/// assert_eq!(chunk_file_name("talk", 2, "mp3"), "talk - chunk_2.mp3");
/// ```
#[must_use]
pub fn chunk_file_name(base: &str, index: u64, ext: &str) -> String {
    format!("{base} - chunk_{index}.{ext}")
}

/// Output filename of the analysis figure for a file stem.
#[must_use]
pub fn analysis_file_name(base: &str) -> String {
    format!("{base}_analysis.png")
}

/// First `chunk_<digits>` marker in `file_name`, if any.
///
/// Numbers too large for `u64` are treated as absent.
///
/// # Example
/// ```
/// use cs_core::naming::parse_chunk_index;
/// assert_eq!(parse_chunk_index("foo - chunk_3.mp3"), Some(3));
/// assert_eq!(parse_chunk_index("foo.mp3"), None);
/// ```
#[must_use]
pub fn parse_chunk_index(file_name: &str) -> Option<u64> {
    let caps = chunk_regex().captures(file_name)?;
    let digits = caps.get(1)?.as_str();
    match digits.parse() {
        Ok(n) => Some(n),
        Err(e) => {
            log::warn!("Index de chunk illisible '{digits}' dans {file_name}: {e}");
            None
        }
    }
}

/// Timeline offset in seconds: `(n - 1) * window_secs`, or 0 without a marker.
///
/// `chunk_0` is kept as-is and yields a negative offset.
///
/// # Example
/// ```
/// use cs_core::naming::{chunk_offset_secs, DEFAULT_OFFSET_WINDOW_SECS};
/// assert_eq!(chunk_offset_secs("foo - chunk_3.mp3", DEFAULT_OFFSET_WINDOW_SECS), 1200.0);
/// assert_eq!(chunk_offset_secs("foo.mp3", DEFAULT_OFFSET_WINDOW_SECS), 0.0);
/// ```
#[must_use]
pub fn chunk_offset_secs(file_name: &str, window_secs: f64) -> f64 {
    parse_chunk_index(file_name).map_or(0.0, |n| (n as f64 - 1.0) * window_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_marker_wins() {
        assert_eq!(parse_chunk_index("a chunk_12 b chunk_4.mp3"), Some(12));
    }

    #[test]
    fn marker_needs_digits() {
        assert_eq!(parse_chunk_index("chunk_.mp3"), None);
        assert_eq!(parse_chunk_index("chunk_x1.mp3"), None);
        assert_eq!(parse_chunk_index("my chunk_x - chunk_2.mp3"), Some(2));
    }

    #[test]
    fn marker_inside_words() {
        assert_eq!(parse_chunk_index("podcastchunk_7_final.mp3"), Some(7));
    }

    #[test]
    fn chunk_names_round_trip_through_parser() {
        for i in [1_u64, 2, 10, 250] {
            let name = chunk_file_name("talk", i, "mp3");
            assert_eq!(parse_chunk_index(&name), Some(i));
        }
    }

    #[test]
    fn offsets_follow_window() {
        assert!((chunk_offset_secs("x - chunk_1.mp3", 600.0)).abs() < f64::EPSILON);
        assert!((chunk_offset_secs("x - chunk_2.mp3", 600.0) - 600.0).abs() < f64::EPSILON);
        assert!((chunk_offset_secs("x - chunk_2.mp3", 30.0) - 30.0).abs() < f64::EPSILON);
        assert!((chunk_offset_secs("x - chunk_0.mp3", 600.0) + 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn overflowing_index_is_absent() {
        let name = "x - chunk_99999999999999999999999.mp3";
        assert_eq!(parse_chunk_index(name), None);
        assert!(chunk_offset_secs(name, 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn base_and_analysis_names() {
        let stem = base_name(Path::new("dir/talk - chunk_1.mp3"));
        assert_eq!(stem, "talk - chunk_1");
        assert_eq!(analysis_file_name(&stem), "talk - chunk_1_analysis.png");
        assert_eq!(base_name(Path::new("")), "");
    }
}
