/*!
 * Line classification for raw transcript paragraphs.
 *
 * Every input paragraph is one of four kinds: blank, an SRT sequence number,
 * an SRT timecode line, or dialogue content.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// One or more ASCII digits and nothing else
pub const LINE_NUMBER_PATTERN: &str = r"^[0-9]+$";

/// `HH:MM:SS,mmm --> HH:MM:SS,mmm`, anchored at both ends
pub const TIMECODE_PATTERN: &str =
    r"^[0-9]{2}:[0-9]{2}:[0-9]{2},[0-9]{3}\s+-->\s+[0-9]{2}:[0-9]{2}:[0-9]{2},[0-9]{3}$";

static LINE_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(LINE_NUMBER_PATTERN).expect("Invalid line number regex"));

static TIMECODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(TIMECODE_PATTERN).expect("Invalid timecode regex"));

/// Kind of a raw transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Blank,
    LineNumber,
    Timecode,
    Dialogue,
}

/// Classify one raw line. Surrounding whitespace is ignored.
pub fn classify(text: &str) -> LineKind {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        LineKind::Blank
    } else if LINE_NUMBER_REGEX.is_match(trimmed) {
        LineKind::LineNumber
    } else if TIMECODE_REGEX.is_match(trimmed) {
        LineKind::Timecode
    } else {
        LineKind::Dialogue
    }
}
