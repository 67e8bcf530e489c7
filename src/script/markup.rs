/*!
 * Inline emphasis rendering.
 *
 * Subtitle text carries HTML-like emphasis tags (`<i>`, `<b>`, `<u>`, possibly
 * stacked). Tagged text is rendered uniformly as bold italic, whatever the
 * tag; everything else is plain. The spans produced always cover the whole
 * input: their `source` ranges are contiguous and in order.
 */

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

/// Opening tag run, lazy inner text, closing tag run
pub const EMPHASIS_PATTERN: &str = r"(?is)((?:<[ibu]>)+)(.*?)((?:</[ibu]>)+)";

/// Any single emphasis tag, opening or closing
pub const EMPHASIS_TAG_PATTERN: &str = r"(?i)</?[ibu]>";

static EMPHASIS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMPHASIS_PATTERN).expect("Invalid emphasis regex"));

static EMPHASIS_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMPHASIS_TAG_PATTERN).expect("Invalid emphasis tag regex"));

/// Run-level emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleFlags {
    pub bold: bool,
    pub italic: bool,
}

impl StyleFlags {
    pub const PLAIN: Self = Self { bold: false, italic: false };
    pub const BOLD: Self = Self { bold: true, italic: false };
    pub const EMPHASIS: Self = Self { bold: true, italic: true };

    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic
    }
}

/// A piece of rendered text and the input bytes it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmphasisSpan {
    /// Display text, tags removed
    pub text: String,
    pub style: StyleFlags,
    /// Byte range of the input covered by this span, tags included
    pub source: Range<usize>,
}

impl EmphasisSpan {
    fn plain(input: &str, source: Range<usize>) -> Self {
        Self {
            text: input[source.clone()].to_string(),
            style: StyleFlags::PLAIN,
            source,
        }
    }
}

/// Split `text` into plain and emphasized spans.
///
/// Unbalanced or stray tags are kept verbatim as plain text.
pub fn render_spans(text: &str) -> Vec<EmphasisSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in EMPHASIS_REGEX.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(2)) else {
            continue;
        };

        if whole.start() > cursor {
            spans.push(EmphasisSpan::plain(text, cursor..whole.start()));
        }

        spans.push(EmphasisSpan {
            text: strip_tags(inner.as_str()),
            style: StyleFlags::EMPHASIS,
            source: whole.range(),
        });
        cursor = whole.end();
    }

    if cursor < text.len() {
        spans.push(EmphasisSpan::plain(text, cursor..text.len()));
    }

    spans
}

/// Remove every emphasis tag from `text`
pub fn strip_tags(text: &str) -> String {
    EMPHASIS_TAG_REGEX.replace_all(text, "").into_owned()
}
