/*!
 * Output blocks produced by the script pipeline.
 *
 * A block is one future paragraph of the script document: its kind, its
 * indentation, and an ordered list of styled spans.
 */

use crate::script::colors::Rgb;
use crate::script::markup::{EmphasisSpan, StyleFlags};

/// Kind of an output paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Title,
    SpeakerRoster,
    Timecode,
    SpeakerLine,
    Continuation,
}

/// Hanging indent and tab stop for dialogue paragraphs, in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentSpec {
    /// Left margin of wrapped lines
    pub left_twips: u32,
    /// How far the first line starts left of `left_twips`
    pub hanging_twips: u32,
    /// Position of the dialogue tab stop
    pub tab_stop_twips: u32,
}

/// One element of a block
#[derive(Debug, Clone, PartialEq)]
pub enum StyledSpan {
    Text {
        text: String,
        style: StyleFlags,
        /// Font color
        color: Option<Rgb>,
        /// Background shading
        highlight: Option<Rgb>,
    },
    /// Advance to the next tab stop
    Tab,
}

impl StyledSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            style: StyleFlags::PLAIN,
            color: None,
            highlight: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            style: StyleFlags::BOLD,
            color: None,
            highlight: None,
        }
    }

    /// Text of the span; tabs read as '\t'
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text, .. } => text,
            Self::Tab => "\t",
        }
    }

    pub fn style(&self) -> StyleFlags {
        match self {
            Self::Text { style, .. } => *style,
            Self::Tab => StyleFlags::PLAIN,
        }
    }
}

impl From<EmphasisSpan> for StyledSpan {
    fn from(span: EmphasisSpan) -> Self {
        Self::Text {
            text: span.text,
            style: span.style,
            color: None,
            highlight: None,
        }
    }
}

/// One formatted paragraph of the script
#[derive(Debug, Clone, PartialEq)]
pub struct OutputBlock {
    pub kind: BlockKind,
    /// Speaker of a `SpeakerLine`
    pub speaker: Option<String>,
    pub indent: Option<IndentSpec>,
    pub spans: Vec<StyledSpan>,
}

impl OutputBlock {
    pub fn new(kind: BlockKind, spans: Vec<StyledSpan>) -> Self {
        Self {
            kind,
            speaker: None,
            indent: None,
            spans,
        }
    }

    pub fn with_indent(mut self, indent: Option<IndentSpec>) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Concatenated span text
    pub fn text(&self) -> String {
        self.spans.iter().map(StyledSpan::text).collect()
    }

    /// Spans after the speaker name and its tabs
    pub fn content_spans(&self) -> &[StyledSpan] {
        if self.kind != BlockKind::SpeakerLine {
            return &self.spans;
        }
        let skip = self
            .spans
            .iter()
            .skip(1)
            .take_while(|span| matches!(span, StyledSpan::Tab))
            .count()
            + 1;
        &self.spans[skip.min(self.spans.len())..]
    }

    /// Concatenated text after the speaker name
    pub fn content_text(&self) -> String {
        self.content_spans().iter().map(StyledSpan::text).collect()
    }
}
