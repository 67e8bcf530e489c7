/*!
 * In-memory rich document model.
 *
 * A `ScriptDocument` is an ordered list of paragraphs made of styled runs.
 * It knows nothing about any file format; `document::docx` reads and writes it.
 */

use crate::script::colors::Rgb;

/// Paragraph alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Content of a run
#[derive(Debug, Clone, PartialEq)]
pub enum RunContent {
    Text(String),
    Tab,
}

/// Contiguous text sharing one character format
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub content: RunContent,
    pub font_name: Option<String>,
    pub size_pt: Option<f32>,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<Rgb>,
    /// Background shading
    pub highlight: Option<Rgb>,
}

impl Run {
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_content(RunContent::Text(text.into()))
    }

    pub fn tab() -> Self {
        Self::with_content(RunContent::Tab)
    }

    fn with_content(content: RunContent) -> Self {
        Self {
            content,
            font_name: None,
            size_pt: None,
            bold: false,
            italic: false,
            color: None,
            highlight: None,
        }
    }

    pub fn font(mut self, name: impl Into<String>, size_pt: f32) -> Self {
        self.font_name = Some(name.into());
        self.size_pt = Some(size_pt);
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn color(mut self, color: Option<Rgb>) -> Self {
        self.color = color;
        self
    }

    pub fn highlight(mut self, highlight: Option<Rgb>) -> Self {
        self.highlight = highlight;
        self
    }

    /// Plain text of the run; tabs read as '\t'
    pub fn plain_text(&self) -> &str {
        match &self.content {
            RunContent::Text(text) => text,
            RunContent::Tab => "\t",
        }
    }
}

/// Left margin and hanging indent, in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParagraphIndent {
    pub left_twips: u32,
    pub hanging_twips: u32,
}

/// Space after the paragraph and line spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphSpacing {
    pub after_pt: f32,
    /// Multiple of single line spacing
    pub line: f32,
}

/// One paragraph
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub alignment: Alignment,
    pub indent: Option<ParagraphIndent>,
    /// Left tab stops, in twips
    pub tab_stops: Vec<u32>,
    pub spacing: Option<ParagraphSpacing>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn indent(mut self, indent: ParagraphIndent) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn tab_stop(mut self, position_twips: u32) -> Self {
        self.tab_stops.push(position_twips);
        self
    }

    pub fn spacing(mut self, spacing: ParagraphSpacing) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn add_run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn push_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(Run::plain_text).collect()
    }
}

/// Document-level properties
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentProperties {
    pub title: Option<String>,
    /// Font applied to runs without their own font
    pub default_font: Option<(String, f32)>,
    /// Whether a page number footer is written
    pub page_numbers: bool,
}

/// A complete rich document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScriptDocument {
    pub properties: DocumentProperties,
    paragraphs: Vec<Paragraph>,
}

impl ScriptDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Paragraph texts joined by newlines
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
