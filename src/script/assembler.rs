/*!
 * Script assembly.
 *
 * The assembler drives one conversion: it classifies every raw line, splits
 * dialogue into speaker blocks, emits the title and roster, and finally turns
 * the blocks into a styled `ScriptDocument`.
 *
 * An assembler owns its `ColorRegistry`; every call to `assemble` starts a
 * fresh run, so one assembler never leaks colors from one document into the
 * next, and separate assemblers can run on separate threads.
 */

use log::{debug, info, warn};

use crate::app_config::{Config, FormattingStyle};
use crate::document::model::{
    Alignment, DocumentProperties, Paragraph, ParagraphIndent, ParagraphSpacing, Run, ScriptDocument,
};
use crate::script::blocks::{BlockKind, OutputBlock, StyledSpan};
use crate::script::colors::ColorRegistry;
use crate::script::line_classifier::{classify, LineKind};
use crate::script::speakers::SpeakerExtractor;
use crate::script::splitter::DialogueSplitter;

/// Counters for one conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub lines_read: usize,
    pub blank_lines: usize,
    pub line_numbers_dropped: usize,
    pub timecodes: usize,
    pub dialogue_lines: usize,
    pub speaker_lines: usize,
    pub continuation_blocks: usize,
}

/// Blocks and speaker list of one assembled transcript
#[derive(Debug, Clone)]
pub struct AssemblyOutput {
    pub title: String,
    /// Distinct genuine speakers in order of first appearance
    pub speakers: Vec<String>,
    pub blocks: Vec<OutputBlock>,
    pub stats: AssemblyStats,
}

/// Drives the transformation of raw lines into a script
#[derive(Debug)]
pub struct ScriptAssembler {
    config: Config,
    extractor: SpeakerExtractor,
    registry: ColorRegistry,
}

impl ScriptAssembler {
    pub fn new(config: Config) -> Self {
        let extractor = SpeakerExtractor::from_config(&config.speakers);
        let registry = ColorRegistry::from_config(&config.colors);
        Self {
            config,
            extractor,
            registry,
        }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(Config::default())
    }

    pub fn style(&self) -> &FormattingStyle {
        &self.config.style
    }

    /// Colors assigned during the last run
    pub fn registry(&self) -> &ColorRegistry {
        &self.registry
    }

    /// Turn raw lines into output blocks
    pub fn assemble<S: AsRef<str>>(&mut self, lines: &[S], title_seed: &str) -> AssemblyOutput {
        self.registry.reset();

        let title = derive_title(title_seed, &self.config.title.decorations);
        let mut blocks = vec![OutputBlock::new(BlockKind::Title, vec![StyledSpan::bold(title.clone())])];

        let speakers = self.extractor.collect_speakers(lines);
        if self.config.title.include_roster && !speakers.is_empty() {
            blocks.push(OutputBlock::new(
                BlockKind::SpeakerRoster,
                vec![StyledSpan::plain(format!("Speakers: {}", speakers.join(", ")))],
            ));
        }

        let mut stats = AssemblyStats {
            lines_read: lines.len(),
            ..Default::default()
        };
        let splitter = DialogueSplitter::new(&self.extractor, &self.config.style);

        for line in lines {
            let line = line.as_ref();
            match classify(line) {
                LineKind::Blank => stats.blank_lines += 1,
                LineKind::LineNumber => stats.line_numbers_dropped += 1,
                LineKind::Timecode => {
                    stats.timecodes += 1;
                    blocks.push(OutputBlock::new(
                        BlockKind::Timecode,
                        vec![StyledSpan::bold(line.trim())],
                    ));
                }
                LineKind::Dialogue => {
                    stats.dialogue_lines += 1;
                    for block in splitter.split(line, &mut self.registry) {
                        match block.kind {
                            BlockKind::SpeakerLine => stats.speaker_lines += 1,
                            BlockKind::Continuation => stats.continuation_blocks += 1,
                            _ => {}
                        }
                        blocks.push(block);
                    }
                }
            }
        }

        if stats.dialogue_lines == 0 {
            warn!("No dialogue found in '{}'; the script will only contain its title", title_seed);
        }
        debug!("Assembly stats for '{}': {:?}", title, stats);

        AssemblyOutput {
            title,
            speakers,
            blocks,
            stats,
        }
    }

    /// Lay out assembled blocks as a styled document
    pub fn build_document(&self, output: &AssemblyOutput) -> ScriptDocument {
        let style = &self.config.style;
        let mut document = ScriptDocument::new();
        document.properties = DocumentProperties {
            title: Some(output.title.clone()),
            default_font: Some((style.font_name.clone(), style.font_size_pt)),
            page_numbers: style.page_numbers,
        };

        let body_spacing = ParagraphSpacing {
            after_pt: style.paragraph_spacing_pt,
            line: style.line_spacing,
        };

        for block in &output.blocks {
            let paragraph = match block.kind {
                BlockKind::Title => Paragraph::new()
                    .align(Alignment::Center)
                    .spacing(ParagraphSpacing {
                        after_pt: style.title_size_pt,
                        line: 1.0,
                    })
                    .add_run(
                        Run::text(block.text())
                            .font(style.font_name.clone(), style.title_size_pt)
                            .bold(true),
                    ),
                _ => {
                    let mut paragraph = Paragraph::new().spacing(body_spacing);
                    if let Some(indent) = block.indent {
                        paragraph = paragraph
                            .indent(ParagraphIndent {
                                left_twips: indent.left_twips,
                                hanging_twips: indent.hanging_twips,
                            })
                            .tab_stop(indent.tab_stop_twips);
                    }
                    for span in &block.spans {
                        paragraph.push_run(span_to_run(span, style));
                    }
                    paragraph
                }
            };
            document.add_paragraph(paragraph);
        }

        document
    }

    /// Assemble and lay out in one step
    pub fn convert<S: AsRef<str>>(&mut self, lines: &[S], title_seed: &str) -> (ScriptDocument, AssemblyOutput) {
        let output = self.assemble(lines, title_seed);
        let document = self.build_document(&output);
        info!(
            "Assembled '{}': {} speakers, {} timecodes, {} paragraphs",
            output.title,
            output.speakers.len(),
            output.stats.timecodes,
            document.paragraphs().len()
        );
        (document, output)
    }
}

impl Default for ScriptAssembler {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn span_to_run(span: &StyledSpan, style: &FormattingStyle) -> Run {
    match span {
        StyledSpan::Tab => Run::tab().font(style.font_name.clone(), style.font_size_pt),
        StyledSpan::Text { text, style: flags, color, highlight } => Run::text(text.clone())
            .font(style.font_name.clone(), style.font_size_pt)
            .bold(flags.bold)
            .italic(flags.italic)
            .color(*color)
            .highlight(*highlight),
    }
}

/// Title from a file name: decorations stripped, underscores as spaces, upper-cased.
pub fn derive_title(seed: &str, decorations: &[String]) -> String {
    let mut title = seed.trim().to_string();

    // Decorations can be stacked ("FORMATTED_talk_transcript.srt"), so strip until stable.
    loop {
        let before = title.len();
        for decoration in decorations.iter().filter(|d| !d.is_empty()) {
            if let Some(rest) = strip_prefix_ignore_case(&title, decoration) {
                title = rest.to_string();
            }
            if let Some(rest) = strip_suffix_ignore_case(&title, decoration) {
                title = rest.to_string();
            }
        }
        if title.len() == before {
            break;
        }
    }

    let title = title
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    if title.is_empty() {
        seed.trim().to_uppercase()
    } else {
        title
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(suffix.len())?;
    let tail = text.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &text[..split])
}
