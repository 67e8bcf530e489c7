/*!
 * Dialogue splitting.
 *
 * One raw dialogue line may hold narration and several speaker turns. The
 * splitter cuts it at every genuine speaker cue and produces one block per
 * turn, plus continuation blocks for text that belongs to no speaker.
 */

use crate::app_config::{FormattingStyle, TabPolicy};
use crate::script::blocks::{BlockKind, IndentSpec, OutputBlock, StyledSpan};
use crate::script::colors::ColorRegistry;
use crate::script::markup::{render_spans, StyleFlags};
use crate::script::speakers::{Cue, SpeakerCue, SpeakerExtractor};

/// Approximate width of one bold character, in twips per point of font size
const BOLD_CHAR_TWIPS_PER_PT: u32 = 11;

/// Splits dialogue lines into formatted blocks
#[derive(Debug, Clone, Copy)]
pub struct DialogueSplitter<'a> {
    extractor: &'a SpeakerExtractor,
    style: &'a FormattingStyle,
}

impl<'a> DialogueSplitter<'a> {
    pub fn new(extractor: &'a SpeakerExtractor, style: &'a FormattingStyle) -> Self {
        Self { extractor, style }
    }

    /// Split one line. Speakers get their colors from `registry`.
    pub fn split(&self, line: &str, registry: &mut ColorRegistry) -> Vec<OutputBlock> {
        let cues = self.extractor.scan(line);
        let mut blocks = Vec::new();

        if cues.is_empty() {
            self.push_continuation(&mut blocks, line);
            return blocks;
        }

        let mut cursor = 0;
        for (i, cue) in cues.iter().enumerate() {
            let current = cue.cue();
            if current.start > cursor {
                self.push_continuation(&mut blocks, &line[cursor..current.start]);
            }

            match cue {
                Cue::Denied(denied) => {
                    self.push_continuation(&mut blocks, &line[denied.start..]);
                    cursor = line.len();
                    break;
                }
                Cue::Genuine(genuine) => {
                    let content_end = cues
                        .get(i + 1)
                        .map(|next| next.cue().start)
                        .unwrap_or(line.len());
                    blocks.push(self.speaker_line(genuine, &line[genuine.end..content_end], registry));
                    cursor = content_end;
                }
            }
        }

        if cursor < line.len() {
            self.push_continuation(&mut blocks, &line[cursor..]);
        }

        blocks
    }

    fn speaker_line(&self, cue: &SpeakerCue, content: &str, registry: &mut ColorRegistry) -> OutputBlock {
        let colors = registry.color_for(&cue.name);
        let mode = self.style.color_mode;

        let mut spans = vec![StyledSpan::Text {
            text: cue.full_match.clone(),
            style: StyleFlags::BOLD,
            color: mode.uses_text_color().then_some(colors.text),
            highlight: mode.uses_highlight().then_some(colors.highlight),
        }];
        spans.extend(std::iter::repeat_n(StyledSpan::Tab, self.tab_count(&cue.full_match)));
        spans.extend(render_spans(content.trim()).into_iter().map(StyledSpan::from));

        OutputBlock::new(BlockKind::SpeakerLine, spans)
            .with_speaker(cue.name.clone())
            .with_indent(Some(self.speaker_indent()))
    }

    fn push_continuation(&self, blocks: &mut Vec<OutputBlock>, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let spans = render_spans(text).into_iter().map(StyledSpan::from).collect();
        blocks.push(
            OutputBlock::new(BlockKind::Continuation, spans).with_indent(Some(self.continuation_indent())),
        );
    }

    /// Tabs between the name and the dialogue column
    pub fn tab_count(&self, cue_text: &str) -> usize {
        match self.style.tab_policy {
            TabPolicy::Single => 1,
            TabPolicy::ByNameWidth => {
                let chars = cue_text.trim_end().chars().count() as u32;
                let font_pt = self.style.font_size_pt.max(1.0).round() as u32;
                let width = chars * font_pt * BOLD_CHAR_TWIPS_PER_PT;
                if width >= self.style.tab_stop_twips { 2 } else { 1 }
            }
        }
    }

    fn speaker_indent(&self) -> IndentSpec {
        let stop = self.style.tab_stop_twips;
        if self.style.hanging_indent {
            IndentSpec { left_twips: stop, hanging_twips: stop, tab_stop_twips: stop }
        } else {
            IndentSpec { left_twips: 0, hanging_twips: 0, tab_stop_twips: stop }
        }
    }

    fn continuation_indent(&self) -> IndentSpec {
        let stop = self.style.tab_stop_twips;
        IndentSpec {
            left_twips: if self.style.hanging_indent { stop } else { 0 },
            hanging_twips: 0,
            tab_stop_twips: stop,
        }
    }
}
