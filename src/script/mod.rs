/*!
 * Transcript to script transformation.
 *
 * - `line_classifier`: line numbers, timecodes, blanks and dialogue
 * - `speakers`: "Name:" cue extraction and the false positive denylist
 * - `colors`: per-speaker color assignment
 * - `markup`: `<b>`, `<i>` and `<u>` emphasis spans
 * - `splitter`: one dialogue line into speaker and continuation blocks
 * - `assembler`: the whole pipeline, up to a styled document
 */

pub mod assembler;
pub mod blocks;
pub mod colors;
pub mod line_classifier;
pub mod markup;
pub mod speakers;
pub mod splitter;

pub use assembler::{derive_title, AssemblyOutput, AssemblyStats, ScriptAssembler};
pub use blocks::{BlockKind, IndentSpec, OutputBlock, StyledSpan};
pub use colors::{ColorRegistry, Palette, Rgb, SpeakerColor};
pub use line_classifier::{classify, LineKind};
pub use markup::{render_spans, strip_tags, EmphasisSpan, StyleFlags};
pub use speakers::{Cue, SpeakerCue, SpeakerExtractor};
pub use splitter::DialogueSplitter;
