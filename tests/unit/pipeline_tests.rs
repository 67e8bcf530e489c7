/*!
 * Tests for the transcript to script pipeline
 */

use std::collections::HashSet;

use scriptsmith::app_config::{ColorMode, Config, DenylistPolicy};
use scriptsmith::script::{
    classify, render_spans, BlockKind, ColorRegistry, DialogueSplitter, LineKind, OutputBlock, Palette,
    ScriptAssembler, SpeakerExtractor, StyleFlags, StyledSpan,
};
use crate::common;

fn speaker_lines(blocks: &[OutputBlock]) -> Vec<&OutputBlock> {
    blocks.iter().filter(|b| b.kind == BlockKind::SpeakerLine).collect()
}

/// A sequence number produces no block at all
#[test]
fn test_assemble_withLineNumber_shouldEmitNothing() {
    assert_eq!(classify("1"), LineKind::LineNumber);

    let mut assembler = ScriptAssembler::new(common::seeded_config());
    let output = assembler.assemble(&["1"], "scene");
    assert_eq!(output.blocks.len(), 1);
    assert_eq!(output.blocks[0].kind, BlockKind::Title);
}

/// A timecode becomes one bold block with the same text
#[test]
fn test_assemble_withTimecode_shouldEmitBoldTimecode() {
    let mut assembler = ScriptAssembler::new(common::seeded_config());
    let output = assembler.assemble(&["00:00:01,000 --> 00:00:04,500"], "scene");

    let timecode = &output.blocks[1];
    assert_eq!(timecode.kind, BlockKind::Timecode);
    assert_eq!(timecode.text(), "00:00:01,000 --> 00:00:04,500");
    assert!(timecode.spans.iter().all(|span| span.style() == StyleFlags::BOLD));
}

/// One speaker line: bold colored name, tab, plain dialogue
#[test]
fn test_split_withSpeakerCue_shouldColorNameAndKeepDialoguePlain() {
    let config = common::seeded_config();
    let extractor = SpeakerExtractor::from_config(&config.speakers);
    let mut registry = ColorRegistry::from_config(&config.colors);
    let splitter = DialogueSplitter::new(&extractor, &config.style);

    let blocks = splitter.split("Ethan: Hello there.", &mut registry);
    assert_eq!(blocks.len(), 1);
    let block = &blocks[0];

    match &block.spans[0] {
        StyledSpan::Text { text, style, color, .. } => {
            assert_eq!(text, "Ethan: ");
            assert_eq!(*style, StyleFlags::BOLD);
            assert!(color.is_some());
        }
        StyledSpan::Tab => panic!("expected the speaker name first"),
    }
    assert_eq!(block.spans[1], StyledSpan::Tab);
    assert_eq!(block.content_text(), "Hello there.");
    assert!(block.content_spans().iter().all(|span| span.style().is_plain()));
}

/// Two speakers in one line get two blocks and keep their colors
#[test]
fn test_assemble_withTwoSpeakersInLine_shouldSplitAndKeepColors() {
    let mut assembler = ScriptAssembler::new(common::seeded_config());
    let output = assembler.assemble(&["Ethan: Hi. Leo: Hey!", "Leo: Again."], "scene");

    let lines = speaker_lines(&output.blocks);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].speaker.as_deref(), Some("Ethan"));
    assert_eq!(lines[0].content_text(), "Hi.");
    assert_eq!(lines[1].speaker.as_deref(), Some("Leo"));
    assert_eq!(lines[1].content_text(), "Hey!");

    // Leo's name span is identical both times
    assert_eq!(lines[1].spans[0].text(), lines[2].spans[0].text());
    assert_eq!(lines[1].spans[0], lines[2].spans[0]);
    assert_ne!(lines[0].spans[0], lines[1].spans[0]);
}

/// A greeting before a name never becomes part of the speaker roster
#[test]
fn test_assemble_withGreetingBeforeName_shouldNotInventSpeakers() {
    let mut assembler = ScriptAssembler::new(common::seeded_config());
    let output = assembler.assemble(
        &["Ethan: Hey Leo: what?", "Ethan: Thanks Leo: sure", "(beat) Then Maya: Stop."],
        "scene",
    );

    assert_eq!(output.speakers, vec!["Ethan", "Leo", "Maya"]);
    assert_eq!(assembler.registry().len(), 3);
}

/// A denylisted cue leaves the whole line as narration
#[test]
fn test_assemble_withDenylistedCue_shouldEmitContinuationOnly() {
    let mut assembler = ScriptAssembler::new(common::seeded_config());
    let output = assembler.assemble(&["OH NO: this isn't real"], "scene");

    assert!(speaker_lines(&output.blocks).is_empty());
    assert!(output.speakers.is_empty());
    let last = output.blocks.last().unwrap();
    assert_eq!(last.kind, BlockKind::Continuation);
    assert_eq!(last.text(), "OH NO: this isn't real");
}

/// Emphasis tags become bold italic text with the tags removed
#[test]
fn test_assemble_withItalicTag_shouldRenderEmphasis() {
    let mut assembler = ScriptAssembler::new(common::seeded_config());
    let output = assembler.assemble(&["It was <i>whispered</i> quietly."], "scene");

    let block = output.blocks.last().unwrap();
    assert_eq!(block.kind, BlockKind::Continuation);
    let spans: Vec<(&str, StyleFlags)> = block.spans.iter().map(|s| (s.text(), s.style())).collect();
    assert_eq!(
        spans,
        vec![
            ("It was ", StyleFlags::PLAIN),
            ("whispered", StyleFlags::EMPHASIS),
            (" quietly.", StyleFlags::PLAIN),
        ]
    );
}

/// Span sources always tile the input
#[test]
fn test_renderSpans_shouldCoverWholeInput() {
    let inputs = [
        "plain words only",
        "<b>all bold</b>",
        "a <i><b>stacked</b></i> b <u>under</u>",
        "stray </i> tag and <i>open",
        "émigré <i>café</i> naïve",
    ];
    for input in inputs {
        let spans = render_spans(input);
        let rebuilt: String = spans.iter().map(|s| &input[s.source.clone()]).collect();
        assert_eq!(rebuilt, input);
    }

    let untagged = "no tags: just text";
    let rebuilt: String = render_spans(untagged).into_iter().map(|s| s.text).collect();
    assert_eq!(rebuilt, untagged);
}

/// Every genuine cue yields exactly one speaker line
#[test]
fn test_split_shouldConserveCues() {
    let extractor = SpeakerExtractor::with_defaults();
    let config = Config::default();
    let splitter = DialogueSplitter::new(&extractor, &config.style);
    let mut registry = ColorRegistry::new(Palette::builtin(), Some(3));

    let lines = [
        "Ethan: Hi.",
        "Ethan: Hi. Leo: Hey! Maya: Yo.",
        "narration first. Leo: then me",
        "Ethan & Leo: together",
        "nothing here",
    ];
    for line in lines {
        let cues = extractor.find_speaker_cues(line).len();
        let blocks = splitter.split(line, &mut registry);
        assert_eq!(speaker_lines(&blocks).len(), cues, "line: {}", line);
    }
}

/// Speakers within the palette size get distinct text colors
#[test]
fn test_colorRegistry_withinPaletteSize_shouldAssignDistinctColors() {
    let config = common::seeded_config();
    let mut registry = ColorRegistry::from_config(&config.colors);
    let names: Vec<String> = (0..config.colors.palette_size).map(|i| format!("Speaker{}", i)).collect();

    let colors: HashSet<String> = names.iter().map(|n| registry.color_for(n).text.to_hex()).collect();
    assert_eq!(colors.len(), names.len());

    for name in &names {
        assert_eq!(registry.color_for(name), registry.get(name).unwrap());
    }
}

/// The same seed reproduces the same assignment
#[test]
fn test_assemble_withSameSeed_shouldBeDeterministic() {
    let lines = ["Ethan: Hi. Leo: Hey!", "Maya: Hello."];
    let mut first = ScriptAssembler::new(common::seeded_config());
    let mut second = ScriptAssembler::new(common::seeded_config());
    assert_eq!(first.assemble(&lines, "x").blocks, second.assemble(&lines, "x").blocks);
}

/// Highlight mode shades names instead of coloring them
#[test]
fn test_assemble_withHighlightMode_shouldShadeNames() {
    let mut config = common::seeded_config();
    config.style.color_mode = ColorMode::HighlightOnly;
    let mut assembler = ScriptAssembler::new(config);
    let output = assembler.assemble(&["Ethan: Hi."], "x");

    match &speaker_lines(&output.blocks)[0].spans[0] {
        StyledSpan::Text { color, highlight, .. } => {
            assert!(color.is_none());
            assert!(highlight.is_some());
        }
        StyledSpan::Tab => panic!("expected the speaker name first"),
    }
}

/// With skip_cue a denylisted cue does not hide later speakers
#[test]
fn test_assemble_withSkipCuePolicy_shouldFindLaterSpeakers() {
    let mut config = common::seeded_config();
    config.speakers.denylist_policy = DenylistPolicy::SkipCue;
    let mut assembler = ScriptAssembler::new(config);
    let output = assembler.assemble(&["WAIT: stop. Leo: Why?"], "x");

    let lines = speaker_lines(&output.blocks);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].speaker.as_deref(), Some("Leo"));
    assert_eq!(output.speakers, vec!["Leo"]);
}

/// The whole sample transcript assembles in order
#[test]
fn test_assemble_withSampleTranscript_shouldProduceExpectedKinds() {
    let lines: Vec<&str> = common::SAMPLE_TRANSCRIPT.lines().collect();
    let mut assembler = ScriptAssembler::new(common::seeded_config());
    let output = assembler.assemble(&lines, "pilot_transcript");

    assert_eq!(output.title, "PILOT");
    assert_eq!(output.speakers, vec!["Ethan", "Leo"]);
    assert_eq!(output.stats.line_numbers_dropped, 4);
    assert_eq!(output.stats.timecodes, 4);
    assert_eq!(output.stats.speaker_lines, 3);
    assert_eq!(output.stats.continuation_blocks, 2);

    let kinds: Vec<BlockKind> = output.blocks.iter().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![
            BlockKind::Title,
            BlockKind::SpeakerRoster,
            BlockKind::Timecode,
            BlockKind::SpeakerLine,
            BlockKind::Timecode,
            BlockKind::SpeakerLine,
            BlockKind::SpeakerLine,
            BlockKind::Timecode,
            BlockKind::Continuation,
            BlockKind::Timecode,
            BlockKind::Continuation,
        ]
    );
}
