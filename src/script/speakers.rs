/*!
 * Speaker cue extraction.
 *
 * A speaker cue is a name-shaped phrase followed by a colon, e.g.
 * "Ethan: " or "Ethan & Leo: ". A line may hold several cues. Phrases that
 * have the right shape but are not people ("OH NO:", "SCENE:") are filtered
 * through a denylist.
 */

use std::collections::HashSet;

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::{DenylistPolicy, SpeakerConfig};
use crate::script::line_classifier::{classify, LineKind};

/// A capitalized token, then up to three more joined by spaces, `&` or
/// `and`, then a colon and optional whitespace. Group 1 is the name.
pub const SPEAKER_CUE_PATTERN: &str =
    r"\b(\p{Lu}[\p{L}']*(?:(?:\s*&\s*|\s+and\s+|\s+)\p{Lu}[\p{L}']*){0,3}):\s*";

static SPEAKER_CUE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(SPEAKER_CUE_PATTERN).expect("Invalid speaker cue regex"));

static LEADING_TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{Lu}[\p{L}']*\s+").expect("Invalid leading token regex"));

/// Capitalized words that open a sentence rather than a name ("Hey Leo:",
/// "Then Maya:"). Compared upper-cased, together with the denylist.
pub const LEAD_IN_WORDS: &[&str] = &[
    "AH", "ALL", "ALSO", "AND", "BUT", "BYE", "COME", "DEAR", "EXCUSE", "GOOD", "GREAT",
    "HELLO", "HI", "HMM", "JUST", "MORNING", "NICE", "NIGHT", "NOW", "OH", "OK", "OKAY",
    "PLEASE", "REALLY", "RIGHT", "SO", "SORRY", "SURE", "THANK", "THANKS", "THEN", "UH",
    "UM", "WELL", "YEAH", "YES", "YO",
];

/// Name-shaped phrases that are not speakers. Compared upper-cased.
pub const DEFAULT_FALSE_POSITIVE_NAMES: &[&str] = &[
    // exclamations
    "OH",
    "OH NO",
    "OH MY GOD",
    "OH MY",
    "WOW",
    "HEY",
    "WAIT",
    "LOOK",
    "LISTEN",
    "WHAT",
    "WELL",
    "YES",
    "NO",
    "OK",
    "OKAY",
    // scene descriptions
    "SCENE",
    "INT",
    "EXT",
    "CUT TO",
    "FADE IN",
    "FADE OUT",
    "FLASHBACK",
    "MEANWHILE",
    "LATER",
    "MUSIC",
    "LAUGHTER",
    "APPLAUSE",
    "NOTE",
    "TRANSLATION",
    "SUBTITLE",
    "SUBTITLES",
    // groups
    "TEAM",
    "TEAM RED",
    "TEAM BLUE",
    "THE TEAM",
];

/// One "Name:" match inside a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerCue {
    /// Name, colon and trailing whitespace, as written
    pub full_match: String,
    /// Trimmed name, case preserved
    pub name: String,
    /// Byte offset of the cue start
    pub start: usize,
    /// Byte offset just past the full match
    pub end: usize,
}

/// Result of scanning one cue candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    /// A real speaker attribution
    Genuine(SpeakerCue),
    /// A denylisted phrase that ended scanning for the line
    Denied(SpeakerCue),
}

impl Cue {
    pub fn cue(&self) -> &SpeakerCue {
        match self {
            Self::Genuine(cue) | Self::Denied(cue) => cue,
        }
    }

    pub fn is_genuine(&self) -> bool {
        matches!(self, Self::Genuine(_))
    }
}

/// Finds speaker cues and filters false positives
#[derive(Debug, Clone)]
pub struct SpeakerExtractor {
    denylist: HashSet<String>,
    policy: DenylistPolicy,
}

impl SpeakerExtractor {
    /// Create an extractor over the given denylist entries
    pub fn new<I, S>(denylist: I, policy: DenylistPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            denylist: denylist
                .into_iter()
                .map(|name| normalize_name(name.as_ref()))
                .filter(|name| !name.is_empty())
                .collect(),
            policy,
        }
    }

    /// Create an extractor from the speaker section of the configuration
    pub fn from_config(config: &SpeakerConfig) -> Self {
        Self::new(config.denylist(), config.denylist_policy)
    }

    /// Create with the built-in denylist.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_FALSE_POSITIVE_NAMES.iter(), DenylistPolicy::default())
    }

    /// Whether `name` is a known false positive
    pub fn is_denied(&self, name: &str) -> bool {
        self.denylist.contains(&normalize_name(name))
    }

    pub fn policy(&self) -> DenylistPolicy {
        self.policy
    }

    /// Scan a line for cues, left to right.
    ///
    /// With `DenylistPolicy::StopScanning` a denylisted cue is reported as the
    /// final `Cue::Denied`; with `SkipCue` it is left out and scanning goes on.
    pub fn scan(&self, text: &str) -> Vec<Cue> {
        let mut cues = Vec::new();

        for caps in SPEAKER_CUE_REGEX.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let mut cue = SpeakerCue {
                full_match: whole.as_str().to_string(),
                name: name.as_str().trim().to_string(),
                start: whole.start(),
                end: whole.end(),
            };
            if !self.is_denied(&cue.name) {
                cue = self.strip_lead_in(text, cue);
            }

            if self.is_denied(&cue.name) {
                trace!("Rejected speaker cue '{}' at byte {}", cue.name, cue.start);
                match self.policy {
                    DenylistPolicy::StopScanning => {
                        cues.push(Cue::Denied(cue));
                        break;
                    }
                    DenylistPolicy::SkipCue => continue,
                }
            }

            cues.push(Cue::Genuine(cue));
        }

        cues
    }

    /// Drop space-joined leading words that belong to the preceding sentence.
    /// At least one token always remains; `&`/`and` groups are left whole.
    fn strip_lead_in(&self, text: &str, mut cue: SpeakerCue) -> SpeakerCue {
        loop {
            let Some(token) = LEADING_TOKEN_REGEX.find(&cue.name) else {
                return cue;
            };
            let rest = &cue.name[token.end()..];
            let joins_name = rest.chars().next().is_some_and(char::is_uppercase);
            let word = normalize_name(token.as_str());
            if !joins_name || !(self.is_denied(&word) || LEAD_IN_WORDS.contains(&word.as_str())) {
                return cue;
            }

            trace!("Dropped lead-in '{}' from speaker cue '{}'", word, cue.name);
            cue.start += token.end();
            cue.name = rest.to_string();
            cue.full_match = text[cue.start..cue.end].to_string();
        }
    }

    /// Genuine cues only
    pub fn find_speaker_cues(&self, text: &str) -> Vec<SpeakerCue> {
        self.scan(text)
            .into_iter()
            .filter_map(|cue| match cue {
                Cue::Genuine(cue) => Some(cue),
                Cue::Denied(_) => None,
            })
            .collect()
    }

    /// Distinct genuine speaker names across dialogue lines, in order of first appearance
    pub fn collect_speakers<I, S>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut speakers = Vec::new();

        for line in lines {
            let line = line.as_ref();
            if classify(line) != LineKind::Dialogue {
                continue;
            }
            for cue in self.find_speaker_cues(line) {
                if seen.insert(cue.name.clone()) {
                    speakers.push(cue.name);
                }
            }
        }

        speakers
    }
}

impl Default for SpeakerExtractor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Upper-case and collapse internal whitespace
fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
