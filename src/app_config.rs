use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::ConfigError;
use crate::script::speakers::DEFAULT_FALSE_POSITIVE_NAMES;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Speaker detection settings
    #[serde(default)]
    pub speakers: SpeakerConfig,

    /// Speaker color palette settings
    #[serde(default)]
    pub colors: ColorConfig,

    /// Typography and layout of the produced script
    #[serde(default)]
    pub style: FormattingStyle,

    /// Title and roster settings
    #[serde(default)]
    pub title: TitleConfig,

    /// Output naming and batch settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// How speakers are marked in the output
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    // @mode: Speaker name drawn in its assigned font color
    #[default]
    TextOnly,
    // @mode: Speaker name shaded with its assigned highlight color
    HighlightOnly,
    // @mode: Font color plus matching highlight shading
    Paired,
}

impl ColorMode {
    // @returns: Stable lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextOnly => "text_only",
            Self::HighlightOnly => "highlight_only",
            Self::Paired => "paired",
        }
    }

    /// Whether the speaker's text color is applied to the name run
    pub fn uses_text_color(&self) -> bool {
        matches!(self, Self::TextOnly | Self::Paired)
    }

    /// Whether the speaker's highlight color is applied to the name run
    pub fn uses_highlight(&self) -> bool {
        matches!(self, Self::HighlightOnly | Self::Paired)
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ColorMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "text_only" | "text" => Ok(Self::TextOnly),
            "highlight_only" | "highlight" => Ok(Self::HighlightOnly),
            "paired" => Ok(Self::Paired),
            _ => Err(anyhow!("Invalid color mode: {}", s)),
        }
    }
}

/// How many tabs separate a speaker name from its dialogue
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TabPolicy {
    /// Always a single tab
    Single,
    /// A second tab when the name reaches the tab stop
    #[default]
    ByNameWidth,
}

/// What happens to the rest of a line once a denylisted cue is found
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DenylistPolicy {
    /// Stop looking for speakers; the remainder is continuation text
    #[default]
    StopScanning,
    /// Reject only the offending cue and keep scanning
    SkipCue,
}

/// Speaker detection configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpeakerConfig {
    /// Name-shaped phrases that are never speakers (compared upper-cased)
    #[serde(default = "default_false_positive_names")]
    pub false_positive_names: Vec<String>,

    /// Additional phrases appended to the denylist
    #[serde(default)]
    pub extra_false_positive_names: Vec<String>,

    /// Behavior after a denylisted cue
    #[serde(default)]
    pub denylist_policy: DenylistPolicy,
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            false_positive_names: default_false_positive_names(),
            extra_false_positive_names: Vec::new(),
            denylist_policy: DenylistPolicy::default(),
        }
    }
}

impl SpeakerConfig {
    /// Full denylist: the base list followed by the extra entries
    pub fn denylist(&self) -> impl Iterator<Item = &str> {
        self.false_positive_names
            .iter()
            .chain(self.extra_false_positive_names.iter())
            .map(String::as_str)
    }
}

/// Speaker color palette configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ColorConfig {
    /// Number of palette colors; values above the built-in palette are generated
    #[serde(default = "default_palette_size")]
    pub palette_size: usize,

    /// Seed for shuffling and generation, random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            palette_size: default_palette_size(),
            seed: None,
        }
    }
}

/// Typography and layout applied to every produced script
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FormattingStyle {
    /// How speaker names are colored
    #[serde(default)]
    pub color_mode: ColorMode,

    /// Font family for every run
    #[serde(default = "default_font_name")]
    pub font_name: String,

    /// Body font size in points
    #[serde(default = "default_font_size_pt")]
    pub font_size_pt: f32,

    /// Title font size in points
    #[serde(default = "default_title_size_pt")]
    pub title_size_pt: f32,

    /// Space after each non-title paragraph in points
    #[serde(default = "default_paragraph_spacing_pt")]
    pub paragraph_spacing_pt: f32,

    /// Line spacing multiplier for non-title paragraphs
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,

    /// Tab count policy between speaker name and dialogue
    #[serde(default)]
    pub tab_policy: TabPolicy,

    /// Position of the dialogue tab stop in twips
    #[serde(default = "default_tab_stop_twips")]
    pub tab_stop_twips: u32,

    /// Whether dialogue paragraphs use a hanging indent at the tab stop
    #[serde(default = "default_true")]
    pub hanging_indent: bool,

    /// Whether a page number footer is written
    #[serde(default = "default_true")]
    pub page_numbers: bool,
}

impl Default for FormattingStyle {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::default(),
            font_name: default_font_name(),
            font_size_pt: default_font_size_pt(),
            title_size_pt: default_title_size_pt(),
            paragraph_spacing_pt: default_paragraph_spacing_pt(),
            line_spacing: default_line_spacing(),
            tab_policy: TabPolicy::default(),
            tab_stop_twips: default_tab_stop_twips(),
            hanging_indent: true,
            page_numbers: true,
        }
    }
}

/// Title derivation and roster settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TitleConfig {
    /// Prefixes and suffixes stripped from the file name, case-insensitively
    #[serde(default = "default_title_decorations")]
    pub decorations: Vec<String>,

    /// Whether a "Speakers:" roster follows the title
    #[serde(default = "default_true")]
    pub include_roster: bool,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            decorations: default_title_decorations(),
            include_roster: true,
        }
    }
}

/// Output naming and batch settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Prefix of produced file names
    #[serde(default = "default_output_prefix")]
    pub prefix: String,

    /// Maximum files converted at once in folder mode
    #[serde(default = "default_max_concurrent_files")]
    pub max_concurrent_files: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: default_output_prefix(),
            max_concurrent_files: default_max_concurrent_files(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn as_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_false_positive_names() -> Vec<String> {
    DEFAULT_FALSE_POSITIVE_NAMES
        .iter()
        .map(|name| name.to_string())
        .collect()
}

fn default_palette_size() -> usize {
    20
}

fn default_font_name() -> String {
    "Times New Roman".to_string()
}

fn default_font_size_pt() -> f32 {
    12.0
}

fn default_title_size_pt() -> f32 {
    16.0
}

fn default_paragraph_spacing_pt() -> f32 {
    6.0
}

fn default_line_spacing() -> f32 {
    1.0
}

fn default_tab_stop_twips() -> u32 {
    1440 // one inch
}

fn default_true() -> bool {
    true
}

fn default_title_decorations() -> Vec<String> {
    ["FORMATTED_", "_transcript", "_subtitles", ".srt", ".docx", ".txt"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

fn default_output_prefix() -> String {
    "FORMATTED_".to_string()
}

fn default_max_concurrent_files() -> usize {
    4
}

impl Config {
    /// Load a configuration file, or write the defaults there when it does not exist
    pub fn load_or_create(path: &Path) -> Result<(Self, bool)> {
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok((config, false));
        }

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok((config, true))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let style = &self.style;

        if style.font_name.trim().is_empty() {
            return Err(ConfigError::invalid("style.font_name", "must not be empty"));
        }
        if !(style.font_size_pt > 0.0) {
            return Err(ConfigError::invalid("style.font_size_pt", "must be positive"));
        }
        if !(style.title_size_pt > 0.0) {
            return Err(ConfigError::invalid("style.title_size_pt", "must be positive"));
        }
        if !(style.paragraph_spacing_pt >= 0.0) {
            return Err(ConfigError::invalid("style.paragraph_spacing_pt", "must not be negative"));
        }
        if !(0.5..=3.0).contains(&style.line_spacing) {
            return Err(ConfigError::invalid(
                "style.line_spacing",
                format!("{} is outside 0.5..=3.0", style.line_spacing),
            ));
        }
        if style.tab_stop_twips == 0 {
            return Err(ConfigError::invalid("style.tab_stop_twips", "must be positive"));
        }
        if self.colors.palette_size == 0 {
            return Err(ConfigError::invalid("colors.palette_size", "must be at least 1"));
        }
        if self.output.max_concurrent_files == 0 {
            return Err(ConfigError::invalid("output.max_concurrent_files", "must be at least 1"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            speakers: SpeakerConfig::default(),
            colors: ColorConfig::default(),
            style: FormattingStyle::default(),
            title: TitleConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
