use anyhow::{Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::document::docx;
use crate::errors::ConversionError;

// @module: Transcript discovery, reading and output naming

/// Extension of every produced script
pub const OUTPUT_EXTENSION: &str = "docx";

static SRT_CUE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+\s*\r?\n\d{2}:\d{2}:\d{2},\d{3}\s+-->\s+\d{2}:\d{2}:\d{2},\d{3}")
        .expect("Invalid SRT cue regex")
});

/// Kind of a transcript input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Word document holding the transcript as paragraphs
    Docx,
    /// Raw SubRip file
    Srt,
    /// Any other plain text transcript
    Text,
}

impl InputKind {
    // @returns: Kind for a known extension, None otherwise
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "docx" => Some(Self::Docx),
            "srt" => Some(Self::Srt),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Detect the kind of a transcript file, by extension first, then by content
    pub fn detect_input_kind<P: AsRef<Path>>(path: P) -> std::result::Result<InputKind, ConversionError> {
        let path = path.as_ref();
        if let Some(kind) = InputKind::from_extension(path) {
            return Ok(kind);
        }

        let bytes = fs::read(path)?;
        if bytes.starts_with(b"PK\x03\x04") {
            return Ok(InputKind::Docx);
        }
        if let Ok(text) = std::str::from_utf8(&bytes) {
            if SRT_CUE_REGEX.is_match(text) {
                return Ok(InputKind::Srt);
            }
        }

        Err(ConversionError::UnsupportedInput(format!(
            "{} is neither a .docx document nor an SRT transcript",
            path.display()
        )))
    }

    /// Read the raw transcript lines of a file, one entry per paragraph or text line
    pub fn read_raw_lines<P: AsRef<Path>>(path: P) -> std::result::Result<Vec<String>, ConversionError> {
        let path = path.as_ref();
        let kind = Self::detect_input_kind(path)?;
        let bytes = fs::read(path)?;

        let lines = match kind {
            InputKind::Docx => docx::read_paragraphs(&bytes)?,
            InputKind::Srt | InputKind::Text => {
                let text = match String::from_utf8(bytes) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("{} is not valid UTF-8, replacing invalid bytes", path.display());
                        String::from_utf8_lossy(e.as_bytes()).into_owned()
                    }
                };
                Self::split_lines(&text)
            }
        };

        debug!("Read {} raw lines from {:?} ({:?})", lines.len(), path, kind);
        Ok(lines)
    }

    /// Split text into lines, dropping a byte order mark and carriage returns
    pub fn split_lines(text: &str) -> Vec<String> {
        text.trim_start_matches('\u{feff}')
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect()
    }

    /// Whether a path is a script this tool produced
    pub fn is_formatted_output<P: AsRef<Path>>(path: P, prefix: &str) -> bool {
        !prefix.is_empty()
            && path
                .as_ref()
                .file_name()
                .map(|name| name.to_string_lossy().starts_with(prefix))
                .unwrap_or(false)
    }

    /// Find convertible transcripts under a directory, skipping produced scripts
    pub fn find_transcripts<P: AsRef<Path>>(dir: P, prefix: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file()
                && InputKind::from_extension(path).is_some()
                && !Self::is_formatted_output(path, prefix)
            {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    // @generates: Output path "<prefix><stem>.docx" inside output_dir
    pub fn output_path<P1: AsRef<Path>, P2: AsRef<Path>>(input_file: P1, output_dir: P2, prefix: &str) -> PathBuf {
        let stem = Self::title_seed(input_file);
        output_dir
            .as_ref()
            .join(format!("{}{}.{}", prefix, stem, OUTPUT_EXTENSION))
    }

    // @returns: File stem used to derive the script title
    pub fn title_seed<P: AsRef<Path>>(path: P) -> String {
        path.as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Write bytes to a file, creating the parent directory if needed.
    /// Bytes go to a temporary file in the same directory which is then renamed
    /// over the target, so the target is either complete or untouched.
    pub fn write_bytes<P: AsRef<Path>>(path: P, bytes: &[u8]) -> std::result::Result<(), ConversionError> {
        let path = path.as_ref();
        let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent,
            None => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
