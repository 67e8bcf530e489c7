/*!
 * Common test utilities for the scriptsmith test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use scriptsmith::app_config::Config;
use scriptsmith::document::{write_document, Paragraph, Run, ScriptDocument};

/// A short transcript with numbers, timecodes, tags and speakers
pub const SAMPLE_TRANSCRIPT: &str = "1
00:00:01,000 --> 00:00:04,500
Ethan: Hello there.

2
00:00:05,000 --> 00:00:08,000
Ethan: Hi. Leo: Hey!

3
00:00:09,000 --> 00:00:12,000
OH NO: this isn't real

4
00:00:13,000 --> 00:00:15,000
It was <i>whispered</i> quietly.
";

/// Routes library logs to the test output; RUST_LOG selects the level
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates the sample transcript as an .srt file
pub fn create_test_transcript(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_TRANSCRIPT)
}

/// Creates a .docx file holding one paragraph per line
pub fn create_test_docx(dir: &Path, filename: &str, lines: &[&str]) -> Result<PathBuf> {
    let mut document = ScriptDocument::new();
    for line in lines {
        document.add_paragraph(Paragraph::new().add_run(Run::text(*line)));
    }
    let file_path = dir.join(filename);
    fs::write(&file_path, write_document(&document)?)?;
    Ok(file_path)
}

/// Default configuration with a fixed color seed
pub fn seeded_config() -> Config {
    let mut config = Config::default();
    config.colors.seed = Some(42);
    config
}
