use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::document::docx;
use crate::errors::ConversionError;
use crate::file_utils::FileManager;
use crate::script::ScriptAssembler;

// @module: Application controller for transcript conversion

/// Outcome of one converted file
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub title: String,
    pub speakers: Vec<String>,
    pub paragraphs: usize,
}

/// Result of a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderReport {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for transcript conversion
pub struct Controller {
    // @field: App configuration
    config: Arc<Config>,
}

impl Controller {
    /// Create a controller with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Convert one transcript into a script document.
    ///
    /// The whole document is serialized before the output file is touched, so a
    /// failed conversion never leaves a partial file behind.
    pub fn convert_file(config: &Config, input_file: &Path, output_dir: &Path) -> std::result::Result<ConversionSummary, ConversionError> {
        let lines = FileManager::read_raw_lines(input_file)?;
        let seed = FileManager::title_seed(input_file);

        let mut assembler = ScriptAssembler::new(config.clone());
        let (document, output) = assembler.convert(&lines, &seed);
        let bytes = docx::write_document(&document)?;

        let output_path = FileManager::output_path(input_file, output_dir, &config.output.prefix);
        FileManager::write_bytes(&output_path, &bytes)?;

        Ok(ConversionSummary {
            input: input_file.to_path_buf(),
            output: output_path,
            title: output.title,
            speakers: output.speakers,
            paragraphs: document.paragraphs().len(),
        })
    }

    /// Convert a single file into output_dir.
    /// Returns None when the output exists and force_overwrite is off.
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<Option<ConversionSummary>> {
        let start_time = std::time::Instant::now();

        if !input_file.is_file() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        FileManager::ensure_dir(&output_dir)?;

        let output_path = FileManager::output_path(&input_file, &output_dir, &self.config.output.prefix);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, {} already exists (use -f to force overwrite)", output_path.display());
            return Ok(None);
        }

        let config = Arc::clone(&self.config);
        let input = input_file.clone();
        let summary = tokio::task::spawn_blocking(move || Self::convert_file(&config, &input, &output_dir))
            .await
            .context("Conversion task panicked")?
            .with_context(|| format!("Failed to convert {}", input_file.display()))?;

        info!(
            "Success: {} ({} speakers) in {}",
            summary.output.display(),
            summary.speakers.len(),
            Self::format_duration(start_time.elapsed())
        );
        Ok(Some(summary))
    }

    /// Convert every transcript under input_dir, next to its source file.
    /// Transcripts that already have a script are skipped unless force_overwrite is set.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderReport> {
        let start_time = std::time::Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let prefix = self.config.output.prefix.clone();
        let transcripts = FileManager::find_transcripts(&input_dir, &prefix)?;
        if transcripts.is_empty() {
            return Err(anyhow!("No transcripts found in directory: {:?}", input_dir));
        }

        let mut report = FolderReport::default();
        let mut pending = Vec::new();
        // Output path -> transcript that claimed it; transcripts are sorted, so the first one wins
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
        for transcript in transcripts {
            let output_dir = transcript
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| input_dir.clone());
            let output_path = FileManager::output_path(&transcript, &output_dir, &prefix);
            if let Some(owner) = claimed.get(&output_path) {
                error!(
                    "Not converting {}: its script {} would overwrite the one from {}",
                    transcript.display(),
                    output_path.display(),
                    owner.display()
                );
                report.failed += 1;
                continue;
            }
            claimed.insert(output_path.clone(), transcript.clone());

            if output_path.exists() && !force_overwrite {
                debug!("Skipping {}, script already exists", transcript.display());
                report.skipped += 1;
            } else {
                pending.push((transcript, output_dir));
            }
        }

        let folder_pb = ProgressBar::new(pending.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Converting transcripts");

        let limit = self.config.output.max_concurrent_files.max(1);
        let mut results = stream::iter(pending)
            .map(|(transcript, output_dir)| {
                let config = Arc::clone(&self.config);
                async move {
                    let input = transcript.clone();
                    let result = tokio::task::spawn_blocking(move || Self::convert_file(&config, &input, &output_dir)).await;
                    (transcript, result)
                }
            })
            .buffer_unordered(limit);

        while let Some((transcript, result)) = results.next().await {
            let file_name = transcript
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            match result {
                Ok(Ok(summary)) => {
                    debug!("Converted {} -> {}", file_name, summary.output.display());
                    report.converted += 1;
                }
                Ok(Err(e)) => {
                    error!("Error converting {}: {}", file_name, e);
                    report.failed += 1;
                }
                Err(e) => {
                    error!("Conversion task for {} failed: {}", file_name, e);
                    report.failed += 1;
                }
            }
            folder_pb.set_message(file_name);
            folder_pb.inc(1);
        }
        folder_pb.finish_with_message("Folder conversion complete");

        info!(
            "Folder conversion completed: {} converted, {} skipped, {} errors in {}",
            report.converted,
            report.skipped,
            report.failed,
            Self::format_duration(start_time.elapsed())
        );
        Ok(report)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
