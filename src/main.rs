// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use scriptsmith::app_config::{self, ColorMode, Config};
use scriptsmith::errors::{ConversionError, DocumentError};
use scriptsmith::Controller;

/// CLI Wrapper for ColorMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliColorMode {
    Text,
    Highlight,
    Paired,
}

impl From<CliColorMode> for ColorMode {
    fn from(cli_mode: CliColorMode) -> Self {
        match cli_mode {
            CliColorMode::Text => ColorMode::TextOnly,
            CliColorMode::Highlight => ColorMode::HighlightOnly,
            CliColorMode::Paired => ColorMode::Paired,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a transcript or a folder of transcripts (default command)
    #[command(alias = "format")]
    Convert(ConvertArgs),

    /// Generate shell completions for scriptsmith
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Transcript file (.docx, .srt, .txt) or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Directory for the produced script (defaults to the input's directory)
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// How speaker names are colored
    #[arg(long, value_enum)]
    color_mode: Option<CliColorMode>,

    /// Seed for reproducible speaker colors
    #[arg(long)]
    seed: Option<u64>,

    /// Leave out the "Speakers:" roster under the title
    #[arg(long)]
    no_roster: bool,
}

/// scriptsmith - subtitle transcripts to formatted scripts
///
/// Turns SRT-derived transcripts into speaker-attributed script documents.
#[derive(Parser, Debug)]
#[command(name = "scriptsmith")]
#[command(version)]
#[command(about = "Subtitle transcript to script document converter")]
#[command(long_about = "scriptsmith turns SRT-derived subtitle transcripts into formatted script documents.

EXAMPLES:
    scriptsmith episode1.docx                      # Convert using default config
    scriptsmith -f episode1.srt                    # Force overwrite existing output
    scriptsmith --color-mode highlight ep1.docx    # Highlight speaker names
    scriptsmith --seed 7 ep1.docx                  # Reproducible speaker colors
    scriptsmith convert ep1.docx -o scripts/       # Write into another directory
    scriptsmith --log-level debug /transcripts/    # Process an entire directory
    scriptsmith completions bash > scriptsmith.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Transcript file (.docx, .srt, .txt) or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Directory for the produced script (defaults to the input's directory)
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// How speaker names are colored
    #[arg(long, value_enum)]
    color_mode: Option<CliColorMode>,

    /// Seed for reproducible speaker colors
    #[arg(long)]
    seed: Option<u64>,

    /// Leave out the "Speakers:" roster under the title
    #[arg(long)]
    no_roster: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{:#}", e);
        if is_input_problem(&e) {
            error!("Please check the formatting of your input file.");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Install the logger accepting every level, then filter through the
    // global max level, which is updated after loading the config
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "scriptsmith", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args).await,
        None => {
            // Default behavior - top-level args
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let convert_args = ConvertArgs {
                input_path,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                config_path: cli.config_path,
                log_level: cli.log_level,
                color_mode: cli.color_mode,
                seed: cli.seed,
                no_roster: cli.no_roster,
            };
            run_convert(convert_args).await
        }
    }
}

async fn run_convert(options: ConvertArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.as_level_filter());
    }

    let config_path = Path::new(&options.config_path);
    let (mut config, created) = Config::load_or_create(config_path)?;
    if created {
        warn!("Config file not found at '{}', created default config.", options.config_path);
    }

    apply_overrides(&mut config, &options);

    // Validate the configuration after loading and overriding
    config.validate()?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.as_level_filter());
    }

    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        let output_dir = options.output_dir.clone().unwrap_or_else(|| {
            options
                .input_path
                .parent()
                .unwrap_or(Path::new("."))
                .to_path_buf()
        });
        if let Some(summary) = controller
            .run(options.input_path.clone(), output_dir, options.force_overwrite)
            .await?
        {
            info!("Speakers: {}", summary.speakers.join(", "));
        }
    } else if options.input_path.is_dir() {
        if options.output_dir.is_some() {
            warn!("--output-dir is ignored in folder mode; scripts are written next to their transcripts");
        }
        let report = controller
            .run_folder(options.input_path.clone(), options.force_overwrite)
            .await?;
        if report.failed > 0 {
            return Err(anyhow!("{} of the transcripts could not be converted", report.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, options: &ConvertArgs) {
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(color_mode) = &options.color_mode {
        config.style.color_mode = color_mode.clone().into();
    }
    if let Some(seed) = options.seed {
        config.colors.seed = Some(seed);
    }
    if options.no_roster {
        config.title.include_roster = false;
    }
}

// @checks: Whether a failure came from unreadable input
fn is_input_problem(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<ConversionError>(),
            Some(ConversionError::Document(DocumentError::InputFormat(_)) | ConversionError::UnsupportedInput(_))
        ) || matches!(cause.downcast_ref::<DocumentError>(), Some(DocumentError::InputFormat(_)))
    })
}
