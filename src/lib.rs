/*!
 * # scriptsmith - Subtitle transcripts to formatted scripts
 *
 * A Rust library that turns SRT-derived subtitle transcripts into readable,
 * speaker-attributed script documents.
 *
 * ## Features
 *
 * - Drop subtitle sequence numbers, keep timecodes as bold headers
 * - Detect "Name:" speaker cues, including several per line
 * - Filter name-shaped false positives ("OH NO:", "SCENE:") through a denylist
 * - Give each speaker a stable color for the whole document
 * - Render `<b>`, `<i>` and `<u>` subtitle tags as emphasis
 * - Read and write .docx documents
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `script`: the transformation pipeline:
 *   - `script::line_classifier`: line kinds
 *   - `script::speakers`: speaker cue extraction
 *   - `script::colors`: speaker color registry
 *   - `script::markup`: inline emphasis
 *   - `script::splitter`: dialogue splitting
 *   - `script::assembler`: block assembly and document layout
 * - `document`: rich document model and the .docx codec
 * - `app_config`: Configuration management
 * - `file_utils`: Transcript discovery, reading and output naming
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod script;

// Re-export main types for easier usage
pub use app_config::{ColorMode, Config, FormattingStyle};
pub use app_controller::{ConversionSummary, Controller, FolderReport};
pub use document::ScriptDocument;
pub use errors::{AppError, ConfigError, ConversionError, DocumentError};
pub use script::{AssemblyOutput, ScriptAssembler};
