/*!
 * End-to-end tests for single file conversion
 */

use anyhow::Result;
use std::fs;
use std::io::{Cursor, Read};

use scriptsmith::app_config::ColorMode;
use scriptsmith::document::read_paragraphs;
use scriptsmith::Controller;
use crate::common;

fn main_part(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Test converting a .docx transcript into a formatted script
#[test]
fn test_convert_file_withDocxTranscript_shouldWriteScript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let lines: Vec<&str> = common::SAMPLE_TRANSCRIPT.lines().collect();
    let input = common::create_test_docx(temp_dir.path(), "pilot_transcript.docx", &lines)?;

    let config = common::seeded_config();
    let summary = Controller::convert_file(&config, &input, temp_dir.path())?;

    assert_eq!(summary.output, temp_dir.path().join("FORMATTED_pilot_transcript.docx"));
    assert_eq!(summary.title, "PILOT");
    assert_eq!(summary.speakers, vec!["Ethan", "Leo"]);

    let bytes = fs::read(&summary.output)?;
    let paragraphs = read_paragraphs(&bytes)?;
    assert_eq!(paragraphs[0], "PILOT");
    assert_eq!(paragraphs[1], "Speakers: Ethan, Leo");
    assert!(paragraphs.iter().all(|p| p != "1" && p != "2"));
    assert!(paragraphs.iter().any(|p| p == "Ethan: \tHello there."));
    assert!(paragraphs.iter().any(|p| p == "OH NO: this isn't real"));
    assert!(paragraphs.iter().any(|p| p == "It was whispered quietly."));

    let xml = main_part(&bytes)?;
    assert!(xml.contains(r#"<w:jc w:val="center"/>"#));
    assert!(xml.contains("<w:i/>"));
    assert!(xml.contains("<w:color w:val="));
    Ok(())
}

/// Test converting an .srt transcript with highlight mode
#[test]
fn test_convert_file_withSrtAndHighlightMode_shouldShadeNames() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_transcript(temp_dir.path(), "pilot.srt")?;

    let mut config = common::seeded_config();
    config.style.color_mode = ColorMode::HighlightOnly;
    let summary = Controller::convert_file(&config, &input, temp_dir.path())?;

    let xml = main_part(&fs::read(&summary.output)?)?;
    assert!(xml.contains("<w:shd "));
    assert!(!xml.contains("<w:color "));
    Ok(())
}

/// Test that a broken input leaves no output file behind
#[test]
fn test_convert_file_withCorruptInput_shouldNotWriteOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "broken.docx", "garbage")?;

    let result = Controller::convert_file(&common::seeded_config(), &input, temp_dir.path());
    assert!(result.is_err());
    assert!(!temp_dir.path().join("FORMATTED_broken.docx").exists());
    Ok(())
}

/// Test that an existing output is skipped unless forced
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_transcript(temp_dir.path(), "pilot.srt")?;
    let output = common::create_test_file(temp_dir.path(), "FORMATTED_pilot.docx", "old")?;

    let controller = Controller::with_config(common::seeded_config())?;

    let skipped = controller.run(input.clone(), temp_dir.path().to_path_buf(), false).await?;
    assert!(skipped.is_none());
    assert_eq!(fs::read_to_string(&output)?, "old");

    let converted = controller.run(input, temp_dir.path().to_path_buf(), true).await?;
    assert!(converted.is_some());
    assert!(read_paragraphs(&fs::read(&output)?).is_ok());
    Ok(())
}

/// Test that an empty transcript still produces a titled document
#[test]
fn test_run_withEmptyTranscript_shouldProduceTitleOnly() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "empty.txt", "")?;
    let output_dir = temp_dir.path().to_path_buf();

    let controller = Controller::with_config(common::seeded_config())?;
    let summary = tokio_test::block_on(async { controller.run(input, output_dir, false).await })?
        .expect("output should be written");

    assert_eq!(summary.paragraphs, 1);
    assert_eq!(read_paragraphs(&fs::read(&summary.output)?)?, vec!["EMPTY"]);
    Ok(())
}
