/*!
 * Tests for folder mode conversion
 */

use anyhow::Result;
use std::fs;

use scriptsmith::document::read_paragraphs;
use scriptsmith::Controller;
use crate::common;

/// Test that every transcript in a folder tree gets its own script
#[tokio::test]
async fn test_run_folder_withNestedTranscripts_shouldConvertAll() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season1");
    fs::create_dir_all(&nested)?;

    common::create_test_transcript(temp_dir.path(), "ep1.srt")?;
    common::create_test_transcript(&nested, "ep2.txt")?;
    common::create_test_docx(&nested, "ep3.docx", &["Maya: Hello.", "Jo: Hi."])?;

    let mut config = common::seeded_config();
    config.output.max_concurrent_files = 2;
    let controller = Controller::with_config(config)?;

    let report = controller.run_folder(temp_dir.path().to_path_buf(), false).await?;
    assert_eq!(report.converted, 3);
    assert_eq!(report.failed, 0);

    assert!(temp_dir.path().join("FORMATTED_ep1.docx").exists());
    assert!(nested.join("FORMATTED_ep2.docx").exists());
    assert!(nested.join("FORMATTED_ep3.docx").exists());

    // A second run skips everything and never picks up its own outputs
    let again = controller.run_folder(temp_dir.path().to_path_buf(), false).await?;
    assert_eq!(again.converted, 0);
    assert_eq!(again.skipped, 3);
    Ok(())
}

/// Test that one broken file does not stop the others
#[tokio::test]
async fn test_run_folder_withBrokenFile_shouldReportFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_transcript(temp_dir.path(), "good.srt")?;
    common::create_test_file(temp_dir.path(), "bad.docx", "not a document")?;

    let controller = Controller::with_config(common::seeded_config())?;
    let report = controller.run_folder(temp_dir.path().to_path_buf(), false).await?;

    assert_eq!(report.converted, 1);
    assert_eq!(report.failed, 1);
    assert!(!temp_dir.path().join("FORMATTED_bad.docx").exists());
    Ok(())
}

/// Test that a folder without transcripts is an error
#[tokio::test]
async fn test_run_folder_withoutTranscripts_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "movie.mkv", "")?;

    let controller = Controller::with_config(common::seeded_config())?;
    assert!(controller.run_folder(temp_dir.path().to_path_buf(), false).await.is_err());
    Ok(())
}

/// Test that two transcripts sharing a stem never write the same script
#[tokio::test]
async fn test_run_folder_withSharedStem_shouldConvertOnlyFirst() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_docx(temp_dir.path(), "pilot.docx", &["Maya: From the document."])?;
    common::create_test_file(temp_dir.path(), "pilot.srt", "Jo: From the subtitles.")?;

    let controller = Controller::with_config(common::seeded_config())?;
    let report = controller.run_folder(temp_dir.path().to_path_buf(), true).await?;

    assert_eq!(report.converted, 1);
    assert_eq!(report.failed, 1);

    let output = temp_dir.path().join("FORMATTED_pilot.docx");
    let paragraphs = read_paragraphs(&fs::read(output)?)?;
    assert!(paragraphs.iter().any(|p| p.contains("From the document.")));
    assert!(!paragraphs.iter().any(|p| p.contains("From the subtitles.")));
    Ok(())
}
