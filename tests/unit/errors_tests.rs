/*!
 * Tests for error types and conversions
 */

use scriptsmith::errors::{AppError, ConfigError, ConversionError, DocumentError};

#[test]
fn test_documentError_inputFormat_shouldDisplayCorrectly() {
    let error = DocumentError::InputFormat("missing word/document.xml".to_string());
    let display = format!("{}", error);
    assert!(display.contains("not a valid document"));
    assert!(display.contains("missing word/document.xml"));
}

#[test]
fn test_documentError_fromZipError_shouldBeInputFormat() {
    let error: DocumentError = zip::result::ZipError::InvalidArchive("bad header".into()).into();
    assert!(matches!(error, DocumentError::InputFormat(_)));
}

#[test]
fn test_configError_invalid_shouldDisplayFieldAndMessage() {
    let error = ConfigError::invalid("style.font_size_pt", "must be positive");
    let display = format!("{}", error);
    assert!(display.contains("style.font_size_pt"));
    assert!(display.contains("must be positive"));
}

#[test]
fn test_conversionError_fromDocumentError_shouldWrap() {
    let error: ConversionError = DocumentError::Write("disk full".to_string()).into();
    assert!(matches!(error, ConversionError::Document(DocumentError::Write(_))));
    assert!(format!("{}", error).contains("disk full"));
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let error: AppError = io.into();
    assert!(matches!(error, AppError::File(_)));
}

#[test]
fn test_appError_fromAnyhow_shouldBeUnknown() {
    let error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(error, AppError::Unknown(ref message) if message == "boom"));
}

#[test]
fn test_appError_fromConversionError_shouldWrap() {
    let error: AppError = ConversionError::UnsupportedInput("movie.mkv".to_string()).into();
    assert!(format!("{}", error).contains("movie.mkv"));
}
