/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;

use furisub::errors::{AppError, Diagnostic, EmitError, InputError};

#[test]
fn test_emitError_artifactCountMismatch_shouldDisplayCounts() {
    let error = EmitError::ArtifactCountMismatch { expected: 3, actual: 2 };
    let display = format!("{}", error);
    assert!(display.contains("expected 3"));
    assert!(display.contains("found 2"));
}

#[test]
fn test_inputError_read_shouldDisplayPath() {
    let error = InputError::Read {
        path: PathBuf::from("subs/a.srt"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    };
    let display = format!("{}", error);
    assert!(display.contains("subs/a.srt"));
    assert!(display.contains("missing"));
}

#[test]
fn test_appError_fromInputError_shouldWrap() {
    let error: AppError = InputError::MalformedDocument {
        path: PathBuf::from("c.json"),
        message: "expected array".to_string(),
    }
    .into();

    assert!(matches!(error, AppError::Input(_)));
    assert!(error.to_string().contains("expected array"));
}

#[test]
fn test_appError_fromEmitError_shouldWrap() {
    let error: AppError = EmitError::Font("no glyphs".to_string()).into();
    assert!(matches!(error, AppError::Emit(EmitError::Font(_))));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(error, AppError::Unknown(ref message) if message == "boom"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let error: AppError = std::io::Error::other("disk full").into();
    assert!(matches!(error, AppError::File(_)));
}

#[test]
fn test_diagnostic_display_shouldDescribeCondition() {
    let mismatch = Diagnostic::LengthMismatch { content_units: 5, intervals: 3 };
    assert!(mismatch.to_string().contains("truncating to 3"));

    let unsupported = Diagnostic::UnsupportedCharacter('犬');
    assert!(unsupported.to_string().contains('犬'));

    let markup = Diagnostic::MalformedMarkup { tag: "<b>".to_string() };
    assert!(markup.to_string().contains("<b>"));
}
