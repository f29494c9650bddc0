/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;
use wikitrans::errors::{AppError, PipelineError, PipelineErrors};

#[test]
fn test_pipelineError_display_shouldUseOneBasedLineNumbers() {
    let error = PipelineError::MissingTranslation {
        document: "god.md".to_string(),
        line: 4,
    };
    assert_eq!(error.to_string(), "god.md line 5: translation missing");
}

#[test]
fn test_pipelineError_structuralMismatch_shouldNameReferenceAndCounts() {
    let error = PipelineError::StructuralMismatch {
        document: "god.md".to_string(),
        line: 0,
        reference: "3:2.1-2".to_string(),
        lines: 1,
        paragraphs: 2,
    };
    let display = error.to_string();
    assert!(display.contains("3:2.1-2"));
    assert!(display.contains("1 content lines"));
    assert!(display.contains("2 paragraphs"));
}

#[test]
fn test_pipelineError_document_shouldOnlyBeSetForDocumentErrors() {
    let scoped = PipelineError::PlaceholderUnresolved {
        document: "a.md".to_string(),
        line: 1,
        index: 0,
    };
    let global = PipelineError::IntermediateFileMissing(PathBuf::from("work/translation.json"));

    assert_eq!(scoped.document(), Some("a.md"));
    assert_eq!(global.document(), None);
}

#[test]
fn test_pipelineErrors_intoResult_shouldReturnValueOnlyWhenEmpty() {
    assert_eq!(PipelineErrors::new().into_result(3), Ok(3));

    let mut errors = PipelineErrors::new();
    errors.push(PipelineError::TaskFailed("boom".to_string()));
    errors.extend(vec![PipelineError::File("locked".to_string())]);

    let result = errors.into_result(3);
    assert_eq!(result.as_ref().map_err(PipelineErrors::len), Err(2));
}

#[test]
fn test_pipelineErrors_display_shouldListEveryError() {
    let errors = PipelineErrors::from(vec![
        PipelineError::File("a".to_string()),
        PipelineError::File("b".to_string()),
    ]);
    let display = errors.to_string();
    assert!(display.starts_with("2 error(s)"));
    assert!(display.contains("File error: a"));
    assert!(display.contains("File error: b"));
}

#[test]
fn test_appError_fromPipelineErrors_shouldWrap() {
    let errors = PipelineErrors::from(PipelineError::TaskFailed("x".to_string()));
    let error: AppError = errors.into();
    assert!(matches!(error, AppError::Pipeline(ref inner) if inner.len() == 1));
}

#[test]
fn test_pipelineError_fromSerdeError_shouldBeSerialization() {
    let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: PipelineError = parse_error.into();
    assert!(matches!(error, PipelineError::Serialization(_)));
}
