/*!
 * Tests for document handlers
 */

use doctran::documents::memory::MemoryDocument;
use doctran::documents::plain_text::PlainTextHandler;
use doctran::documents::{DocumentHandler, detect_handler};
use doctran::errors::AppError;

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_detect_handler_withTxtExtension_shouldSelectPlainText() {
    let temp_dir = create_temp_dir().unwrap();
    let path = create_test_file(temp_dir.path(), "doc.txt", "Hello\n").unwrap();

    let (document_type, _handler) = detect_handler(&path).unwrap();
    assert_eq!(document_type, "txt");
}

#[test]
fn test_detect_handler_withUnknownExtension_shouldFail() {
    let temp_dir = create_temp_dir().unwrap();
    let path = create_test_file(temp_dir.path(), "doc.docx", "binary").unwrap();

    let result = detect_handler(&path);
    assert!(matches!(result, Err(AppError::UnsupportedFormat(_))));
}

#[test]
fn test_plain_text_handler_shouldExtractNonBlankLinesOnly() {
    let temp_dir = create_temp_dir().unwrap();
    let path = create_test_file(temp_dir.path(), "doc.txt", "Hello\n\nWorld\n").unwrap();

    let mut handler = PlainTextHandler::open(&path).unwrap();
    let units = handler.extract_text_units().unwrap();

    assert_eq!(units.len(), 2);
    assert_eq!(units[0].unit_id, "line0");
    assert_eq!(units[0].original_text, "Hello");
    assert_eq!(units[0].location, "Line 1");
    assert_eq!(units[1].unit_id, "line2");
    assert_eq!(units[1].original_text, "World");
    assert_eq!(units[1].location, "Line 3");
}

#[test]
fn test_plain_text_handler_shouldPreserveStructureThroughSinkAndSave() {
    let temp_dir = create_temp_dir().unwrap();
    let path = create_test_file(temp_dir.path(), "doc.txt", "Hello\n\nWorld\n").unwrap();
    let output = temp_dir.path().join("out.txt");

    let mut handler = PlainTextHandler::open(&path).unwrap();
    let units = handler.extract_text_units().unwrap();

    // Write through the first unit's sink and persist.
    match &units[0].content {
        doctran::document_model::UnitContent::Plain { sink } => sink.apply("Bonjour").unwrap(),
        doctran::document_model::UnitContent::Tagged { .. } => panic!("expected a plain unit"),
    }
    handler.save(&output).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, "Bonjour\n\nWorld\n");
}

#[test]
fn test_memory_document_withMultiRunParagraph_shouldBuildTaggedUnit() {
    let mut document = MemoryDocument::new(vec![vec!["Hello ", "world"]]);
    let units = document.extract_text_units().unwrap();

    assert_eq!(units.len(), 1);
    assert!(units[0].is_atomic());
    assert_eq!(units[0].unit_id, "p0");
    assert_eq!(units[0].location, "Paragraph 1");
}

#[test]
fn test_memory_document_withSingleRunParagraph_shouldBuildPlainUnit() {
    let mut document = MemoryDocument::new(vec![vec!["Only run."]]);
    let units = document.extract_text_units().unwrap();

    assert_eq!(units.len(), 1);
    assert!(!units[0].is_atomic());
    assert_eq!(units[0].unit_id, "p0.r0");
}

#[test]
fn test_memory_document_withBlankParagraph_shouldSkipIt() {
    let mut document = MemoryDocument::new(vec![vec!["  ", ""], vec!["Text"]]);
    let units = document.extract_text_units().unwrap();

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].unit_id, "p1.r0");
}

#[test]
fn test_memory_document_sinks_shouldWriteBackIntoTheStore() {
    let mut document = MemoryDocument::new(vec![vec!["Hello ", "world"]]);
    let units = document.extract_text_units().unwrap();

    match &units[0].content {
        doctran::document_model::UnitContent::Tagged { fragments } => {
            fragments[0].sink.apply("Bonjour ").unwrap();
            fragments[1].sink.apply("monde").unwrap();
        }
        doctran::document_model::UnitContent::Plain { .. } => panic!("expected a tagged unit"),
    }

    assert_eq!(document.run_text(0, 0).as_deref(), Some("Bonjour "));
    assert_eq!(document.run_text(0, 1).as_deref(), Some("monde"));
    assert_eq!(document.paragraph_text(0), "Bonjour monde");
}
