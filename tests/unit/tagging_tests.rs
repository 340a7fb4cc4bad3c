/*!
 * Tests for the run-tagging wire codec
 */

use doctran::document_model::UnitContent;
use doctran::documents::unit_from_runs;
use doctran::errors::AppError;
use doctran::translation::tagging::{decode_tagged, encode_fragments, escape_text, unescape_text};

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_encode_fragments_shouldWrapEachFragmentInOrder() {
    let fragments = vec![
        ("u.r0".to_string(), "Hello ".to_string()),
        ("u.r1".to_string(), "world".to_string()),
    ];
    let encoded = encode_fragments(&fragments);
    assert_eq!(
        encoded,
        r#"<run id="u.r0">Hello </run><run id="u.r1">world</run>"#
    );
}

#[test]
fn test_escape_text_shouldEscapeMarkupCharacters() {
    assert_eq!(escape_text("a < b & c > d"), "a &lt; b &amp; c &gt; d");
    assert_eq!(unescape_text("a &lt; b &amp; c &gt; d"), "a < b & c > d");
}

#[test]
fn test_roundTrip_withMarkupInText_shouldSurviveEncodeDecode() {
    let fragments = vec![("u.r0".to_string(), "1 < 2 && <tag>".to_string())];
    // Single fragments normally bypass tagging; the codec still handles them.
    let encoded = encode_fragments(&fragments);
    let mapping = decode_tagged(&encoded, &ids(&["u.r0"])).unwrap();
    assert_eq!(mapping["u.r0"], "1 < 2 && <tag>");
}

#[test]
fn test_decode_withReorderedRuns_shouldMapByIdNotPosition() {
    // The provider may reorder fragments when word order changes.
    let translated = r#"<run id="u.r1">monde</run><run id="u.r0">Bonjour </run>"#;
    let mapping = decode_tagged(translated, &ids(&["u.r0", "u.r1"])).unwrap();
    assert_eq!(mapping["u.r0"], "Bonjour ");
    assert_eq!(mapping["u.r1"], "monde");
}

#[test]
fn test_decode_withWhitespaceBetweenTags_shouldSucceed() {
    let translated = "  <run id=\"u.r0\">a</run>\n  <run id=\"u.r1\">b</run>  ";
    let mapping = decode_tagged(translated, &ids(&["u.r0", "u.r1"])).unwrap();
    assert_eq!(mapping.len(), 2);
}

#[test]
fn test_decode_withFreeTextBetweenTags_shouldFail() {
    let translated = r#"<run id="u.r0">a</run>stray<run id="u.r1">b</run>"#;
    let result = decode_tagged(translated, &ids(&["u.r0", "u.r1"]));
    assert!(matches!(result, Err(AppError::TagFormat(_))));
}

#[test]
fn test_decode_withTrailingFreeText_shouldFail() {
    let translated = r#"<run id="u.r0">a</run>trailing"#;
    let result = decode_tagged(translated, &ids(&["u.r0"]));
    assert!(matches!(result, Err(AppError::TagFormat(_))));
}

#[test]
fn test_decode_withUnknownId_shouldFail() {
    let translated = r#"<run id="u.r9">a</run>"#;
    let result = decode_tagged(translated, &ids(&["u.r0"]));
    assert!(matches!(result, Err(AppError::TagFormat(_))));
}

#[test]
fn test_decode_withDuplicateId_shouldFail() {
    let translated = r#"<run id="u.r0">a</run><run id="u.r0">b</run>"#;
    let result = decode_tagged(translated, &ids(&["u.r0", "u.r1"]));
    assert!(matches!(result, Err(AppError::TagFormat(_))));
}

#[test]
fn test_decode_withMissingId_shouldNameItInTheError() {
    let translated = r#"<run id="u.r0">a</run>"#;
    let result = decode_tagged(translated, &ids(&["u.r0", "u.r1"]));
    match result {
        Err(AppError::TagFormat(message)) => assert!(message.contains("u.r1")),
        other => panic!("expected a tag format error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_decode_withEmptyInnerText_shouldSucceed() {
    let translated = r#"<run id="u.r0"></run>"#;
    let mapping = decode_tagged(translated, &ids(&["u.r0"])).unwrap();
    assert_eq!(mapping["u.r0"], "");
}

#[test]
fn test_unit_from_runs_withSingleNonEmptyRun_shouldBypassTagging() {
    let runs = vec![
        ("".to_string(), sink()),
        ("only text".to_string(), sink()),
    ];
    let unit = unit_from_runs("body.p0", "Body paragraph 1", runs).unwrap();
    // The fragment keeps its structural index even after empties are dropped.
    assert_eq!(unit.unit_id, "body.p0.r1");
    assert_eq!(unit.original_text, "only text");
    assert!(!unit.is_atomic());
}

#[test]
fn test_unit_from_runs_withSeveralRuns_shouldBuildTaggedAtomicUnit() {
    let runs = vec![
        ("Hello ".to_string(), sink()),
        ("world".to_string(), sink()),
    ];
    let unit = unit_from_runs("p0", "Paragraph 1", runs).unwrap();
    assert!(unit.is_atomic());
    assert_eq!(
        unit.original_text,
        r#"<run id="p0.r0">Hello </run><run id="p0.r1">world</run>"#
    );
    match &unit.content {
        UnitContent::Tagged { fragments } => {
            let fragment_ids: Vec<&str> =
                fragments.iter().map(|f| f.fragment_id.as_str()).collect();
            assert_eq!(fragment_ids, vec!["p0.r0", "p0.r1"]);
        }
        UnitContent::Plain { .. } => panic!("expected a tagged unit"),
    }
}

#[test]
fn test_unit_from_runs_withOnlyEmptyRuns_shouldProduceNoUnit() {
    let runs = vec![("".to_string(), sink()), ("   ".to_string(), sink())];
    assert!(unit_from_runs("p0", "Paragraph 1", runs).is_none());
}

fn sink() -> Box<dyn doctran::document_model::TextSink> {
    struct NullSink;
    impl doctran::document_model::TextSink for NullSink {
        fn apply(&self, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }
    Box::new(NullSink)
}
