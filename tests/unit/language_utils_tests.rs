/*!
 * Tests for language descriptor utilities
 */

use doctran::language_utils::{display_name, filename_suffix, resolve_language};

#[test]
fn test_resolve_language_withIso639_1Code_shouldResolve() {
    assert!(resolve_language("fr").is_some());
    assert!(resolve_language("FR").is_some());
}

#[test]
fn test_resolve_language_withIso639_3Code_shouldResolve() {
    assert!(resolve_language("fra").is_some());
    assert!(resolve_language("deu").is_some());
}

#[test]
fn test_resolve_language_withEnglishName_shouldResolve() {
    assert!(resolve_language("French").is_some());
    assert!(resolve_language("french").is_some());
}

#[test]
fn test_resolve_language_withGibberish_shouldReturnNone() {
    assert!(resolve_language("zzzzzz").is_none());
    assert!(resolve_language("").is_none());
}

#[test]
fn test_display_name_shouldResolveCodesToNames() {
    assert_eq!(display_name("fr"), "French");
    assert_eq!(display_name("deu"), "German");
}

#[test]
fn test_display_name_withUnresolvableDescriptor_shouldPassThrough() {
    assert_eq!(display_name("Klingon (tlh)"), "Klingon (tlh)");
}

#[test]
fn test_filename_suffix_shouldProduceFilesystemSafeNames() {
    assert_eq!(filename_suffix("fr"), "fr");
    assert_eq!(filename_suffix("Brazilian Portuguese"), "Brazilian-Portuguese");
    assert_eq!(filename_suffix("  spaced   out  "), "spaced-out");
}

#[test]
fn test_filename_suffix_withNonAsciiOnly_shouldFallBack() {
    assert_eq!(filename_suffix("中文"), "translated");
    assert_eq!(filename_suffix(""), "translated");
}
