/*!
 * Tests for language code utilities
 */

use anyhow::Result;
use wikitrans::language_utils::{
    get_language_name, language_codes_match, normalize_language_code, LanguageProfile,
};

/// Test normalization of the different ISO code forms
#[test]
fn test_normalize_language_code_withVariousForms_shouldReturnPart1() -> Result<()> {
    assert_eq!(normalize_language_code("ES")?, "es");
    assert_eq!(normalize_language_code("spa")?, "es");
    assert_eq!(normalize_language_code("ger")?, "de");
    assert!(normalize_language_code("xx").is_err());
    assert!(normalize_language_code("").is_err());
    Ok(())
}

/// Test language code matching across code forms
#[test]
fn test_language_codes_match_withDifferentForms_shouldMatch() {
    assert!(language_codes_match("fr", "fre"));
    assert!(language_codes_match("fr", "fra"));
    assert!(!language_codes_match("fr", "es"));
    assert!(!language_codes_match("zz", "zz"));
}

/// Test language names
#[test]
fn test_get_language_name_withValidCode_shouldReturnName() -> Result<()> {
    assert_eq!(get_language_name("en")?, "English");
    assert_eq!(get_language_name("deu")?, "German");
    Ok(())
}

/// Test the typographic profile of each edition
#[test]
fn test_language_profile_shouldMatchEditionTypography() {
    let german = LanguageProfile::for_language("de");
    assert_eq!((german.quote_open, german.quote_close), ('„', '“'));
    assert_eq!(german.book_abbreviation, "UB");

    let french = LanguageProfile::for_language("fra");
    assert_eq!((french.quote_open, french.quote_close), ('«', '»'));
    assert_eq!(french.book_abbreviation, "LU");

    assert_eq!(LanguageProfile::for_language("ru").book_abbreviation, "КУ");
    assert_eq!(LanguageProfile::for_language("ja"), LanguageProfile::for_language("en"));
}
