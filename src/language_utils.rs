use anyhow::{anyhow, Result};
use isolang::Language;

/// Language utilities for the corpus editions
///
/// ISO 639-1 / 639-2 code validation and normalization, and the typographic
/// profile (quotation marks, book abbreviation) each edition is published with.

/// ISO 639-2/B codes that differ from their ISO 639-2/T form
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

fn resolve_language(code: &str) -> Option<Language> {
    let code = code.trim().to_lowercase();
    match code.len() {
        2 => Language::from_639_1(&code),
        3 => {
            let part2t = PART2B_TO_PART2T
                .iter()
                .find(|(b, _)| *b == code)
                .map(|(_, t)| *t)
                .unwrap_or(code.as_str());
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Validate a language code and normalize it to ISO 639-1 when one exists,
/// falling back to ISO 639-2/T
pub fn normalize_language_code(code: &str) -> Result<String> {
    let language = resolve_language(code)
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))?;

    Ok(language
        .to_639_1()
        .map(|c| c.to_string())
        .unwrap_or_else(|| language.to_639_3().to_string()))
}

/// Check if two language codes represent the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (resolve_language(code1), resolve_language(code2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let language = resolve_language(code)
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    Ok(language.to_name().to_string())
}

/// How an edition of the corpus writes quotations and cites itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageProfile {
    /// Opening quotation mark
    pub quote_open: char,
    /// Closing quotation mark
    pub quote_close: char,
    /// Abbreviation of the book title used in citations ("UB 3:2.1")
    pub book_abbreviation: &'static str,
}

impl LanguageProfile {
    /// Profile for a language code; unknown languages get English typography
    pub fn for_language(code: &str) -> Self {
        let normalized = normalize_language_code(code).unwrap_or_else(|_| code.trim().to_lowercase());
        match normalized.as_str() {
            "es" | "fr" | "it" => Self::new('«', '»', "LU"),
            "pt" => Self::new('“', '”', "LU"),
            "de" => Self::new('„', '“', "UB"),
            "nl" => Self::new('„', '”', "UB"),
            "ru" => Self::new('«', '»', "КУ"),
            _ => Self::new('“', '”', "UB"),
        }
    }

    const fn new(quote_open: char, quote_close: char, book_abbreviation: &'static str) -> Self {
        Self { quote_open, quote_close, book_abbreviation }
    }
}
