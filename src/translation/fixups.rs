/*!
 * Typographic and wording fixups for translated lines.
 *
 * Applied around placeholder reinsertion: quotation marks are converted
 * before (so quote characters inside extracts are left alone), the remaining
 * fixups after.
 */

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::document::LinkRewriter;
use crate::language_utils::{language_codes_match, LanguageProfile};

/// Plain double quotes; tags and attribute values (`="..."`) match first
/// and are kept as they are
static GENERIC_QUOTES_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<[^>]*>|=\s*"[^"]*"|"([^"]*)""#).expect("Invalid generic quotes regex")
});

/// "document N" as machine translation tends to render "paper N"
static DOCUMENT_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([Dd])ocument(\s+\d+)").expect("Invalid document number regex")
});

/// Trailing line break tag
static TRAILING_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<br\s*/?>\s*$").expect("Invalid trailing break regex")
});

/// Fixups for one language pair
#[derive(Debug, Clone)]
pub struct TextFixups {
    rewriter: LinkRewriter,
    target: LanguageProfile,
    same_language: bool,
    target_is_english: bool,
    source_quotes: Regex,
}

impl TextFixups {
    pub fn new(rewriter: LinkRewriter) -> Result<Self> {
        let source = rewriter.source_profile();
        let target = rewriter.target_profile();
        let (source_language, target_language) = (rewriter.source_language(), rewriter.target_language());

        let same_language = source_language.eq_ignore_ascii_case(target_language)
            || language_codes_match(source_language, target_language);
        let target_is_english = language_codes_match(target_language, "en")
            && !language_codes_match(source_language, "en");

        let open = regex::escape(&source.quote_open.to_string());
        let close = regex::escape(&source.quote_close.to_string());
        let source_quotes = Regex::new(&format!("{}([^{}]*){}", open, close, close))
            .context("Failed to compile source quotation regex")?;

        Ok(Self {
            rewriter,
            target,
            same_language,
            target_is_english,
            source_quotes,
        })
    }

    pub fn rewriter(&self) -> &LinkRewriter {
        &self.rewriter
    }

    /// Convert source-language and plain quotation marks to the target pair
    pub fn convert_quotes(&self, text: &str) -> String {
        if self.same_language {
            return text.to_string();
        }
        let (open, close) = (self.target.quote_open, self.target.quote_close);

        let text = self
            .source_quotes
            .replace_all(text, |caps: &Captures<'_>| format!("{}{}{}", open, &caps[1], close));
        GENERIC_QUOTES_REGEX
            .replace_all(&text, |caps: &Captures<'_>| match caps.get(1) {
                Some(inner) => format!("{}{}{}", open, inner.as_str(), close),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Fixups applied once placeholders are back in place. `source_line` is
    /// the raw line; `source_text` the text that was sent for translation.
    pub fn finish(&self, source_line: &str, source_text: &str, translation: &str) -> String {
        let mut result = translation.to_string();

        if self.rewriter.has_abbreviation(source_text) && self.rewriter.has_abbreviation(&result) {
            result = self.rewriter.rewrite_abbreviations(&result);
        }

        if self.target_is_english {
            result = DOCUMENT_NUMBER_REGEX
                .replace_all(&result, |caps: &Captures<'_>| {
                    let paper = if &caps[1] == "D" { "Paper" } else { "paper" };
                    format!("{}{}", paper, &caps[2])
                })
                .into_owned();
        }

        if let Some(tag) = TRAILING_BREAK_REGEX.find(source_line) {
            if !TRAILING_BREAK_REGEX.is_match(&result) {
                result.push_str(tag.as_str().trim_end());
            }
        }

        result
    }
}
