/*!
 * Placeholder markers for extracted fragments.
 *
 * Every non-translatable fragment removed from a line is replaced by a
 * `{N}` token, where `N` indexes the fragment in the record's extract list.
 * This module creates those tokens and validates how a translation kept them.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

/// Regex for matching placeholder tokens
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(\d+)\}").expect("Invalid placeholder regex")
});

/// Placeholder token for an extract index
pub fn placeholder(index: usize) -> String {
    format!("{{{}}}", index)
}

/// Byte ranges of every occurrence of placeholder `index` in `text`
pub fn placeholder_positions(text: &str, index: usize) -> Vec<Range<usize>> {
    PLACEHOLDER_REGEX
        .captures_iter(text)
        .filter(|caps| caps[1].parse::<usize>().ok() == Some(index))
        .filter_map(|caps| caps.get(0).map(|m| m.range()))
        .collect()
}

/// Replace each known placeholder with its extract in a single pass, so
/// extracts that themselves look like `{N}` are never substituted again.
/// Unknown indices are left as they are.
pub fn substitute_placeholders(text: &str, extracts: &[String]) -> String {
    PLACEHOLDER_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| extracts.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Text with every placeholder token removed
pub fn strip_placeholders(text: &str) -> String {
    PLACEHOLDER_REGEX.replace_all(text, "").into_owned()
}

/// Whether the text is nothing but placeholders, whitespace and punctuation
pub fn is_structural_only(text: &str) -> bool {
    !strip_placeholders(text).chars().any(char::is_alphanumeric)
}

/// Replaces matched fragments with numbered placeholders and keeps the
/// originals for later restoration
#[derive(Debug, Clone, Default)]
pub struct ExtractionMarker {
    extracts: Vec<String>,
}

impl ExtractionMarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fragment and return the token that stands for it
    pub fn mark(&mut self, fragment: impl Into<String>) -> String {
        self.extracts.push(fragment.into());
        placeholder(self.extracts.len() - 1)
    }

    /// Replace every match of `regex` with a placeholder for the whole match
    pub fn replace_all(&mut self, text: &str, regex: &Regex) -> String {
        self.replace_with(text, regex, |caps| caps[0].to_string())
    }

    /// Replace every match of `regex`; `fragment` chooses what is stored as
    /// the extract (e.g. a rewritten link)
    pub fn replace_with<F>(&mut self, text: &str, regex: &Regex, mut fragment: F) -> String
    where
        F: FnMut(&Captures<'_>) -> String,
    {
        regex
            .replace_all(text, |caps: &Captures<'_>| {
                let original = fragment(caps);
                self.mark(original)
            })
            .into_owned()
    }

    /// Replace only capture group `group` of each match, keeping the rest of
    /// the match in the text; `fragment` maps the group's text to the extract
    pub fn replace_group<F>(&mut self, text: &str, regex: &Regex, group: usize, mut fragment: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        regex
            .replace_all(text, |caps: &Captures<'_>| {
                let (Some(whole), Some(inner)) = (caps.get(0), caps.get(group)) else {
                    return caps[0].to_string();
                };
                let start = inner.start() - whole.start();
                let end = inner.end() - whole.start();
                let matched = whole.as_str();
                let token = self.mark(fragment(inner.as_str()));
                format!("{}{}{}", &matched[..start], token, &matched[end..])
            })
            .into_owned()
    }

    /// Extract text that already looks like a placeholder, so it cannot be
    /// confused with the tokens of later passes
    pub fn escape_placeholders(&mut self, text: &str) -> String {
        self.replace_all(text, &PLACEHOLDER_REGEX)
    }

    pub fn len(&self) -> usize {
        self.extracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extracts.is_empty()
    }

    pub fn into_extracts(self) -> Vec<String> {
        self.extracts
    }
}

/// How a translation preserved the placeholders of its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderReport {
    /// Indices found exactly once
    pub exact: Vec<usize>,
    /// Indices not found at all
    pub missing: Vec<usize>,
    /// Indices found more than once
    pub duplicated: Vec<usize>,
}

impl PlaceholderReport {
    /// Check if every placeholder can be substituted directly
    pub fn passed(&self) -> bool {
        self.missing.is_empty() && self.duplicated.is_empty()
    }
}

/// Placeholder validator for translated text
pub struct PlaceholderValidator;

impl PlaceholderValidator {
    /// Validate that placeholders `0..expected_count` each appear exactly once
    pub fn validate(translation: &str, expected_count: usize) -> PlaceholderReport {
        let mut report = PlaceholderReport {
            exact: Vec::new(),
            missing: Vec::new(),
            duplicated: Vec::new(),
        };

        for index in 0..expected_count {
            match placeholder_positions(translation, index).len() {
                0 => report.missing.push(index),
                1 => report.exact.push(index),
                _ => report.duplicated.push(index),
            }
        }

        debug!(
            "Placeholder validation: expected={}, exact={}, missing={}, duplicated={}",
            expected_count,
            report.exact.len(),
            report.missing.len(),
            report.duplicated.len()
        );

        report
    }
}
