/*!
 * Structured paragraph references and cross-document links.
 *
 * A reference `P:S.N` names paragraph `N` of section `S` of paper `P`; a
 * `-M` suffix extends it over paragraphs `N..=M` of the same section. Links
 * to the book look like `[UB 3:2.1](/en/The_Urantia_Book/3#p2_1)`.
 */

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

use crate::language_utils::LanguageProfile;

/// Path segment of the book inside each language tree of the wiki
pub const BOOK_PATH: &str = "The_Urantia_Book";

/// Reference tokens written in text, with an optional range end
static REFERENCE_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+):(\d+)\.(\d+)(?:-(\d+))?").expect("Invalid reference token regex")
});

/// Paragraph reference `paper:section.paragraph[-end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StructuredReference {
    pub paper: u32,
    pub section: u32,
    pub paragraph: u32,
    pub end_paragraph: Option<u32>,
}

impl StructuredReference {
    pub fn new(paper: u32, section: u32, paragraph: u32) -> Self {
        Self { paper, section, paragraph, end_paragraph: None }
    }

    /// Extend the reference over paragraphs up to `end`; ignored unless `end` is past the start
    pub fn with_end(mut self, end: u32) -> Self {
        self.end_paragraph = (end > self.paragraph).then_some(end);
        self
    }

    /// Whether two references point at the same starting paragraph
    pub fn same_start(&self, other: &Self) -> bool {
        self.paper == other.paper && self.section == other.section && self.paragraph == other.paragraph
    }

    /// Number of paragraphs covered
    pub fn paragraph_count(&self) -> usize {
        match self.end_paragraph {
            Some(end) => end.saturating_sub(self.paragraph) as usize + 1,
            None => 1,
        }
    }

    /// Single-paragraph reference `offset` paragraphs after the start
    pub fn nth(&self, offset: usize) -> Self {
        Self::new(self.paper, self.section, self.paragraph + offset as u32)
    }
}

impl fmt::Display for StructuredReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}.{}", self.paper, self.section, self.paragraph)?;
        if let Some(end) = self.end_paragraph {
            write!(f, "-{}", end)?;
        }
        Ok(())
    }
}

impl FromStr for StructuredReference {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let caps = REFERENCE_TOKEN_REGEX
            .captures(s)
            .filter(|c| c.get(0).map(|m| m.as_str().len()) == Some(s.len()))
            .ok_or_else(|| anyhow!("Invalid reference: '{}'", s))?;

        let number = |i: usize| -> Result<u32> {
            caps[i].parse::<u32>().map_err(|e| anyhow!("Invalid reference '{}': {}", s, e))
        };
        let reference = Self::new(number(1)?, number(2)?, number(3)?);

        match caps.get(4) {
            Some(_) => {
                let end = number(4)?;
                if end <= reference.paragraph {
                    return Err(anyhow!("Invalid reference range: '{}'", s));
                }
                Ok(reference.with_end(end))
            }
            None => Ok(reference),
        }
    }
}

impl TryFrom<String> for StructuredReference {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<StructuredReference> for String {
    fn from(reference: StructuredReference) -> Self {
        reference.to_string()
    }
}

/// Lookup of paragraph text in one language edition of the corpus
pub trait DocumentResolver: Send + Sync {
    /// Text of a single paragraph, or `None` when it does not exist
    fn resolve_paragraph(&self, paper: u32, section: u32, paragraph: u32) -> Option<String>;

    /// Text of the starting paragraph of a reference
    fn resolve(&self, reference: &StructuredReference) -> Option<String> {
        self.resolve_paragraph(reference.paper, reference.section, reference.paragraph)
    }
}

/// In-memory resolver keyed by `(paper, section, paragraph)`
#[derive(Debug, Clone, Default)]
pub struct ParagraphIndex {
    paragraphs: HashMap<(u32, u32, u32), String>,
}

impl ParagraphIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: StructuredReference, text: impl Into<String>) {
        self.paragraphs
            .insert((reference.paper, reference.section, reference.paragraph), text.into());
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Build from a JSON object mapping `"P:S.N"` to paragraph text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, String> =
            serde_json::from_str(json).context("Failed to parse paragraph index")?;

        let mut index = Self::new();
        for (key, text) in raw {
            let reference: StructuredReference = key.parse()?;
            index.insert(reference, text);
        }
        Ok(index)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read paragraph index: {:?}", path))?;
        Self::from_json_str(&json)
    }
}

impl DocumentResolver for ParagraphIndex {
    fn resolve_paragraph(&self, paper: u32, section: u32, paragraph: u32) -> Option<String> {
        self.paragraphs.get(&(paper, section, paragraph)).cloned()
    }
}

/// Cross-document link found in a line
#[derive(Debug, Clone, PartialEq)]
pub struct LinkMatch {
    /// Byte range of the whole link
    pub range: Range<usize>,
    /// Paragraph reference, when the link carries a paragraph anchor
    pub reference: Option<StructuredReference>,
}

/// Finds links into the book in the source language and rewrites them for
/// the target language edition
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    source_language: String,
    target_language: String,
    source_profile: LanguageProfile,
    target_profile: LanguageProfile,
    cross_reference: Regex,
    abbreviation: Regex,
}

impl LinkRewriter {
    pub fn new(source_language: &str, target_language: &str) -> Result<Self> {
        let source_profile = LanguageProfile::for_language(source_language);
        let target_profile = LanguageProfile::for_language(target_language);

        let cross_reference = Regex::new(&format!(
            r"\[([^\]]*)\]\(/{}/{}/(\d+)(?:#p(\d+)_(\d+))?\)",
            regex::escape(source_language),
            BOOK_PATH
        ))
        .context("Failed to compile cross-reference regex")?;

        let abbreviation = Regex::new(&format!(
            r"\b{}(\s+\d+:\d+)",
            regex::escape(source_profile.book_abbreviation)
        ))
        .context("Failed to compile abbreviation regex")?;

        Ok(Self {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            source_profile,
            target_profile,
            cross_reference,
            abbreviation,
        })
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn source_profile(&self) -> LanguageProfile {
        self.source_profile
    }

    pub fn target_profile(&self) -> LanguageProfile {
        self.target_profile
    }

    /// Regex matching source-language links into the book
    pub fn cross_reference_regex(&self) -> &Regex {
        &self.cross_reference
    }

    /// All source-language links into the book, left to right
    pub fn find_links(&self, text: &str) -> Vec<LinkMatch> {
        self.cross_reference
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(LinkMatch {
                    range: whole.range(),
                    reference: Self::reference_from(&caps),
                })
            })
            .collect()
    }

    fn reference_from(caps: &Captures<'_>) -> Option<StructuredReference> {
        let paper = caps.get(2)?.as_str().parse().ok()?;
        let section = caps.get(3)?.as_str().parse().ok()?;
        let paragraph = caps.get(4)?.as_str().parse().ok()?;
        Some(StructuredReference::new(paper, section, paragraph))
    }

    /// Range end written next to a reference anywhere in `text`, e.g. `3:2.1-4`
    pub fn range_end(text: &str, reference: &StructuredReference) -> Option<u32> {
        REFERENCE_TOKEN_REGEX.captures_iter(text).find_map(|caps| {
            let token = StructuredReference::new(
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
                caps[3].parse().ok()?,
            );
            if !token.same_start(reference) {
                return None;
            }
            caps.get(4)?.as_str().parse().ok()
        })
    }

    /// Rewrite every source-language link into the book found in `text`
    pub fn rewrite_links(&self, text: &str) -> String {
        self.cross_reference
            .replace_all(text, |caps: &Captures<'_>| {
                let label = self.rewrite_abbreviations(&caps[1]);
                let anchor = match (caps.get(3), caps.get(4)) {
                    (Some(section), Some(paragraph)) => {
                        format!("#p{}_{}", section.as_str(), paragraph.as_str())
                    }
                    _ => String::new(),
                };
                format!(
                    "[{}](/{}/{}/{}{})",
                    label, self.target_language, BOOK_PATH, &caps[2], anchor
                )
            })
            .into_owned()
    }

    /// Rewrite a same-site path (`/<src>/...`) to the target language tree
    pub fn rewrite_path(&self, target: &str) -> String {
        let prefix = format!("/{}/", self.source_language);
        match target.strip_prefix(&prefix) {
            Some(rest) => format!("/{}/{}", self.target_language, rest),
            None => target.to_string(),
        }
    }

    /// Whether the text cites the book with the source abbreviation
    pub fn has_abbreviation(&self, text: &str) -> bool {
        self.abbreviation.is_match(text)
    }

    /// Replace the source book abbreviation in citations with the target one
    pub fn rewrite_abbreviations(&self, text: &str) -> String {
        if self.source_profile.book_abbreviation == self.target_profile.book_abbreviation {
            return text.to_string();
        }
        self.abbreviation
            .replace_all(text, |caps: &Captures<'_>| {
                format!("{}{}", self.target_profile.book_abbreviation, &caps[1])
            })
            .into_owned()
    }
}
