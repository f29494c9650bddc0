/*!
 * Quotation runs and their paragraph references.
 *
 * Consecutive `>` lines form a run. A run that cites exactly one anchored
 * paragraph of the book resolves to that reference, and is later replaced by
 * the target language's own text of the quoted paragraph(s) instead of being
 * sent for translation.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{LinkRewriter, QuoteSpan, StructuredReference};
use crate::language_utils::LanguageProfile;

use super::classifier::is_empty_quote;

/// Quotation prefix: indentation, the `>` marker and the spacing after it
static QUOTE_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*>\s*").expect("Invalid quote prefix regex")
});

/// Emphasis markers that may open a quoted paragraph
static EMPHASIS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\*{1,3}|_{1,2})").expect("Invalid emphasis regex")
});

/// Quotation characters recognised at the start of a quoted paragraph
const QUOTE_CHARS: &[char] = &['"', '“', '”', '«', '»', '„', '‘', '\''];

/// Maximal run of quotation lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRun {
    pub start: usize,
    pub end: usize,
    pub reference: Option<StructuredReference>,
}

impl QuoteRun {
    pub fn into_span(self) -> Option<QuoteSpan> {
        let reference = self.reference?;
        Some(QuoteSpan { start: self.start, end: self.end, reference })
    }
}

/// Role of one line inside a resolved run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteLine {
    /// Empty `>` line kept as is
    Separator,
    /// Line holding only the citation link(s)
    Citation,
    /// Quoted paragraph; carries its position among the run's content lines
    Content(usize),
}

/// Whether a line belongs to a quotation run
pub fn is_quote_line(line: &str) -> bool {
    line.trim_start().starts_with('>')
}

/// Finds quotation runs and resolves their references
pub struct QuoteSpanResolver<'a> {
    rewriter: &'a LinkRewriter,
}

impl<'a> QuoteSpanResolver<'a> {
    pub fn new(rewriter: &'a LinkRewriter) -> Self {
        Self { rewriter }
    }

    /// Group lines into runs and resolve each one
    pub fn runs<S: AsRef<str>>(&self, lines: &[S]) -> Vec<QuoteRun> {
        let mut runs = Vec::new();
        let mut start: Option<usize> = None;

        for (index, line) in lines.iter().enumerate() {
            match (is_quote_line(line.as_ref()), start) {
                (true, None) => start = Some(index),
                (false, Some(first)) => {
                    runs.push(self.resolve_run(lines, first, index - 1));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(first) = start {
            runs.push(self.resolve_run(lines, first, lines.len() - 1));
        }

        runs
    }

    /// Resolved runs only
    pub fn spans<S: AsRef<str>>(&self, lines: &[S]) -> Vec<QuoteSpan> {
        self.runs(lines).into_iter().filter_map(QuoteRun::into_span).collect()
    }

    fn resolve_run<S: AsRef<str>>(&self, lines: &[S], start: usize, end: usize) -> QuoteRun {
        let run = &lines[start..=end];
        let mut found: Vec<StructuredReference> = Vec::new();

        for line in run {
            for link in self.rewriter.find_links(line.as_ref()) {
                if let Some(reference) = link.reference {
                    if !found.iter().any(|r| r.same_start(&reference)) {
                        found.push(reference);
                    }
                }
            }
        }

        let reference = match found.as_slice() {
            [single] => {
                let end_paragraph = run
                    .iter()
                    .find_map(|line| LinkRewriter::range_end(line.as_ref(), single));
                Some(match end_paragraph {
                    Some(end) => single.with_end(end),
                    None => *single,
                })
            }
            _ => None,
        };

        debug!(
            "Quote run {}..={}: {} reference(s), resolved to {:?}",
            start + 1,
            end + 1,
            found.len(),
            reference.map(|r| r.to_string())
        );

        QuoteRun { start, end, reference }
    }

    /// Layout of the lines of a resolved run: separators, citations and
    /// numbered content lines
    pub fn layout<S: AsRef<str>>(&self, run: &[S]) -> Vec<QuoteLine> {
        let mut content = 0;
        run.iter()
            .map(|line| {
                let line = line.as_ref();
                if is_empty_quote(line.trim()) {
                    QuoteLine::Separator
                } else if self.is_citation(line) {
                    QuoteLine::Citation
                } else {
                    content += 1;
                    QuoteLine::Content(content - 1)
                }
            })
            .collect()
    }

    /// Whether nothing but links and punctuation remain on the line
    fn is_citation(&self, line: &str) -> bool {
        let without_links = self.rewriter.cross_reference_regex().replace_all(line, "");
        let body = QUOTE_PREFIX_REGEX.replace(&without_links, "");
        !body.chars().any(char::is_alphanumeric)
    }
}

/// Visual style of a quoted paragraph line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteStyle {
    prefix: String,
    emphasis: String,
    quoted: bool,
    tail: Option<String>,
}

impl QuoteStyle {
    /// Detect prefix, emphasis and quotation character of a content line.
    /// `tail_from` is the byte offset of the citation link when the line
    /// carries one.
    pub fn detect(line: &str, tail_from: Option<usize>) -> Self {
        let prefix = QUOTE_PREFIX_REGEX
            .find(line)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let rest = &line[prefix.len()..];
        let emphasis = EMPHASIS_REGEX
            .find(rest)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let quoted = rest[emphasis.len()..].starts_with(QUOTE_CHARS);

        let tail = tail_from.map(|offset| {
            let mut start = offset;
            if line[..start].ends_with('(') {
                start -= 1;
            }
            let head = line[..start].trim_end();
            line[head.len()..].to_string()
        });

        Self { prefix, emphasis, quoted, tail }
    }

    /// Render paragraph text in this style for the target language
    pub fn render(&self, text: &str, profile: LanguageProfile, rewriter: &LinkRewriter) -> String {
        let closing: String = self.emphasis.chars().rev().collect();
        let (open, close) = if self.quoted {
            (profile.quote_open.to_string(), profile.quote_close.to_string())
        } else {
            (String::new(), String::new())
        };
        let tail = self
            .tail
            .as_deref()
            .map(|tail| rewriter.rewrite_links(tail))
            .unwrap_or_default();

        format!(
            "{}{}{}{}{}{}{}",
            self.prefix,
            self.emphasis,
            open,
            text.trim(),
            close,
            closing,
            tail
        )
    }
}
