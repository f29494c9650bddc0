/*!
 * Line extraction.
 *
 * Turns the lines of one document into `LineRecord`s: classification,
 * quotation spans, and for every kept line the translatable text with each
 * non-translatable fragment swapped for a `{N}` placeholder.
 */

use anyhow::Result;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::Arc;

use crate::document::{DocumentKind, DocumentResolver, LineRecord, LineRole, LinkRewriter, QuoteSpan};
use crate::errors::PipelineError;

use super::classifier::LineClassifier;
use super::markers::{is_structural_only, ExtractionMarker};
use super::quotes::QuoteSpanResolver;

/// Inline anchors stripped from article documents
static ANCHOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<a\s+(?:id|name)="[^"]*"\s*>\s*</a>"#).expect("Invalid anchor regex")
});

/// Markdown link targets `](...)`
static LINK_TARGET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\]\(([^()\s]+)\)").expect("Invalid link target regex")
});

/// Page number spans of book documents
static PAGE_SPAN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<span id="p[^"]*">\[[^\]]*\]</span>"#).expect("Invalid page span regex")
});

/// Verse numbers
static SUP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<sup>[^<]*</sup>").expect("Invalid verse number regex")
});

/// Generated title wrapper tags
static TITLE_SPAN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<span class="[^"]*title[^"]*">|</span>"#).expect("Invalid title span regex")
});

/// Vector graphic text tags
static SVG_TEXT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?t(?:ext|span)(?:\s[^>]*)?>").expect("Invalid svg text regex")
});

/// Hyperlink target attributes
static HREF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"href="([^"]*)""#).expect("Invalid href regex")
});

/// Display and inline math
static MATH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\$[^$]+\$\$|\$[^$\s](?:[^$]*[^$\s])?\$|\\\(.+?\\\)").expect("Invalid math regex")
});

/// Any markup tag
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").expect("Invalid tag regex")
});

/// Front matter entry split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry<'a> {
    /// Key, colon and spacing, e.g. `title: `
    pub prefix: &'a str,
    /// Quotation character wrapping the value
    pub quote: Option<char>,
    /// Unquoted value
    pub value: &'a str,
}

/// Split a `key: value` front matter line (without indentation)
pub fn split_header(line: &str) -> Option<HeaderEntry<'_>> {
    let colon = line.find(':')?;
    let after = &line[colon + 1..];
    let value = after.trim();
    let prefix = &line[..line.len() - after.trim_start().len()];

    let quote = value
        .chars()
        .next()
        .filter(|c| (*c == '"' || *c == '\'') && value.len() >= 2 && value.ends_with(*c));

    Some(HeaderEntry {
        prefix,
        quote,
        value: match quote {
            Some(_) => &value[1..value.len() - 1],
            None => value,
        },
    })
}

impl HeaderEntry<'_> {
    /// Value with the escapes of its quotation style undone
    pub fn unescaped_value(&self) -> String {
        match self.quote {
            Some('"') => self.value.replace("\\\"", "\""),
            Some('\'') => self.value.replace("''", "'"),
            _ => self.value.to_string(),
        }
    }
}

/// Escape text for a front matter value wrapped in `quote`
pub fn escape_header_value(text: &str, quote: Option<char>) -> Cow<'_, str> {
    match quote {
        Some('"') => Cow::Owned(text.replace('"', "\\\"")),
        Some('\'') => Cow::Owned(text.replace('\'', "''")),
        _ => Cow::Borrowed(text),
    }
}

/// Opening and closing tag around a copyright card (without indentation)
pub fn copyright_tags(line: &str) -> (&str, &str) {
    let line = line.trim_end();
    let open = match line.find('>') {
        Some(end) => &line[..=end],
        None => "",
    };
    let close = match line.rfind("</") {
        Some(start) if start >= open.len() && line.ends_with('>') => &line[start..],
        _ => "",
    };
    (open, close)
}

/// Extraction result for one document
#[derive(Debug, Clone, Default)]
pub struct DocumentExtraction {
    pub records: Vec<LineRecord>,
    pub spans: Vec<QuoteSpan>,
    /// Non-fatal problems, such as links to paragraphs the target edition lacks
    pub warnings: Vec<PipelineError>,
}

impl DocumentExtraction {
    pub fn translatable_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_translatable()).count()
    }
}

/// Extracts translatable text from documents of one kind and language pair
#[derive(Clone)]
pub struct LineExtractor {
    kind: DocumentKind,
    rewriter: LinkRewriter,
    resolver: Arc<dyn DocumentResolver>,
}

impl LineExtractor {
    pub fn new(
        source_language: &str,
        target_language: &str,
        kind: DocumentKind,
        resolver: Arc<dyn DocumentResolver>,
    ) -> Result<Self> {
        Ok(Self {
            kind,
            rewriter: LinkRewriter::new(source_language, target_language)?,
            resolver,
        })
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn rewriter(&self) -> &LinkRewriter {
        &self.rewriter
    }

    /// Extract every line of a document
    pub fn extract_document<S: AsRef<str>>(&self, document: &str, lines: &[S]) -> DocumentExtraction {
        let classes = LineClassifier::classify_all(self.kind, lines);
        let spans = QuoteSpanResolver::new(&self.rewriter).spans(lines);
        let mut warnings = Vec::new();

        let records: Vec<LineRecord> = lines
            .iter()
            .zip(classes)
            .enumerate()
            .map(|(index, (line, class))| {
                let mut record = LineRecord::new(index, line.as_ref(), class.role);
                record.ignore = class.ignore;
                record.remove = class.remove;

                if record.remove {
                    return record;
                }
                if let Some(span) = spans.iter().find(|span| span.contains(index)) {
                    record.role = LineRole::Quote;
                    record.ignore = true;
                    record.quote_span = Some(span.clone());
                    return record;
                }
                if !record.ignore {
                    self.extract_line(document, &mut record, &mut warnings);
                }
                record
            })
            .collect();

        let extraction = DocumentExtraction { records, spans, warnings };
        debug!(
            "Extracted {}: {} lines, {} translatable, {} quote spans",
            document,
            extraction.records.len(),
            extraction.translatable_count(),
            extraction.spans.len()
        );
        extraction
    }

    fn extract_line(&self, document: &str, record: &mut LineRecord, warnings: &mut Vec<PipelineError>) {
        let source: Cow<'_, str> = if self.kind.is_book() {
            Cow::Borrowed(record.line.as_str())
        } else {
            ANCHOR_REGEX.replace_all(&record.line, "")
        };
        let source = source.trim_start();

        let body = match record.role {
            LineRole::Title | LineRole::Description => {
                split_header(source).map(|entry| entry.unescaped_value())
            }
            LineRole::Copyright => Some(TAG_REGEX.replace_all(source, "").trim().to_string()),
            _ => Some(source.to_string()),
        };

        let Some(body) = body.filter(|body| !body.trim().is_empty()) else {
            record.ignore = true;
            return;
        };

        let mut marker = ExtractionMarker::new();
        let text = self.replace_fragments(document, record.index, &body, &mut marker, warnings);

        record.ignore = is_structural_only(&text);
        record.extracts = marker.into_extracts();
        record.translatable_text = Some(text);

        if record.ignore {
            debug!("{} line {}: nothing to translate", document, record.index + 1);
        }
    }

    /// Swap every non-translatable fragment for a placeholder, pass by pass
    fn replace_fragments(
        &self,
        document: &str,
        index: usize,
        body: &str,
        marker: &mut ExtractionMarker,
        warnings: &mut Vec<PipelineError>,
    ) -> String {
        let rewriter = &self.rewriter;

        let body = marker.escape_placeholders(body);
        let mut text = marker.replace_with(&body, rewriter.cross_reference_regex(), |caps: &Captures<'_>| {
            let link = &caps[0];
            let missing = rewriter
                .find_links(link)
                .into_iter()
                .filter_map(|found| found.reference)
                .find(|reference| self.resolver.resolve(reference).is_none());
            if let Some(reference) = missing {
                warn!(
                    "{} line {}: {} not found in the {} edition",
                    document,
                    index + 1,
                    reference,
                    rewriter.target_language()
                );
                warnings.push(PipelineError::ReferenceNotFound {
                    document: document.to_string(),
                    line: index,
                    reference: reference.to_string(),
                });
            }
            rewriter.rewrite_links(link)
        });

        text = marker.replace_group(&text, &LINK_TARGET_REGEX, 1, |target| rewriter.rewrite_path(target));

        if self.kind.is_book() {
            for regex in [&*PAGE_SPAN_REGEX, &*SUP_REGEX, &*TITLE_SPAN_REGEX, &*SVG_TEXT_REGEX] {
                text = marker.replace_all(&text, regex);
            }
        }

        text = marker.replace_group(&text, &HREF_REGEX, 1, |target| rewriter.rewrite_path(target));
        marker.replace_all(&text, &MATH_REGEX)
    }
}
