/*!
 * Document reconstruction.
 *
 * Turns the records of one document, each carrying its translation, back into
 * the final lines: placeholders are refilled with their extracts, quotation
 * runs are replaced by the target edition's paragraphs, front matter and
 * copyright lines are re-wrapped, and language fixups are applied.
 *
 * Errors never stop the document: the affected line falls back to its source
 * text and the error is collected for the caller.
 */

use anyhow::Result;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::document::{DocumentResolver, LineRecord, LineRole, LinkRewriter, QuoteSpan};
use crate::errors::PipelineError;
use crate::extraction::extractor::{copyright_tags, escape_header_value, split_header};
use crate::extraction::markers::{
    placeholder, placeholder_positions, substitute_placeholders, PlaceholderValidator,
};
use crate::extraction::quotes::{QuoteLine, QuoteSpanResolver, QuoteStyle};

use super::fixups::TextFixups;
use super::placement::PlaceholderPlacement;

/// Final lines of a document and the errors met while producing them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinalizedDocument {
    pub lines: Vec<String>,
    pub errors: Vec<PipelineError>,
}

impl FinalizedDocument {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }
}

/// Content layout of one resolved quotation run
struct QuoteLayout {
    lines: Vec<QuoteLine>,
    content_lines: usize,
}

/// Rebuilds documents for one language pair
#[derive(Clone)]
pub struct Finalizer {
    fixups: TextFixups,
    resolver: Arc<dyn DocumentResolver>,
    placement: Arc<dyn PlaceholderPlacement>,
}

impl Finalizer {
    pub fn new(
        source_language: &str,
        target_language: &str,
        resolver: Arc<dyn DocumentResolver>,
        placement: Arc<dyn PlaceholderPlacement>,
    ) -> Result<Self> {
        let rewriter = LinkRewriter::new(source_language, target_language)?;
        Ok(Self {
            fixups: TextFixups::new(rewriter)?,
            resolver,
            placement,
        })
    }

    fn rewriter(&self) -> &LinkRewriter {
        self.fixups.rewriter()
    }

    /// Rebuild a document from its records, in line order
    pub fn finalize(&self, document: &str, records: &[LineRecord]) -> FinalizedDocument {
        let layouts = self.quote_layouts(records);
        let mut result = FinalizedDocument::default();

        for record in records {
            if let Some(line) = self.finalize_record(document, record, &layouts, &mut result.errors) {
                result.lines.push(line);
            }
        }

        debug!(
            "Finalized {}: {} of {} lines kept, {} errors (placement: {})",
            document,
            result.lines.len(),
            records.len(),
            result.errors.len(),
            self.placement.name()
        );
        result
    }

    fn finalize_record(
        &self,
        document: &str,
        record: &LineRecord,
        layouts: &HashMap<usize, QuoteLayout>,
        errors: &mut Vec<PipelineError>,
    ) -> Option<String> {
        if record.remove {
            return None;
        }

        if record.role == LineRole::Quote {
            if let Some(span) = &record.quote_span {
                return Some(self.render_quote(document, record, span, layouts, errors));
            }
        }

        let Some(source) = record.translatable_text.as_deref() else {
            return Some(record.line.clone());
        };

        if record.ignore {
            if record.extracts.is_empty() {
                return Some(record.line.clone());
            }
            return Some(self.wrap(record, &substitute_placeholders(source, &record.extracts)));
        }

        let text = match record.translation.as_deref() {
            Some(translation) => {
                let translation = if record.role == LineRole::Other {
                    self.fixups.convert_quotes(translation)
                } else {
                    translation.to_string()
                };
                match self.reinsert(document, record, source, &translation, errors) {
                    Some(text) => self.fixups.finish(&record.line, source, &text),
                    None => substitute_placeholders(source, &record.extracts),
                }
            }
            None => {
                warn!("{} line {}: no translation, keeping source text", document, record.index + 1);
                errors.push(PipelineError::MissingTranslation {
                    document: document.to_string(),
                    line: record.index,
                });
                substitute_placeholders(source, &record.extracts)
            }
        };

        Some(self.wrap(record, &text))
    }

    /// Put extracts back into a translation. Placeholders found exactly once
    /// are substituted in place; lost or duplicated ones are positioned by the
    /// placement strategy. `None` when the strategy refuses.
    fn reinsert(
        &self,
        document: &str,
        record: &LineRecord,
        source: &str,
        translation: &str,
        errors: &mut Vec<PipelineError>,
    ) -> Option<String> {
        let report = PlaceholderValidator::validate(translation, record.extracts.len());
        if report.passed() {
            return Some(substitute_placeholders(translation, &record.extracts));
        }

        let mut text = translation.to_string();
        let source_len = source.chars().count();
        let mut misplaced: Vec<usize> = report.missing.into_iter().chain(report.duplicated).collect();
        misplaced.sort_unstable();

        for index in misplaced {
            let found = placeholder_positions(&text, index);
            for range in found.iter().rev() {
                text.replace_range(range.clone(), "");
            }

            let source_offset = placeholder_positions(source, index)
                .first()
                .map(|range| source[..range.start].chars().count())
                .unwrap_or(source_len);

            let Some(offset) = self.placement.place(source_offset, source_len, &text) else {
                warn!(
                    "{} line {}: placeholder {} found {} times, not placed",
                    document,
                    record.index + 1,
                    index,
                    found.len()
                );
                errors.push(PipelineError::PlaceholderUnresolved {
                    document: document.to_string(),
                    line: record.index,
                    index,
                });
                return None;
            };

            warn!(
                "{} line {}: placeholder {} found {} times, placed at {}",
                document,
                record.index + 1,
                index,
                found.len(),
                offset
            );
            let token = placeholder(index);
            let token = if offset >= text.len() {
                if text.is_empty() || text.ends_with(char::is_whitespace) {
                    token
                } else {
                    format!(" {}", token)
                }
            } else {
                format!("{} ", token)
            };
            text.insert_str(offset.min(text.len()), &token);
        }

        Some(substitute_placeholders(&text, &record.extracts))
    }

    /// Restore indentation and the wrapping of header and copyright lines
    fn wrap(&self, record: &LineRecord, text: &str) -> String {
        let indentation = record.indentation();
        let line = record.line.trim_start();

        match record.role {
            LineRole::Title | LineRole::Description => match split_header(line) {
                Some(entry) => {
                    let quote = entry.quote.map(String::from).unwrap_or_default();
                    let value = escape_header_value(text, entry.quote);
                    format!("{}{}{}{}{}", indentation, entry.prefix, quote, value, quote)
                }
                None => format!("{}{}", indentation, text),
            },
            LineRole::Copyright => {
                let (open, close) = copyright_tags(line);
                format!("{}{}{}{}", indentation, open, text, close)
            }
            _ => format!("{}{}", indentation, text),
        }
    }

    fn quote_layouts(&self, records: &[LineRecord]) -> HashMap<usize, QuoteLayout> {
        let resolver = QuoteSpanResolver::new(self.rewriter());
        let mut layouts = HashMap::new();

        for span in records.iter().filter_map(|record| record.quote_span.as_ref()) {
            if layouts.contains_key(&span.start) || span.end >= records.len() {
                continue;
            }
            let run: Vec<&str> = records[span.start..=span.end]
                .iter()
                .map(|record| record.line.as_str())
                .collect();
            let lines = resolver.layout(&run);
            let content_lines = lines
                .iter()
                .filter(|line| matches!(line, QuoteLine::Content(_)))
                .count();
            layouts.insert(span.start, QuoteLayout { lines, content_lines });
        }

        layouts
    }

    /// Render one line of a resolved quotation run
    fn render_quote(
        &self,
        document: &str,
        record: &LineRecord,
        span: &QuoteSpan,
        layouts: &HashMap<usize, QuoteLayout>,
        errors: &mut Vec<PipelineError>,
    ) -> String {
        let rewriter = self.rewriter();
        let fallback = || rewriter.rewrite_links(&record.line);

        let Some(layout) = layouts.get(&span.start) else {
            return fallback();
        };
        let position = record.index.saturating_sub(span.start);

        match layout.lines.get(position) {
            Some(QuoteLine::Separator) => record.line.clone(),
            Some(QuoteLine::Citation) | None => fallback(),
            Some(QuoteLine::Content(offset)) => {
                let paragraphs = span.reference.paragraph_count();
                if layout.content_lines != paragraphs {
                    errors.push(PipelineError::StructuralMismatch {
                        document: document.to_string(),
                        line: record.index,
                        reference: span.reference.to_string(),
                        lines: layout.content_lines,
                        paragraphs,
                    });
                    return fallback();
                }

                let reference = span.reference.nth(*offset);
                match self.resolver.resolve(&reference) {
                    Some(text) => {
                        let tail_from = rewriter
                            .find_links(&record.line)
                            .into_iter()
                            .find(|link| link.reference.is_some())
                            .map(|link| link.range.start);
                        QuoteStyle::detect(&record.line, tail_from).render(
                            &text,
                            rewriter.target_profile(),
                            rewriter,
                        )
                    }
                    None => {
                        warn!("{} line {}: quoted {} not found", document, record.index + 1, reference);
                        errors.push(PipelineError::ReferenceNotFound {
                            document: document.to_string(),
                            line: record.index,
                            reference: reference.to_string(),
                        });
                        fallback()
                    }
                }
            }
        }
    }
}
