/*!
 * Tests for document reconstruction
 */

use anyhow::Result;
use std::sync::Arc;
use wikitrans::document::{DocumentKind, LineRecord};
use wikitrans::extraction::LineExtractor;
use wikitrans::translation::{proportional_offset, Finalizer, ProportionalPlacement, StrictPlacement};
use wikitrans::PipelineError;
use crate::common;

fn echo_translations(records: &mut [LineRecord]) {
    for record in records.iter_mut().filter(|r| r.is_translatable()) {
        record.translation = record.translatable_text.clone();
    }
}

/// Test that echoing the translatable text rebuilds the original book document
#[test]
fn test_finalize_echoedTranslation_shouldReproduceBookDocument() -> Result<()> {
    let lines: Vec<&str> = common::SAMPLE_ARTICLE.split('\n').collect();
    let resolver = common::english_resolver();
    let extractor = LineExtractor::new("en", "en", DocumentKind::Book, resolver.clone())?;
    let finalizer = Finalizer::new("en", "en", resolver, Arc::new(ProportionalPlacement))?;

    let mut records = extractor.extract_document("doc.md", &lines).records;
    echo_translations(&mut records);
    let result = finalizer.finalize("doc.md", &records);

    assert_eq!(result.errors, Vec::<PipelineError>::new());
    assert_eq!(result.content(), common::SAMPLE_ARTICLE);
    Ok(())
}

/// Test that literal braces and escaped front matter quotes survive a round trip
#[test]
fn test_finalize_echoedTranslation_withLiteralTokensAndEscapes_shouldReproduceLines() -> Result<()> {
    let lines = [
        "---",
        r#"title: "The \"First\" Source""#,
        "description: 'Father''s love'",
        "---",
        "Set {0} to $x$ now.",
        "Only {1} here",
    ];
    let resolver = common::english_resolver();
    let extractor = LineExtractor::new("en", "en", DocumentKind::Article, resolver.clone())?;
    let finalizer = Finalizer::new("en", "en", resolver, Arc::new(ProportionalPlacement))?;

    let mut records = extractor.extract_document("doc.md", &lines).records;
    assert_eq!(records[4].translatable_text.as_deref(), Some("Set {0} to {1} now."));
    assert_eq!(records[4].extracts, vec!["{0}", "$x$"]);

    echo_translations(&mut records);
    let result = finalizer.finalize("doc.md", &records);

    assert!(result.is_clean());
    assert_eq!(result.lines, lines);
    Ok(())
}

/// Test that the round trip of an article only drops the navigator block
#[test]
fn test_finalize_echoedTranslation_shouldReproduceArticleWithoutNavigator() -> Result<()> {
    let lines: Vec<&str> = common::SAMPLE_ARTICLE.split('\n').collect();
    let resolver = common::english_resolver();
    let extractor = LineExtractor::new("en", "en", DocumentKind::Article, resolver.clone())?;
    let finalizer = Finalizer::new("en", "en", resolver, Arc::new(ProportionalPlacement))?;

    let mut records = extractor.extract_document("doc.md", &lines).records;
    echo_translations(&mut records);
    let result = finalizer.finalize("doc.md", &records);

    let expected: Vec<&str> = lines
        .iter()
        .enumerate()
        .filter(|(index, _)| !(5..=7).contains(index))
        .map(|(_, line)| *line)
        .collect();
    assert!(result.is_clean());
    assert_eq!(result.lines, expected);
    Ok(())
}

/// Test that a multi-paragraph quotation maps lines to paragraphs in order
#[test]
fn test_finalize_rangeQuote_shouldFillParagraphsInOrder() -> Result<()> {
    let resolver = common::spanish_resolver();
    let extractor = LineExtractor::new("en", "es", DocumentKind::Article, resolver.clone())?;
    let finalizer = Finalizer::new("en", "es", resolver, Arc::new(ProportionalPlacement))?;

    let lines = [
        "> *\"God is spirit.\"*",
        ">",
        "> *\"God is love.\"* ([UB 3:2.1-2](/en/The_Urantia_Book/3#p2_1))",
    ];
    let extraction = extractor.extract_document("doc.md", &lines);
    let result = finalizer.finalize("doc.md", &extraction.records);

    assert!(result.is_clean());
    assert_eq!(result.lines[0], "> *«Dios es espíritu.»*");
    assert_eq!(result.lines[1], ">");
    assert_eq!(
        result.lines[2],
        "> *«Dios es amor.»* ([LU 3:2.1-2](/es/The_Urantia_Book/3#p2_1))"
    );
    Ok(())
}

/// Test that a quoted paragraph missing from the target edition is reported
#[test]
fn test_finalize_quoteOfUnknownParagraph_shouldReportReferenceNotFound() -> Result<()> {
    let resolver = common::spanish_resolver();
    let extractor = LineExtractor::new("en", "es", DocumentKind::Article, resolver.clone())?;
    let finalizer = Finalizer::new("en", "es", resolver, Arc::new(ProportionalPlacement))?;

    let lines = ["> Lost words [UB 9:1.1](/en/The_Urantia_Book/9#p1_1)"];
    let extraction = extractor.extract_document("doc.md", &lines);
    let result = finalizer.finalize("doc.md", &extraction.records);

    assert!(result
        .errors
        .iter()
        .any(|e| matches!(e, PipelineError::ReferenceNotFound { reference, .. } if reference == "9:1.1")));
    assert_eq!(result.lines[0], "> Lost words [LU 9:1.1](/es/The_Urantia_Book/9#p1_1)");
    Ok(())
}

/// Test that a duplicated placeholder is collapsed to a single extract
#[test]
fn test_finalize_duplicatedPlaceholder_shouldKeepOneExtract() -> Result<()> {
    let resolver = common::spanish_resolver();
    let extractor = LineExtractor::new("en", "es", DocumentKind::Article, resolver.clone())?;
    let strict = Finalizer::new("en", "es", resolver.clone(), Arc::new(StrictPlacement))?;
    let proportional = Finalizer::new("en", "es", resolver, Arc::new(ProportionalPlacement))?;

    let mut records = extractor.extract_document("doc.md", &["Value $x$ is small"]).records;
    records[0].translation = Some("El valor {0} {0} es pequeño".to_string());

    let result = proportional.finalize("doc.md", &records);
    assert!(result.is_clean());
    assert_eq!(result.lines[0].matches("$x$").count(), 1);

    let result = strict.finalize("doc.md", &records);
    assert!(matches!(
        result.errors.as_slice(),
        [PipelineError::PlaceholderUnresolved { index: 0, .. }]
    ));
    Ok(())
}

/// Test that the placement fallback is a pure function of its inputs
#[test]
fn test_proportionalOffset_sameInputs_shouldGiveSameOffset() {
    let translation = "La luz y la vida del universo";
    let offsets: Vec<usize> = (0..5).map(|_| proportional_offset(12, 30, translation)).collect();
    assert!(offsets.windows(2).all(|pair| pair[0] == pair[1]));
    assert!(translation.is_char_boundary(offsets[0]));
}
