/*!
 * Tests for line extraction
 */

use anyhow::Result;
use wikitrans::document::{DocumentKind, LineRole};
use wikitrans::extraction::LineExtractor;
use wikitrans::PipelineError;
use crate::common;

fn extractor(kind: DocumentKind) -> Result<LineExtractor> {
    LineExtractor::new("en", "es", kind, common::spanish_resolver())
}

/// Test that two hyperlink attributes give two ordered extracts and tokens
#[test]
fn test_extract_twoHrefAttributes_shouldProduceTwoOrderedPlaceholders() -> Result<()> {
    let line = r#"See <a href="/en/a">first</a> and <a href="/en/b">second</a>"#;
    let extraction = extractor(DocumentKind::Article)?.extract_document("doc.md", &[line]);
    let record = &extraction.records[0];

    assert_eq!(record.extracts, vec!["/es/a", "/es/b"]);
    let text = record.translatable_text.as_deref().unwrap_or_default();
    assert!(text.find("{0}") < text.find("{1}"));
    assert_eq!(text.matches("{0}").count(), 1);
    assert_eq!(text.matches("{1}").count(), 1);
    Ok(())
}

/// Test that a document made of a single blank line yields nothing to translate
#[test]
fn test_extract_singleBlankLine_shouldYieldNoTranslatableRecords() -> Result<()> {
    let extraction = extractor(DocumentKind::Article)?.extract_document("doc.md", &[""]);

    assert_eq!(extraction.records.len(), 1);
    assert_eq!(extraction.translatable_count(), 0);
    assert!(extraction.warnings.is_empty());
    Ok(())
}

/// Test the sample article record by record
#[test]
fn test_extract_sampleArticle_shouldClassifyAndExtract() -> Result<()> {
    let lines: Vec<&str> = common::SAMPLE_ARTICLE.split('\n').collect();
    let extraction = extractor(DocumentKind::Article)?.extract_document("doc.md", &lines);
    let records = &extraction.records;

    assert_eq!(records[1].translatable_text.as_deref(), Some("Hello World"));
    assert_eq!(records[2].translatable_text.as_deref(), Some("A short page"));
    assert!(records[5..=7].iter().all(|r| r.remove));
    assert_eq!(
        records[11].translatable_text.as_deref(),
        Some("As written in {0}, God is \"spirit\".<br>")
    );
    assert_eq!(records[14].role, LineRole::Quote);
    assert_eq!(records[15].role, LineRole::Quote);
    assert_eq!(records[17].translatable_text.as_deref(), Some("Energy is {0} here."));
    assert!(records[19..=21].iter().all(|r| r.role == LineRole::Math && r.ignore));
    assert_eq!(
        records[25].translatable_text.as_deref(),
        Some("<figcaption>The Paradise Isle</figcaption>")
    );
    assert_eq!(records[28].role, LineRole::Copyright);
    assert_eq!(extraction.translatable_count(), 8);
    Ok(())
}

/// Test that article anchors are stripped while book anchors stay
#[test]
fn test_extract_inlineAnchor_shouldOnlyBeStrippedFromArticles() -> Result<()> {
    let line = r#"<a id="top"></a>Welcome to the page"#;

    let article = extractor(DocumentKind::Article)?.extract_document("a.md", &[line]);
    assert_eq!(article.records[0].translatable_text.as_deref(), Some("Welcome to the page"));

    let book = extractor(DocumentKind::Book)?.extract_document("b.md", &[line]);
    assert_eq!(book.records[0].translatable_text.as_deref(), Some(line));
    Ok(())
}

/// Test that svg text tags are extracted in book documents
#[test]
fn test_extract_svgText_shouldExtractTags() -> Result<()> {
    let line = r#"<text x="10" y="20">Paradise</text>"#;
    let extraction = extractor(DocumentKind::Book)?.extract_document("b.md", &[line]);
    let record = &extraction.records[0];

    assert_eq!(record.translatable_text.as_deref(), Some("{0}Paradise{1}"));
    assert_eq!(record.extracts, vec![r#"<text x="10" y="20">"#, "</text>"]);
    Ok(())
}

/// Test that a link to a paragraph missing from the target edition is a warning
#[test]
fn test_extract_unresolvableLink_shouldRecordWarning() -> Result<()> {
    let line = "Compare [UB 44:0.1](/en/The_Urantia_Book/44#p0_1) with this.";
    let extraction = extractor(DocumentKind::Article)?.extract_document("doc.md", &[line]);

    assert!(matches!(
        extraction.warnings.as_slice(),
        [PipelineError::ReferenceNotFound { line: 0, .. }]
    ));
    assert!(extraction.records[0].is_translatable());
    Ok(())
}

/// Test that a quotation citing two paragraphs is translated as ordinary text
#[test]
fn test_extract_ambiguousQuote_shouldStayTranslatable() -> Result<()> {
    let lines = [
        "> One [UB 3:2.1](/en/The_Urantia_Book/3#p2_1)",
        "> Two [UB 3:2.2](/en/The_Urantia_Book/3#p2_2)",
    ];
    let extraction = extractor(DocumentKind::Article)?.extract_document("doc.md", &lines);

    assert!(extraction.spans.is_empty());
    assert!(extraction.records.iter().all(|r| r.role == LineRole::Other && r.is_translatable()));
    Ok(())
}
