/*!
 * Common test utilities for the wikitrans test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use wikitrans::document::{ParagraphIndex, StructuredReference};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content, including parent folders
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Route library logs to the test output
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Spanish edition paragraphs used across tests
pub fn spanish_resolver() -> Arc<ParagraphIndex> {
    let mut index = ParagraphIndex::new();
    index.insert(StructuredReference::new(3, 2, 1), "Dios es espíritu.");
    index.insert(StructuredReference::new(3, 2, 2), "Dios es amor.");
    index.insert(StructuredReference::new(1, 0, 1), "Dios es el Padre Universal.");
    Arc::new(index)
}

/// English edition paragraphs, for runs where source and target match
pub fn english_resolver() -> Arc<ParagraphIndex> {
    let mut index = ParagraphIndex::new();
    index.insert(StructuredReference::new(3, 2, 1), "God is spirit.");
    index.insert(StructuredReference::new(3, 2, 2), "God is love.");
    Arc::new(index)
}

/// An article exercising most line kinds
pub const SAMPLE_ARTICLE: &str = r#"---
title: "Hello World"
description: A short page
published: true
---
<figure class="table chapter-navigator">
<a href="/en/index">Index</a>
</figure>

# The nature of God

As written in [UB 3:2.1](/en/The_Urantia_Book/3#p2_1), God is "spirit".<br>
Read <a href="/en/article/Love">this article</a> or <a href="https://example.org">that one</a>.

> God is spirit.
> ([UB 3:2.1](/en/The_Urantia_Book/3#p2_1))

    Energy is $E = mc^2$ here.

$$
x^2 + y^2
$$

<figure class="image">
<img src="/image/a.png">
<figcaption>The Paradise Isle</figcaption>
</figure>

<p class="v-card">© 2024 Foundation</p>
"#;
