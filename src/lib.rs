//! # unoutline
//!
//! Document structure inference from page layout data.
//!
//! This library takes the styled text runs an external PDF extractor
//! produces (text, font size, weight, position, page) and infers a
//! document title and a leveled outline. In persona mode it ranks sections
//! across a collection of documents for a reader role and links related
//! sections through externally computed embeddings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unoutline::{outline_file, render};
//!
//! fn main() -> unoutline::Result<()> {
//!     // Build the outline of a layout file
//!     let result = outline_file("report.json")?;
//!
//!     // Render it
//!     println!("{}", render::to_json(&result, render::JsonFormat::Pretty)?);
//!     println!("{}", render::outline_to_markdown(&result));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Table of contents first**: native bookmarks are used verbatim when present
//! - **Layout fallback**: font size, weight and section numbering drive heading levels
//! - **CJK support**: byte-length text filters and full-width section numbers
//! - **Persona ranking**: keyword-weighted importance per reader role
//! - **Semantic linking**: cosine similarity graph over pluggable embeddings
//! - **Parallel processing**: Uses Rayon across documents and similarity rows

pub mod collection;
pub mod error;
pub mod link;
pub mod model;
pub mod parser;
pub mod persona;
pub mod render;

// Re-export commonly used types
pub use collection::{analyze, AnalyzeOptions, Collection, CollectionAnalyzer, CollectionConfig};
pub use error::{Error, Result};
pub use link::{
    build_connections, ConnectionGraphBuilder, EmbeddingProvider, LinkOptions,
    PrecomputedEmbeddings, SIMILARITY_THRESHOLD,
};
pub use model::{
    BatchMetadata, BatchResult, ConnectionEdge, DocumentSource, Heading, HeadingLevel,
    LayoutDocument, LayoutPage, OutlineResult, Section, TextRun, TocEntry,
};
pub use parser::{
    build_outline, extract_title, HeadingOptions, OutlineBuilder, OutlineOptions, TitleOptions,
    TocPolicy,
};
pub use persona::{PersonaProfile, PersonaScorer, PersonaStore, SectionFilter};
pub use render::JsonFormat;

use std::collections::BTreeMap;
use std::path::Path;

/// Build the outline of a layout JSON file.
///
/// # Arguments
///
/// * `path` - Path to the layout file
///
/// # Example
///
/// ```no_run
/// use unoutline::outline_file;
///
/// let result = outline_file("report.json").unwrap();
/// println!("{}", result.title);
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<OutlineResult> {
    outline_file_with_options(path, &OutlineOptions::default())
}

/// Build the outline of a layout JSON file with custom options.
pub fn outline_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &OutlineOptions,
) -> Result<OutlineResult> {
    let doc = LayoutDocument::open(path)?;
    Ok(build_outline(&doc, options))
}

/// Outlines of several files, keyed by file name.
pub type OutlineSet = BTreeMap<String, OutlineResult>;

/// Build the outlines of several layout JSON files.
///
/// Results are keyed by each path's file name. Files are read one at a
/// time in iteration order and the first unreadable file is an error. When
/// two paths share a file name, the later one wins.
///
/// # Example
///
/// ```no_run
/// use unoutline::{outline_files, render, JsonFormat, OutlineOptions};
///
/// let outlines = outline_files(["a.json", "b.json"], &OutlineOptions::default())?;
/// println!("{}", render::to_json(&outlines, JsonFormat::Pretty)?);
/// # Ok::<(), unoutline::Error>(())
/// ```
pub fn outline_files<I, P>(paths: I, options: &OutlineOptions) -> Result<OutlineSet>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut outlines = OutlineSet::new();
    for path in paths {
        let path = path.as_ref();
        let key = outline_key(path);
        let result = outline_file_with_options(path, options)?;
        if outlines.insert(key, result).is_some() {
            log::warn!("{}: replaces an earlier file with the same name", path.display());
        }
    }
    Ok(outlines)
}

/// Key of a file in an [`OutlineSet`]: its file name, or the whole path when it has none.
pub fn outline_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Build the outline of layout JSON held in a string.
pub fn outline_json(json: &str) -> Result<OutlineResult> {
    let doc = LayoutDocument::from_json_str(json)?;
    Ok(build_outline(&doc, &OutlineOptions::default()))
}

/// Builder for outlining documents.
///
/// # Example
///
/// ```no_run
/// use unoutline::Unoutline;
///
/// let json = Unoutline::new()
///     .title_anywhere_on_page()
///     .with_max_title_parts(5)
///     .open("report.json")?
///     .to_json(unoutline::JsonFormat::Pretty)?;
/// # Ok::<(), unoutline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Unoutline {
    options: OutlineOptions,
}

impl Unoutline {
    /// Create a new Unoutline builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consider prominent runs anywhere on the first page for the title.
    pub fn title_anywhere_on_page(mut self) -> Self {
        self.options.title = self.options.title.anywhere_on_page();
        self
    }

    /// Keep at most `parts` title parts.
    pub fn with_max_title_parts(mut self, parts: usize) -> Self {
        self.options.title = self.options.title.with_max_parts(parts);
        self
    }

    /// Set the table-of-contents policy.
    pub fn with_toc_policy(mut self, policy: TocPolicy) -> Self {
        self.options.toc_policy = policy;
        self
    }

    /// Set heading detection options.
    pub fn with_heading_options(mut self, heading: HeadingOptions) -> Self {
        self.options.heading = heading;
        self
    }

    /// Outline a document from any source.
    pub fn outline<S: DocumentSource + ?Sized>(&self, doc: &S) -> UnoutlineResult {
        UnoutlineResult {
            outline: build_outline(doc, &self.options),
        }
    }

    /// Load a layout JSON file and outline it.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<UnoutlineResult> {
        let doc = LayoutDocument::open(path)?;
        Ok(self.outline(&doc))
    }
}

/// Result of outlining a document.
#[derive(Debug, Clone)]
pub struct UnoutlineResult {
    outline: OutlineResult,
}

impl UnoutlineResult {
    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.outline, format)
    }

    /// Convert to Markdown.
    pub fn to_markdown(&self) -> String {
        render::outline_to_markdown(&self.outline)
    }

    /// Get the outline.
    pub fn outline(&self) -> &OutlineResult {
        &self.outline
    }

    /// Take the outline.
    pub fn into_outline(self) -> OutlineResult {
        self.outline
    }
}
