//! Document-level types and the document source contract.

use super::{TextRun, TocEntry};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A source of layout data for one document.
///
/// Implementations wrap whatever extractor turned the original file into
/// styled runs. Pages must be served in reading order, and runs within a
/// page top-to-bottom as closely as the source format allows.
pub trait DocumentSource {
    /// Document name used to attribute sections (usually the file name).
    fn name(&self) -> &str;

    /// The native table of contents, if the source format exposes one.
    fn toc(&self) -> Option<&[TocEntry]>;

    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Meaningful runs of a page (1-indexed), in reading order.
    ///
    /// Returns [`Error::MalformedPage`] when the page's run data is absent
    /// or inconsistent; callers skip that page and continue.
    fn page_runs(&self, page: u32) -> Result<Vec<TextRun>>;
}

/// A document described by serialized layout data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Document name
    #[serde(default)]
    pub name: String,

    /// Table of contents, when the extractor found one
    #[serde(default)]
    pub toc: Option<Vec<TocEntry>>,

    /// Pages in reading order
    #[serde(default)]
    pub pages: Vec<LayoutPage>,
}

impl LayoutDocument {
    /// Create a new empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            toc: None,
            pages: Vec::new(),
        }
    }

    /// Attach a table of contents.
    pub fn with_toc(mut self, toc: Vec<TocEntry>) -> Self {
        self.toc = Some(toc);
        self
    }

    /// Append a page holding the given runs.
    pub fn add_page(&mut self, runs: Vec<TextRun>) {
        let number = self.pages.len() as u32 + 1;
        self.pages.push(LayoutPage {
            number: Some(number),
            runs: Some(runs),
        });
    }

    /// Append a page and return the document (builder style).
    pub fn with_page(mut self, runs: Vec<TextRun>) -> Self {
        self.add_page(runs);
        self
    }

    /// Parse layout JSON from a string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse layout JSON from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a layout JSON file.
    ///
    /// When the file does not name the document, the file stem is used.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut doc = Self::from_reader(BufReader::new(file))?;
        if doc.name.is_empty() {
            doc.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(doc)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl DocumentSource for LayoutDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn toc(&self) -> Option<&[TocEntry]> {
        self.toc.as_deref()
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_runs(&self, page: u32) -> Result<Vec<TextRun>> {
        let malformed = |reason: String| Error::MalformedPage { page, reason };

        let layout_page = page
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .ok_or_else(|| malformed(format!("document has {} pages", self.pages.len())))?;

        if let Some(number) = layout_page.number {
            if number != page {
                return Err(malformed(format!("page is numbered {}", number)));
            }
        }

        let runs = layout_page
            .runs
            .as_ref()
            .ok_or_else(|| malformed("missing run data".to_string()))?;

        let mut accepted = Vec::with_capacity(runs.len());
        for (i, run) in runs.iter().enumerate() {
            run.check().map_err(|e| malformed(format!("run {}: {}", i, e)))?;
            if run.page != 0 && run.page != page {
                return Err(malformed(format!("run {} claims page {}", i, run.page)));
            }
            if let Some(run) = run.clone().on_page(page).accept() {
                accepted.push(run);
            }
        }
        Ok(accepted)
    }
}

/// A single page of layout data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutPage {
    /// Page number (1-indexed), if the extractor recorded one
    #[serde(default)]
    pub number: Option<u32>,

    /// Runs on the page; `None` when the extractor could not read the page
    #[serde(default)]
    pub runs: Option<Vec<TextRun>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = LayoutDocument::new("report.pdf");
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert!(doc.toc().is_none());
    }

    #[test]
    fn test_page_runs_filters_and_stamps_page() {
        let doc = LayoutDocument::new("a").with_page(vec![]).with_page(vec![
            TextRun::new("Introduction", 14.0),
            TextRun::new("ok", 14.0),
        ]);

        let runs = doc.page_runs(2).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].page, 2);
    }

    #[test]
    fn test_page_runs_missing_data() {
        let mut doc = LayoutDocument::new("a");
        doc.pages.push(LayoutPage {
            number: Some(1),
            runs: None,
        });

        let err = doc.page_runs(1).unwrap_err();
        assert!(matches!(err, Error::MalformedPage { page: 1, .. }));
    }

    #[test]
    fn test_page_runs_inconsistent_page() {
        let doc = LayoutDocument::new("a").with_page(vec![TextRun::new("Body text", 11.0).on_page(4)]);
        assert!(doc.page_runs(1).is_err());
        assert!(doc.page_runs(0).is_err());
        assert!(doc.page_runs(2).is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "name": "guide.pdf",
            "toc": [{"level": 1, "title": "Start", "page": 1}],
            "pages": [{"runs": [{"text": "Start here", "font_size": 16, "font_name": "Arial-Bold", "x": 72, "y": 90}]}]
        }"#;
        let doc = LayoutDocument::from_json_str(json).unwrap();
        assert_eq!(doc.toc().map(|t| t.len()), Some(1));

        let runs = doc.page_runs(1).unwrap();
        assert!(runs[0].is_bold);
    }
}
