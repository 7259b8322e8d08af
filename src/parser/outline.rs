//! Outline building: native table of contents first, layout heuristics otherwise.

use std::collections::HashSet;

use super::layout::{group_runs_into_lines, TextLine};
use super::numbering::parse_number_prefix;
use super::options::{HeadingOptions, OutlineOptions, TocPolicy};
use super::title::extract_title;
use crate::model::{DocumentSource, Heading, HeadingLevel, OutlineResult, TocEntry, MIN_TEXT_BYTES};

/// Which path produced an outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineSource {
    /// Mapped from the document's table of contents
    Toc,
    /// Detected from font size, weight and numbering
    Layout,
}

/// Builds titles and outlines for documents.
#[derive(Debug, Clone, Default)]
pub struct OutlineBuilder {
    options: OutlineOptions,
}

impl OutlineBuilder {
    /// Create a builder with the given options.
    pub fn new(options: OutlineOptions) -> Self {
        Self { options }
    }

    /// Get the builder's options.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Build the title and outline of a document.
    pub fn build<S: DocumentSource + ?Sized>(&self, doc: &S) -> OutlineResult {
        self.build_with_source(doc).0
    }

    /// Build the title and outline, reporting which path produced the outline.
    pub fn build_with_source<S: DocumentSource + ?Sized>(
        &self,
        doc: &S,
    ) -> (OutlineResult, OutlineSource) {
        let title = self.title(doc);

        if let Some(toc) = doc.toc().filter(|toc| !toc.is_empty()) {
            let headings = toc_headings(toc);
            if !headings.is_empty() || self.options.toc_policy == TocPolicy::TrustToc {
                log::debug!(
                    "{}: outline from table of contents ({} of {} entries)",
                    doc.name(),
                    headings.len(),
                    toc.len()
                );
                return (OutlineResult::new(title, headings), OutlineSource::Toc);
            }
            log::debug!("{}: table of contents has no usable entries", doc.name());
        }

        let headings = detect_headings_by_layout(doc, &title, &self.options.heading);
        log::debug!(
            "{}: {} headings detected from layout",
            doc.name(),
            headings.len()
        );
        (OutlineResult::new(title, headings), OutlineSource::Layout)
    }

    /// Extract the title from the first page; empty when the page is missing or unreadable.
    pub fn title<S: DocumentSource + ?Sized>(&self, doc: &S) -> String {
        if doc.page_count() == 0 {
            return String::new();
        }
        match doc.page_runs(1) {
            Ok(runs) => extract_title(&runs, &self.options.title),
            Err(e) => {
                log::warn!("{}: no title, first page unreadable: {}", doc.name(), e);
                String::new()
            }
        }
    }
}

/// Build the title and outline of a document.
pub fn build_outline<S: DocumentSource + ?Sized>(doc: &S, options: &OutlineOptions) -> OutlineResult {
    OutlineBuilder::new(options.clone()).build(doc)
}

/// Minimum number of characters in a table-of-contents title.
pub const MIN_TOC_TITLE_CHARS: usize = 3;

/// Map table-of-contents entries to headings, dropping entries with too little text.
///
/// Titles are measured in characters, unlike layout lines which are measured in bytes.
pub fn toc_headings(toc: &[TocEntry]) -> Vec<Heading> {
    toc.iter()
        .filter_map(|entry| {
            let text = entry.title.trim();
            if text.chars().count() < MIN_TOC_TITLE_CHARS {
                return None;
            }
            if entry.level == 0 {
                log::warn!("Skipping table of contents entry {:?} with level 0", text);
                return None;
            }
            Some(Heading::new(
                HeadingLevel::new(entry.level),
                text,
                entry.page,
            ))
        })
        .collect()
}

/// Detect headings from layout, page by page.
///
/// Every examined line is remembered, so a text that first appears as body
/// copy is never promoted later; lines equal to `title` are skipped.
/// Malformed pages are logged and skipped.
pub fn detect_headings_by_layout<S: DocumentSource + ?Sized>(
    doc: &S,
    title: &str,
    options: &HeadingOptions,
) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for page in 1..=doc.page_count() {
        let runs = match doc.page_runs(page) {
            Ok(runs) => runs,
            Err(e) => {
                log::warn!("{}: skipping page: {}", doc.name(), e);
                continue;
            }
        };

        for line in group_runs_into_lines(runs, options.line_tolerance) {
            let text = line.text();
            if text.len() < MIN_TEXT_BYTES || text == title {
                continue;
            }
            if !seen.insert(text.clone()) {
                continue;
            }
            if is_heading_like(&line, options) {
                headings.push(Heading::new(heading_level(&text, page, options), text, page));
            }
        }
    }

    headings
}

/// Check if a line is styled like a heading.
pub fn is_heading_like(line: &TextLine, options: &HeadingOptions) -> bool {
    let size = line.avg_font_size();
    size > options.min_font_size && (line.is_bold() || size > options.large_font_size)
}

/// Assign a level to heading text found on `page`.
///
/// Numbered headings take their depth from the numbering; unnumbered ones
/// are H1 on early pages and H2 afterwards.
pub fn heading_level(text: &str, page: u32, options: &HeadingOptions) -> HeadingLevel {
    if let Some(prefix) = parse_number_prefix(text) {
        HeadingLevel::new(prefix.depth())
    } else if page <= options.early_page_limit {
        HeadingLevel::H1
    } else {
        HeadingLevel::H2
    }
}
