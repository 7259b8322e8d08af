//! Persona mode over a batch of documents.
//!
//! Sections are extracted per document (in parallel when enabled),
//! flattened in document order, sorted by importance, and only then
//! embedded and linked, so edge indices always refer to the final list.
//!
//! # Example
//!
//! ```no_run
//! use unoutline::collection::{analyze, AnalyzeOptions};
//! use unoutline::{LayoutDocument, PersonaStore};
//!
//! fn main() -> unoutline::Result<()> {
//!     let docs = vec![LayoutDocument::open("layouts/nice.json")?];
//!     let store = PersonaStore::builtin();
//!     let result = analyze(&docs, "Travel Planner", &store, None, &AnalyzeOptions::default())?;
//!     println!("{} sections", result.sections.len());
//!     Ok(())
//! }
//! ```

mod config;

pub use config::{
    layout_path, Collection, CollectionConfig, CollectionDocument, JobToBeDone, PersonaRole,
    LAYOUT_DIR, MANIFEST_FILE,
};

use chrono::Utc;
use rayon::prelude::*;

use crate::error::Result;
use crate::link::{ConnectionGraphBuilder, EmbeddingProvider, LinkOptions};
use crate::model::{BatchMetadata, BatchResult, DocumentSource, Section};
use crate::persona::{sort_sections, PersonaScorer, PersonaStore, SectionFilter};

/// Options for analyzing a collection.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Connection graph options
    pub link: LinkOptions,

    /// Which runs become sections
    pub section_filter: SectionFilter,

    /// Extract documents in parallel
    pub parallel: bool,
}

impl AnalyzeOptions {
    /// Create new analyze options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set link options.
    pub fn with_link(mut self, link: LinkOptions) -> Self {
        self.link = link;
        self
    }

    /// Set the section filter.
    pub fn with_section_filter(mut self, filter: SectionFilter) -> Self {
        self.section_filter = filter;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self.link.parallel = false;
        self
    }
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            link: LinkOptions::default(),
            section_filter: SectionFilter::default(),
            parallel: true,
        }
    }
}

/// Analyzes batches for one persona within one request.
///
/// Embeddings computed for one batch are reused by later batches.
#[derive(Debug)]
pub struct CollectionAnalyzer {
    scorer: PersonaScorer,
    graph: ConnectionGraphBuilder,
    section_filter: SectionFilter,
    parallel: bool,
}

impl CollectionAnalyzer {
    /// Create an analyzer for `persona`, resolved from `store`.
    pub fn new(store: &PersonaStore, persona: &str, options: &AnalyzeOptions) -> Result<Self> {
        options.link.validate()?;
        Ok(Self {
            scorer: PersonaScorer::new(store, persona),
            graph: ConnectionGraphBuilder::new(options.link.clone()),
            section_filter: options.section_filter,
            parallel: options.parallel,
        })
    }

    /// Extract, rank and link the sections of a batch of documents.
    ///
    /// An embedding failure leaves `connections` empty and records the
    /// reason in `connection_error`; sections are returned either way.
    pub fn analyze<S: DocumentSource + Sync>(
        &mut self,
        documents: &[S],
        provider: Option<&dyn EmbeddingProvider>,
    ) -> BatchResult {
        let mut sections = self.extract_all(documents);
        sort_sections(&mut sections);

        let mut connection_error = None;
        let connections = match provider {
            Some(provider) if !sections.is_empty() => {
                let texts: Vec<&str> = sections.iter().map(|s| s.text.as_str()).collect();
                match self.graph.build(&texts, provider) {
                    Ok(edges) => edges,
                    Err(e) => {
                        log::warn!("Connections skipped: {}", e);
                        connection_error = Some(e.to_string());
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        };

        BatchResult {
            metadata: BatchMetadata {
                input_documents: documents.iter().map(|d| d.name().to_string()).collect(),
                persona: self.scorer.persona().to_string(),
                processing_timestamp: Utc::now(),
            },
            sections,
            connections,
            connection_error,
        }
    }

    fn extract_all<S: DocumentSource + Sync>(&self, documents: &[S]) -> Vec<Section> {
        let per_document: Vec<Vec<Section>> = if self.parallel {
            documents
                .par_iter()
                .map(|doc| self.scorer.extract_sections(doc, self.section_filter))
                .collect()
        } else {
            documents
                .iter()
                .map(|doc| self.scorer.extract_sections(doc, self.section_filter))
                .collect()
        };
        per_document.into_iter().flatten().collect()
    }
}

/// Analyze a batch of documents for a persona.
///
/// Fails only on invalid options; see [`CollectionAnalyzer::analyze`].
pub fn analyze<S: DocumentSource + Sync>(
    documents: &[S],
    persona: &str,
    store: &PersonaStore,
    provider: Option<&dyn EmbeddingProvider>,
    options: &AnalyzeOptions,
) -> Result<BatchResult> {
    let mut analyzer = CollectionAnalyzer::new(store, persona, options)?;
    Ok(analyzer.analyze(documents, provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{LayoutDocument, TextRun};

    fn docs() -> Vec<LayoutDocument> {
        vec![
            LayoutDocument::new("south.pdf").with_page(vec![
                TextRun::bold("Coastal Towns", 14.0),
                TextRun::bold("Weekly Itinerary", 14.0),
            ]),
            LayoutDocument::new("north.pdf").with_page(vec![
                TextRun::bold("Mountain Huts", 12.0),
                TextRun::bold("Transport Links", 12.0),
            ]),
        ]
    }

    #[test]
    fn test_sections_ranked_across_documents() {
        let store = PersonaStore::builtin();
        for options in [AnalyzeOptions::default(), AnalyzeOptions::new().sequential()] {
            let result = analyze(&docs(), "Travel Planner", &store, None, &options).unwrap();
            let order: Vec<&str> = result.sections.iter().map(|s| s.text.as_str()).collect();
            assert_eq!(
                order,
                vec!["Weekly Itinerary", "Transport Links", "Coastal Towns", "Mountain Huts"]
            );
            assert!(result.connections.is_empty());
            assert!(result.connection_error.is_none());
            assert_eq!(result.metadata.input_documents, vec!["south.pdf", "north.pdf"]);
        }
    }

    #[test]
    fn test_provider_failure_keeps_sections() {
        let store = PersonaStore::builtin();
        let failing = |_: &[&str]| -> Result<Vec<Vec<f32>>> {
            Err(Error::EmbeddingProvider("model unavailable".into()))
        };
        let result = analyze(
            &docs(),
            "Travel Planner",
            &store,
            Some(&failing),
            &AnalyzeOptions::default(),
        )
        .unwrap();

        assert_eq!(result.sections.len(), 4);
        assert!(result.connections.is_empty());
        assert!(result
            .connection_error
            .as_deref()
            .unwrap()
            .contains("model unavailable"));
    }

    #[test]
    fn test_edges_index_sorted_sections() {
        let store = PersonaStore::builtin();
        // Itinerary and transport share a direction; the rest are orthogonal
        let provider = |texts: &[&str]| -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    if t.contains("Itinerary") || t.contains("Transport") {
                        vec![1.0, 0.0]
                    } else {
                        vec![0.0, 1.0]
                    }
                })
                .collect())
        };
        let options = AnalyzeOptions::new().with_link(LinkOptions::new().with_threshold(0.95));
        let result = analyze(&docs(), "Travel Planner", &store, Some(&provider), &options).unwrap();

        // Sorted list: Itinerary(0), Transport(1), Coastal(2), Mountain(3)
        let pairs: Vec<(usize, usize)> = result
            .connections
            .iter()
            .map(|e| (e.source, e.target))
            .collect();
        assert_eq!(pairs, vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let options = AnalyzeOptions::new().with_link(LinkOptions::new().with_threshold(2.0));
        let err = analyze(&docs(), "Travel Planner", &PersonaStore::builtin(), None, &options);
        assert!(matches!(err, Err(Error::InvalidConfig(_))));
    }
}
