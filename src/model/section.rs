//! Persona-mode section and connection types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A text run selected for a persona, with its importance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section text
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Name of the document the section came from
    pub document: String,

    /// Importance weight (1 = baseline)
    pub importance: u32,

    /// Whether the run looks like a heading for this persona
    pub is_heading_like: bool,
}

/// A semantic link between two sections of a batch.
///
/// Indices refer to the batch's final section list. Stored with
/// `source < target`; one edge per unordered pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionEdge {
    /// Index of the first section
    pub source: usize,

    /// Index of the second section
    pub target: usize,

    /// Cosine similarity of the two sections' embeddings
    pub strength: f32,
}

impl ConnectionEdge {
    /// Create an edge, ordering the endpoints.
    pub fn new(a: usize, b: usize, strength: f32) -> Self {
        let (source, target) = if a <= b { (a, b) } else { (b, a) };
        Self {
            source,
            target,
            strength,
        }
    }
}

/// Information about a processed batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchMetadata {
    /// Names of the documents in processing order
    pub input_documents: Vec<String>,

    /// Persona the batch was scored for
    pub persona: String,

    /// When the batch was processed
    pub processing_timestamp: DateTime<Utc>,
}

/// Sections and connections for a collection of documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Batch information
    pub metadata: BatchMetadata,

    /// Sections sorted by descending importance
    pub sections: Vec<Section>,

    /// Links between sections
    pub connections: Vec<ConnectionEdge>,

    /// Why connections are empty, when the embedding stage failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_error: Option<String>,
}
