//! Embedding provider contract and a lookup-table implementation.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, Result};

/// A provider that turns texts into fixed-length vectors.
///
/// Called once per batch. Implementations return one vector per input, in
/// input order, or an error for the whole batch; partial results are not
/// allowed.
pub trait EmbeddingProvider {
    /// Embed a batch of texts.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Provider name used in log messages.
    fn name(&self) -> &str {
        "embedding"
    }
}

impl<F> EmbeddingProvider for F
where
    F: Fn(&[&str]) -> Result<Vec<Vec<f32>>>,
{
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self(texts)
    }
}

/// Embeddings computed ahead of time, looked up by exact text.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedEmbeddings {
    vectors: HashMap<String, Vec<f32>>,
}

impl PrecomputedEmbeddings {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object mapping texts to vectors.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self {
            vectors: serde_json::from_str(json)?,
        })
    }

    /// Load a JSON object mapping texts to vectors.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            vectors: serde_json::from_reader(BufReader::new(file))?,
        })
    }

    /// Add or replace the vector for a text.
    pub fn insert(&mut self, text: impl Into<String>, vector: Vec<f32>) {
        self.vectors.insert(text.into(), vector);
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl FromIterator<(String, Vec<f32>)> for PrecomputedEmbeddings {
    fn from_iter<I: IntoIterator<Item = (String, Vec<f32>)>>(iter: I) -> Self {
        Self {
            vectors: iter.into_iter().collect(),
        }
    }
}

impl EmbeddingProvider for PrecomputedEmbeddings {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|text| {
                self.vectors
                    .get(*text)
                    .cloned()
                    .ok_or_else(|| Error::EmbeddingProvider(format!("no vector for {:?}", text)))
            })
            .collect()
    }

    fn name(&self) -> &str {
        "precomputed"
    }
}
