//! Pairwise similarity graph over embedded fragments.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use super::embedding::EmbeddingProvider;
use super::options::LinkOptions;
use crate::error::{Error, Result};
use crate::model::ConnectionEdge;

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    cosine_with_norms(a, norm(a), b, norm(b))
}

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn cosine_with_norms(a: &[f32], norm_a: f32, b: &[f32], norm_b: f32) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Builds connection edges, caching embeddings across batches.
///
/// A builder lives for one request: fragments embedded by an earlier call
/// are not sent to the provider again.
#[derive(Debug, Default)]
pub struct ConnectionGraphBuilder {
    options: LinkOptions,
    cache: HashMap<String, Vec<f32>>,
}

impl ConnectionGraphBuilder {
    /// Create a builder with the given options.
    pub fn new(options: LinkOptions) -> Self {
        Self {
            options,
            cache: HashMap::new(),
        }
    }

    /// Get the builder's options.
    pub fn options(&self) -> &LinkOptions {
        &self.options
    }

    /// Number of cached embeddings.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Link every pair of fragments whose similarity exceeds the threshold.
    ///
    /// Edges come out ordered by source, then target, with `source < target`.
    /// Indices refer to positions in `fragments`.
    pub fn build<S: AsRef<str>>(
        &mut self,
        fragments: &[S],
        provider: &dyn EmbeddingProvider,
    ) -> Result<Vec<ConnectionEdge>> {
        self.options.validate()?;

        let count = self
            .options
            .max_fragments
            .map_or(fragments.len(), |max| max.min(fragments.len()));
        let fragments: Vec<&str> = fragments[..count].iter().map(|f| f.as_ref()).collect();

        self.embed_missing(&fragments, provider)?;

        let vectors: Vec<&[f32]> = fragments
            .iter()
            .map(|f| {
                self.cache
                    .get(*f)
                    .map(Vec::as_slice)
                    .ok_or_else(|| Error::EmbeddingProvider(format!("no vector for {:?}", f)))
            })
            .collect::<Result<_>>()?;
        let norms: Vec<f32> = vectors.iter().map(|v| norm(v)).collect();

        let threshold = self.options.threshold;
        let row = |i: usize| {
            let (vectors, norms) = (&vectors, &norms);
            ((i + 1)..vectors.len()).filter_map(move |j| {
                let strength = cosine_with_norms(vectors[i], norms[i], vectors[j], norms[j]);
                (strength > threshold).then(|| ConnectionEdge::new(i, j, strength))
            })
        };

        let edges: Vec<ConnectionEdge> = if self.options.parallel {
            (0..vectors.len()).into_par_iter().flat_map_iter(row).collect()
        } else {
            (0..vectors.len()).flat_map(row).collect()
        };

        log::debug!(
            "{} edges over {} fragments (threshold {})",
            edges.len(),
            vectors.len(),
            threshold
        );
        Ok(edges)
    }

    /// Embed the fragments not yet cached, in one provider call.
    fn embed_missing(&mut self, fragments: &[&str], provider: &dyn EmbeddingProvider) -> Result<()> {
        let mut pending = HashSet::new();
        let missing: Vec<&str> = fragments
            .iter()
            .copied()
            .filter(|f| !self.cache.contains_key(*f) && pending.insert(*f))
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        log::debug!(
            "Embedding {} new fragments with {} ({} cached)",
            missing.len(),
            provider.name(),
            self.cache.len()
        );
        let vectors = provider.embed(&missing)?;
        if vectors.len() != missing.len() {
            return Err(Error::EmbeddingMismatch {
                expected: missing.len(),
                actual: vectors.len(),
            });
        }

        let dimensions = self
            .cache
            .values()
            .next()
            .or_else(|| vectors.first())
            .map_or(0, Vec::len);
        if let Some(bad) = vectors.iter().find(|v| v.is_empty() || v.len() != dimensions) {
            return Err(Error::EmbeddingProvider(format!(
                "vector of length {} where {} was expected",
                bad.len(),
                dimensions
            )));
        }

        for (text, vector) in missing.into_iter().zip(vectors) {
            self.cache.insert(text.to_string(), vector);
        }
        Ok(())
    }
}

/// Link fragments with a fresh builder.
pub fn build_connections<S: AsRef<str>>(
    fragments: &[S],
    provider: &dyn EmbeddingProvider,
    options: &LinkOptions,
) -> Result<Vec<ConnectionEdge>> {
    ConnectionGraphBuilder::new(options.clone()).build(fragments, provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::PrecomputedEmbeddings;
    use std::cell::RefCell;

    /// Unit vectors in the plane at the given angles (cos of the difference = similarity).
    fn planar(angles: &[(&str, f32)]) -> PrecomputedEmbeddings {
        angles
            .iter()
            .map(|(text, angle)| (text.to_string(), vec![angle.cos(), angle.sin()]))
            .collect()
    }

    fn three_fragments() -> (Vec<&'static str>, PrecomputedEmbeddings) {
        // Vectors chosen so that sim(0,1)=0.9, sim(0,2)=0.5, sim(1,2)=0.75
        let a = [1.0f32, 0.0, 0.0];
        let b = [0.9f32, (1.0f32 - 0.81).sqrt(), 0.0];
        let c2 = (0.75 - 0.5 * 0.9) / b[1];
        let c = [0.5f32, c2, (1.0 - 0.25 - c2 * c2).sqrt()];
        let table = vec![
            ("alpha".to_string(), a.to_vec()),
            ("beta".to_string(), b.to_vec()),
            ("gamma".to_string(), c.to_vec()),
        ]
        .into_iter()
        .collect();
        (vec!["alpha", "beta", "gamma"], table)
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let (fragments, table) = three_fragments();
        for parallel in [true, false] {
            let options = LinkOptions::new().with_parallel(parallel);
            let edges = build_connections(&fragments, &table, &options).unwrap();

            assert_eq!(edges.len(), 2);
            assert_eq!((edges[0].source, edges[0].target), (0, 1));
            assert!((edges[0].strength - 0.9).abs() < 1e-4);
            assert_eq!((edges[1].source, edges[1].target), (1, 2));
            assert!((edges[1].strength - 0.75).abs() < 1e-4);
        }
    }

    #[test]
    fn test_pair_at_threshold_excluded() {
        let table = planar(&[("x", 0.0), ("y", 0.0)]);
        let options = LinkOptions::new().with_threshold(1.0);
        let edges = build_connections(&["x", "y"], &table, &options).unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn test_one_edge_per_pair() {
        let table = planar(&[("a", 0.0), ("b", 0.01), ("c", 0.02), ("d", 0.03)]);
        let edges = build_connections(&["a", "b", "c", "d"], &table, &LinkOptions::default()).unwrap();
        assert_eq!(edges.len(), 6);
        assert!(edges.iter().all(|e| e.source < e.target));
    }

    #[test]
    fn test_duplicate_texts_share_embedding() {
        let calls = RefCell::new(Vec::new());
        let provider = |texts: &[&str]| -> Result<Vec<Vec<f32>>> {
            calls.borrow_mut().push(texts.len());
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        };

        let edges = build_connections(&["same", "same", "other"], &provider, &LinkOptions::default()).unwrap();
        assert_eq!(*calls.borrow(), vec![2]);
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn test_cache_reused_across_batches() {
        let calls = RefCell::new(Vec::new());
        let provider = |texts: &[&str]| -> Result<Vec<Vec<f32>>> {
            calls.borrow_mut().push(texts.iter().map(|t| t.to_string()).collect::<Vec<_>>());
            Ok(texts.iter().map(|_| vec![0.0, 1.0]).collect())
        };

        let mut builder = ConnectionGraphBuilder::new(LinkOptions::default());
        builder.build(&["one", "two"], &provider).unwrap();
        builder.build(&["two", "three"], &provider).unwrap();
        builder.build(&["one", "three"], &provider).unwrap();

        assert_eq!(*calls.borrow(), vec![vec!["one", "two"], vec!["three"]]);
        assert_eq!(builder.cached(), 3);
    }

    #[test]
    fn test_short_result_is_mismatch() {
        let provider = |_: &[&str]| -> Result<Vec<Vec<f32>>> { Ok(vec![vec![1.0]]) };
        let err = build_connections(&["a", "b"], &provider, &LinkOptions::default()).unwrap_err();
        assert!(matches!(err, Error::EmbeddingMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_ragged_vectors_rejected() {
        let provider = |_: &[&str]| -> Result<Vec<Vec<f32>>> { Ok(vec![vec![1.0, 0.0], vec![1.0]]) };
        let mut builder = ConnectionGraphBuilder::new(LinkOptions::default());
        assert!(builder.build(&["a", "b"], &provider).is_err());
        assert_eq!(builder.cached(), 0);
    }

    #[test]
    fn test_max_fragments_limits_pairs() {
        let table = planar(&[("a", 0.0), ("b", 0.0), ("c", 0.0)]);
        let options = LinkOptions::new().with_max_fragments(2);
        let edges = build_connections(&["a", "b", "c"], &table, &options).unwrap();
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_empty_fragments() {
        let table = PrecomputedEmbeddings::new();
        let fragments: [&str; 0] = [];
        assert!(build_connections(&fragments, &table, &LinkOptions::default())
            .unwrap()
            .is_empty());
    }
}
