//! Connection graph options.

use crate::error::{Error, Result};

/// Pairs must be strictly more similar than this to be linked.
pub const SIMILARITY_THRESHOLD: f32 = 0.7;

/// Options for building the connection graph.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkOptions {
    /// Similarity a pair must exceed
    pub threshold: f32,

    /// Link only the first N fragments (`None` = all)
    ///
    /// Pair evaluation is quadratic; with sections sorted by importance this
    /// keeps the most important ones.
    pub max_fragments: Option<usize>,

    /// Evaluate rows of the similarity matrix in parallel
    pub parallel: bool,
}

impl LinkOptions {
    /// Create new link options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the similarity threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Limit the number of linked fragments.
    pub fn with_max_fragments(mut self, max: usize) -> Self {
        self.max_fragments = Some(max);
        self
    }

    /// Enable or disable parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel evaluation.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check that the options can be used.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(-1.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidConfig(format!(
                "similarity threshold {} is outside [-1, 1]",
                self.threshold
            )));
        }
        Ok(())
    }
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            threshold: SIMILARITY_THRESHOLD,
            max_fragments: None,
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_options_builder() {
        let options = LinkOptions::new()
            .with_threshold(0.8)
            .with_max_fragments(100)
            .sequential();
        assert_eq!(options.threshold, 0.8);
        assert_eq!(options.max_fragments, Some(100));
        assert!(!options.parallel);
    }

    #[test]
    fn test_validate() {
        assert!(LinkOptions::default().validate().is_ok());
        assert!(LinkOptions::new().with_threshold(1.5).validate().is_err());
        assert!(LinkOptions::new().with_threshold(f32::NAN).validate().is_err());
    }
}
