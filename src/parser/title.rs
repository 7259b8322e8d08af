//! Title extraction from first-page runs.

use std::collections::{HashMap, HashSet};

use super::options::TitleOptions;
use crate::model::TextRun;

/// Assemble a document title from the stylistically prominent runs of the first page.
///
/// Candidates are bold runs or runs larger than `options.min_font_size`,
/// restricted to the top of the page when `options.max_y` is set. They are
/// put in reading order (top-to-bottom, then left-to-right), texts repeated
/// more than `options.max_repeats` times are dropped as watermarks, and the
/// remaining duplicates collapse to their first occurrence.
///
/// Returns an empty string when no run qualifies.
pub fn extract_title(runs: &[TextRun], options: &TitleOptions) -> String {
    let mut candidates: Vec<&TextRun> = runs
        .iter()
        .filter(|r| r.is_meaningful())
        .filter(|r| r.is_bold || r.font_size > options.min_font_size)
        .filter(|r| options.max_y.map_or(true, |max_y| r.y < max_y))
        .collect();

    if candidates.is_empty() {
        return String::new();
    }

    candidates.sort_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for run in &candidates {
        *counts.entry(run.text.trim()).or_insert(0) += 1;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut parts: Vec<&str> = candidates
        .iter()
        .map(|r| r.text.trim())
        .filter(|t| counts.get(t).copied().unwrap_or(0) <= options.max_repeats)
        .filter(|t| seen.insert(*t))
        .collect();

    if let Some(max_parts) = options.max_parts {
        parts.truncate(max_parts);
    }

    log::debug!("Title assembled from {} of {} runs", parts.len(), runs.len());

    parts
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
