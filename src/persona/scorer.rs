//! Persona scoring: heading-likeness and keyword importance of runs.

use std::cmp::Reverse;

use regex::{Regex, RegexBuilder};

use super::profile::{PersonaProfile, PersonaStore};
use crate::model::{DocumentSource, Section, TextRun};

/// Importance of a run that matches no keyword.
pub const BASELINE_IMPORTANCE: u32 = 1;

/// Result of classifying one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Whether the run is bold and at least the persona's heading size
    pub is_heading_like: bool,
    /// Highest matching keyword weight, or the baseline
    pub importance: u32,
}

/// Which runs become sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionFilter {
    /// Only heading-like runs
    #[default]
    HeadingLike,
    /// Every meaningful run
    All,
}

impl SectionFilter {
    fn admits(self, classification: &Classification) -> bool {
        match self {
            SectionFilter::HeadingLike => classification.is_heading_like,
            SectionFilter::All => true,
        }
    }
}

/// Scores runs for one persona.
///
/// Keyword matchers are compiled once at construction, so a scorer can be
/// shared across all documents of a batch.
#[derive(Debug, Clone)]
pub struct PersonaScorer {
    persona: String,
    min_font_size: f32,
    keywords: Vec<(Regex, u32)>,
}

impl PersonaScorer {
    /// Create a scorer for a persona resolved from `store`.
    pub fn new(store: &PersonaStore, persona: &str) -> Self {
        Self::from_profile(persona, store.resolve(persona))
    }

    /// Create a scorer from an explicit profile.
    pub fn from_profile(persona: impl Into<String>, profile: &PersonaProfile) -> Self {
        let keywords = profile
            .keywords
            .iter()
            .filter(|(keyword, _)| !keyword.trim().is_empty())
            .filter_map(|(keyword, &weight)| {
                match RegexBuilder::new(&regex::escape(keyword))
                    .case_insensitive(true)
                    .build()
                {
                    Ok(re) => Some((re, weight)),
                    Err(e) => {
                        log::warn!("Ignoring keyword {:?}: {}", keyword, e);
                        None
                    }
                }
            })
            .collect();

        Self {
            persona: persona.into(),
            min_font_size: profile.min_font_size,
            keywords,
        }
    }

    /// Name of the persona this scorer was built for.
    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Check if a run is styled like a heading for this persona.
    pub fn is_heading_like(&self, run: &TextRun) -> bool {
        run.font_size >= self.min_font_size && run.is_bold
    }

    /// Importance of a text: the highest weight among matching keywords.
    ///
    /// Weights do not add up; a text matching two weight-3 keywords scores 3.
    pub fn importance(&self, text: &str) -> u32 {
        self.keywords
            .iter()
            .filter(|(re, _)| re.is_match(text))
            .fold(BASELINE_IMPORTANCE, |acc, &(_, weight)| acc.max(weight))
    }

    /// Classify a run.
    pub fn classify(&self, run: &TextRun) -> Classification {
        Classification {
            is_heading_like: self.is_heading_like(run),
            importance: self.importance(&run.text),
        }
    }

    /// Extract the sections of one document, in page then run order.
    ///
    /// Malformed pages are logged and skipped.
    pub fn extract_sections<S: DocumentSource + ?Sized>(
        &self,
        doc: &S,
        filter: SectionFilter,
    ) -> Vec<Section> {
        let mut sections = Vec::new();

        for page in 1..=doc.page_count() {
            let runs = match doc.page_runs(page) {
                Ok(runs) => runs,
                Err(e) => {
                    log::warn!("{}: skipping page: {}", doc.name(), e);
                    continue;
                }
            };

            for run in runs {
                let classification = self.classify(&run);
                if filter.admits(&classification) {
                    sections.push(Section {
                        text: run.text,
                        page,
                        document: doc.name().to_string(),
                        importance: classification.importance,
                        is_heading_like: classification.is_heading_like,
                    });
                }
            }
        }

        log::debug!(
            "{}: {} sections for {:?}",
            doc.name(),
            sections.len(),
            self.persona
        );
        sections
    }
}

/// Classify a run against a profile.
///
/// Compiles the profile's keywords on every call; build a [`PersonaScorer`]
/// to classify many runs.
pub fn classify(run: &TextRun, profile: &PersonaProfile) -> Classification {
    PersonaScorer::from_profile("", profile).classify(run)
}

/// Sort sections by descending importance, keeping the order of equal ones.
pub fn sort_sections(sections: &mut [Section]) {
    sections.sort_by_key(|s| Reverse(s.importance));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LayoutDocument, LayoutPage};

    fn travel() -> PersonaScorer {
        PersonaScorer::new(&PersonaStore::builtin(), "Travel Planner")
    }

    fn section(text: &str, importance: u32) -> Section {
        Section {
            text: text.to_string(),
            page: 1,
            document: "d".to_string(),
            importance,
            is_heading_like: true,
        }
    }

    #[test]
    fn test_heading_like_needs_bold_and_size() {
        let scorer = travel();
        assert!(scorer.is_heading_like(&TextRun::bold("Day One", 11.0)));
        assert!(!scorer.is_heading_like(&TextRun::bold("Day One", 10.5)));
        assert!(!scorer.is_heading_like(&TextRun::new("Day One", 16.0)));
    }

    #[test]
    fn test_importance_is_max_not_sum() {
        let profile = PersonaProfile::new(11.0)
            .with_keyword("menu", 3)
            .with_keyword("recipe", 3)
            .with_keyword("salt", 2);
        let scorer = PersonaScorer::from_profile("Chef", &profile);

        assert_eq!(scorer.importance("Menu and recipe notes with salt"), 3);
        assert_eq!(scorer.importance("A pinch of salt"), 2);
        assert_eq!(scorer.importance("Nothing relevant"), BASELINE_IMPORTANCE);
    }

    #[test]
    fn test_importance_case_insensitive_substring() {
        let scorer = travel();
        assert_eq!(scorer.importance("Your ITINERARY for Nice"), 3);
        assert_eq!(scorer.importance("Public transportation"), 2);
    }

    #[test]
    fn test_importance_monotonic_when_text_extended() {
        let scorer = travel();
        let original = "Transport options";
        let extended = "Transport options and full itinerary";
        assert!(scorer.importance(extended) >= scorer.importance(original));
    }

    #[test]
    fn test_keyword_metacharacters_are_literal() {
        let profile = PersonaProfile::new(11.0).with_keyword("c++", 3);
        let scorer = PersonaScorer::from_profile("Dev", &profile);
        assert_eq!(scorer.importance("Modern C++ idioms"), 3);
        assert_eq!(scorer.importance("cc"), 1);
    }

    #[test]
    fn test_unknown_persona() {
        let scorer = PersonaScorer::new(&PersonaStore::builtin(), "Nobody");
        let c = scorer.classify(&TextRun::new("Itinerary", 12.0));
        assert!(!c.is_heading_like);
        assert_eq!(c.importance, 1);
    }

    #[test]
    fn test_classify_free_function() {
        let store = PersonaStore::builtin();
        let profile = store.get("HR Professional").unwrap();
        let c = classify(&TextRun::bold("Onboarding Form", 10.0), profile);
        assert!(c.is_heading_like);
        assert_eq!(c.importance, 3);
    }

    #[test]
    fn test_extract_sections_filters_and_skips_bad_pages() {
        let mut doc = LayoutDocument::new("nice.pdf").with_page(vec![
            TextRun::bold("Itinerary Overview", 14.0),
            TextRun::new("Plain paragraph text", 11.0),
        ]);
        doc.pages.push(LayoutPage {
            number: None,
            runs: None,
        });
        doc.add_page(vec![TextRun::bold("Hotels", 12.0)]);

        let scorer = travel();
        let sections = scorer.extract_sections(&doc, SectionFilter::HeadingLike);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].importance, 3);
        assert_eq!(sections[1].page, 3);
        assert_eq!(sections[1].document, "nice.pdf");

        let all = scorer.extract_sections(&doc, SectionFilter::All);
        assert_eq!(all.len(), 3);
        assert!(!all[1].is_heading_like);
    }

    #[test]
    fn test_sort_sections_stable() {
        let mut sections = vec![
            section("a", 1),
            section("b", 3),
            section("c", 1),
            section("d", 3),
            section("e", 2),
        ];
        sort_sections(&mut sections);
        let order: Vec<&str> = sections.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "e", "a", "c"]);
    }
}
