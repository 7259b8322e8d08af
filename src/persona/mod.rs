//! Persona-weighted section scoring.
//!
//! A persona is a named reader role whose profile biases which runs count
//! as headings and how important their content is.

mod profile;
mod scorer;

pub use profile::{PersonaProfile, PersonaStore, DEFAULT_MIN_FONT_SIZE};
pub use scorer::{
    classify, sort_sections, Classification, PersonaScorer, SectionFilter, BASELINE_IMPORTANCE,
};
