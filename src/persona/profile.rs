//! Persona profiles and the store that resolves them by name.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum font size of the fallback profile used for unknown personas.
pub const DEFAULT_MIN_FONT_SIZE: f32 = 11.0;

static DEFAULT_PROFILE: PersonaProfile = PersonaProfile {
    keywords: BTreeMap::new(),
    min_font_size: DEFAULT_MIN_FONT_SIZE,
};

/// Keyword weights and heading size for one reader role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaProfile {
    /// Keyword to importance weight
    #[serde(default)]
    pub keywords: BTreeMap<String, u32>,

    /// Smallest font size a heading-like run may have
    #[serde(default = "default_min_font_size")]
    pub min_font_size: f32,
}

fn default_min_font_size() -> f32 {
    DEFAULT_MIN_FONT_SIZE
}

impl PersonaProfile {
    /// Create a profile with no keywords.
    pub fn new(min_font_size: f32) -> Self {
        Self {
            keywords: BTreeMap::new(),
            min_font_size,
        }
    }

    /// Add a weighted keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>, weight: u32) -> Self {
        self.keywords.insert(keyword.into(), weight);
        self
    }
}

impl Default for PersonaProfile {
    fn default() -> Self {
        DEFAULT_PROFILE.clone()
    }
}

/// Named persona profiles.
///
/// Passed explicitly to the scorer, so concurrent requests can use
/// different tables without sharing state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonaStore {
    profiles: BTreeMap<String, PersonaProfile>,
}

impl PersonaStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the built-in reader roles.
    pub fn builtin() -> Self {
        let mut store = Self::new();
        store.insert(
            "Travel Planner",
            PersonaProfile::new(11.0)
                .with_keyword("itinerary", 3)
                .with_keyword("accommodation", 2)
                .with_keyword("transport", 2),
        );
        store.insert(
            "HR Professional",
            PersonaProfile::new(10.0)
                .with_keyword("form", 3)
                .with_keyword("onboarding", 2)
                .with_keyword("compliance", 2),
        );
        store.insert(
            "Food Contractor",
            PersonaProfile::new(11.0)
                .with_keyword("recipe", 3)
                .with_keyword("ingredients", 2)
                .with_keyword("vegetarian", 2),
        );
        store
    }

    /// Parse a store from JSON (`{"Role": {"keywords": {...}, "min_font_size": 11}}`).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let store: Self = serde_json::from_str(json)?;
        store.validate()?;
        Ok(store)
    }

    /// Load a store from a JSON file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let store: Self = serde_json::from_reader(BufReader::new(file))?;
        store.validate()?;
        Ok(store)
    }

    /// Add or replace a profile.
    pub fn insert(&mut self, name: impl Into<String>, profile: PersonaProfile) {
        self.profiles.insert(name.into(), profile);
    }

    /// Get a profile by exact name.
    pub fn get(&self, name: &str) -> Option<&PersonaProfile> {
        self.profiles.get(name)
    }

    /// Get a profile by name, substituting the default profile for unknown names.
    pub fn resolve(&self, name: &str) -> &PersonaProfile {
        match self.profiles.get(name) {
            Some(profile) => profile,
            None => {
                log::warn!("Unknown persona {:?}, using default profile", name);
                &DEFAULT_PROFILE
            }
        }
    }

    /// Names of all profiles, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Check if the store holds no profiles.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn validate(&self) -> Result<()> {
        for (name, profile) in &self.profiles {
            if !profile.min_font_size.is_finite() || profile.min_font_size < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "persona {:?}: min_font_size must be a non-negative number",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles() {
        let store = PersonaStore::builtin();
        assert_eq!(store.len(), 3);

        let hr = store.get("HR Professional").unwrap();
        assert_eq!(hr.min_font_size, 10.0);
        assert_eq!(hr.keywords.get("form"), Some(&3));
    }

    #[test]
    fn test_unknown_persona_resolves_to_default() {
        let store = PersonaStore::builtin();
        let profile = store.resolve("Astronaut");
        assert_eq!(profile.min_font_size, 11.0);
        assert!(profile.keywords.is_empty());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "Researcher": {"keywords": {"methodology": 3, "dataset": 2}, "min_font_size": 12},
            "Student": {"keywords": {"exam": 3}}
        }"#;
        let store = PersonaStore::from_json_str(json).unwrap();
        let names: Vec<&str> = store.names().collect();
        assert_eq!(names, vec!["Researcher", "Student"]);
        assert_eq!(store.get("Student").unwrap().min_font_size, 11.0);
    }

    #[test]
    fn test_from_json_rejects_bad_font_size() {
        let json = r#"{"Broken": {"min_font_size": -1}}"#;
        assert!(matches!(
            PersonaStore::from_json_str(json),
            Err(Error::InvalidConfig(_))
        ));
    }
}
