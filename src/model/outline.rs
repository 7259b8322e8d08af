//! Heading and outline result types.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Heading depth, rendered as `"H1"`, `"H2"`, ...
///
/// Depth is unbounded: numbered sections such as `4.2.1.3.2` produce `H5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadingLevel(u32);

impl HeadingLevel {
    /// Top-level heading.
    pub const H1: HeadingLevel = HeadingLevel(1);
    /// Second-level heading.
    pub const H2: HeadingLevel = HeadingLevel(2);

    /// Create a level from a depth (values below 1 are raised to 1).
    pub fn new(depth: u32) -> Self {
        Self(depth.max(1))
    }

    /// Get the nesting depth (1 = top level).
    pub fn depth(self) -> u32 {
        self.0
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.0)
    }
}

impl FromStr for HeadingLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('H')
            .or_else(|| s.strip_prefix('h'))
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n >= 1)
            .map(HeadingLevel)
            .ok_or_else(|| format!("invalid heading level: {:?}", s))
    }
}

impl Serialize for HeadingLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HeadingLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A heading in a document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level
    pub level: HeadingLevel,

    /// Heading text
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,
}

impl Heading {
    /// Create a new heading.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Title and outline inferred for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineResult {
    /// Document title (empty when none could be found)
    pub title: String,

    /// Headings in page order, then line order within a page
    pub outline: Vec<Heading>,
}

impl OutlineResult {
    /// Create a result from a title and headings.
    pub fn new(title: impl Into<String>, outline: Vec<Heading>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// Check if neither a title nor any heading was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.outline.is_empty()
    }

    /// Deepest heading level in the outline.
    pub fn max_depth(&self) -> u32 {
        self.outline
            .iter()
            .map(|h| h.level.depth())
            .max()
            .unwrap_or(0)
    }
}
