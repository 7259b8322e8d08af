//! Text run and table-of-contents types.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Minimum byte length of meaningful text.
///
/// Measured in bytes rather than characters so that a single CJK ideograph
/// (three bytes in UTF-8) counts as meaningful while stray punctuation does not.
pub const MIN_TEXT_BYTES: usize = 3;

/// A run of text with consistent styling, as emitted by a layout extractor.
///
/// Coordinates follow screen convention: `y` grows downward from the top
/// edge of the page, so smaller values are higher on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Font size in points
    pub font_size: f32,

    /// Whether the run is set in a bold or black weight
    #[serde(default)]
    pub is_bold: bool,

    /// Font name (e.g., "Helvetica-Bold")
    #[serde(default)]
    pub font_name: String,

    /// X position (left edge)
    #[serde(default)]
    pub x: f32,

    /// Y position (top edge)
    #[serde(default)]
    pub y: f32,

    /// Page number (1-indexed, 0 = inherit from the containing page)
    #[serde(default)]
    pub page: u32,
}

impl TextRun {
    /// Create a new regular-weight run at the page origin.
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            is_bold: false,
            font_name: String::new(),
            x: 0.0,
            y: 0.0,
            page: 0,
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            is_bold: true,
            ..Self::new(text, font_size)
        }
    }

    /// Set the font name; bold/black font names also mark the run bold.
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        self.is_bold |= font_implies_bold(&self.font_name);
        self
    }

    /// Set the position of the run.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the page number.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Check whether the trimmed text is long enough to take part in any heuristic.
    pub fn is_meaningful(&self) -> bool {
        self.text.trim().len() >= MIN_TEXT_BYTES
    }

    /// Check the numeric fields, returning a description of the first problem.
    pub fn check(&self) -> std::result::Result<(), String> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(format!("invalid font size {}", self.font_size));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(format!("invalid position ({}, {})", self.x, self.y));
        }
        Ok(())
    }

    /// Normalize text and weight, dropping the run if nothing meaningful is left.
    pub(crate) fn accept(mut self) -> Option<Self> {
        self.text = normalize_text(&self.text);
        if self.text.len() < MIN_TEXT_BYTES {
            return None;
        }
        self.is_bold |= font_implies_bold(&self.font_name);
        Some(self)
    }
}

/// Check if a font name denotes a bold or black weight.
pub fn font_implies_bold(font_name: &str) -> bool {
    let lower = font_name.to_lowercase();
    lower.contains("bold") || lower.contains("black")
}

/// Trim and NFC-normalize run text.
pub fn normalize_text(text: &str) -> String {
    text.trim().nfc().collect()
}

/// An entry of a document's native table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Nesting level (1 = top level)
    pub level: u32,

    /// Entry title
    pub title: String,

    /// Target page number (1-indexed)
    pub page: u32,
}

impl TocEntry {
    /// Create a new table-of-contents entry.
    pub fn new(level: u32, title: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }
}
