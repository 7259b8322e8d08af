//! Structure inference options and configuration.
//!
//! Every threshold the heuristics use lives here as a named constant so it
//! can be overridden per call and exercised independently in tests.

/// Runs larger than this (in points) are title candidates even when not bold.
///
/// Body text is rarely set above 12pt; 13pt separates display type from it.
pub const TITLE_MIN_FONT_SIZE: f32 = 13.0;

/// Title candidates must start above this vertical position.
///
/// Prominent text further down the first page is usually a section heading
/// or a pull quote, not part of the title block.
pub const TITLE_MAX_Y: f32 = 250.0;

/// Candidate texts seen more often than this are treated as watermarks or
/// running headers and removed from the title.
pub const TITLE_MAX_REPEATS: usize = 2;

/// Lines at or below this average size (in points) are never headings.
pub const HEADING_MIN_FONT_SIZE: f32 = 10.0;

/// Lines above this average size (in points) are headings even when not bold.
pub const HEADING_LARGE_FONT_SIZE: f32 = 12.0;

/// Unnumbered headings on pages up to this number are assigned H1.
///
/// Early pages hold the top-level section starts of most reports.
pub const EARLY_PAGE_LIMIT: u32 = 5;

/// Runs whose vertical position differs by at most this fraction of their
/// font size share a visual line.
pub const LINE_Y_TOLERANCE: f32 = 0.3;

/// Options for title extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleOptions {
    /// Font size above which a run is prominent
    pub min_font_size: f32,

    /// Upper-page limit for candidates (`None` = whole page)
    pub max_y: Option<f32>,

    /// Texts repeated more often than this are dropped
    pub max_repeats: usize,

    /// Keep at most this many parts (`None` = all)
    pub max_parts: Option<usize>,
}

impl TitleOptions {
    /// Create new title options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prominent font size threshold.
    pub fn with_min_font_size(mut self, size: f32) -> Self {
        self.min_font_size = size;
        self
    }

    /// Set the upper-page limit.
    pub fn with_max_y(mut self, y: f32) -> Self {
        self.max_y = Some(y);
        self
    }

    /// Consider prominent runs anywhere on the first page.
    pub fn anywhere_on_page(mut self) -> Self {
        self.max_y = None;
        self
    }

    /// Set the repeat limit.
    pub fn with_max_repeats(mut self, repeats: usize) -> Self {
        self.max_repeats = repeats;
        self
    }

    /// Keep at most `parts` title parts.
    pub fn with_max_parts(mut self, parts: usize) -> Self {
        self.max_parts = Some(parts);
        self
    }
}

impl Default for TitleOptions {
    fn default() -> Self {
        Self {
            min_font_size: TITLE_MIN_FONT_SIZE,
            max_y: Some(TITLE_MAX_Y),
            max_repeats: TITLE_MAX_REPEATS,
            max_parts: None,
        }
    }
}

/// Options for layout-based heading detection.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingOptions {
    /// Average font size a line must exceed
    pub min_font_size: f32,

    /// Average font size above which bold is not required
    pub large_font_size: f32,

    /// Last page on which unnumbered headings become H1
    pub early_page_limit: u32,

    /// Line grouping tolerance as a fraction of font size
    pub line_tolerance: f32,
}

impl HeadingOptions {
    /// Create new heading options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum average font size.
    pub fn with_min_font_size(mut self, size: f32) -> Self {
        self.min_font_size = size;
        self
    }

    /// Set the large font size.
    pub fn with_large_font_size(mut self, size: f32) -> Self {
        self.large_font_size = size;
        self
    }

    /// Set the early page limit.
    pub fn with_early_page_limit(mut self, page: u32) -> Self {
        self.early_page_limit = page;
        self
    }

    /// Set the line grouping tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }
}

impl Default for HeadingOptions {
    fn default() -> Self {
        Self {
            min_font_size: HEADING_MIN_FONT_SIZE,
            large_font_size: HEADING_LARGE_FONT_SIZE,
            early_page_limit: EARLY_PAGE_LIMIT,
            line_tolerance: LINE_Y_TOLERANCE,
        }
    }
}

/// What to do when a table of contents is present but yields no headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TocPolicy {
    /// Fall back to layout detection
    #[default]
    FallbackOnEmpty,
    /// Return the (empty) table of contents as the outline
    TrustToc,
}

/// Options for outline building.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlineOptions {
    /// Title extraction options
    pub title: TitleOptions,

    /// Heading detection options
    pub heading: HeadingOptions,

    /// Empty table-of-contents handling
    pub toc_policy: TocPolicy,
}

impl OutlineOptions {
    /// Create new outline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set title options.
    pub fn with_title(mut self, title: TitleOptions) -> Self {
        self.title = title;
        self
    }

    /// Set heading options.
    pub fn with_heading(mut self, heading: HeadingOptions) -> Self {
        self.heading = heading;
        self
    }

    /// Set the table-of-contents policy.
    pub fn with_toc_policy(mut self, policy: TocPolicy) -> Self {
        self.toc_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_options_builder() {
        let options = OutlineOptions::new()
            .with_title(TitleOptions::new().anywhere_on_page().with_max_parts(5))
            .with_heading(HeadingOptions::new().with_early_page_limit(3))
            .with_toc_policy(TocPolicy::TrustToc);

        assert_eq!(options.title.max_y, None);
        assert_eq!(options.title.max_parts, Some(5));
        assert_eq!(options.heading.early_page_limit, 3);
        assert_eq!(options.toc_policy, TocPolicy::TrustToc);
    }

    #[test]
    fn test_default_options() {
        let options = OutlineOptions::default();
        assert_eq!(options.title.max_y, Some(TITLE_MAX_Y));
        assert_eq!(options.title.max_repeats, 2);
        assert_eq!(options.heading.min_font_size, 10.0);
        assert_eq!(options.heading.large_font_size, 12.0);
        assert_eq!(options.toc_policy, TocPolicy::FallbackOnEmpty);
    }
}
