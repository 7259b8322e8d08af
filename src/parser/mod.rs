//! Structure inference: titles, visual lines, numbering and outlines.

mod layout;
pub mod numbering;
mod options;
mod outline;
mod title;

pub use layout::{group_runs_into_lines, TextLine};
pub use numbering::{parse_number_prefix, NumberPrefix};
pub use options::{
    HeadingOptions, OutlineOptions, TitleOptions, TocPolicy, EARLY_PAGE_LIMIT,
    HEADING_LARGE_FONT_SIZE, HEADING_MIN_FONT_SIZE, LINE_Y_TOLERANCE, TITLE_MAX_REPEATS,
    TITLE_MAX_Y, TITLE_MIN_FONT_SIZE,
};
pub use outline::{
    build_outline, detect_headings_by_layout, heading_level, is_heading_like, toc_headings,
    OutlineBuilder, OutlineSource, MIN_TOC_TITLE_CHARS,
};
pub use title::extract_title;
