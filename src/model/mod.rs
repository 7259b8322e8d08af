//! Document model types for layout-driven structure inference.
//!
//! This module defines the normalized span model every heuristic consumes:
//! styled text runs, table-of-contents entries, and the containers that
//! carry them in from an external layout extractor. It also holds the
//! structured results handed back to callers.

mod document;
mod outline;
mod run;
mod section;

pub use document::{DocumentSource, LayoutDocument, LayoutPage};
pub use outline::{Heading, HeadingLevel, OutlineResult};
pub use run::{font_implies_bold, normalize_text, TextRun, TocEntry, MIN_TEXT_BYTES};
pub use section::{BatchMetadata, BatchResult, ConnectionEdge, Section};
