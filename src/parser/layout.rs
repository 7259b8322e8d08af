//! Visual line reconstruction from text runs.
//!
//! Layout extractors emit one run per font change, so a heading such as
//! "2.1 **Scope**" may arrive as several runs. Heading detection works on
//! whole lines, which this module rebuilds from consecutive runs.

use crate::model::TextRun;

/// A text line composed of runs sharing a baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The runs in this line, in emission order
    pub runs: Vec<TextRun>,
    /// Y position of the first run
    pub y: f32,
}

impl TextLine {
    /// Create a new text line from runs.
    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        let y = runs.first().map(|r| r.y).unwrap_or(0.0);
        Self { runs, y }
    }

    /// Get the combined text: non-empty run texts joined by single spaces.
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|r| r.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Arithmetic mean of the runs' font sizes.
    pub fn avg_font_size(&self) -> f32 {
        if self.runs.is_empty() {
            return 0.0;
        }
        self.runs.iter().map(|r| r.font_size).sum::<f32>() / self.runs.len() as f32
    }

    /// Check if any run in the line is bold.
    pub fn is_bold(&self) -> bool {
        self.runs.iter().any(|r| r.is_bold)
    }

    /// Check if the line has no runs.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Group runs into lines, keeping the source's reading order.
///
/// A run joins the current line when its Y position is within
/// `tolerance × font_size` of the line's first run; otherwise it starts a
/// new line. Runs are never reordered.
pub fn group_runs_into_lines(runs: Vec<TextRun>, tolerance: f32) -> Vec<TextLine> {
    let mut lines: Vec<TextLine> = Vec::new();
    let mut current_runs: Vec<TextRun> = Vec::new();
    let mut current_y: Option<f32> = None;

    for run in runs {
        let y_tolerance = run.font_size * tolerance;

        match current_y {
            Some(y) if (run.y - y).abs() <= y_tolerance => current_runs.push(run),
            _ => {
                if !current_runs.is_empty() {
                    lines.push(TextLine::from_runs(std::mem::take(&mut current_runs)));
                }
                current_y = Some(run.y);
                current_runs.push(run);
            }
        }
    }

    if !current_runs.is_empty() {
        lines.push(TextLine::from_runs(current_runs));
    }

    lines
}
