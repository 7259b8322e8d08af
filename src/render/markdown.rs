//! Markdown rendering for outlines.

use crate::model::OutlineResult;

/// Render an outline as Markdown.
///
/// The title becomes a level-1 heading; headings become a bullet list
/// indented two spaces per level below H1, with their page number.
pub fn outline_to_markdown(result: &OutlineResult) -> String {
    let mut output = String::new();

    if !result.title.is_empty() {
        output.push_str("# ");
        output.push_str(&escape_markdown(&result.title));
        output.push_str("\n\n");
    }

    for heading in &result.outline {
        let indent = "  ".repeat(heading.level.depth().saturating_sub(1) as usize);
        output.push_str(&format!(
            "{}- {} (p. {})\n",
            indent,
            escape_markdown(&heading.text),
            heading.page
        ));
    }

    output.trim_end().to_string()
}

/// Escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
