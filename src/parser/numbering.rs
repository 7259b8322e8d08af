//! Numeric section prefix recognition.
//!
//! Recognizes outline numbering such as `2.3.1 Results` at the start of a
//! line. ASCII and full-width digits (`０`–`９`) and dots (`．`) are treated
//! alike, so documents typeset with East Asian fonts number the same way.

/// A recognized section number prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberPrefix {
    /// Numeric value of each digit group, outermost first
    pub groups: Vec<u32>,

    /// Whether the number ended with a dot (`1.2.`)
    pub trailing_dot: bool,

    /// Byte offset where the heading text starts
    pub text_start: usize,
}

impl NumberPrefix {
    /// Nesting depth: one per digit group (internal dots + 1).
    pub fn depth(&self) -> u32 {
        self.groups.len() as u32
    }
}

/// Get the value of an ASCII or full-width decimal digit.
pub fn digit_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(c as u32 - '0' as u32),
        '\u{FF10}'..='\u{FF19}' => Some(c as u32 - 0xFF10),
        _ => None,
    }
}

/// Check if a character separates digit groups.
pub fn is_group_separator(c: char) -> bool {
    c == '.' || c == '\u{FF0E}'
}

/// Parse a section number at the start of `text`.
///
/// A prefix matches when it is at least two digit groups joined by dots
/// and is followed by dots or whitespace and then more text. A single
/// group such as `"3. Methods"` is not numbering; neither are
/// `"2024 Report"`, a bare `"1.2"`, or `"3.5kg"`.
pub fn parse_number_prefix(text: &str) -> Option<NumberPrefix> {
    let mut chars = text.char_indices().peekable();
    let mut groups = Vec::new();
    let mut trailing_dot = false;

    loop {
        let mut value: Option<u32> = None;
        while let Some(d) = chars.peek().and_then(|&(_, c)| digit_value(c)) {
            value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d));
            chars.next();
        }
        match value {
            Some(v) => groups.push(v),
            None => break,
        }

        match chars.peek() {
            Some(&(_, c)) if is_group_separator(c) => {
                chars.next();
                let next_is_digit = chars
                    .peek()
                    .map(|&(_, c)| digit_value(c).is_some())
                    .unwrap_or(false);
                if !next_is_digit {
                    trailing_dot = true;
                    break;
                }
            }
            _ => break,
        }
    }

    if groups.len() < 2 {
        return None;
    }

    // At least one separator after the number; a trailing dot counts
    let mut separated = trailing_dot;
    while let Some(&(_, c)) = chars.peek() {
        if c.is_whitespace() || is_group_separator(c) {
            separated = true;
            chars.next();
        } else {
            break;
        }
    }

    let (text_start, _) = chars.next()?;
    if !separated {
        return None;
    }

    Some(NumberPrefix {
        groups,
        trailing_dot,
        text_start,
    })
}
