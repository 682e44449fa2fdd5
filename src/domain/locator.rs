//! Locating titles inside a note
//!
//! A note can carry its title in three places: a prefix heading (`# Title`),
//! an underline heading (`Title` followed by `===`), or a frontmatter field.
//! The functions here scan lines and report where the title lives. Nothing
//! found is a normal outcome and is reported as `None`.

use serde::{Deserialize, Serialize};

/// Frontmatter block delimiter
pub const FRONTMATTER_DELIMITER: &str = "---";

/// Where a title was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleStyle {
    /// `# Title`
    Prefix,
    /// `Title` followed by a line of `=`
    Underline,
    /// `key: Title` inside the frontmatter block
    Frontmatter,
}

/// A title reference inside a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleLocation {
    /// Zero-based line of the title text
    pub line: usize,
    pub text: String,
    pub style: TitleStyle,
}

impl TitleLocation {
    fn new(line: usize, text: impl Into<String>, style: TitleStyle) -> Self {
        Self {
            line,
            text: text.into(),
            style,
        }
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == FRONTMATTER_DELIMITER
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

fn has_balanced_backticks(line: &str) -> bool {
    line.matches('`').count() % 2 == 0
}

fn is_underline(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c == '=')
}

/// Index of the closing frontmatter delimiter, if the document has a block
pub fn frontmatter_end<S: AsRef<str>>(lines: &[S]) -> Option<usize> {
    let first = lines.first()?;
    if !is_delimiter(first.as_ref()) {
        return None;
    }

    lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| is_delimiter(line.as_ref()))
        .map(|(idx, _)| idx)
}

/// Returns the first line after the frontmatter block, or 0 without one.
///
/// An opening delimiter that is never closed does not count as frontmatter.
pub fn find_note_start<S: AsRef<str>>(lines: &[S]) -> usize {
    frontmatter_end(lines).map_or(0, |end| end + 1)
}

/// Finds the first heading at or after `start_line`.
///
/// Lines inside fenced code blocks are skipped. A `#` inside an inline code
/// span (odd number of backticks on the line) or escaped as `\#` does not
/// start a prefix heading.
pub fn find_heading<S: AsRef<str>>(lines: &[S], start_line: usize) -> Option<TitleLocation> {
    let mut in_fence = false;

    for (idx, line) in lines.iter().enumerate().skip(start_line) {
        let line = line.as_ref();

        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        if let Some(text) = line.strip_prefix("# ") {
            if has_balanced_backticks(line) {
                return Some(TitleLocation::new(idx, text, TitleStyle::Prefix));
            }
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        let next_is_underline = lines
            .get(idx + 1)
            .is_some_and(|next| is_underline(next.as_ref()));
        if next_is_underline && has_balanced_backticks(line) {
            return Some(TitleLocation::new(idx, line, TitleStyle::Underline));
        }
    }

    None
}

/// Strips one pair of surrounding YAML quotes, unescaping the content
fn unquote(value: &str) -> String {
    let value = value.trim();
    if value.len() >= 2 {
        if let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
            return inner.replace("\\\"", "\"").replace("\\\\", "\\");
        }
        if let Some(inner) = value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) {
            return inner.replace("''", "'");
        }
    }
    value.to_string()
}

/// Finds the `key:` field inside the frontmatter block
pub fn find_frontmatter_title<S: AsRef<str>>(lines: &[S], key: &str) -> Option<TitleLocation> {
    let first = lines.first()?;
    if !is_delimiter(first.as_ref()) {
        return None;
    }

    let prefix = format!("{}:", key);
    for (idx, line) in lines.iter().enumerate().skip(1) {
        let line = line.as_ref();
        if is_delimiter(line) {
            return None;
        }

        if let Some(rest) = line.strip_prefix(&prefix) {
            if rest.is_empty() || rest.starts_with(' ') {
                return Some(TitleLocation::new(
                    idx,
                    unquote(rest),
                    TitleStyle::Frontmatter,
                ));
            }
        }
    }

    None
}
