//! Writing titles back into a document
//!
//! All edits work on [`Document`] lines. Replacing or inserting past the end
//! of the document appends instead of failing.

use serde::{Deserialize, Serialize};

use super::document::Document;
use super::locator::{
    find_frontmatter_title, find_heading, find_note_start, TitleLocation, TitleStyle,
    FRONTMATTER_DELIMITER,
};

/// Style used when a heading is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingStyle {
    #[default]
    Prefix,
    Underline,
}

/// How headings are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingFormat {
    /// Style of newly inserted headings, and of replaced ones when `replace_style` is set
    pub style: HeadingStyle,

    /// Convert existing headings to `style` when replacing them
    pub replace_style: bool,

    /// Line written under underline headings
    pub underline: String,
}

impl Default for HeadingFormat {
    fn default() -> Self {
        Self {
            style: HeadingStyle::Prefix,
            replace_style: false,
            underline: "===".to_string(),
        }
    }
}

fn prefix_line(title: &str) -> String {
    format!("# {}", title)
}

/// Inserts a new heading at `line` in the configured style
pub fn insert_heading(doc: &mut Document, line: usize, title: &str, format: &HeadingFormat) {
    match format.style {
        HeadingStyle::Prefix => doc.insert_line(line, prefix_line(title)),
        HeadingStyle::Underline => {
            let at = line.min(doc.lines.len());
            doc.insert_line(at, title.to_string());
            doc.insert_line(at + 1, format.underline.clone());
        }
    }
}

/// Replaces the text of an existing heading.
///
/// The heading keeps its style unless `replace_style` is set, in which case it
/// is converted to the configured style.
pub fn replace_heading(
    doc: &mut Document,
    heading: &TitleLocation,
    title: &str,
    format: &HeadingFormat,
) {
    let current = match heading.style {
        TitleStyle::Underline => HeadingStyle::Underline,
        _ => HeadingStyle::Prefix,
    };
    let target = if format.replace_style {
        format.style
    } else {
        current
    };

    match (current, target) {
        (HeadingStyle::Prefix, HeadingStyle::Prefix) => {
            doc.set_line(heading.line, prefix_line(title));
        }
        (HeadingStyle::Underline, HeadingStyle::Underline) => {
            doc.set_line(heading.line, title.to_string());
            if format.replace_style {
                doc.set_line(heading.line + 1, format.underline.clone());
            }
        }
        (HeadingStyle::Prefix, HeadingStyle::Underline) => {
            doc.set_line(heading.line, title.to_string());
            doc.insert_line(heading.line + 1, format.underline.clone());
        }
        (HeadingStyle::Underline, HeadingStyle::Prefix) => {
            doc.set_line(heading.line, prefix_line(title));
            if heading.line + 1 < doc.lines.len() {
                doc.remove_line(heading.line + 1);
            }
        }
    }
}

/// Sets the document heading to `title`, inserting one after the frontmatter if missing
pub fn write_heading(doc: &mut Document, title: &str, format: &HeadingFormat) {
    let start = find_note_start(&doc.lines);
    match find_heading(&doc.lines, start) {
        Some(heading) => replace_heading(doc, &heading, title, format),
        None => insert_heading(doc, start, title, format),
    }
}

/// Renders a YAML string value for a frontmatter line
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Sets `key: "title"` in the frontmatter, creating the block if needed
pub fn write_frontmatter_title(doc: &mut Document, key: &str, title: &str) {
    let line = format!("{}: {}", key, quote(title));

    if let Some(existing) = find_frontmatter_title(&doc.lines, key) {
        doc.set_line(existing.line, line);
        return;
    }

    if find_note_start(&doc.lines) > 0 {
        doc.insert_line(1, line);
    } else {
        doc.insert_line(0, FRONTMATTER_DELIMITER.to_string());
        doc.insert_line(1, line);
        doc.insert_line(2, FRONTMATTER_DELIMITER.to_string());
    }
}
