//! Line-oriented view of a note's text

/// A note's content as an ordered list of lines.
///
/// Each line remembers whether it ended in `\r\n`, so rendering a document
/// reproduces the input byte for byte and edits leave other lines alone.
/// Added lines take the ending used by most of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<String>,
    crlf: Vec<bool>,
    default_crlf: bool,
}

impl Document {
    /// Splits text into lines, accepting both `\n` and `\r\n`
    pub fn parse(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut crlf = Vec::new();
        for line in text.split('\n') {
            match line.strip_suffix('\r') {
                Some(stripped) => {
                    lines.push(stripped.to_string());
                    crlf.push(true);
                }
                None => {
                    lines.push(line.to_string());
                    crlf.push(false);
                }
            }
        }

        let breaks = crlf.len() - 1;
        let crlf_breaks = crlf[..breaks].iter().filter(|&&c| c).count();
        let default_crlf = crlf_breaks * 2 > breaks;

        // The last line has no line break of its own
        if let Some(last) = crlf.last_mut() {
            *last = default_crlf;
        }

        Self {
            lines,
            crlf,
            default_crlf,
        }
    }

    /// Creates a document from lines using `\n` endings
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        Self {
            crlf: vec![false; lines.len()],
            lines,
            default_crlf: false,
        }
    }

    /// Replaces line `idx`, appending when it is past the end
    pub fn set_line(&mut self, idx: usize, text: String) {
        match self.lines.get_mut(idx) {
            Some(line) => *line = text,
            None => self.push_line(text),
        }
    }

    /// Inserts a line before `idx`, appending when it is past the end.
    ///
    /// The new line takes the ending of the line it is inserted before.
    pub fn insert_line(&mut self, idx: usize, text: String) {
        if idx >= self.lines.len() {
            self.push_line(text);
            return;
        }
        let crlf = self.ending(idx);
        self.lines.insert(idx, text);
        self.crlf.insert(idx.min(self.crlf.len()), crlf);
    }

    pub fn remove_line(&mut self, idx: usize) {
        if idx < self.lines.len() {
            self.lines.remove(idx);
            if idx < self.crlf.len() {
                self.crlf.remove(idx);
            }
        }
    }

    fn push_line(&mut self, text: String) {
        self.lines.push(text);
        self.crlf.push(self.default_crlf);
    }

    fn ending(&self, idx: usize) -> bool {
        self.crlf.get(idx).copied().unwrap_or(self.default_crlf)
    }

    /// Joins the lines back into text
    pub fn render(&self) -> String {
        let mut text = String::new();
        for (idx, line) in self.lines.iter().enumerate() {
            if idx > 0 {
                text.push_str(if self.ending(idx - 1) { "\r\n" } else { "\n" });
            }
            text.push_str(line);
        }
        text
    }
}
