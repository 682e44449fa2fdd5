//! Title sanitization
//!
//! Turns a candidate title into something usable as a file name by removing
//! characters the vault cannot store, plus any user-configured symbols.

use std::sync::LazyLock;

use regex::Regex;

/// Characters that are never allowed in a note file name
pub const ILLEGAL_CHARACTERS: &[char] = &['\\', '/', ':', '|', '#', '^', '[', ']'];

static FIXED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&fixed_class()).expect("fixed character class is a valid regex"));

fn fixed_class() -> String {
    let escaped: String = ILLEGAL_CHARACTERS
        .iter()
        .map(|c| regex::escape(&c.to_string()))
        .collect();
    format!("[{}]", escaped)
}

/// Removes illegal characters and user symbols from titles
#[derive(Debug, Clone)]
pub struct Sanitizer {
    pattern: Regex,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            pattern: FIXED_PATTERN.clone(),
        }
    }
}

impl Sanitizer {
    /// Creates a sanitizer that also strips the given literal strings
    pub fn new<S: AsRef<str>>(user_symbols: &[S]) -> Self {
        let mut alternatives = vec![fixed_class()];
        alternatives.extend(
            user_symbols
                .iter()
                .map(AsRef::as_ref)
                .filter(|s| !s.is_empty())
                .map(regex::escape),
        );

        match Regex::new(&alternatives.join("|")) {
            Ok(pattern) => Self { pattern },
            Err(e) => {
                tracing::warn!("Illegal symbol list rejected, using built-in set only: {}", e);
                Self::default()
            }
        }
    }

    /// Sanitizes a title.
    ///
    /// Removal is repeated until nothing matches, so a symbol that only
    /// appears once its neighbours are stripped is removed as well. The
    /// result may be empty, which callers treat as "no usable title".
    pub fn sanitize(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = self.pattern.replace_all(&current, "").into_owned();
            if next == current {
                break;
            }
            current = next;
        }
        current.trim().to_string()
    }
}
