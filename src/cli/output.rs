//! Output formatting for CLI commands

use serde::Serialize;

use crate::storage;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<storage::OutputFormat> for OutputFormat {
    fn from(format: storage::OutputFormat) -> Self {
        match format {
            storage::OutputFormat::Text => OutputFormat::Text,
            storage::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Prints command results as text or as one JSON value per line
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Reports a change or a completed command
    pub fn success(&self, message: &str) {
        if self.is_json() {
            println!("{}", serde_json::json!({ "success": true, "message": message }));
        } else {
            println!("{}", message);
        }
    }

    /// Reports something the user should act on, like a failed rename.
    /// Text notices go to stderr so they stand out from regular output.
    pub fn notice(&self, path: &str, message: &str) {
        if self.is_json() {
            println!("{}", serde_json::json!({ "notice": message, "path": path }));
        } else {
            eprintln!("Notice: {}", message);
        }
    }

    /// Prints structured data, pretty-printed in text mode
    pub fn data<T: Serialize>(&self, data: &T) {
        let json = if self.is_json() {
            serde_json::to_string(data)
        } else {
            serde_json::to_string_pretty(data)
        };
        if let Ok(json) = json {
            println!("{}", json);
        }
    }
}
