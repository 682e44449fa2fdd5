//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Vault setup and overview | `init`, `status` |
//! | Sync | One-off syncs | `sync heading-to-filename <note>`, `open <note>` |
//! | Files | Manual file list | `ignore`, `unignore`, `ignored` |
//! | Settings | Inspect settings | `config show`, `config path` |
//! | Watch | Sync while editing | `watch`, `watch --active <note>` |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output, or set `RUST_LOG`:
//! ```bash
//! titlesync --verbose watch
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod notes;
mod output;
mod watch;

pub use app::{run, Cli, Commands, ConfigCommands};
pub use output::{Output, OutputFormat};
