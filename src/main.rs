//! titlesync - Keeps note filenames, headings and frontmatter titles in sync

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = titlesync::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
