//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{notes, watch};
use crate::storage::{GlobalConfig, Workspace};
use crate::sync::Direction;

#[derive(Parser)]
#[command(name = "titlesync")]
#[command(author, version, about = "Keeps note filenames, headings and frontmatter titles in sync")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Vault root (defaults to the nearest parent with a .titlesync folder)
    #[arg(long, global = true, env = "TITLESYNC_VAULT")]
    pub vault: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up titlesync in a vault
    Init {
        /// Vault root (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show where each note's titles are and whether they agree
    Status {
        /// Notes to inspect (defaults to every note in the vault)
        files: Vec<PathBuf>,

        /// Only list notes whose titles disagree
        #[arg(long)]
        out_of_sync: bool,
    },

    /// Run a single sync direction on a note
    Sync {
        /// One of: filename-to-heading, heading-to-filename,
        /// filename-to-frontmatter, frontmatter-to-filename,
        /// heading-to-frontmatter, frontmatter-to-heading
        direction: Direction,

        /// Note to sync
        file: PathBuf,
    },

    /// Sync a note as if it was just opened
    Open {
        /// Note to open
        file: PathBuf,
    },

    /// Stop syncing a note
    Ignore {
        /// Note to ignore
        file: PathBuf,
    },

    /// Resume syncing a note
    Unignore {
        /// Note to resume
        file: PathBuf,
    },

    /// List the manual file list
    Ignored,

    /// Inspect settings
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Watch the vault and sync notes as they change
    Watch {
        /// Note being edited; defaults to whichever note was modified last
        #[arg(long)]
        active: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings
    Show,

    /// Print the settings file path
    Path,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = match cli.format {
        Some(format) => format,
        None => GlobalConfig::load()
            .map(|global| global.default_format.into())
            .unwrap_or_default(),
    };
    let output = Output::new(format);

    let vault = cli.vault;
    let workspace = || match &vault {
        Some(root) => Workspace::open(root),
        None => Workspace::open_current(),
    };

    match cli.command {
        Commands::Init { path } => {
            tracing::debug!(path = %path.display(), "Initializing vault");
            let workspace = Workspace::init(&path)?;
            output.success(&format!(
                "Initialized titlesync at {}",
                workspace.root().display()
            ));
        }
        Commands::Status { files, out_of_sync } => {
            notes::status(&workspace()?, &output, &files, out_of_sync)?
        }
        Commands::Sync { direction, file } => {
            notes::sync(&workspace()?, &output, direction, &file)?
        }
        Commands::Open { file } => notes::open(&workspace()?, &output, &file)?,
        Commands::Ignore { file } => notes::ignore(&workspace()?, &output, &file)?,
        Commands::Unignore { file } => notes::unignore(&workspace()?, &output, &file)?,
        Commands::Ignored => notes::ignored(&workspace()?, &output)?,
        Commands::Config(ConfigCommands::Show) => notes::config_show(&workspace()?, &output)?,
        Commands::Config(ConfigCommands::Path) => notes::config_path(&workspace()?, &output),
        Commands::Watch { active } => watch::run(&workspace()?, &output, active.as_deref())?,
    }

    Ok(())
}

/// Logs go to stderr; `RUST_LOG` overrides the level picked by `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "titlesync=debug" } else { "titlesync=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
