use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "yansa")]
#[command(author, version, about = "Extract studio, date, performer and title metadata from media filenames")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse one or more filenames and print the extracted metadata
    Parse {
        /// Filenames (or paths) to parse
        #[arg(required = true)]
        filenames: Vec<String>,

        /// Studio already known for the files
        #[arg(long)]
        studio: Option<String>,

        /// Output one JSON object per line
        #[arg(long, conflicts_with = "trace")]
        json: bool,

        /// Show the result after every pipeline stage
        #[arg(long)]
        trace: bool,
    },

    /// Parse a newline-separated list of filenames in parallel
    Batch {
        /// File with one filename per line, or "-" for stdin
        #[arg(required = true)]
        list: String,

        /// Studio already known for the files
        #[arg(long)]
        studio: Option<String>,

        /// Write JSON lines here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect rule tables
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand)]
pub enum RulesCommand {
    /// Load every rule table strictly and print entry counts
    Check {
        /// Rule directory (defaults to the configured or bundled tables)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}
