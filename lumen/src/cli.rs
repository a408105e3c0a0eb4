// lumen/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Cleans marketing campaign exports and checks their quality", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📥 Cleans the raw CSV export and loads it into DuckDB
    Ingest {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Raw CSV export (default: 'raw-input' from lumen.yaml)
        #[arg(long)]
        input: Option<PathBuf>,

        /// DuckDB database file
        #[arg(long)]
        database: Option<PathBuf>,

        /// Target table name
        #[arg(long)]
        table: Option<String>,

        /// Where to write the cleaned CSV
        #[arg(long)]
        clean_output: Option<PathBuf>,
    },

    /// 🧪 Runs the data-quality rules and writes the findings report
    Validate {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// DuckDB database file
        #[arg(long)]
        database: Option<PathBuf>,

        /// Table to validate
        #[arg(long)]
        table: Option<String>,

        /// Findings report path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}
