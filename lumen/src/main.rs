// lumen/src/main.rs

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG=debug lumen validate ... to see the details
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Ingest {
            project_dir,
            input,
            database,
            table,
            clean_output,
        } => commands::ingest::execute(project_dir, input, database, table, clean_output).await?,

        Commands::Validate {
            project_dir,
            database,
            table,
            output,
        } => commands::validate::execute(project_dir, database, table, output).await?,
    }

    Ok(())
}
