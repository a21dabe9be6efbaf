mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "cers")]
#[command(about = "Scrape Montana campaign finance reports from the CERS portal")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search candidates
    Candidates(commands::candidates::CandidatesArgs),
    /// Search committees
    Committees(commands::committees::CommitteesArgs),
    /// List a candidate's or committee's reports
    Reports(commands::reports::ReportsArgs),
    /// Parse every report of the matching filers and write raw exports
    Scrape(commands::scrape::ScrapeArgs),
    /// Combine raw exports into cleaned CSV and JSON files
    Clean(commands::clean::CleanArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cers=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from_arg(&cli.output);

    match &cli.command {
        Commands::Candidates(args) => commands::candidates::run(args, &format).await?,
        Commands::Committees(args) => commands::committees::run(args, &format).await?,
        Commands::Reports(args) => commands::reports::run(args, &format).await?,
        Commands::Scrape(args) => commands::scrape::run(args, &format).await?,
        Commands::Clean(args) => commands::clean::run(args)?,
    }

    Ok(())
}
