use std::path::PathBuf;

use anyhow::Result;
use cers_lib::Cleaner;
use clap::Args;

#[derive(Args)]
pub struct CleanArgs {
    /// Directory holding the raw per-entity exports
    #[arg(long)]
    pub raw_dir: PathBuf,

    /// Directory for contributions.csv, expenditures.csv and summary.json
    #[arg(long)]
    pub out_dir: PathBuf,
}

pub fn run(args: &CleanArgs) -> Result<()> {
    let data = Cleaner::default().clean(&args.raw_dir, &args.out_dir)?;
    eprintln!(
        "Cleaned {} filers: {} contributions, {} expenditures -> {}",
        data.summaries.len(),
        data.contributions.len(),
        data.expenditures.len(),
        args.out_dir.display()
    );
    Ok(())
}
