use anyhow::Result;
use cers_lib::pipeline::fetch_candidates;
use clap::Args;

use super::{portal_client, CandidateFilterArgs};
use crate::output::{print_entities, OutputFormat};

#[derive(Args)]
pub struct CandidatesArgs {
    #[command(flatten)]
    pub filters: CandidateFilterArgs,
}

pub async fn run(args: &CandidatesArgs, format: &OutputFormat) -> Result<()> {
    let search = args.filters.search()?;
    let filter = args.filters.filter()?;

    let candidates = fetch_candidates(&portal_client(), &search, &filter).await?;
    eprintln!("{} candidates", candidates.len());

    print_entities(&candidates, format)
}
