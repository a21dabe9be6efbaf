use anyhow::Result;
use cers_lib::pipeline::fetch_committees;
use clap::Args;

use super::{portal_client, CommitteeFilterArgs};
use crate::output::{print_entities, OutputFormat};

#[derive(Args)]
pub struct CommitteesArgs {
    #[command(flatten)]
    pub filters: CommitteeFilterArgs,
}

pub async fn run(args: &CommitteesArgs, format: &OutputFormat) -> Result<()> {
    let search = args.filters.search()?;
    let filter = args.filters.filter()?;

    let committees = fetch_committees(&portal_client(), &search, &filter).await?;
    eprintln!("{} committees", committees.len());

    print_entities(&committees, format)
}
