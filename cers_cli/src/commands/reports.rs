use anyhow::{bail, Result};
use cers_lib::pipeline::list_reports;
use cers_lib::FilerId;
use clap::Args;

use super::portal_client;
use crate::output::{print_reports, OutputFormat};

#[derive(Args)]
pub struct ReportsArgs {
    /// List a candidate's reports
    #[arg(long, conflicts_with = "committee")]
    pub candidate: Option<i64>,

    /// List a committee's reports
    #[arg(long)]
    pub committee: Option<i64>,
}

pub async fn run(args: &ReportsArgs, format: &OutputFormat) -> Result<()> {
    let filer = match (args.candidate, args.committee) {
        (Some(id), None) => FilerId::Candidate(id),
        (None, Some(id)) => FilerId::Committee(id),
        _ => bail!("pass exactly one of --candidate or --committee"),
    };

    let reports = list_reports(&portal_client(), filer, None).await?;
    eprintln!("{} reports", reports.len());

    print_reports(&reports, format)
}
