//! Full scrape: list entities, load every report through the cache, and
//! write one set of raw exports per entity.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use cers_lib::pipeline::{fetch_candidates, fetch_committees, fetch_reports};
use cers_lib::validation;
use cers_lib::{
    CacheOptions, Entity, EntityFilings, ManualCaches, PortalClient, ReportCache, ReportLoader,
    ReportParser, SummaryExport,
};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use super::{portal_client, CandidateFilterArgs, CommitteeFilterArgs};
use crate::output::{print_scrape_summaries, OutputFormat};

const DEFAULT_CACHE_DIR: &str = "cache";

#[derive(Args)]
pub struct ScrapeArgs {
    #[command(subcommand)]
    pub target: ScrapeTarget,
}

#[derive(Subcommand)]
pub enum ScrapeTarget {
    /// Scrape candidates matching a search
    Candidates(ScrapeCandidatesArgs),
    /// Scrape committees matching a search
    Committees(ScrapeCommitteesArgs),
}

#[derive(Args)]
pub struct ScrapeCandidatesArgs {
    #[command(flatten)]
    pub filters: CandidateFilterArgs,

    /// Skip reports whose period ended before this date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    #[command(flatten)]
    pub options: ScrapeOptions,
}

#[derive(Args)]
pub struct ScrapeCommitteesArgs {
    #[command(flatten)]
    pub filters: CommitteeFilterArgs,

    /// Skip reports whose period ended before this date (YYYY-MM-DD)
    #[arg(long, default_value = "2021-01-01")]
    pub since: String,

    #[command(flatten)]
    pub options: ScrapeOptions,
}

#[derive(Args)]
pub struct ScrapeOptions {
    /// Directory for the per-entity raw exports
    #[arg(long)]
    pub raw_dir: PathBuf,

    /// Report cache root (default: $CERS_CACHE_DIR or ./cache)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// TOML table of manually cached reports (default: $CERS_MANUAL_CACHES)
    #[arg(long)]
    pub manual_caches: Option<PathBuf>,

    /// Ignore cached reports
    #[arg(long)]
    pub no_cache_read: bool,

    /// Do not write parsed reports to the cache
    #[arg(long)]
    pub no_cache_write: bool,

    /// Parse summaries only, without itemized schedules
    #[arg(long)]
    pub summaries_only: bool,
}

impl ScrapeOptions {
    fn cache_root(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .or_else(|| std::env::var("CERS_CACHE_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR))
    }

    fn manual_caches(&self) -> Result<ManualCaches> {
        let path = self
            .manual_caches
            .clone()
            .or_else(|| std::env::var("CERS_MANUAL_CACHES").ok().map(PathBuf::from));
        match path {
            Some(path) => {
                let caches = ManualCaches::load(&path)?;
                eprintln!("{} manually cached reports from {}", caches.len(), path.display());
                Ok(caches)
            }
            None => Ok(ManualCaches::empty()),
        }
    }

    fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            read: !self.no_cache_read,
            write: !self.no_cache_write,
        }
    }
}

pub async fn run(args: &ScrapeArgs, format: &OutputFormat) -> Result<()> {
    let client = portal_client();

    let (entities, since, options) = match &args.target {
        ScrapeTarget::Candidates(a) => {
            let since = a
                .since
                .as_deref()
                .map(validation::validate_date)
                .transpose()?;
            let entities =
                fetch_candidates(&client, &a.filters.search()?, &a.filters.filter()?).await?;
            (entities, since, &a.options)
        }
        ScrapeTarget::Committees(a) => {
            let since = Some(validation::validate_date(&a.since)?);
            let entities =
                fetch_committees(&client, &a.filters.search()?, &a.filters.filter()?).await?;
            (entities, since, &a.options)
        }
    };

    let parser = ReportParser::new(client, options.manual_caches()?)
        .with_fetch_itemized(!options.summaries_only);
    let loader = ReportLoader::new(parser, options.cache_options());

    let exports = scrape_entities(&loader, &entities, since, options).await?;
    eprintln!(
        "Scraped {} of {} entities into {}",
        exports.len(),
        entities.len(),
        options.raw_dir.display()
    );

    print_scrape_summaries(&exports, format)
}

async fn scrape_entities(
    loader: &ReportLoader<PortalClient>,
    entities: &[Entity],
    since: Option<NaiveDate>,
    options: &ScrapeOptions,
) -> Result<Vec<SummaryExport>> {
    let cache_root = options.cache_root();
    let today = chrono::Local::now().date_naive();

    let pb = ProgressBar::new(entities.len() as u64);
    pb.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>4}/{len:4} {msg}",
    )?);

    let mut exports = Vec::with_capacity(entities.len());
    let mut slugs = HashMap::new();
    for entity in entities {
        pb.set_message(entity.name.trim().to_string());
        tracing::info!("Scraping {} ({})", entity.name.trim(), entity.id);

        let reports = match fetch_reports(loader.parser().portal(), entity, since).await {
            Ok(reports) => reports,
            Err(e) => {
                tracing::warn!("Skipping {}: could not list reports: {}", entity.name, e);
                pb.inc(1);
                continue;
            }
        };

        claim_slug(&mut slugs, entity);
        let cache = ReportCache::new(cache_root.join(entity.slug()));
        let parsed = loader.load_all(&reports, &cache).await;
        let filings = EntityFilings::new(entity.clone(), parsed);
        filings.export(&options.raw_dir, today)?;
        exports.push(filings.summary_export(today));
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(exports)
}

/// Records the entity's slug. Returns false, with a warning, when another
/// entity in this run already wrote under it.
fn claim_slug(slugs: &mut HashMap<String, i64>, entity: &Entity) -> bool {
    let slug = entity.slug();
    match slugs.get(&slug) {
        Some(&owner) if owner != entity.id => {
            tracing::warn!(
                "{} ({}) shares the slug '{}' with {}; its exports overwrite the earlier ones",
                entity.name.trim(),
                entity.id,
                slug,
                owner
            );
            false
        }
        _ => {
            slugs.insert(slug, entity.id);
            true
        }
    }
}
