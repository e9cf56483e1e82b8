// ABOUTME: Command-line entry point for the Similarweb scraper.
// ABOUTME: Runs the example scrape of all four categories or a single category and writes JSON results.

mod output;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use simweb_fetch::{ClientBuilder, Scraper, TRENDING_SITEMAP_URL};
use simweb_parse::{TrendCategory, TrendEntry};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::output::{Report, ResultsDir};

const EXAMPLE_WEBSITES: [&str; 2] = ["google.com", "youtube.com"];
const EXAMPLE_COMPARISON: [&str; 2] = ["google.com", "bing.com"];
const EXAMPLE_SITEMAP_LIMIT: usize = 20;

/// Scrape Similarweb traffic insights through the Scrapfly API.
///
/// Requires SCRAPFLY_KEY in the environment. Set RUST_LOG to adjust logging.
#[derive(Parser, Debug)]
#[command(name = "simweb", version)]
struct Args {
    /// Directory receiving the JSON result files
    #[arg(short = 'o', long = "output", default_value = "results", global = true)]
    output: PathBuf,

    /// Maximum requests in flight
    #[arg(short = 'c', long = "concurrency", global = true)]
    concurrency: Option<usize>,

    /// Scraping API endpoint
    #[arg(long = "api-url", hide = true, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape one example of every category (the default)
    Run,
    /// Scrape website profiles
    Website {
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// Scrape one comparison page for up to five domains
    Compare {
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// Scrape trending-website rankings by category slug
    Trends {
        #[arg(required = true)]
        categories: Vec<String>,
    },
    /// Collect page URLs from a sitemap or sitemap index
    Sitemap {
        url: String,
        /// Stop after this many URLs
        #[arg(short = 'l', long = "limit")]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            error!(failed, "some targets failed");
            ExitCode::from(1)
        }
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns the number of failed targets.
async fn run(args: Args) -> Result<usize> {
    let mut builder = ClientBuilder::from_env();
    if let Some(concurrency) = args.concurrency {
        builder = builder.concurrency(concurrency);
    }
    if let Some(api_url) = args.api_url {
        builder = builder.api_url(api_url);
    }
    let scraper = Scraper::new(builder.build()?);
    let out = ResultsDir::new(&args.output);
    let mut report = Report::default();

    match args.command.unwrap_or(Command::Run) {
        Command::Run => {
            info!(output = %args.output.display(), "starting example run");
            websites(&scraper, &out, &mut report, &EXAMPLE_WEBSITES).await?;
            compare(&scraper, &out, &mut report, &EXAMPLE_COMPARISON).await?;
            trends(
                &scraper,
                &out,
                &mut report,
                &[TrendCategory::ComputersElectronicsAndTechnology.slug()],
            )
            .await?;
            sitemap(&scraper, &out, &mut report, TRENDING_SITEMAP_URL, Some(EXAMPLE_SITEMAP_LIMIT))
                .await?;
        }
        Command::Website { domains } => websites(&scraper, &out, &mut report, &domains).await?,
        Command::Compare { domains } => compare(&scraper, &out, &mut report, &domains).await?,
        Command::Trends { categories } => trends(&scraper, &out, &mut report, &categories).await?,
        Command::Sitemap { url, limit } => sitemap(&scraper, &out, &mut report, &url, limit).await?,
    }

    Ok(report.failed())
}

async fn websites<S: AsRef<str>>(
    scraper: &Scraper,
    out: &ResultsDir,
    report: &mut Report,
    domains: &[S],
) -> Result<()> {
    let outcomes = scraper.scrape_websites(domains).await;
    let profiles = report.successes("website", outcomes);
    out.write_records("websites.json", &profiles)?;
    Ok(())
}

async fn compare<S: AsRef<str>>(
    scraper: &Scraper,
    out: &ResultsDir,
    report: &mut Report,
    domains: &[S],
) -> Result<()> {
    match scraper.scrape_comparison(domains).await {
        Ok(result) => {
            let path = out.write("compare.json", &result)?;
            info!(path = %path.display(), sites = result.sites.len(), "results written");
        }
        Err(err) => {
            let target = domains
                .iter()
                .map(AsRef::<str>::as_ref)
                .collect::<Vec<_>>()
                .join(" vs ");
            report.failure("compare", &target, &err);
        }
    }
    Ok(())
}

async fn trends<S: AsRef<str>>(
    scraper: &Scraper,
    out: &ResultsDir,
    report: &mut Report,
    categories: &[S],
) -> Result<()> {
    let outcomes = scraper.scrape_trends(categories).await;
    // Ranks restart at 1 in every category, so each keeps its own list.
    let by_category: BTreeMap<String, Vec<TrendEntry>> = report
        .successes_by_target("trends", outcomes)
        .into_iter()
        .map(|(target, entries)| {
            let slug = target
                .parse::<TrendCategory>()
                .map(|c| c.slug().to_string())
                .unwrap_or(target);
            (slug, entries)
        })
        .collect();
    out.write_groups("trends.json", &by_category)?;
    Ok(())
}

async fn sitemap(
    scraper: &Scraper,
    out: &ResultsDir,
    report: &mut Report,
    url: &str,
    limit: Option<usize>,
) -> Result<()> {
    match scraper.scrape_sitemaps(url, limit).await {
        Ok(urls) => {
            out.write_records("sitemaps.json", &urls)?;
        }
        Err(err) => report.failure("sitemap", url, &err),
    }
    Ok(())
}
