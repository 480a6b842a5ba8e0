use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod analysis;
mod campaign;
mod config;
mod consolidate;
mod export;
mod feed;
mod models;
mod normalize;
mod report;
mod stats;

use crate::analysis::Analysis;
use crate::config::{FeedConfig, ReportConfig};
use crate::feed::HttpFeed;

#[derive(Parser)]
#[command(name = "gofundme-donation-stats")]
#[command(about = "Donation statistics for a GoFundMe campaign", long_about = None)]
#[command(group(
    ArgGroup::new("source")
        .args(["campaign", "from_export"])
        .multiple(false)
))]
struct Cli {
    /// Campaign URL, e.g. https://www.gofundme.com/f/help-the-shelter
    campaign: Option<String>,

    /// Read a donor list saved from the campaign page instead of the feed
    #[arg(long, value_name = "PATH")]
    from_export: Option<PathBuf>,

    /// How many donors to rank
    #[arg(long, env = "DONATION_STATS_TOP", default_value_t = config::DEFAULT_TOP_N)]
    top: usize,

    /// Minimum consolidated amount for the big donor list
    #[arg(
        long,
        env = "DONATION_STATS_BIG_DONOR_THRESHOLD",
        default_value_t = Decimal::from(config::DEFAULT_BIG_DONOR_THRESHOLD)
    )]
    big_donor_threshold: Decimal,

    #[arg(long, env = "DONATION_STATS_FEED_URL", default_value = config::DEFAULT_FEED_URL)]
    feed_url: String,

    #[arg(long, default_value_t = config::DEFAULT_PAGE_SIZE)]
    page_size: usize,

    #[arg(long, default_value = config::DEFAULT_SORT)]
    sort: String,

    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Give up after this many pages if the feed keeps reporting more
    #[arg(long)]
    max_pages: Option<usize>,

    /// Give up after this many rejected campaign URLs
    #[arg(long)]
    max_prompts: Option<usize>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            base_url: self.feed_url.clone(),
            page_size: self.page_size,
            sort: self.sort.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            max_pages: self.max_pages,
        }
    }

    fn report_config(&self) -> ReportConfig {
        ReportConfig {
            top_n: self.top,
            big_donor_threshold: self.big_donor_threshold,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "gofundme_donation_stats=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    anyhow::ensure!(cli.page_size > 0, "--page-size must be at least 1");

    let report_config = cli.report_config();

    let (label, raw) = match &cli.from_export {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let raw = export::parse_export(&text, chrono::Utc::now())
                .with_context(|| format!("failed to parse donor list in {}", path.display()))?;
            (path.display().to_string(), raw)
        }
        None => {
            let stdin = std::io::stdin();
            let slug = campaign::resolve_or_prompt(
                cli.campaign.as_deref(),
                &mut stdin.lock(),
                &mut std::io::stdout(),
                cli.max_prompts,
            )
            .context("failed to resolve a campaign")?;

            let feed_config = cli.feed_config();
            let feed = HttpFeed::new(&feed_config).context("failed to build HTTP client")?;
            let raw = feed::fetch_all(&feed, &slug, &feed_config)
                .await
                .with_context(|| format!("failed to fetch donations for campaign `{slug}`"))?;
            (slug, raw)
        }
    };

    let analysis = Analysis::from_raw(raw, &report_config);
    print!("{}", report::build_report(&label, &analysis, &report_config));

    Ok(())
}
