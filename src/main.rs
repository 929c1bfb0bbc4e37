//! Domain-Scout main entry point
//!
//! This is the command-line interface for the Domain-Scout domain discovery
//! crawler.

use anyhow::Context;
use clap::Parser;
use domain_scout::config::{
    load_config_with_hash, load_ignore_patterns, validate, Config, CrawlConfig,
    DEFAULT_IGNORE_FILE,
};
use domain_scout::crawler::{run_crawl, HttpFetcher};
use domain_scout::output::{OutputHandler, TextOutput};
use domain_scout::DomainMatch;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Domain-Scout: discovers the external domains reachable from a seed URL
///
/// Domain-Scout follows hyperlinks outward from a seed page up to a maximum
/// depth and writes every distinct domain it reached to a file, one per line.
#[derive(Parser, Debug)]
#[command(name = "domain-scout")]
#[command(version)]
#[command(about = "Discovers external domains reachable from a seed URL", long_about = None)]
struct Cli {
    /// URL to start from (a missing scheme defaults to http://)
    #[arg(value_name = "URL", conflicts_with = "url")]
    seed: Option<String>,

    /// URL to start from
    #[arg(short = 'u', long)]
    url: Option<String>,

    /// Maximum number of hops from the seed that are fetched
    #[arg(short = 'd', long, allow_negative_numbers = true)]
    max_depth: Option<i64>,

    /// File with one ignore pattern per line
    #[arg(short = 'i', long, value_name = "FILE")]
    ignore_file: Option<PathBuf>,

    /// File the discovered domains are written to
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short = 'c', long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Allow several links per domain into the frontier
    #[arg(long)]
    same_domain: bool,

    /// How a domain is judged already tracked
    #[arg(long, value_enum)]
    domain_match: Option<DomainMatch>,

    /// Number of pages fetched at the same time
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Timeout for a single page fetch in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Echo visited links and found domains; repeat for more log detail (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let config = merge_cli(config, &cli);
    let crawl = validate(&config).context("Invalid crawl configuration")?;

    if cli.dry_run {
        handle_dry_run(&config, &crawl);
        return Ok(());
    }

    handle_crawl(&config, crawl).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            // A single -v only turns on result echo
            0 | 1 => EnvFilter::new("domain_scout=info,warn"),
            2 => EnvFilter::new("domain_scout=debug,info"),
            3 => EnvFilter::new("domain_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command line values on top of the file configuration
fn merge_cli(mut config: Config, cli: &Cli) -> Config {
    if let Some(seed) = cli.url.as_ref().or(cli.seed.as_ref()) {
        config.crawler.seed_url = Some(seed.clone());
    }
    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = Some(depth);
    }
    if cli.same_domain {
        config.crawler.same_domain_allowed = true;
    }
    if let Some(domain_match) = cli.domain_match {
        config.crawler.domain_match = domain_match;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_fetches = concurrency;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.crawler.fetch_timeout_ms = timeout_ms;
    }
    if let Some(output) = &cli.output {
        config.output.output_path = output.display().to_string();
    }
    if cli.verbose > 0 {
        config.output.verbose = true;
    }

    let ignore_file = cli
        .ignore_file
        .clone()
        .or_else(|| config.output.ignore_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_IGNORE_FILE));

    // A missing ignore file is not fatal
    match load_ignore_patterns(&ignore_file) {
        Ok(patterns) => {
            tracing::info!(
                "Loaded {} ignore patterns from {}",
                patterns.len(),
                ignore_file.display()
            );
            config.crawler.ignore_patterns.extend(patterns);
        }
        Err(e) => tracing::warn!("{}; continuing without it", e),
    }

    config
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, crawl: &CrawlConfig) {
    println!("=== Domain-Scout Dry Run ===\n");

    println!("Crawl Configuration:");
    println!("  Seed: {}", crawl.seed_url);
    println!("  Max depth: {}", crawl.max_depth);
    println!("  Same domain allowed: {}", crawl.same_domain_allowed);
    println!("  Domain match: {}", crawl.domain_match);
    println!("  Reject local pages: {}", crawl.reject_local_pages);
    println!("  Concurrent fetches: {}", crawl.max_concurrent_fetches);
    println!("  Fetch timeout: {}ms", crawl.fetch_timeout.as_millis());

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Result file: {}", config.output.output_path);
    println!("  Verbose: {}", crawl.verbose);

    println!("\nIgnore Patterns ({}):", crawl.ignore_patterns.len());
    for pattern in &crawl.ignore_patterns {
        println!("  - {}", pattern);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, crawl: CrawlConfig) -> anyhow::Result<()> {
    let timeout = crawl.fetch_timeout;
    let fetcher = HttpFetcher::new(&config.user_agent, timeout + Duration::from_millis(500))
        .context("Failed to build HTTP client")?;

    let output = TextOutput::new(&config.output.output_path, crawl.verbose);

    let report = run_crawl(crawl, fetcher).await.context("Crawl failed")?;

    output
        .record_domains(&report.domains)
        .context("Failed to write results")?;
    output
        .finalize(&report.stats)
        .context("Failed to write summary")?;

    tracing::info!("Results written to {}", output.path().display());
    Ok(())
}
