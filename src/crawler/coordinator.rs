//! Crawl controller - main crawl orchestration logic
//!
//! This module contains the crawl loop. It takes entries from the frontier,
//! fetches them through a [`Fetcher`], feeds the discovered hrefs back into
//! the frontier one depth level deeper, and drops links whose fetch failed.
//!
//! Up to `max_concurrent_fetches` pages are fetched at the same time. Their
//! outcomes are applied one by one in the order the entries left the
//! frontier, so the frontier has a single writer and a concurrent crawl
//! produces the same result as a sequential one.

use crate::config::{validate_crawl_config, CrawlConfig};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{CrawlState, FrontierEntry};
use crate::output::CrawlSummary;
use crate::{ConfigError, FetchError};
use futures::future::join_all;
use std::collections::BTreeSet;

/// What happened to a single frontier entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The page was fetched; `accepted` of its `discovered` hrefs were recorded
    Visited { discovered: usize, accepted: usize },

    /// The entry was past the depth limit and was counted without a fetch
    SkippedAtDepthLimit,

    /// The fetch failed and the link was dropped
    Dropped(FetchError),
}

/// Result of processing one frontier entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub link: String,
    pub depth: u32,
    pub outcome: Outcome,
}

/// Result of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Distinct domains of all visited links, sorted
    pub domains: BTreeSet<String>,

    /// Counters and timing of the crawl
    pub stats: CrawlSummary,
}

/// Main crawler structure
///
/// Owns the crawl state for the duration of one run.
pub struct Crawler<F: Fetcher> {
    config: CrawlConfig,
    state: CrawlState,
    fetcher: F,
    summary: CrawlSummary,
}

impl<F: Fetcher> Crawler<F> {
    /// Creates a crawler and puts the seed into the frontier
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    /// * `fetcher` - Page fetcher
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run, seed queued at depth 0
    /// * `Err(ConfigError)` - Invalid configuration or a seed that the link
    ///   filter or an ignore pattern rejects
    pub fn new(config: CrawlConfig, fetcher: F) -> Result<Self, ConfigError> {
        validate_crawl_config(&config)?;

        let mut state = CrawlState::from_config(&config)?;
        state
            .admit(None, &config.seed_url, 0)
            .map_err(|reason| ConfigError::InvalidSeed {
                url: config.seed_url.clone(),
                reason: format!("rejected by link filter ({})", reason),
            })?;

        let summary = CrawlSummary::new(config.seed_url.clone(), config.max_depth);

        Ok(Self {
            config,
            state,
            fetcher,
            summary,
        })
    }

    /// Runs the crawl until the frontier is empty
    pub async fn run(mut self) -> CrawlReport {
        tracing::info!(
            "Starting crawl of {} (max depth {}, {} concurrent fetches)",
            self.config.seed_url,
            self.config.max_depth,
            self.config.max_concurrent_fetches
        );

        let limit = self.config.max_concurrent_fetches.max(1);
        while !self.process_batch(limit).await.is_empty() {}

        let report = self.finish();
        tracing::info!(
            "Crawl completed: {} domains from {} visited links",
            report.domains.len(),
            report.stats.frontier.visited + report.stats.frontier.skipped_at_depth_limit
        );
        report
    }

    /// Processes the oldest frontier entry
    ///
    /// Returns None once the frontier is empty.
    pub async fn step(&mut self) -> Option<StepOutcome> {
        self.process_batch(1).await.into_iter().next()
    }

    /// Takes up to `limit` entries, fetches them concurrently and applies the
    /// outcomes in take order
    ///
    /// Returns an empty vector once the frontier is empty.
    pub async fn process_batch(&mut self, limit: usize) -> Vec<StepOutcome> {
        let batch: Vec<FrontierEntry> = std::iter::from_fn(|| self.state.take())
            .take(limit.max(1))
            .collect();

        if batch.is_empty() {
            return Vec::new();
        }

        let max_depth = self.state.max_depth();
        let timeout = self.config.fetch_timeout;
        let fetcher = &self.fetcher;

        let fetches = batch.iter().map(|entry| async move {
            if entry.depth > max_depth {
                return None;
            }

            let result = match tokio::time::timeout(timeout, fetcher.fetch_links(&entry.link)).await
            {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout {
                    url: entry.link.clone(),
                }),
            };
            Some(result)
        });
        let results = join_all(fetches).await;

        batch
            .into_iter()
            .zip(results)
            .map(|(entry, result)| self.apply(entry, result))
            .collect()
    }

    fn apply(
        &mut self,
        entry: FrontierEntry,
        result: Option<Result<Vec<String>, FetchError>>,
    ) -> StepOutcome {
        if self.config.verbose {
            tracing::info!("Visiting {}", entry.link);
        }

        let outcome = match result {
            None => {
                self.state.skip_at_depth_limit(&entry.link);
                Outcome::SkippedAtDepthLimit
            }
            Some(Ok(hrefs)) => {
                let accepted = self
                    .state
                    .enqueue(Some(&entry.link), hrefs.as_slice(), entry.depth + 1);
                self.state.mark_visited(&entry.link);
                tracing::debug!(
                    "{}: {} hrefs, {} accepted",
                    entry.link,
                    hrefs.len(),
                    accepted
                );
                Outcome::Visited {
                    discovered: hrefs.len(),
                    accepted,
                }
            }
            Some(Err(error)) => {
                if self.config.verbose {
                    tracing::warn!("Dropping {}: {}", entry.link, error);
                } else {
                    tracing::warn!("Failed to load {}", entry.link);
                }
                tracing::debug!(
                    "Provenance of dropped link: {}",
                    self.state.provenance(&entry.link).join(" -> ")
                );
                self.state.drop_link(&entry.link);
                Outcome::Dropped(error)
            }
        };

        tracing::info!(
            "Queue: {}, Visited: {}, Current depth: {}",
            self.state.pending_len(),
            self.state.visited_len(),
            entry.depth
        );

        StepOutcome {
            link: entry.link,
            depth: entry.depth,
            outcome,
        }
    }

    fn finish(self) -> CrawlReport {
        let domains = self.state.domains();
        let mut stats = self.summary;
        stats.finish(self.state.stats().clone(), domains.len());
        CrawlReport { domains, stats }
    }

    /// Current crawl state
    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }
}

/// Runs a complete crawl
///
/// # Arguments
///
/// * `config` - The crawl configuration
/// * `fetcher` - Page fetcher
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed; fetch failures never end a crawl
/// * `Err(ConfigError)` - The configuration was rejected before any fetch
///
/// # Example
///
/// ```no_run
/// use domain_scout::config::UserAgentConfig;
/// use domain_scout::{run_crawl, CrawlConfig, HttpFetcher};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CrawlConfig::new("example.com", 1);
/// let fetcher = HttpFetcher::new(&UserAgentConfig::default(), config.fetch_timeout)?;
/// let report = run_crawl(config, fetcher).await?;
/// for domain in &report.domains {
///     println!("{}", domain);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl<F: Fetcher>(
    config: CrawlConfig,
    fetcher: F,
) -> Result<CrawlReport, ConfigError> {
    let crawler = Crawler::new(config, fetcher)?;
    Ok(crawler.run().await)
}
