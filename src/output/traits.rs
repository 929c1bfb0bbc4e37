//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! summary of a finished crawl.

use crate::crawler::FrontierStats;
use crate::url::Rejection;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Summary statistics for a crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    // Run metadata
    pub seed_url: String,
    pub max_depth: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    // Link outcomes
    pub frontier: FrontierStats,

    // Result
    pub unique_domains: u64,
}

impl CrawlSummary {
    /// Creates a summary for a crawl that starts now
    pub fn new(seed_url: impl Into<String>, max_depth: u32) -> Self {
        Self {
            seed_url: seed_url.into(),
            max_depth,
            started_at: Utc::now(),
            finished_at: None,
            frontier: FrontierStats::default(),
            unique_domains: 0,
        }
    }

    /// Records the final counters and the finish time
    pub fn finish(&mut self, frontier: FrontierStats, unique_domains: usize) {
        self.frontier = frontier;
        self.unique_domains = unique_domains as u64;
        self.finished_at = Some(Utc::now());
    }

    /// Duration of the crawl in seconds, if it finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    /// Number of pages a fetch was attempted for
    pub fn pages_fetched(&self) -> u64 {
        self.frontier.visited + self.frontier.dropped
    }

    /// Returns the fetch success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let fetched = self.pages_fetched();
        if fetched == 0 {
            return 0.0;
        }
        (self.frontier.visited as f64 / fetched as f64) * 100.0
    }

    /// Rejection counts, largest first, ties in check order
    pub fn rejection_breakdown(&self) -> Vec<(Rejection, u64)> {
        let mut breakdown: Vec<_> = self
            .frontier
            .rejected
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(reason, count)| (*reason, *count))
            .collect();
        breakdown.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        breakdown
    }
}

/// Trait for output handlers
///
/// Output handlers receive the result of a finished crawl.
pub trait OutputHandler {
    /// Records the discovered domains
    ///
    /// # Arguments
    ///
    /// * `domains` - Distinct domains of all visited links, sorted
    fn record_domains(&self, domains: &BTreeSet<String>) -> OutputResult<()>;

    /// Finalizes the output, performing any cleanup or final writes
    ///
    /// # Arguments
    ///
    /// * `summary` - Statistics of the finished crawl
    fn finalize(&self, summary: &CrawlSummary) -> OutputResult<()>;
}
