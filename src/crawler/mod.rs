//! Crawler module for the crawl loop and everything it drives
//!
//! This module contains the core crawling logic, including:
//! - The crawl frontier with depth and provenance bookkeeping
//! - The crawl controller that drains the frontier
//! - The page fetcher seam and its HTTP implementation
//! - HTML link extraction

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{run_crawl, CrawlReport, Crawler, Outcome, StepOutcome};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher, MAX_REDIRECTS};
pub use frontier::{CrawlState, FrontierEntry, FrontierStats};
pub use parser::extract_hrefs;
