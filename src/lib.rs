//! Domain-Scout: an outbound domain discovery crawler
//!
//! This crate crawls outward from a seed URL, following hyperlinks up to a
//! configured depth, and reports the distinct domains it reached. Asset links,
//! anchors, mail/tel schemes and caller-supplied ignore patterns are filtered
//! out before anything enters the frontier.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Seed URL is required")]
    MissingSeed,

    #[error("Max depth must be >= 0, got {0}")]
    InvalidDepth(i64),

    #[error("Seed URL '{url}' cannot be crawled: {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("Invalid ignore pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to read ignore file {path}: {source}")]
    IgnoreFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors reported by a [`crawler::Fetcher`]
///
/// The crawl loop treats every variant the same way: the link is logged and
/// dropped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse page {url}: {message}")]
    Parse { url: String, message: String },
}

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{run_crawl, CrawlReport, Crawler, Fetcher, HttpFetcher};
pub use state::LinkState;
pub use url::{domain_of, DomainMatch, LinkFilter, Rejection};
