use crate::url::DomainMatch;
use serde::Deserialize;
use std::time::Duration;

/// Default name of the ignore pattern file
pub const DEFAULT_IGNORE_FILE: &str = "IgnoreSitesList.txt";

/// Default path of the result file
pub const DEFAULT_OUTPUT_PATH: &str = "output.txt";

/// Default per-fetch timeout in milliseconds
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;

/// Main configuration structure, as read from a TOML file and the command line
///
/// Every field has a default so that a crawl can be configured from the
/// command line alone. [`crate::config::validate`] turns this into a
/// [`CrawlConfig`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL to start exploring from
    #[serde(rename = "seed-url", default)]
    pub seed_url: Option<String>,

    /// Maximum number of hops from the seed that are fetched
    #[serde(rename = "max-depth", default)]
    pub max_depth: Option<i64>,

    /// Case-insensitive regex patterns for links that should never be followed
    #[serde(rename = "ignore-patterns", default)]
    pub ignore_patterns: Vec<String>,

    /// Allow several links on an already-tracked domain into the frontier
    #[serde(rename = "same-domain-allowed", default)]
    pub same_domain_allowed: bool,

    /// How a domain is judged already tracked
    #[serde(rename = "domain-match", default)]
    pub domain_match: DomainMatch,

    /// Reject links whose "domain" looks like a page name (index.html)
    #[serde(rename = "reject-local-pages", default = "default_true")]
    pub reject_local_pages: bool,

    /// Number of pages fetched at the same time
    #[serde(rename = "max-concurrent-fetches", default = "default_concurrency")]
    pub max_concurrent_fetches: u32,

    /// Timeout for a single page fetch (milliseconds)
    #[serde(rename = "fetch-timeout-ms", default = "default_fetch_timeout")]
    pub fetch_timeout_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: None,
            max_depth: None,
            ignore_patterns: Vec::new(),
            same_domain_allowed: false,
            domain_match: DomainMatch::default(),
            reject_local_pages: true,
            max_concurrent_fetches: default_concurrency(),
            fetch_timeout_ms: default_fetch_timeout(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// File the discovered domains are written to, one per line
    #[serde(rename = "output-path", default = "default_output_path")]
    pub output_path: String,

    /// Line-oriented file of ignore patterns
    #[serde(rename = "ignore-file", default)]
    pub ignore_file: Option<String>,

    /// Echo visited links and discovered domains to the console
    #[serde(default)]
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            ignore_file: None,
            verbose: false,
        }
    }
}

/// Validated input of a single crawl
///
/// This is what the crawl engine consumes. It is immutable for the duration
/// of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    /// Seed URL; a missing scheme is filled in with `http://`
    pub seed_url: String,

    /// Depth of the deepest links that are fetched (seed = 0)
    pub max_depth: u32,

    /// Case-insensitive regex patterns matched against raw link text
    pub ignore_patterns: Vec<String>,

    /// Allow several links per tracked domain into the frontier
    pub same_domain_allowed: bool,

    /// How a domain is judged already tracked
    pub domain_match: DomainMatch,

    /// Enables the local page name heuristic of the link filter
    pub reject_local_pages: bool,

    /// Number of pages fetched at the same time
    pub max_concurrent_fetches: usize,

    /// Timeout for a single page fetch
    pub fetch_timeout: Duration,

    /// Log every visited link and the full detail of fetch failures
    pub verbose: bool,
}

impl CrawlConfig {
    /// Creates a crawl configuration with default settings
    ///
    /// # Example
    ///
    /// ```
    /// use domain_scout::CrawlConfig;
    ///
    /// let config = CrawlConfig::new("example.com", 2);
    /// assert_eq!(config.max_depth, 2);
    /// assert!(!config.same_domain_allowed);
    /// ```
    pub fn new(seed_url: impl Into<String>, max_depth: u32) -> Self {
        Self {
            seed_url: seed_url.into(),
            max_depth,
            ignore_patterns: Vec::new(),
            same_domain_allowed: false,
            domain_match: DomainMatch::default(),
            reject_local_pages: true,
            max_concurrent_fetches: default_concurrency() as usize,
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            verbose: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> u32 {
    1
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

fn default_crawler_name() -> String {
    "DomainScout".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}
