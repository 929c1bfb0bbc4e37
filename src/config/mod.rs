//! Configuration module for Domain-Scout
//!
//! This module handles loading and parsing TOML configuration files, reading
//! ignore pattern files, and validating the merged settings into a
//! [`CrawlConfig`].
//!
//! # Example
//!
//! ```no_run
//! use domain_scout::config::{load_config, validate};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! let crawl = validate(&config).unwrap();
//! println!("Crawler will use max depth: {}", crawl.max_depth);
//! ```

mod ignore;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_FETCH_TIMEOUT_MS,
    DEFAULT_IGNORE_FILE, DEFAULT_OUTPUT_PATH,
};

// Re-export loading functions
pub use ignore::{load_ignore_patterns, parse_ignore_patterns};
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use validation::{
    validate, validate_crawl_config, validate_seed, MAX_CONCURRENT_FETCHES, MIN_FETCH_TIMEOUT,
};
