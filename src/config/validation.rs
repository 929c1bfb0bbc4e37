use crate::config::types::{Config, CrawlConfig, OutputConfig, UserAgentConfig};
use crate::url::{IgnoreList, LinkFilter};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Upper bound for concurrent page fetches
pub const MAX_CONCURRENT_FETCHES: usize = 64;

/// Lower bound for the per-fetch timeout
pub const MIN_FETCH_TIMEOUT: Duration = Duration::from_millis(100);

/// Validates the entire configuration and builds the crawl input from it
pub fn validate(config: &Config) -> Result<CrawlConfig, ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;

    let crawl = build_crawl_config(config)?;
    validate_crawl_config(&crawl)?;
    Ok(crawl)
}

/// Validates a crawl configuration
///
/// This is also run by the crawler itself, so a hand-built [`CrawlConfig`]
/// gets the same checks as one coming from a file.
pub fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.seed_url.trim().is_empty() {
        return Err(ConfigError::MissingSeed);
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > MAX_CONCURRENT_FETCHES
    {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and {}, got {}",
            MAX_CONCURRENT_FETCHES, config.max_concurrent_fetches
        )));
    }

    if config.fetch_timeout < MIN_FETCH_TIMEOUT {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout must be >= {}ms, got {}ms",
            MIN_FETCH_TIMEOUT.as_millis(),
            config.fetch_timeout.as_millis()
        )));
    }

    IgnoreList::compile(config.ignore_patterns.as_slice())?;
    validate_seed(&config.seed_url, config.reject_local_pages)?;

    Ok(())
}

/// Checks that the seed survives the link filter and parses as a URL
///
/// # Returns
///
/// * `Ok(String)` - The seed as it will enter the frontier
/// * `Err(ConfigError::InvalidSeed)` - The seed would be rejected
pub fn validate_seed(seed: &str, reject_local_pages: bool) -> Result<String, ConfigError> {
    let link = LinkFilter::new(reject_local_pages)
        .classify(seed)
        .map_err(|reason| ConfigError::InvalidSeed {
            url: seed.to_string(),
            reason: format!("rejected by link filter ({})", reason),
        })?;

    Url::parse(&link).map_err(|e| ConfigError::InvalidSeed {
        url: seed.to_string(),
        reason: e.to_string(),
    })?;

    Ok(link)
}

/// Turns the loosely typed file/CLI settings into a crawl configuration
fn build_crawl_config(config: &Config) -> Result<CrawlConfig, ConfigError> {
    let crawler = &config.crawler;

    let seed_url = crawler
        .seed_url
        .as_deref()
        .map(str::trim)
        .filter(|seed| !seed.is_empty())
        .ok_or(ConfigError::MissingSeed)?;

    let max_depth = match crawler.max_depth {
        None => {
            return Err(ConfigError::Validation(
                "max_depth is required".to_string(),
            ))
        }
        Some(depth) if depth < 0 => return Err(ConfigError::InvalidDepth(depth)),
        Some(depth) => u32::try_from(depth).map_err(|_| {
            ConfigError::Validation(format!("max_depth is too large, got {}", depth))
        })?,
    };

    Ok(CrawlConfig {
        seed_url: seed_url.to_string(),
        max_depth,
        ignore_patterns: crawler.ignore_patterns.clone(),
        same_domain_allowed: crawler.same_domain_allowed,
        domain_match: crawler.domain_match,
        reject_local_pages: crawler.reject_local_pages,
        max_concurrent_fetches: crawler.max_concurrent_fetches as usize,
        fetch_timeout: Duration::from_millis(crawler.fetch_timeout_ms),
        verbose: config.output.verbose,
    })
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::Validation(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(seed: Option<&str>, depth: Option<i64>) -> Config {
        let mut config = Config::default();
        config.crawler.seed_url = seed.map(str::to_string);
        config.crawler.max_depth = depth;
        config
    }

    #[test]
    fn test_validate_minimal_config() {
        let crawl = validate(&config_with(Some("example.com"), Some(2))).unwrap();
        assert_eq!(crawl.seed_url, "example.com");
        assert_eq!(crawl.max_depth, 2);
        assert_eq!(crawl.max_concurrent_fetches, 1);
        assert!(crawl.reject_local_pages);
    }

    #[test]
    fn test_missing_seed() {
        let result = validate(&config_with(None, Some(1)));
        assert!(matches!(result, Err(ConfigError::MissingSeed)));
    }

    #[test]
    fn test_blank_seed() {
        let result = validate(&config_with(Some("   "), Some(1)));
        assert!(matches!(result, Err(ConfigError::MissingSeed)));
    }

    #[test]
    fn test_negative_depth() {
        let result = validate(&config_with(Some("example.com"), Some(-1)));
        assert!(matches!(result, Err(ConfigError::InvalidDepth(-1))));
    }

    #[test]
    fn test_missing_depth() {
        let result = validate(&config_with(Some("example.com"), None));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_depth_is_valid() {
        let crawl = validate(&config_with(Some("example.com"), Some(0))).unwrap();
        assert_eq!(crawl.max_depth, 0);
    }

    #[test]
    fn test_seed_rejected_by_filter() {
        for seed in ["/relative", "localhost", "http://example.com:8080/", "mailto:a@b.com"] {
            let result = validate(&config_with(Some(seed), Some(1)));
            assert!(
                matches!(result, Err(ConfigError::InvalidSeed { .. })),
                "{} should be rejected",
                seed
            );
        }
    }

    #[test]
    fn test_validate_seed_normalizes() {
        assert_eq!(validate_seed("example.com", true).unwrap(), "http://example.com");
        assert_eq!(
            validate_seed("https://example.com/a", true).unwrap(),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        let mut config = config_with(Some("example.com"), Some(1));
        config.crawler.ignore_patterns = vec!["[unclosed".to_string()];
        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut config = config_with(Some("example.com"), Some(1));
        config.crawler.max_concurrent_fetches = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.crawler.max_concurrent_fetches = 65;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.crawler.max_concurrent_fetches = 64;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_timeout_lower_bound() {
        let mut config = config_with(Some("example.com"), Some(1));
        config.crawler.fetch_timeout_ms = 99;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_crawler_name_characters() {
        let mut config = config_with(Some("example.com"), Some(1));
        config.user_agent.crawler_name = "Bad Name!".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.user_agent.crawler_name = String::new();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_contact_url_must_parse() {
        let mut config = config_with(Some("example.com"), Some(1));
        config.user_agent.contact_url = Some("not a url".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.user_agent.contact_url = Some("https://example.com/about".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_output_path() {
        let mut config = config_with(Some("example.com"), Some(1));
        config.output.output_path = " ".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_verbose_carried_over() {
        let mut config = config_with(Some("example.com"), Some(1));
        config.output.verbose = true;
        assert!(validate(&config).unwrap().verbose);
    }
}
