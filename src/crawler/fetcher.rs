//! Page fetching
//!
//! The crawl loop only sees the [`Fetcher`] trait: give it a URL, get back the
//! raw href values found on that page. [`HttpFetcher`] is the implementation
//! used by the binary:
//! - Builds an HTTP client with a proper user agent string
//! - Follows redirects (at most 10 hops)
//! - Classifies failures into [`FetchError`] variants
//! - Returns no links for content that is not HTML

use crate::config::UserAgentConfig;
use crate::crawler::parser::extract_hrefs;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::sync::Arc;
use std::time::Duration;

/// Maximum number of redirects followed for a single fetch
pub const MAX_REDIRECTS: usize = 10;

/// Retrieves the hyperlinks of a page
///
/// Implementations return href attribute values exactly as written in the
/// page. Relative links, anchors and assets are all returned; classifying them
/// is the frontier's job.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns the raw href values found on it
    async fn fetch_links(&self, url: &str) -> Result<Vec<String>, FetchError>;
}

#[async_trait]
impl<'a, T: Fetcher + ?Sized> Fetcher for &'a T {
    async fn fetch_links(&self, url: &str) -> Result<Vec<String>, FetchError> {
        (**self).fetch_links(url).await
    }
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    async fn fetch_links(&self, url: &str) -> Result<Vec<String>, FetchError> {
        (**self).fetch_links(url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Overall timeout of a single request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use domain_scout::config::UserAgentConfig;
/// use domain_scout::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig::default();
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config, timeout)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a page and extracts its hrefs
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx, HTML content | `Ok(hrefs)` |
    /// | 2xx, other content type | `Ok(vec![])` |
    /// | non-2xx status | `Err(Status)` |
    /// | timeout | `Err(Timeout)` |
    /// | connection, TLS, redirect failure | `Err(Network)` |
    /// | body cannot be decoded | `Err(Parse)` |
    async fn fetch_links(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if !content_type.is_empty() && !content_type.contains("html") {
            tracing::debug!("Skipping {} with content type {}", url, content_type);
            return Ok(Vec::new());
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Parse {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        Ok(extract_hrefs(&body))
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Network {
            url: url.to_string(),
            message: format!("Connection failed: {}", error),
        }
    } else if error.is_redirect() {
        FetchError::Network {
            url: url.to_string(),
            message: format!("Redirect error: {}", error),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: Some("https://example.com/about".to_string()),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_test_config(), Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_fetcher_new() {
        let fetcher = HttpFetcher::new(&create_test_config(), Duration::from_secs(5));
        assert!(fetcher.is_ok());
    }

    struct MapFetcher(HashMap<String, Vec<String>>);

    #[async_trait]
    impl Fetcher for MapFetcher {
        async fn fetch_links(&self, url: &str) -> Result<Vec<String>, FetchError> {
            self.0.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    #[tokio::test]
    async fn test_fetcher_through_reference_and_arc() {
        let mut pages = HashMap::new();
        pages.insert("http://a.com".to_string(), vec!["b.com".to_string()]);
        let fetcher = Arc::new(MapFetcher(pages));

        let by_arc = fetcher.fetch_links("http://a.com").await.unwrap();
        let by_ref = (&*fetcher).fetch_links("http://a.com").await.unwrap();
        assert_eq!(by_arc, by_ref);

        let missing = fetcher.fetch_links("http://missing.com").await;
        assert_eq!(
            missing,
            Err(FetchError::Status {
                url: "http://missing.com".to_string(),
                status: 404
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let fetcher = HttpFetcher::new(&create_test_config(), Duration::from_secs(2)).unwrap();
        // Port 9 (discard) on localhost is expected to refuse connections
        let result = fetcher.fetch_links("http://127.0.0.1:9/").await;
        assert!(matches!(
            result,
            Err(FetchError::Network { .. }) | Err(FetchError::Timeout { .. })
        ));
    }
}
