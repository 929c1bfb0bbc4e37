//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test the HTTP
//! fetcher and the full crawl cycle end-to-end.
//!
//! The link filter rejects explicit ports, so the crawl tests use fictional
//! `.test` hosts and route every request to the mock server, with the host
//! name as the first path segment.

use async_trait::async_trait;
use domain_scout::config::{load_ignore_patterns, UserAgentConfig};
use domain_scout::crawler::{Crawler, Fetcher, HttpFetcher};
use domain_scout::output::{OutputHandler, TextOutput};
use domain_scout::url::strip_scheme;
use domain_scout::{run_crawl, CrawlConfig, FetchError, LinkState};
use std::collections::BTreeSet;
use std::io::Write;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: None,
    }
}

fn http_fetcher() -> HttpFetcher {
    HttpFetcher::new(&test_user_agent(), Duration::from_secs(5)).expect("Failed to build client")
}

fn html(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>Test</title></head><body>{}</body></html>",
        anchors
    )
}

fn html_page(links: &[&str]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(html(links), "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page_path: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(links))
        .mount(server)
        .await;
}

fn domains(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Sends `http://host/path` to `{mock}/host/path`
struct RoutedFetcher {
    base: String,
    inner: HttpFetcher,
}

impl RoutedFetcher {
    fn new(server: &MockServer) -> Self {
        Self {
            base: server.uri(),
            inner: http_fetcher(),
        }
    }
}

#[async_trait]
impl Fetcher for RoutedFetcher {
    async fn fetch_links(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let routed = format!("{}/{}", self.base, strip_scheme(url));
        self.inner.fetch_links(&routed).await.map_err(|e| match e {
            FetchError::Status { status, .. } => FetchError::Status {
                url: url.to_string(),
                status,
            },
            other => other,
        })
    }
}

#[tokio::test]
async fn test_http_fetcher_returns_raw_hrefs() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        &["/about", "other.com/page", "mailto:a@b.com", "#top"],
    )
    .await;

    let links = http_fetcher()
        .fetch_links(&format!("{}/", mock_server.uri()))
        .await
        .expect("Fetch failed");

    assert_eq!(links, vec!["/about", "other.com/page", "mailto:a@b.com", "#top"]);
}

#[tokio::test]
async fn test_http_fetcher_non_html_has_no_links() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/file.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="http://hidden.com/">x</a>"#, "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let links = http_fetcher()
        .fetch_links(&format!("{}/file.pdf", mock_server.uri()))
        .await
        .expect("Fetch failed");

    assert!(links.is_empty());
}

#[tokio::test]
async fn test_http_fetcher_status_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/missing", mock_server.uri());
    let result = http_fetcher().fetch_links(&url).await;

    assert_eq!(result, Err(FetchError::Status { url, status: 404 }));
}

#[tokio::test]
async fn test_http_fetcher_server_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let result = http_fetcher()
        .fetch_links(&format!("{}/", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
}

#[tokio::test]
async fn test_http_fetcher_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html_page(&["http://late.com/"]).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&test_user_agent(), Duration::from_millis(200)).unwrap();
    let result = fetcher
        .fetch_links(&format!("{}/", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}

#[tokio::test]
async fn test_http_fetcher_sends_user_agent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "TestBot/1.0.0"))
        .respond_with(html_page(&["http://seen.com/"]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let links = http_fetcher()
        .fetch_links(&format!("{}/", mock_server.uri()))
        .await
        .expect("Request without the expected user agent");

    assert_eq!(links, vec!["http://seen.com/"]);
}

#[tokio::test]
async fn test_http_fetcher_follows_redirects() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/new", mock_server.uri()).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", &["http://moved.com/"]).await;

    let links = http_fetcher()
        .fetch_links(&format!("{}/old", mock_server.uri()))
        .await
        .expect("Fetch failed");

    assert_eq!(links, vec!["http://moved.com/"]);
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/example.test",
        &[
            "/about",
            "http://other.test/page",
            "http://example.test/contact",
            "mailto:a@b.com",
            "http://cdn.test/img.png",
        ],
    )
    .await;
    mount_page(&mock_server, "/other.test/page", &[]).await;

    let report = run_crawl(
        CrawlConfig::new("example.test", 1),
        RoutedFetcher::new(&mock_server),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.domains, domains(&["example.test", "other.test"]));
    assert_eq!(report.stats.frontier.visited, 2);
    assert_eq!(report.stats.frontier.dropped, 0);
}

#[tokio::test]
async fn test_end_to_end_depth_limit() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/a.test", &["http://b.test/"]).await;
    mount_page(&mock_server, "/b.test/", &["http://c.test/"]).await;
    Mock::given(method("GET"))
        .and(path("/c.test/"))
        .respond_with(html_page(&["http://d.test/"]))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = run_crawl(CrawlConfig::new("a.test", 1), RoutedFetcher::new(&mock_server))
        .await
        .expect("Crawl failed");

    assert_eq!(report.domains, domains(&["a.test", "b.test", "c.test"]));
    assert_eq!(report.stats.frontier.skipped_at_depth_limit, 1);
}

#[tokio::test]
async fn test_end_to_end_failed_page_is_dropped() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/hub.test",
        &["http://broken.test/", "http://fine.test/"],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken.test/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/fine.test/", &[]).await;

    let mut crawler = Crawler::new(
        CrawlConfig::new("hub.test", 2),
        RoutedFetcher::new(&mock_server),
    )
    .expect("Invalid config");
    while crawler.step().await.is_some() {}

    assert_eq!(
        crawler.state().state_of("http://broken.test/"),
        Some(LinkState::Dropped)
    );

    let report = crawler.run().await;
    assert_eq!(report.domains, domains(&["fine.test", "hub.test"]));
    assert_eq!(report.stats.frontier.dropped, 1);
}

#[tokio::test]
async fn test_end_to_end_concurrent_fetches() {
    let mock_server = MockServer::start().await;
    let children = ["http://a.test/", "http://b.test/", "http://c.test/", "http://d.test/"];
    mount_page(&mock_server, "/root.test", &children).await;
    for (child, grandchild) in children.iter().zip(["w.test", "x.test", "y.test", "z.test"]) {
        let child_path = format!("/{}", strip_scheme(child));
        Mock::given(method("GET"))
            .and(path(child_path.as_str()))
            .respond_with(
                html_page(&[grandchild]).set_delay(Duration::from_millis(50)),
            )
            .mount(&mock_server)
            .await;
    }

    let mut config = CrawlConfig::new("root.test", 1);
    config.max_concurrent_fetches = 4;
    let report = run_crawl(config, RoutedFetcher::new(&mock_server))
        .await
        .expect("Crawl failed");

    assert_eq!(
        report.domains,
        domains(&[
            "a.test", "b.test", "c.test", "d.test", "root.test", "w.test", "x.test", "y.test",
            "z.test",
        ])
    );
    assert_eq!(report.stats.frontier.visited, 5);
    assert_eq!(report.stats.frontier.skipped_at_depth_limit, 4);
}

#[tokio::test]
async fn test_ignore_file_patterns_applied() {
    let mut ignore_file = NamedTempFile::new().unwrap();
    ignore_file
        .write_all(b"// social networks\nfacebook\n\n  TWITTER  \n")
        .unwrap();
    ignore_file.flush().unwrap();

    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/seed.test",
        &[
            "http://www.facebook.test/share",
            "twitter.test/intent",
            "http://kept.test/",
        ],
    )
    .await;
    mount_page(&mock_server, "/kept.test/", &[]).await;

    let mut config = CrawlConfig::new("seed.test", 1);
    config.ignore_patterns = load_ignore_patterns(ignore_file.path()).unwrap();
    let report = run_crawl(config, RoutedFetcher::new(&mock_server))
        .await
        .expect("Crawl failed");

    assert_eq!(report.domains, domains(&["kept.test", "seed.test"]));
}

#[tokio::test]
async fn test_results_written_to_output_file() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/seed.test", &["http://zeta.test/", "alpha.test"]).await;

    let report = run_crawl(
        CrawlConfig::new("seed.test", 0),
        RoutedFetcher::new(&mock_server),
    )
    .await
    .expect("Crawl failed");

    let dir = TempDir::new().unwrap();
    let output_path = dir.path().join("output.txt");
    let output = TextOutput::new(&output_path, false).without_stats();
    output.record_domains(&report.domains).unwrap();
    output.finalize(&report.stats).unwrap();

    let content = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(content, "alpha.test\nseed.test\nzeta.test\n");
}
