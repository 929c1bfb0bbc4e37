//! HTML link extraction
//!
//! Pulls the raw `href` values out of a page. Nothing is resolved or filtered
//! here: relative paths, anchors and `mailto:` links come back exactly as they
//! were written so the link filter sees the same text the author wrote.

use scraper::{Html, Selector};

/// Elements whose `href` counts as a hyperlink
const LINK_SELECTOR: &str = "a[href], area[href]";

/// Extracts all href attribute values from an HTML document, in document order
///
/// # Example
///
/// ```
/// use domain_scout::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/page">Link</a><a href="other.com">Other</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/page", "other.com"]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse(LINK_SELECTOR) {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
