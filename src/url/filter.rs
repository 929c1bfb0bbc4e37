//! Link classification
//!
//! Every href found on a page passes through [`LinkFilter::classify`] before it
//! may enter the frontier. The checks run in a fixed order and stop at the
//! first rejection:
//!
//! 1. Trim whitespace; empty links are dropped
//! 2. Fragment anchors and short relative paths (`#top`, `/`, `./`, `../`, `a/b`)
//! 3. Static assets (`.css`, `.js`, images) in a path after the host, with
//!    optional query
//! 4. Missing scheme gets `http://` prepended
//! 5. Any `:` after the scheme (`mailto:`, `tel:`, explicit ports)
//! 6. Domains without a period
//! 7. Domains that look like local page names (`index.html`, `search.php`)
//!
//! The checks that depend on crawl state (visited links, ignore patterns,
//! tracked domains) are applied by the frontier on top of this.

use crate::url::domain::{domain_of, has_http_scheme, strip_scheme};
use crate::ConfigError;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Anchors and anything that starts with up to two characters followed by `/`
const LOCAL_REFERENCE: &str = r"^#|^.?.?/";

/// A path segment ending in a static asset extension, optional query string
const STATIC_ASSET: &str = r"(?i)/.*\.(css|js|jpeg|jpg|png|gif|bmp|svg)(\?.*)?$";

/// Second label of a "domain" that is really a file name
const LOCAL_PAGE_LABEL: &str = r"(?i)^(html?|php|asp*|aspx|jsp*|jspx|cgi)$";

/// Reason a link was not accepted into the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rejection {
    /// Nothing left after trimming whitespace
    Empty,

    /// Fragment anchor or short relative path
    LocalReference,

    /// Stylesheet, script or image
    StaticAsset,

    /// A colon after the scheme (mail/tel links, explicit ports)
    EmbeddedColon,

    /// The domain has no period
    NoPeriodInDomain,

    /// The domain looks like a local file name
    LocalPage,

    /// The link has already been visited
    AlreadyVisited,

    /// The link is already in the frontier
    AlreadyQueued,

    /// An earlier fetch of the link failed
    PreviouslyDropped,

    /// The raw link matched an ignore pattern
    Ignored,

    /// Another link on the same domain is already tracked
    DomainTracked,
}

impl Rejection {
    /// Short machine-friendly name used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::LocalReference => "local_reference",
            Self::StaticAsset => "static_asset",
            Self::EmbeddedColon => "embedded_colon",
            Self::NoPeriodInDomain => "no_period_in_domain",
            Self::LocalPage => "local_page",
            Self::AlreadyVisited => "already_visited",
            Self::AlreadyQueued => "already_queued",
            Self::PreviouslyDropped => "previously_dropped",
            Self::Ignored => "ignored",
            Self::DomainTracked => "domain_tracked",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless part of link classification
#[derive(Debug, Clone)]
pub struct LinkFilter {
    local_reference: Regex,
    static_asset: Regex,
    local_page_label: Regex,
    reject_local_pages: bool,
}

impl LinkFilter {
    /// Creates a filter
    ///
    /// # Arguments
    ///
    /// * `reject_local_pages` - Enables the local page name heuristic (step 7)
    pub fn new(reject_local_pages: bool) -> Self {
        Self {
            local_reference: Regex::new(LOCAL_REFERENCE).expect("static pattern"),
            static_asset: Regex::new(STATIC_ASSET).expect("static pattern"),
            local_page_label: Regex::new(LOCAL_PAGE_LABEL).expect("static pattern"),
            reject_local_pages,
        }
    }

    /// Classifies a raw href
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The scheme-normalized link
    /// * `Err(Rejection)` - Why the link was dropped
    ///
    /// # Examples
    ///
    /// ```
    /// use domain_scout::url::{LinkFilter, Rejection};
    ///
    /// let filter = LinkFilter::default();
    /// assert_eq!(filter.classify(" other.com/page ").unwrap(), "http://other.com/page");
    /// assert_eq!(filter.classify("/about"), Err(Rejection::LocalReference));
    /// assert_eq!(filter.classify("mailto:a@b.com"), Err(Rejection::EmbeddedColon));
    /// ```
    pub fn classify(&self, raw: &str) -> Result<String, Rejection> {
        let link = raw.trim();
        if link.is_empty() {
            return Err(Rejection::Empty);
        }

        if self.local_reference.is_match(link) {
            return Err(Rejection::LocalReference);
        }

        if self.static_asset.is_match(strip_scheme(link)) {
            return Err(Rejection::StaticAsset);
        }

        let link = if has_http_scheme(link) {
            link.to_string()
        } else {
            format!("http://{}", link)
        };

        if strip_scheme(&link).contains(':') {
            return Err(Rejection::EmbeddedColon);
        }

        let domain = domain_of(&link);
        if !domain.contains('.') {
            return Err(Rejection::NoPeriodInDomain);
        }

        if self.reject_local_pages && self.looks_like_local_page(domain) {
            return Err(Rejection::LocalPage);
        }

        Ok(link)
    }

    fn looks_like_local_page(&self, domain: &str) -> bool {
        domain
            .split('.')
            .nth(1)
            .is_some_and(|label| self.local_page_label.is_match(label))
    }
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Ordered list of case-insensitive ignore patterns
///
/// Patterns are searched for anywhere in the raw link text, before any
/// normalization.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    patterns: Vec<Regex>,
}

impl IgnoreList {
    /// Compiles ignore patterns
    ///
    /// # Returns
    ///
    /// * `Ok(IgnoreList)` - All patterns compiled
    /// * `Err(ConfigError::InvalidPattern)` - The first pattern that failed
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ConfigError::InvalidPattern {
                        pattern: pattern.to_string(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Returns true if any pattern matches the raw link
    pub fn matches(&self, raw: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(raw))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
