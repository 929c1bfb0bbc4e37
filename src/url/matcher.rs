use regex::Regex;
use serde::Deserialize;
use std::fmt;

/// How the frontier decides that a domain is already being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DomainMatch {
    /// Hostname equality, ignoring ASCII case
    #[default]
    Exact,

    /// Equal to a tracked domain or a subdomain of one
    Subdomain,

    /// The candidate domain is compiled as a regex and searched for in every
    /// tracked link.
    ///
    /// This reproduces the historical behaviour. It is prone to false
    /// positives: `ample.com` is suppressed once `http://example.com/` is
    /// tracked, and every `.` in the domain matches any character.
    Pattern,
}

impl fmt::Display for DomainMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exact => "exact",
            Self::Subdomain => "subdomain",
            Self::Pattern => "pattern",
        };
        f.write_str(name)
    }
}

/// Checks whether a candidate domain falls under a tracked domain
///
/// 1. Same domain: "example.com" matches "example.com"
/// 2. Subdomain: "blog.example.com" and "api.v2.example.com" match "example.com"
///
/// Both arguments are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use domain_scout::url::matches_subdomain;
///
/// assert!(matches_subdomain("example.com", "example.com"));
/// assert!(matches_subdomain("example.com", "blog.example.com"));
/// assert!(!matches_subdomain("example.com", "myexample.com"));
/// assert!(!matches_subdomain("blog.example.com", "example.com"));
/// ```
pub fn matches_subdomain(tracked: &str, candidate: &str) -> bool {
    if candidate == tracked {
        return true;
    }
    candidate
        .strip_suffix(tracked)
        .is_some_and(|head| head.ends_with('.'))
}

/// Builds the legacy search pattern for a domain
///
/// The domain text is used as a regular expression verbatim. Text that does
/// not compile (e.g. a stray `(`) falls back to a literal search. Returns
/// `None` when even the literal form exceeds the regex size limit.
pub fn domain_pattern(domain: &str) -> Option<Regex> {
    Regex::new(domain)
        .or_else(|_| {
            tracing::trace!("Domain '{}' is not a valid pattern, matching literally", domain);
            Regex::new(&regex::escape(domain))
        })
        .ok()
}

/// Searches tracked links for a domain the legacy way
///
/// Domains too large to compile are searched for as plain substrings.
pub fn pattern_matches_any<'a, I>(domain: &str, tracked: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    match domain_pattern(domain) {
        Some(pattern) => tracked.into_iter().any(|link| pattern.is_match(link)),
        None => tracked.into_iter().any(|link| link.contains(domain)),
    }
}
