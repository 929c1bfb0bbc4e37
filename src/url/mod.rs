//! URL handling module for Domain-Scout
//!
//! This module provides link classification and scheme normalization, domain
//! extraction, and the domain matching policies used by the frontier to decide
//! whether a domain is already being tracked.

mod domain;
mod filter;
mod matcher;

// Re-export main functions
pub use domain::{domain_of, has_http_scheme, strip_scheme};
pub use filter::{IgnoreList, LinkFilter, Rejection};
pub use matcher::{domain_pattern, matches_subdomain, pattern_matches_any, DomainMatch};

/// Collects the distinct domains of a set of links
///
/// # Examples
///
/// ```
/// use domain_scout::url::collect_domains;
///
/// let links = ["http://a.com/x", "http://a.com/y", "https://b.org"];
/// let domains = collect_domains(links.iter().copied());
/// assert_eq!(domains.into_iter().collect::<Vec<_>>(), vec!["a.com", "b.org"]);
/// ```
pub fn collect_domains<'a, I>(links: I) -> std::collections::BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    links
        .into_iter()
        .map(|link| domain_of(link).to_string())
        .collect()
}
