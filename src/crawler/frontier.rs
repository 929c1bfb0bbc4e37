//! Crawl frontier and link bookkeeping
//!
//! This module owns everything the crawl knows about links:
//! - The FIFO frontier of links waiting to be fetched
//! - The sets of queued (pending or in flight) and visited links
//! - Depth and parent provenance, recorded once per link
//! - The index of tracked domains used by the same-domain policy
//!
//! The queued and visited sets are always disjoint, and a link that reached a
//! terminal state never re-enters the frontier.

use crate::config::CrawlConfig;
use crate::state::LinkState;
use crate::url::{
    collect_domains, domain_of, matches_subdomain, pattern_matches_any, DomainMatch, IgnoreList,
    LinkFilter, Rejection,
};
use crate::ConfigError;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// A link taken from the frontier for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The scheme-normalized link
    pub link: String,

    /// Hops from the seed (seed = 0)
    pub depth: u32,

    /// The page the link was first discovered on (None for the seed)
    pub parent: Option<String>,
}

/// Counters describing what happened to discovered links
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontierStats {
    /// Links accepted into the frontier
    pub queued: u64,

    /// Links fetched successfully
    pub visited: u64,

    /// Links found past the depth limit and counted without a fetch
    pub skipped_at_depth_limit: u64,

    /// Links whose fetch failed
    pub dropped: u64,

    /// Rejected hrefs by reason
    pub rejected: BTreeMap<Rejection, u64>,
}

impl FrontierStats {
    /// Total number of rejected hrefs
    pub fn total_rejected(&self) -> u64 {
        self.rejected.values().sum()
    }

    /// Number of rejections for one reason
    pub fn rejected_for(&self, reason: Rejection) -> u64 {
        self.rejected.get(&reason).copied().unwrap_or(0)
    }

    fn record_rejection(&mut self, reason: Rejection) {
        *self.rejected.entry(reason).or_insert(0) += 1;
    }
}

/// The frontier manager: single owner of all crawl state
#[derive(Debug)]
pub struct CrawlState {
    filter: LinkFilter,
    ignore: IgnoreList,
    max_depth: u32,
    same_domain_allowed: bool,
    domain_match: DomainMatch,

    /// Links waiting to be taken, in discovery order
    pending: VecDeque<(String, u32)>,

    /// Pending and in-flight links
    queued: HashSet<String>,

    visited: HashSet<String>,
    dropped: HashSet<String>,
    depth: HashMap<String, u32>,
    parent: HashMap<String, String>,

    /// Lowercased domain -> number of queued or visited links on it
    tracked_domains: HashMap<String, usize>,

    stats: FrontierStats,
}

impl CrawlState {
    /// Creates an empty crawl state
    ///
    /// # Arguments
    ///
    /// * `filter` - Stateless link filter
    /// * `ignore` - Compiled ignore patterns
    /// * `max_depth` - Deepest level that is fetched
    /// * `same_domain_allowed` - Skip the tracked-domain check
    /// * `domain_match` - How tracked domains are compared
    pub fn new(
        filter: LinkFilter,
        ignore: IgnoreList,
        max_depth: u32,
        same_domain_allowed: bool,
        domain_match: DomainMatch,
    ) -> Self {
        Self {
            filter,
            ignore,
            max_depth,
            same_domain_allowed,
            domain_match,
            pending: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            dropped: HashSet::new(),
            depth: HashMap::new(),
            parent: HashMap::new(),
            tracked_domains: HashMap::new(),
            stats: FrontierStats::default(),
        }
    }

    /// Creates an empty crawl state from a crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlState)` - Ready for the seed
    /// * `Err(ConfigError::InvalidPattern)` - An ignore pattern does not compile
    pub fn from_config(config: &CrawlConfig) -> Result<Self, ConfigError> {
        let ignore = IgnoreList::compile(config.ignore_patterns.as_slice())?;
        Ok(Self::new(
            LinkFilter::new(config.reject_local_pages),
            ignore,
            config.max_depth,
            config.same_domain_allowed,
            config.domain_match,
        ))
    }

    /// Runs a page's hrefs through the filter and records the survivors
    ///
    /// Links deeper than the maximum depth go straight to the visited set and
    /// are never fetched. Every other survivor joins the end of the frontier.
    /// Links are checked one at a time, so two links to the same new domain on
    /// one page produce a single entry (unless same-domain links are allowed).
    ///
    /// # Arguments
    ///
    /// * `parent` - The page the hrefs were found on (None for the seed)
    /// * `discovered` - Raw href values
    /// * `depth` - Depth of the discovered links
    ///
    /// # Returns
    ///
    /// The number of links that were accepted (queued or skipped at the limit)
    pub fn enqueue<S: AsRef<str>>(
        &mut self,
        parent: Option<&str>,
        discovered: &[S],
        depth: u32,
    ) -> usize {
        discovered
            .iter()
            .filter(|raw| self.admit(parent, raw.as_ref(), depth).is_ok())
            .count()
    }

    /// Runs a single href through the filter and records it if it survives
    ///
    /// # Returns
    ///
    /// * `Ok(LinkState::Queued)` - The link joined the frontier
    /// * `Ok(LinkState::SkippedAtDepthLimit)` - The link was counted as visited
    ///   without being queued
    /// * `Err(Rejection)` - Why the link was dropped
    pub fn admit(
        &mut self,
        parent: Option<&str>,
        raw: &str,
        depth: u32,
    ) -> Result<LinkState, Rejection> {
        let link = match self.check(raw) {
            Ok(link) => link,
            Err(reason) => {
                tracing::trace!("Rejected link '{}': {}", raw.trim(), reason);
                self.stats.record_rejection(reason);
                return Err(reason);
            }
        };

        self.depth.insert(link.clone(), depth);
        if let Some(parent) = parent {
            self.parent.insert(link.clone(), parent.to_string());
        }
        self.track_domain(&link);

        if depth > self.max_depth {
            tracing::debug!("Depth limit reached, counting {} without fetching", link);
            self.visited.insert(link);
            self.stats.skipped_at_depth_limit += 1;
            Ok(LinkState::SkippedAtDepthLimit)
        } else {
            tracing::debug!("Queued {} at depth {}", link, depth);
            self.queued.insert(link.clone());
            self.pending.push_back((link, depth));
            self.stats.queued += 1;
            Ok(LinkState::Queued)
        }
    }

    /// Applies the stateless filter and the state-dependent checks
    fn check(&self, raw: &str) -> Result<String, Rejection> {
        let link = self.filter.classify(raw)?;

        match self.state_of(&link) {
            Some(state) if state.counts_in_result() => return Err(Rejection::AlreadyVisited),
            Some(LinkState::Queued) => return Err(Rejection::AlreadyQueued),
            Some(_) => return Err(Rejection::PreviouslyDropped),
            None => {}
        }

        if self.ignore.matches(raw) {
            return Err(Rejection::Ignored);
        }

        if !self.same_domain_allowed && self.same_domain_check(&link) {
            return Err(Rejection::DomainTracked);
        }

        Ok(link)
    }

    /// Returns true if the link's domain is already tracked
    ///
    /// A domain is tracked while at least one link on it is queued (pending or
    /// in flight) or visited.
    pub fn same_domain_check(&self, link: &str) -> bool {
        let domain = domain_of(link);

        match self.domain_match {
            DomainMatch::Exact => self
                .tracked_domains
                .contains_key(&domain.to_ascii_lowercase()),
            DomainMatch::Subdomain => {
                let candidate = domain.to_ascii_lowercase();
                self.tracked_domains
                    .keys()
                    .any(|tracked| matches_subdomain(tracked, &candidate))
            }
            DomainMatch::Pattern => pattern_matches_any(
                domain,
                self.queued
                    .iter()
                    .chain(self.visited.iter())
                    .map(String::as_str),
            ),
        }
    }

    /// Takes the oldest pending link
    ///
    /// The link stays in the queued set until it is marked visited or dropped,
    /// so its domain keeps counting as tracked while its own links are
    /// enqueued.
    pub fn take(&mut self) -> Option<FrontierEntry> {
        let (link, depth) = self.pending.pop_front()?;
        let parent = self.parent.get(&link).cloned();
        Some(FrontierEntry {
            link,
            depth,
            parent,
        })
    }

    /// Moves a fetched link from the queued set to the visited set
    ///
    /// Returns false if the link was not queued.
    pub fn mark_visited(&mut self, link: &str) -> bool {
        if !self.queued.remove(link) {
            tracing::warn!("mark_visited called for {} which is not queued", link);
            return false;
        }
        self.visited.insert(link.to_string());
        self.stats.visited += 1;
        true
    }

    /// Moves a queued link to the visited set without it having been fetched
    ///
    /// Used when a queued entry turns out to be past the depth limit.
    pub fn skip_at_depth_limit(&mut self, link: &str) -> bool {
        if !self.queued.remove(link) {
            return false;
        }
        self.visited.insert(link.to_string());
        self.stats.skipped_at_depth_limit += 1;
        true
    }

    /// Removes a queued link from tracking after a failed fetch
    ///
    /// The link never reaches the visited set, its domain stops counting as
    /// tracked (unless other links keep it), and it cannot be queued again.
    pub fn drop_link(&mut self, link: &str) -> bool {
        if !self.queued.remove(link) {
            tracing::warn!("drop_link called for {} which is not queued", link);
            return false;
        }
        self.untrack_domain(link);
        self.dropped.insert(link.to_string());
        self.stats.dropped += 1;
        true
    }

    fn track_domain(&mut self, link: &str) {
        let domain = domain_of(link).to_ascii_lowercase();
        *self.tracked_domains.entry(domain).or_insert(0) += 1;
    }

    fn untrack_domain(&mut self, link: &str) {
        let domain = domain_of(link).to_ascii_lowercase();
        if let Some(count) = self.tracked_domains.get_mut(&domain) {
            *count -= 1;
            if *count == 0 {
                self.tracked_domains.remove(&domain);
            }
        }
    }

    /// Returns the current state of a link, if it was ever accepted
    pub fn state_of(&self, link: &str) -> Option<LinkState> {
        if self.queued.contains(link) {
            Some(LinkState::Queued)
        } else if self.visited.contains(link) {
            match self.depth.get(link) {
                Some(depth) if *depth > self.max_depth => Some(LinkState::SkippedAtDepthLimit),
                _ => Some(LinkState::Visited),
            }
        } else if self.dropped.contains(link) {
            Some(LinkState::Dropped)
        } else {
            None
        }
    }

    /// Returns the depth recorded when the link was first accepted
    pub fn depth_of(&self, link: &str) -> Option<u32> {
        self.depth.get(link).copied()
    }

    /// Returns the page the link was first discovered on
    pub fn parent_of(&self, link: &str) -> Option<&str> {
        self.parent.get(link).map(String::as_str)
    }

    /// Returns the chain of links from the seed down to `link` (inclusive)
    ///
    /// Empty if the link was never accepted.
    pub fn provenance(&self, link: &str) -> Vec<String> {
        if !self.depth.contains_key(link) {
            return Vec::new();
        }

        let mut chain = vec![link.to_string()];
        let mut current = link;
        while let Some(parent) = self.parent.get(current) {
            chain.push(parent.clone());
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Distinct domains of all visited links
    pub fn domains(&self) -> BTreeSet<String> {
        collect_domains(self.visited.iter().map(String::as_str))
    }

    /// Returns true if no link is pending or in flight
    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Number of links waiting to be taken
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of pending and in-flight links
    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    /// Number of visited links (fetched or skipped at the depth limit)
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Returns true if the link is in the visited set
    pub fn is_visited(&self, link: &str) -> bool {
        self.visited.contains(link)
    }

    /// Returns true if the link is pending or in flight
    pub fn is_queued(&self, link: &str) -> bool {
        self.queued.contains(link)
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn stats(&self) -> &FrontierStats {
        &self.stats
    }
}
