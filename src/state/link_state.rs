//! Link state definitions for tracking crawl progress
//!
//! This module defines every state a tracked link can be in.

use std::fmt;

/// Represents the current state of a link in the crawl process
///
/// ```text
/// Queued -> Visited
///        \-> Dropped
/// SkippedAtDepthLimit (never queued)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkState {
    /// Link is in the frontier, waiting for (or undergoing) a fetch
    Queued,

    /// Link was fetched and its outbound links were enqueued
    Visited,

    /// Link was found beyond the depth limit; counted but never fetched
    SkippedAtDepthLimit,

    /// Fetch failed; the link is removed from tracking
    Dropped,
}

impl LinkState {
    /// Returns true if the link's domain is part of the crawl result
    pub fn counts_in_result(&self) -> bool {
        matches!(self, Self::Visited | Self::SkippedAtDepthLimit)
    }

    /// Converts the state to its string representation for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Visited => "visited",
            Self::SkippedAtDepthLimit => "skipped_at_depth_limit",
            Self::Dropped => "dropped",
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
