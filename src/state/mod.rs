//! State module for tracking crawl progress
//!
//! `LinkState` names the lifecycle of a single tracked link, from the frontier
//! to one of the terminal outcomes (visited, skipped at the depth limit, or
//! dropped after a failed fetch).

mod link_state;

pub use link_state::LinkState;
