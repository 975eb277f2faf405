//! Per-run tallies of issues and pull requests by status

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Item, ItemState, Result};

/// Output name for the issue tally
pub const ISSUE_STATS_OUTPUT: &str = "issue_stats";

/// Output name for the pull request tally
pub const PULL_REQUEST_STATS_OUTPUT: &str = "pull_request_stats";

/// Counts of plain issues by state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssueStats {
    pub open: u64,
    pub closed: u64,
}

impl IssueStats {
    /// Count one issue in the given state
    pub fn record(&mut self, state: ItemState) {
        match state {
            ItemState::Open => self.open += 1,
            ItemState::Closed => self.closed += 1,
        }
    }

    /// Number of issues counted
    pub fn total(&self) -> u64 {
        self.open + self.closed
    }
}

/// Counts of pull requests by state, with merged split out of closed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PullRequestStats {
    pub open: u64,
    pub closed: u64,
    pub merged: u64,
}

impl PullRequestStats {
    /// Count one pull request
    ///
    /// An open PR is open whatever its merge timestamp says. A closed PR is
    /// merged only if it carries a merge timestamp.
    pub fn record(&mut self, state: ItemState, merged_at: Option<DateTime<Utc>>) {
        match (state, merged_at) {
            (ItemState::Open, _) => self.open += 1,
            (ItemState::Closed, None) => self.closed += 1,
            (ItemState::Closed, Some(_)) => self.merged += 1,
        }
    }

    /// Number of pull requests counted
    pub fn total(&self) -> u64 {
        self.open + self.closed + self.merged
    }
}

/// Both tallies for a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub issues: IssueStats,
    pub pull_requests: PullRequestStats,
}

impl Tally {
    /// Creates an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify an item and count it
    pub fn record(&mut self, item: &Item) {
        match item {
            Item::Issue { state, .. } => self.issues.record(*state),
            Item::PullRequest {
                state, merged_at, ..
            } => self.pull_requests.record(*state, *merged_at),
        }
    }

    /// Tally every item in a sequence
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let mut tally = Self::new();
        for item in items {
            tally.record(item);
        }
        tally
    }

    /// Number of items counted across both tallies
    pub fn total(&self) -> u64 {
        self.issues.total() + self.pull_requests.total()
    }

    /// Named step outputs, serialized as compact JSON
    pub fn outputs(&self) -> Result<Vec<(&'static str, String)>> {
        Ok(vec![
            (ISSUE_STATS_OUTPUT, serde_json::to_string(&self.issues)?),
            (
                PULL_REQUEST_STATS_OUTPUT,
                serde_json::to_string(&self.pull_requests)?,
            ),
        ])
    }
}
