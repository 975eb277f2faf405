//! Forge items: the issues and pull requests a repository lists

use chrono::{DateTime, Utc};

/// Lifecycle state of an issue or pull request
///
/// The forge only ever reports `open` or `closed`, so anything that is not
/// `open` is treated as closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Open,
    Closed,
}

impl ItemState {
    /// Parse a state string as reported by the API
    pub fn from_api(state: &str) -> Self {
        if state == "open" {
            ItemState::Open
        } else {
            ItemState::Closed
        }
    }

    /// Whether the item is still open
    pub fn is_open(self) -> bool {
        self == ItemState::Open
    }
}

/// An entry from a repository's combined issue and pull request listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A plain issue
    Issue {
        /// Issue number
        number: u64,
        /// Current state
        state: ItemState,
    },
    /// A pull request
    PullRequest {
        /// PR number
        number: u64,
        /// Current state
        state: ItemState,
        /// When the PR was merged, taken from the pull request sub-object
        merged_at: Option<DateTime<Utc>>,
    },
}

impl Item {
    /// Item number (shared between issues and PRs)
    pub fn number(&self) -> u64 {
        match self {
            Item::Issue { number, .. } | Item::PullRequest { number, .. } => *number,
        }
    }

    /// Current state
    pub fn state(&self) -> ItemState {
        match self {
            Item::Issue { state, .. } | Item::PullRequest { state, .. } => *state,
        }
    }

    /// Whether this item is a pull request
    pub fn is_pull_request(&self) -> bool {
        matches!(self, Item::PullRequest { .. })
    }
}
