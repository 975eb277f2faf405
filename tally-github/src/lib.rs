//! Tally GitHub - GitHub integration for tally
//!
//! This crate lists every issue and pull request of a repository through the
//! GitHub REST API and turns the wire records into [`tally_core::Item`]s.

mod client;
mod error;
mod items;

pub use client::{parse_repository, GitHubClient};
pub use error::{Error, Result};
