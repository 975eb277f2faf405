//! Tally Core - Core library for issue and pull request stats
//!
//! This crate provides the data model for forge items, the tallies they are
//! classified into, and the CI output protocol used to publish them.

pub mod collector;
pub mod config;
pub mod error;
pub mod item;
pub mod output;
pub mod secrets;
pub mod stats;

pub use collector::{collect, run, ItemSource, RunFailure};
pub use config::{Config, GitHubConfig};
pub use error::{Error, Result};
pub use item::{Item, ItemState};
pub use output::{GitHubOutputFile, OutputSink, WorkflowCommands};
pub use secrets::Secrets;
pub use stats::{IssueStats, PullRequestStats, Tally};
