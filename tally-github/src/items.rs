//! Listing a repository's issues and pull requests

use crate::{Error, GitHubClient, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Page;
use serde::{Deserialize, Serialize};
use tally_core::{Item, ItemSource, ItemState};
use tracing::{debug, info};

/// Entry from `GET /repos/{owner}/{repo}/issues`
///
/// Pull requests show up in this listing with a `pull_request` object. Its
/// `merged_at` is the only merge signal the endpoint gives; a top-level
/// `merged_at` is not part of the issue schema and is ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IssueRecord {
    #[serde(default)]
    number: u64,
    state: String,
    #[serde(default)]
    pull_request: Option<PullRequestRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PullRequestRef {
    #[serde(default)]
    merged_at: Option<DateTime<Utc>>,
}

impl From<IssueRecord> for Item {
    fn from(record: IssueRecord) -> Self {
        let state = ItemState::from_api(&record.state);
        match record.pull_request {
            Some(pr) => Item::PullRequest {
                number: record.number,
                state,
                merged_at: pr.merged_at,
            },
            None => Item::Issue {
                number: record.number,
                state,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ListParams {
    state: &'static str,
    per_page: u8,
}

impl GitHubClient {
    /// List every issue and pull request, in all states, across all pages
    pub async fn list_all_items(&self) -> Result<Vec<Item>> {
        debug!(
            owner = %self.owner(),
            repo = %self.repo(),
            per_page = self.per_page(),
            "Listing all issues and pull requests"
        );

        let route = format!("/repos/{}/{}/issues", self.owner(), self.repo());
        let params = ListParams {
            state: "all",
            per_page: self.per_page(),
        };

        let first: Page<IssueRecord> = self
            .client()
            .get(route, Some(&params))
            .await
            .map_err(Error::from_api)?;
        let records = self
            .client()
            .all_pages(first)
            .await
            .map_err(Error::from_api)?;

        let items: Vec<Item> = records
            .into_iter()
            .map(|record| {
                debug!(?record, "Listed item");
                Item::from(record)
            })
            .collect();

        info!(count = items.len(), "Fetched all issues and pull requests");

        Ok(items)
    }
}

#[async_trait]
impl ItemSource for GitHubClient {
    type Error = Error;

    async fn list_all_items(&self) -> Result<Vec<Item>> {
        GitHubClient::list_all_items(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(json: serde_json::Value) -> Item {
        serde_json::from_value::<IssueRecord>(json).unwrap().into()
    }

    #[test]
    fn test_open_issue() {
        let item = parse(serde_json::json!({ "number": 1, "state": "open" }));
        assert_eq!(
            item,
            Item::Issue {
                number: 1,
                state: ItemState::Open
            }
        );
    }

    #[test]
    fn test_closed_issue() {
        let item = parse(serde_json::json!({ "state": "closed" }));
        assert_eq!(item.state(), ItemState::Closed);
        assert!(!item.is_pull_request());
    }

    #[test]
    fn test_empty_pull_request_object_marks_pr() {
        let item = parse(serde_json::json!({ "state": "open", "pull_request": {} }));
        assert_eq!(
            item,
            Item::PullRequest {
                number: 0,
                state: ItemState::Open,
                merged_at: None
            }
        );
    }

    #[test]
    fn test_null_merged_at() {
        let item = parse(serde_json::json!({
            "state": "closed",
            "pull_request": { "merged_at": null }
        }));
        assert_eq!(
            item,
            Item::PullRequest {
                number: 0,
                state: ItemState::Closed,
                merged_at: None
            }
        );
    }

    #[test]
    fn test_nested_merged_at() {
        let item = parse(serde_json::json!({
            "state": "closed",
            "pull_request": { "merged_at": "2024-01-01T00:00:00Z" }
        }));
        assert_eq!(
            item,
            Item::PullRequest {
                number: 0,
                state: ItemState::Closed,
                merged_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            }
        );
    }

    #[test]
    fn test_top_level_merged_at_ignored() {
        let item = parse(serde_json::json!({
            "state": "closed",
            "merged_at": "2024-01-01T00:00:00Z",
            "pull_request": { "merged_at": null }
        }));
        assert!(matches!(item, Item::PullRequest { merged_at: None, .. }));
    }

    #[test]
    fn test_full_api_record() {
        let item = parse(serde_json::json!({
            "id": 1,
            "number": 1347,
            "title": "Found a bug",
            "state": "closed",
            "user": { "login": "octocat" },
            "labels": [],
            "pull_request": {
                "url": "https://api.github.com/repos/octocat/Hello-World/pulls/1347",
                "html_url": "https://github.com/octocat/Hello-World/pull/1347",
                "diff_url": "https://github.com/octocat/Hello-World/pull/1347.diff",
                "patch_url": "https://github.com/octocat/Hello-World/pull/1347.patch",
                "merged_at": "2011-01-26T19:01:12Z"
            }
        }));
        assert_eq!(item.number(), 1347);
        assert!(matches!(item, Item::PullRequest { merged_at: Some(_), .. }));
    }
}
