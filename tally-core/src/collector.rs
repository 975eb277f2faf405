//! Collecting items from a source and publishing the resulting tally

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{Item, OutputSink, Tally};

/// Something that can list every issue and pull request of a repository
///
/// Implementations return all items in all states, fully paginated.
#[async_trait]
pub trait ItemSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn list_all_items(&self) -> Result<Vec<Item>, Self::Error>;
}

/// Why a run did not produce stats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    message: String,
}

impl RunFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Keep an error's message as the failure reason
    pub fn from_error(err: impl fmt::Display) -> Self {
        Self::new(err.to_string())
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RunFailure {}

/// Fetch every item from the source and tally it
pub async fn collect<S: ItemSource + ?Sized>(source: &S) -> Result<Tally, S::Error> {
    let items = source.list_all_items().await?;

    let mut tally = Tally::new();
    for item in &items {
        debug!(?item, "Classifying item");
        tally.record(item);
    }

    info!(
        items = items.len(),
        issues_open = tally.issues.open,
        issues_closed = tally.issues.closed,
        prs_open = tally.pull_requests.open,
        prs_closed = tally.pull_requests.closed,
        prs_merged = tally.pull_requests.merged,
        "Tallied repository items"
    );

    Ok(tally)
}

/// Collect a tally and publish it as step outputs
///
/// Nothing reaches the sink unless the whole listing succeeded.
pub async fn run<S, O>(source: &S, sink: &mut O) -> Result<Tally, RunFailure>
where
    S: ItemSource + ?Sized,
    O: OutputSink + ?Sized,
{
    let tally = collect(source).await.map_err(RunFailure::from_error)?;
    let outputs = tally.outputs().map_err(RunFailure::from_error)?;
    sink.publish(&outputs).map_err(RunFailure::from_error)?;
    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, ItemState};
    use chrono::{TimeZone, Utc};

    struct FixedSource(Vec<Item>);

    #[async_trait]
    impl ItemSource for FixedSource {
        type Error = Error;

        async fn list_all_items(&self) -> Result<Vec<Item>, Error> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource(&'static str);

    #[async_trait]
    impl ItemSource for FailingSource {
        type Error = Error;

        async fn list_all_items(&self) -> Result<Vec<Item>, Error> {
            Err(Error::Other(self.0.to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        published: Vec<(String, String)>,
        fail_with: Option<&'static str>,
    }

    impl OutputSink for RecordingSink {
        fn publish(&mut self, outputs: &[(&str, String)]) -> crate::Result<()> {
            if let Some(reason) = self.fail_with {
                return Err(Error::Other(reason.to_string()));
            }
            self.published.extend(
                outputs
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.clone())),
            );
            Ok(())
        }
    }

    fn sample_items() -> Vec<Item> {
        vec![
            Item::Issue {
                number: 1,
                state: ItemState::Open,
            },
            Item::Issue {
                number: 2,
                state: ItemState::Closed,
            },
            Item::PullRequest {
                number: 3,
                state: ItemState::Open,
                merged_at: None,
            },
            Item::PullRequest {
                number: 4,
                state: ItemState::Closed,
                merged_at: None,
            },
            Item::PullRequest {
                number: 5,
                state: ItemState::Closed,
                merged_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            },
        ]
    }

    #[tokio::test]
    async fn test_collect_tallies_every_item() {
        let source = FixedSource(sample_items());
        let tally = collect(&source).await.unwrap();

        assert_eq!(tally.total(), 5);
        assert_eq!(tally.issues.open, 1);
        assert_eq!(tally.issues.closed, 1);
        assert_eq!(tally.pull_requests.open, 1);
        assert_eq!(tally.pull_requests.closed, 1);
        assert_eq!(tally.pull_requests.merged, 1);
    }

    #[tokio::test]
    async fn test_run_publishes_both_outputs() {
        let source = FixedSource(sample_items());
        let mut sink = RecordingSink::default();

        run(&source, &mut sink).await.unwrap();

        assert_eq!(
            sink.published,
            vec![
                (
                    "issue_stats".to_string(),
                    r#"{"open":1,"closed":1}"#.to_string()
                ),
                (
                    "pull_request_stats".to_string(),
                    r#"{"open":1,"closed":1,"merged":1}"#.to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_run_empty_source_publishes_zeros() {
        let source = FixedSource(Vec::new());
        let mut sink = RecordingSink::default();

        let tally = run(&source, &mut sink).await.unwrap();

        assert_eq!(tally, Tally::default());
        assert_eq!(sink.published[0].1, r#"{"open":0,"closed":0}"#);
        assert_eq!(sink.published[1].1, r#"{"open":0,"closed":0,"merged":0}"#);
    }

    #[tokio::test]
    async fn test_fetch_failure_publishes_nothing() {
        let source = FailingSource("rate limited");
        let mut sink = RecordingSink::default();

        let failure = run(&source, &mut sink).await.unwrap_err();

        assert_eq!(failure.message(), "rate limited");
        assert!(sink.published.is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_is_reported() {
        let source = FixedSource(sample_items());
        let mut sink = RecordingSink {
            fail_with: Some("output file is read-only"),
            ..Default::default()
        };

        let failure = run(&source, &mut sink).await.unwrap_err();
        assert_eq!(failure.to_string(), "output file is read-only");
    }
}
