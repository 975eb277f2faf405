//! Collect command - tally a repository's issues and pull requests

use std::io::Write;
use std::process::ExitCode;

use clap::Args;
use tally_core::output::sink_from_env;
use tally_core::{run, Config, RunFailure, Tally, WorkflowCommands};
use tally_github::GitHubClient;

/// Arguments for the collect command
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Token with read access to the repository's issues
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository to tally (owner/repo or a GitHub URL)
    #[arg(short, long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,
}

impl CollectArgs {
    /// Execute the collect command with the loaded configuration
    ///
    /// A configuration that failed to load fails the run like any other
    /// error, so the step still reports why.
    pub async fn execute(&self, config: tally_core::Result<Config>) -> Result<Tally, RunFailure> {
        let config = config.map_err(RunFailure::from_error)?;

        let repository = self.repository.as_deref().ok_or_else(|| {
            RunFailure::new("No repository given. Pass --repository or set GITHUB_REPOSITORY")
        })?;

        tracing::info!(repository = %repository, "Collecting issue and pull request stats");

        let client = GitHubClient::from_url(repository, self.token.as_deref(), &config.github)
            .map_err(RunFailure::from_error)?;

        let mut sink = sink_from_env();
        run(&client, sink.as_mut()).await
    }
}

/// Turn a run's result into the step's exit status
///
/// A failure is reported with `::error::` before the step exits non-zero.
pub fn finish<W: Write>(
    result: Result<Tally, RunFailure>,
    commands: &mut WorkflowCommands<W>,
) -> tally_core::Result<ExitCode> {
    match result {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(failure) => {
            tracing::error!(error = %failure, "Collecting stats failed");
            commands.error(failure.message())?;
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(repository: Option<&str>) -> CollectArgs {
        CollectArgs {
            token: Some("ghp_test".to_string()),
            repository: repository.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_missing_repository_fails() {
        let failure = args(None)
            .execute(Ok(Config::default()))
            .await
            .unwrap_err();
        assert_eq!(
            failure.message(),
            "No repository given. Pass --repository or set GITHUB_REPOSITORY"
        );
    }

    #[tokio::test]
    async fn test_invalid_repository_fails() {
        let failure = args(Some("not-a-repo"))
            .execute(Ok(Config::default()))
            .await
            .unwrap_err();
        assert!(failure.message().contains("Invalid repository format"));
    }

    #[tokio::test]
    async fn test_config_error_fails_run() {
        let config = Err(tally_core::Error::Config(
            "per_page must be between 1 and 100, got 0".to_string(),
        ));
        let failure = args(Some("owner/repo")).execute(config).await.unwrap_err();
        assert_eq!(
            failure.message(),
            "Configuration error: per_page must be between 1 and 100, got 0"
        );
    }

    #[test]
    fn test_failure_prints_error_and_exits_non_zero() {
        let mut commands = WorkflowCommands::new(Vec::new());
        let code = finish(Err(RunFailure::new("rate limited")), &mut commands).unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        let text = String::from_utf8(commands.into_inner()).unwrap();
        assert_eq!(text, "::error::rate limited\n");
    }

    #[test]
    fn test_success_prints_nothing() {
        let mut commands = WorkflowCommands::new(Vec::new());
        let code = finish(Ok(Tally::default()), &mut commands).unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(commands.into_inner().is_empty());
    }
}
