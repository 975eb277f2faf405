//! GitHub API client using octocrab

use crate::error::describe;
use crate::{Error, Result};
use octocrab::Octocrab;
use tally_core::{GitHubConfig, Secrets};
use tracing::info;

/// GitHub API client for a single repository
pub struct GitHubClient {
    client: Octocrab,
    owner: String,
    repo: String,
    per_page: u8,
}

impl GitHubClient {
    /// Create a new GitHub client for the specified repository
    ///
    /// Token is taken from (in priority order):
    /// 1. The explicit token (the step's `token` input)
    /// 2. GITHUB_TOKEN environment variable
    /// 3. ~/.config/tally/secrets.toml
    pub fn new(
        token: Option<&str>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        config: &GitHubConfig,
    ) -> Result<Self> {
        let token = Secrets::resolve_github_token(token)
            .map_err(|e| Error::Auth(e.to_string()))?
            .ok_or_else(|| {
                Error::Auth(
                    "GitHub token not found. Pass the token input, set GITHUB_TOKEN, \
                     or add token to ~/.config/tally/secrets.toml"
                        .to_string(),
                )
            })?;

        Self::with_token(token, owner, repo, config)
    }

    /// Create a client with an already resolved token
    pub fn with_token(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        config: &GitHubConfig,
    ) -> Result<Self> {
        let token: String = token.into();
        let owner = owner.into();
        let repo = repo.into();

        let mut builder = Octocrab::builder().personal_token(token);
        if let Some(ref api_url) = config.api_url {
            builder = builder
                .base_uri(api_url.as_str())
                .map_err(|e| {
                    Error::Parse(format!("Invalid API URL {}: {}", api_url, describe(&e)))
                })?;
        }

        let client = builder
            .build()
            .map_err(|e| {
                Error::Auth(format!("Failed to create GitHub client: {}", describe(&e)))
            })?;

        info!(owner = %owner, repo = %repo, "Created GitHub client");

        Ok(Self {
            client,
            owner,
            repo,
            per_page: config.per_page,
        })
    }

    /// Create a GitHub client from a repository reference
    ///
    /// Supports formats:
    /// - owner/repo
    /// - https://github.com/owner/repo
    /// - git@github.com:owner/repo.git
    pub fn from_url(url: &str, token: Option<&str>, config: &GitHubConfig) -> Result<Self> {
        let (owner, repo) = parse_repository(url)?;
        Self::new(token, owner, repo, config)
    }

    /// Get the repository owner
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repository name
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Items requested per page
    pub fn per_page(&self) -> u8 {
        self.per_page
    }

    /// Get the underlying octocrab client
    pub fn client(&self) -> &Octocrab {
        &self.client
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

/// Parse a repository reference into owner and repo
pub fn parse_repository(url: &str) -> Result<(String, String)> {
    let url = url.trim();

    if !url.contains(':') && !url.contains('/') {
        return Err(Error::Parse(format!(
            "Invalid repository format: {}. Expected owner/repo",
            url
        )));
    }

    if !url.contains("://") && !url.contains('@') {
        // Simple owner/repo format, as in GITHUB_REPOSITORY
        let parts: Vec<&str> = url.split('/').collect();
        return match parts.as_slice() {
            [owner, repo] if !owner.is_empty() && !repo.is_empty() => Ok((
                owner.to_string(),
                repo.trim_end_matches(".git").to_string(),
            )),
            _ => Err(Error::Parse(format!(
                "Invalid repository format: {}. Expected owner/repo",
                url
            ))),
        };
    }

    // Handle HTTPS URL: https://github.com/owner/repo
    if url.starts_with("https://") || url.starts_with("http://") {
        let url = url::Url::parse(url).map_err(|e| Error::Parse(e.to_string()))?;
        let path = url.path().trim_start_matches('/').trim_end_matches(".git");
        let parts: Vec<&str> = path.split('/').collect();
        if let [owner, repo, ..] = parts.as_slice() {
            if !owner.is_empty() && !repo.is_empty() {
                return Ok((owner.to_string(), repo.to_string()));
            }
        }
        return Err(Error::Parse(format!("Invalid GitHub URL path: {}", path)));
    }

    // Handle SSH URL: git@github.com:owner/repo.git
    if url.starts_with("git@") {
        if let Some(path) = url.split(':').nth(1) {
            let path = path.trim_end_matches(".git");
            let parts: Vec<&str> = path.split('/').collect();
            if let [owner, repo, ..] = parts.as_slice() {
                return Ok((owner.to_string(), repo.to_string()));
            }
        }
        return Err(Error::Parse(format!("Invalid SSH URL: {}", url)));
    }

    Err(Error::Parse(format!("Unrecognized URL format: {}", url)))
}
