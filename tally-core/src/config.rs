//! Configuration management for tally
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (GITHUB_API_URL, TALLY_*)
//! 3. Config file (~/.config/tally/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Largest page size the GitHub REST API accepts
pub const MAX_PER_PAGE: u8 = 100;

/// GitHub-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// API base URL, for GitHub Enterprise. None means api.github.com
    pub api_url: Option<String>,

    /// Items requested per page when listing
    pub per_page: u8,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            per_page: MAX_PER_PAGE,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration
    pub github: GitHubConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/tally/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tally").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - GITHUB_API_URL: API base URL (set by the Actions runner)
    /// - TALLY_PER_PAGE: Page size for listing
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(api_url) = std::env::var("GITHUB_API_URL") {
            if !api_url.trim().is_empty() {
                self.github.api_url = Some(api_url.trim().to_string());
            }
        }

        if let Ok(per_page) = std::env::var("TALLY_PER_PAGE") {
            self.github.per_page = per_page.trim().parse().map_err(|_| {
                Error::Config(format!("TALLY_PER_PAGE is not a page size: {}", per_page))
            })?;
        }

        self.validate()
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, api_url: Option<String>, per_page: Option<u8>) -> Self {
        if let Some(url) = api_url {
            self.github.api_url = Some(url);
        }

        if let Some(n) = per_page {
            self.github.per_page = n;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(api_url: Option<String>, per_page: Option<u8>) -> Result<Self> {
        Self::load()?
            .with_env_overrides()?
            .with_cli_overrides(api_url, per_page)
            .validate()
    }

    /// Reject settings the API would refuse
    pub fn validate(self) -> Result<Self> {
        if self.github.per_page == 0 || self.github.per_page > MAX_PER_PAGE {
            return Err(Error::Config(format!(
                "per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.github.per_page
            )));
        }
        Ok(self)
    }
}
