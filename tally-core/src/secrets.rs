//! GitHub token resolution
//!
//! The token is taken from the first source that supplies one:
//! 1. The step's `token` input (INPUT_TOKEN) or `--token`
//! 2. GITHUB_TOKEN environment variable
//! 3. Secrets file (~/.config/tally/secrets.toml, mode 0600 on Unix)
//!
//! The secrets file is only opened when neither of the first two is set, so
//! a broken file cannot fail a run that was given a token directly.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

/// Contents of the secrets file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Secrets {
    pub github: GitHubSecrets,
}

/// `[github]` table of the secrets file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubSecrets {
    /// GitHub Personal Access Token
    pub token: Option<String>,
}

impl Secrets {
    /// Resolve the GitHub token from the step input, environment, or secrets file
    pub fn resolve_github_token(explicit: Option<&str>) -> Result<Option<String>> {
        let env_token = std::env::var("GITHUB_TOKEN").ok();
        resolve_token(
            explicit,
            env_token.as_deref(),
            Self::default_secrets_path().as_deref(),
        )
    }

    /// Read a secrets file, refusing one that others can read
    pub fn load_from_file(path: &Path) -> Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mode = std::fs::metadata(path)?.permissions().mode() & 0o777;
            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode,
                    path.display()
                )));
            }
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/tally/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tally").join("secrets.toml"))
    }

    /// Token stored in the file, if any
    pub fn token(&self) -> Option<String> {
        non_empty(self.github.token.as_deref())
    }
}

fn non_empty(token: Option<&str>) -> Option<String> {
    token.map(str::trim).filter(|t| !t.is_empty()).map(String::from)
}

fn resolve_token(
    explicit: Option<&str>,
    env_token: Option<&str>,
    secrets_path: Option<&Path>,
) -> Result<Option<String>> {
    if let Some(token) = non_empty(explicit) {
        debug!("Using GitHub token from step input");
        return Ok(Some(token));
    }

    if let Some(token) = non_empty(env_token) {
        debug!("Using GitHub token from GITHUB_TOKEN environment variable");
        return Ok(Some(token));
    }

    match secrets_path {
        Some(path) if path.exists() => {
            let token = Secrets::load_from_file(path)?.token();
            if token.is_some() {
                debug!(path = %path.display(), "Using GitHub token from secrets file");
            }
            Ok(token)
        }
        _ => Ok(None),
    }
}
