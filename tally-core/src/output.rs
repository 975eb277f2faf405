//! Step outputs and failure reporting for GitHub Actions
//!
//! Outputs are written to the file named by `GITHUB_OUTPUT` when the runner
//! provides one. Older runners only understand workflow commands on stdout,
//! so `::set-output` is used as a fallback.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use crate::{Error, Result};

/// Environment variable naming the runner's output file
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

const MULTILINE_DELIMITER: &str = "ghadelimiter_tally";

/// Destination for a step's named outputs
pub trait OutputSink {
    /// Publish every output, or none of them
    fn publish(&mut self, outputs: &[(&str, String)]) -> Result<()>;
}

/// Pick the sink the current runner supports
pub fn sink_from_env() -> Box<dyn OutputSink> {
    match std::env::var(GITHUB_OUTPUT_ENV) {
        Ok(path) if !path.trim().is_empty() => Box::new(GitHubOutputFile::new(path)),
        _ => Box::new(WorkflowCommands::stdout()),
    }
}

/// Appends outputs to the `GITHUB_OUTPUT` file
#[derive(Debug, Clone)]
pub struct GitHubOutputFile {
    path: PathBuf,
}

impl GitHubOutputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputSink for GitHubOutputFile {
    fn publish(&mut self, outputs: &[(&str, String)]) -> Result<()> {
        // Render everything first so a bad value leaves the file untouched
        let mut contents = String::new();
        for (name, value) in outputs {
            contents.push_str(&format_output(name, value)?);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(contents.as_bytes())?;

        debug!(path = %self.path.display(), count = outputs.len(), "Wrote step outputs");
        Ok(())
    }
}

/// Format a single `GITHUB_OUTPUT` entry
fn format_output(name: &str, value: &str) -> Result<String> {
    if name.is_empty() || name.contains(['=', '\n', '\r']) {
        return Err(Error::Output {
            name: name.to_string(),
            reason: "invalid output name".to_string(),
        });
    }

    if !value.contains('\n') && !value.contains('\r') {
        return Ok(format!("{}={}\n", name, value));
    }

    if value.contains(MULTILINE_DELIMITER) {
        return Err(Error::Output {
            name: name.to_string(),
            reason: "value contains the output delimiter".to_string(),
        });
    }

    Ok(format!(
        "{name}<<{delim}\n{value}\n{delim}\n",
        name = name,
        delim = MULTILINE_DELIMITER,
        value = value
    ))
}

/// Workflow commands (`::name::value`) written to a stream, normally stdout
pub struct WorkflowCommands<W: Write> {
    writer: W,
}

impl WorkflowCommands<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> WorkflowCommands<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Mark the step as failed with a message
    pub fn error(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "::error::{}", escape_data(message))?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for WorkflowCommands<W> {
    fn publish(&mut self, outputs: &[(&str, String)]) -> Result<()> {
        let mut contents = String::new();
        for (name, value) in outputs {
            contents.push_str(&format!(
                "::set-output name={}::{}\n",
                escape_property(name),
                escape_data(value)
            ));
        }
        self.writer.write_all(contents.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Escape a workflow command message
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow command property value
fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
