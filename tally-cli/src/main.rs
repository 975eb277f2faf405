//! Tally CLI - Command line interface and CI step for tally
//!
//! Counts a repository's issues and pull requests by status and publishes
//! the counts as GitHub Actions step outputs.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tally_core::{Config, WorkflowCommands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::CollectArgs;

/// Tally: issue and pull request stats for a repository
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// GitHub API base URL (overrides config and env)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Items requested per page (overrides config and env)
    #[arg(long, global = true)]
    per_page: Option<u8>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Tally issues and pull requests and publish them as step outputs
    #[command(visible_alias = "c")]
    Collect(CollectArgs),

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries workflow commands
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("tally {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Collect(args)) => {
            let config = Config::load_with_overrides(cli.api_url, cli.per_page);
            let result = args.execute(config).await;
            return Ok(commands::collect::finish(
                result,
                &mut WorkflowCommands::stdout(),
            )?);
        }
        Some(Commands::Config) => {
            let config = Config::load_with_overrides(cli.api_url, cli.per_page)?;

            println!("Tally Configuration");
            println!("===================");
            println!();
            println!("GitHub Settings:");
            println!(
                "  api_url: {}",
                config
                    .github
                    .api_url
                    .as_deref()
                    .unwrap_or("(default: https://api.github.com)")
            );
            println!("  per_page: {}", config.github.per_page);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("Tally - issue and pull request stats for a repository");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(ExitCode::SUCCESS)
}
