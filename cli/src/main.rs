//! CLI for trending-sync.
//!
//! Scrapes today's GitHub Trending repositories, enriches them through the
//! GitHub REST API and writes them to a Feishu Bitable table.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trending_sync::{
    load_config_file, BitableConfig, BitableSink, ConfigError, ConfigFile, PipelineConfig,
    RunOutput, RunSummary, Runner, RunnerError,
};

/// Trending Sync - Copy today's GitHub Trending repositories into a Feishu Bitable table.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an optional TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// GitHub token for the enrichment API (optional, raises the rate limit).
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Feishu app ID.
    #[arg(long, env = "FEISHU_APP_ID")]
    feishu_app_id: Option<String>,

    /// Feishu app secret.
    #[arg(long, env = "FEISHU_APP_SECRET", hide_env_values = true)]
    feishu_app_secret: Option<String>,

    /// Bitable app token.
    #[arg(long, env = "FEISHU_BITABLE_APP_TOKEN", hide_env_values = true)]
    bitable_app_token: Option<String>,

    /// Bitable table ID.
    #[arg(long, env = "FEISHU_BITABLE_TABLE_ID")]
    bitable_table_id: Option<String>,

    /// Number of trending repositories to keep (overrides the config file).
    #[arg(long)]
    limit: Option<usize>,

    /// Maximum concurrent GitHub API requests (overrides the config file).
    #[arg(long)]
    concurrency: Option<usize>,

    /// Print the records as JSON instead of writing them.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Variables in .env behave like the real environment
    let dotenv = dotenvy::dotenv();

    init_tracing();

    if let Err(e) = dotenv {
        if !is_missing_file(&e) {
            warn!(error = %e, "Failed to load .env file");
        }
    }

    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A rustls crypto provider was already installed");
    }

    let args = Args::parse();

    match run(args).await {
        Ok(output) => {
            print_summary(&output.summary);

            if output.summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// A missing `.env` file is normal; anything else is worth a warning.
fn is_missing_file(error: &dotenvy::Error) -> bool {
    matches!(error, dotenvy::Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunOutput, RunnerError> {
    let file = match &args.config {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    let mut config = PipelineConfig::from_file(&file)?.with_github_token(args.github_token);
    if let Some(limit) = args.limit {
        config = config.with_limit(limit);
    }
    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }

    if args.dry_run {
        let runner = Runner::new(config)?;
        let output = runner.collect().await?;
        print_records(&output);
        return Ok(output);
    }

    let bitable = BitableConfig::new(
        required(args.feishu_app_id, "FEISHU_APP_ID")?,
        required(args.feishu_app_secret, "FEISHU_APP_SECRET")?,
        required(args.bitable_app_token, "FEISHU_BITABLE_APP_TOKEN")?,
        required(args.bitable_table_id, "FEISHU_BITABLE_TABLE_ID")?,
    )?
    .with_section(&file.bitable)?;

    let sink = BitableSink::new(bitable)?;
    let runner = Runner::new(config)?;
    runner.run(&sink).await
}

/// Unwraps a credential that is only optional in dry-run mode.
fn required(value: Option<String>, env: &str) -> Result<String, ConfigError> {
    value.ok_or_else(|| ConfigError::ValidationError {
        field: env.to_string(),
        message: "is required unless --dry-run is set".to_string(),
    })
}

/// Prints dry-run records as pretty JSON.
fn print_records(output: &RunOutput) {
    match serde_json::to_string_pretty(&output.records) {
        Ok(json) => println!("{json}"),
        Err(e) => error!(error = %e, "Failed to serialize records"),
    }
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Repositories listed: {}", summary.listed);
    println!("  Repositories kept: {}", summary.retained);
    println!("  Repositories enriched: {}", summary.enriched);
    println!(
        "  Enrichment failures: {}",
        summary.enrichment_failures.len()
    );
    for failure in &summary.enrichment_failures {
        println!(
            "    #{} {}: {}",
            failure.rank, failure.repository, failure.error
        );
    }

    if !summary.dry_run {
        if summary.write_skipped {
            println!("  Records written: none (nothing to write)");
        } else {
            println!("  Records written: {}", summary.written);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_missing_env_file_is_ignored() {
        let error = dotenvy::Error::Io(io::Error::from(io::ErrorKind::NotFound));
        assert!(is_missing_file(&error));
    }

    #[test]
    fn test_malformed_env_file_is_reported() {
        assert!(!is_missing_file(&dotenvy::Error::LineParse(
            "GITHUB_TOKEN='abc".to_string(),
            13
        )));
        let denied = dotenvy::Error::Io(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(!is_missing_file(&denied));
    }
}
