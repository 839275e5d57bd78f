//! hypermindz-search: run a Hypermindz RAG search from the command line

use anyhow::{Context, Result};
use clap::Parser;
use hypermindz_tools::{
    config::{self, ConfigOverrides, ProcessEnv, Settings},
    network::HttpClient,
    search::SearchClient,
    tools::{RagSearchTool, Tool},
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hypermindz-search", version, about = "Semantic search over Hypermindz datasets")]
struct Cli {
    /// Natural-language query
    #[arg(required_unless_present_any = ["check", "tool_definition"])]
    query: Vec<String>,

    /// Path to settings.yml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Full search endpoint URL (overrides HYPERMINDZ_RAG_URL)
    #[arg(long, conflicts_with = "base_url")]
    url: Option<String>,

    /// Service base URL (overrides HYPERMINDZ_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Dataset identifier (overrides HYPERMINDZ_DATASET_ID)
    #[arg(long)]
    dataset_id: Option<String>,

    /// Bearer token (overrides HYPERMINDZ_RAG_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long)]
    timeout: Option<f64>,

    /// Only validate the configuration
    #[arg(long)]
    check: bool,

    /// Print the agent tool definition as JSON and exit
    #[arg(long)]
    tool_definition: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // .env may carry RUST_LOG, so it is loaded before logging starts
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok(), cli.verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if cli.tool_definition {
        let definition = RagSearchTool::new().definition();
        println!("{}", serde_json::to_string_pretty(&definition)?);
        return Ok(ExitCode::SUCCESS);
    }

    let settings = load_settings(cli.config.as_deref())?;

    let overrides = ConfigOverrides {
        mode: None,
        api_url: cli.url.clone(),
        base_url: cli.base_url.clone(),
        api_key: cli.api_key.clone(),
        dataset_id: cli.dataset_id.clone(),
    }
    .or(settings.overrides());
    let configuration = config::load_configuration(overrides, &ProcessEnv);

    let timeout = parse_timeout(cli.timeout.unwrap_or(settings.search.timeout))?;

    let transport =
        HttpClient::with_settings(&settings.outgoing).context("failed to build HTTP client")?;
    let client = SearchClient::from_config(configuration)
        .with_transport(Arc::new(transport))
        .with_timeout(timeout);

    if cli.check {
        let (valid, message) = client.validate_configuration();
        if valid {
            println!("Configuration OK ({:?} mode)", client.config().mode);
            return Ok(ExitCode::SUCCESS);
        }
        println!("{}", message);
        return Ok(ExitCode::FAILURE);
    }

    let query = cli.query.join(" ");
    info!("Searching for: {}", query);

    let outcome = client.execute(&query, timeout).await;
    println!("{}", outcome);

    Ok(if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Log filter from a RUST_LOG directive, or the verbosity flag when unset
fn log_filter(directive: Option<String>, verbose: bool) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(if verbose { "debug" } else { "warn" }))
}

/// Request timeout from seconds; must be positive and finite
fn parse_timeout(secs: f64) -> Result<Duration> {
    anyhow::ensure!(secs > 0.0, "timeout must be greater than zero, got {}", secs);
    Duration::try_from_secs_f64(secs).with_context(|| format!("invalid timeout: {}", secs))
}

/// Load settings from file or use defaults
fn load_settings(explicit: Option<&std::path::Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        info!("Loading settings from: {}", path.display());
        let mut settings = Settings::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        settings.merge_env();
        return Ok(settings);
    }

    // Check environment variable first
    if let Ok(path) = std::env::var("HYPERMINDZ_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("hypermindz/settings.yml"));
    }

    for path in paths.iter() {
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout(2.5).unwrap(), Duration::from_millis(2500));
        assert!(parse_timeout(0.0).is_err());
        assert!(parse_timeout(-1.0).is_err());
        assert!(parse_timeout(f64::INFINITY).is_err());
    }

    #[test]
    fn test_log_filter() {
        let filter = log_filter(Some("hypermindz_tools=trace".into()), false);
        assert_eq!(filter.to_string(), "hypermindz_tools=trace");
        assert_eq!(log_filter(None, false).to_string(), "warn");
        assert_eq!(log_filter(None, true).to_string(), "debug");
    }
}
