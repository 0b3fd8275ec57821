//! Topica application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing (stderr, so the report on stdout stays clean)
//! 3. Read and validate the clustering request
//! 4. Tokenize, vectorize and cluster on a blocking thread
//! 5. Write the JSON report to stdout or the output file

mod cli;

use std::path::Path;

use clap::Parser;
use tokio::io::AsyncWriteExt;

use topica_cluster::{parse_request, TextCluster};
use topica_core::config::TopicaConfig;
use topica_core::error::TopicaError;
use topica_core::types::ClusterReport;
use topica_text::Tokenizer;

use cli::CliArgs;

/// Outcome of looking for a config file, reported once tracing is up.
enum ConfigSource {
    File,
    Missing,
    Invalid(TopicaError),
}

/// Load the config without logging; the subscriber is not installed yet.
///
/// An explicitly requested config file that fails to load is an error. A
/// missing or broken default config falls back to defaults.
fn load_config(path: &Path, explicit: bool) -> Result<(TopicaConfig, ConfigSource), TopicaError> {
    if !path.exists() {
        if explicit {
            return Err(TopicaError::resource(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
            ));
        }
        return Ok((TopicaConfig::default(), ConfigSource::Missing));
    }
    match TopicaConfig::load(path) {
        Ok(config) => Ok((config, ConfigSource::File)),
        Err(e) if explicit => Err(e),
        Err(e) => Ok((TopicaConfig::default(), ConfigSource::Invalid(e))),
    }
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn write_report(
    report: &ClusterReport,
    output: Option<&Path>,
    pretty: bool,
) -> Result<(), TopicaError> {
    let mut json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    json.push('\n');

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, json).await?;
            tracing::info!(path = %path.display(), "Report written");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(json.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let (mut config, source) = load_config(&config_file, args.config_is_explicit())?;

    // Tracing.
    init_tracing(&args.resolve_log_level(&config.general.log_level));
    tracing::info!("Starting Topica v{}", env!("CARGO_PKG_VERSION"));
    match source {
        ConfigSource::File => {
            tracing::info!(path = %config_file.display(), "Configuration loaded")
        }
        ConfigSource::Missing => {
            tracing::debug!(path = %config_file.display(), "No config file; using defaults")
        }
        ConfigSource::Invalid(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config; using defaults"
        ),
    }
    config.tokenizer.stopwords_file = args.resolve_stopwords(config.tokenizer.stopwords_file.take());

    // Request.
    let content = tokio::fs::read_to_string(&args.input)
        .await
        .map_err(|e| TopicaError::resource(&args.input, e))?;
    let request = match parse_request(&content) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(path = %args.input.display(), error = %e, "Invalid clustering request");
            return Err(e.into());
        }
    };
    let theta = args.resolve_threshold(request.threshold, config.clustering.result_theta);
    tracing::info!(
        queries = request.data.len(),
        request_threshold = request.threshold,
        result_threshold = theta,
        shuffle = request.shuffle,
        "Clustering request loaded"
    );

    // Clustering is CPU-bound and strictly sequential; keep it off the runtime threads.
    let report = tokio::task::spawn_blocking(move || -> Result<ClusterReport, TopicaError> {
        let tokenizer = Tokenizer::from_config(&config.tokenizer)?;
        let cluster = TextCluster::from_request(request, tokenizer, &config)?;
        cluster.cluster_result_with(theta)
    })
    .await?;

    let report = match report {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "Clustering failed");
            return Err(e.into());
        }
    };

    write_report(&report, args.output.as_deref(), args.pretty).await?;
    Ok(())
}
