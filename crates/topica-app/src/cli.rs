//! CLI argument definitions for the Topica binary.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Topica - group short text queries into topic clusters.
#[derive(Parser, Debug)]
#[command(name = "topica", version, about)]
pub struct CliArgs {
    /// Clustering request JSON file ({threshold, shuffle, data: [{id, question}]}).
    pub input: PathBuf,

    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Newline-delimited stop-word file.
    #[arg(short = 's', long = "stopwords")]
    pub stopwords: Option<PathBuf>,

    /// Write the report here instead of stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Result similarity threshold, overriding `clustering.result_theta`.
    #[arg(short = 't', long = "threshold")]
    pub threshold: Option<f64>,

    /// Cluster at the request's own `threshold` instead of the result threshold.
    #[arg(long = "use-request-threshold", conflicts_with = "threshold")]
    pub use_request_threshold: bool,

    /// Pretty-print the JSON report.
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > TOPICA_CONFIG env var > platform default (~/.topica/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("TOPICA_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Whether the config path was chosen explicitly rather than defaulted.
    pub fn config_is_explicit(&self) -> bool {
        self.config.is_some() || std::env::var_os("TOPICA_CONFIG").is_some()
    }

    /// Resolve the stop-word file.
    ///
    /// Priority: --stopwords flag > TOPICA_STOPWORDS env var > config file value.
    pub fn resolve_stopwords(&self, config_value: Option<PathBuf>) -> Option<PathBuf> {
        if let Some(ref p) = self.stopwords {
            return Some(p.clone());
        }
        if let Ok(p) = std::env::var("TOPICA_STOPWORDS") {
            return Some(PathBuf::from(p));
        }
        config_value
    }

    /// Resolve the threshold the final result is clustered at.
    ///
    /// Priority: --threshold flag > --use-request-threshold > config `result_theta`.
    pub fn resolve_threshold(&self, request_threshold: f64, result_theta: f64) -> f64 {
        if let Some(t) = self.threshold {
            return t;
        }
        if self.use_request_threshold {
            return request_threshold;
        }
        result_theta
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > TOPICA_LOG env var > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Ok(level) = std::env::var("TOPICA_LOG") {
            return level;
        }
        config_level.to_string()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".topica").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".topica").join("config.toml");
    }
    PathBuf::from("config.toml")
}
