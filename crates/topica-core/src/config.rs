use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TopicaError};

/// Top-level configuration for Topica.
///
/// Loaded from `~/.topica/config.toml` by default. Each section corresponds
/// to one stage of the clustering run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
    #[serde(default)]
    pub vectorizer: VectorizerConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
}

impl TopicaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TopicaConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.vectorizer.validate()?;
        self.clustering.validate()
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Tokenizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Newline-delimited stop-word list. No filtering when unset.
    pub stopwords_file: Option<PathBuf>,
    /// Lowercase tokens before stop-word matching and vectorization.
    pub lowercase: bool,
    /// Word segmentation strategy.
    pub segmenter: Segmenter,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            stopwords_file: None,
            lowercase: true,
            segmenter: Segmenter::default(),
        }
    }
}

/// How raw text is split into words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segmenter {
    /// Dictionary-based Chinese word segmentation; runs of Latin letters and
    /// digits stay whole, every other symbol is its own token.
    #[default]
    Jieba,
    /// Unicode word boundaries (UAX #29). Punctuation is dropped and Han text
    /// splits into single characters.
    Unicode,
}

/// TF-IDF weighting parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Expected document length baseline for pivoted normalization.
    pub pivot: f64,
    /// Pivot slope in [0, 1]. 0 disables length normalization.
    pub slope: f64,
    /// Use `ln((1 + N) / (1 + df)) + 1` instead of `log2(N / df)`.
    pub smooth_idf: bool,
    /// Use `1 + ln(tf)` instead of the raw term count.
    pub sublinear_tf: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            pivot: 10.0,
            slope: 0.1,
            smooth_idf: true,
            sublinear_tf: false,
        }
    }
}

impl VectorizerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.pivot.is_finite() && self.pivot > 0.0) {
            return Err(TopicaError::Config(format!(
                "vectorizer.pivot must be positive, got {}",
                self.pivot
            )));
        }
        if !(0.0..=1.0).contains(&self.slope) {
            return Err(TopicaError::Config(format!(
                "vectorizer.slope must be within [0, 1], got {}",
                self.slope
            )));
        }
        Ok(())
    }
}

/// Single-pass clustering configuration.
///
/// `default_theta` and `result_theta` are deliberately separate values: the
/// first seeds a `TextCluster` built without a request threshold, the second is
/// what `cluster_result` compares against unless the caller overrides it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Instance similarity threshold.
    pub default_theta: f64,
    /// Threshold used when assembling the final result.
    pub result_theta: f64,
    /// Emit a progress event every N items. 0 disables progress events.
    pub progress_interval: usize,
    /// Seed for the reproducible shuffle used when `shuffle = false`.
    pub shuffle_seed: u64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            default_theta: 0.5,
            result_theta: 0.25,
            progress_interval: 1000,
            shuffle_seed: 2020,
        }
    }
}

impl ClusteringConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("default_theta", self.default_theta),
            ("result_theta", self.result_theta),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(TopicaError::Config(format!(
                    "clustering.{name} must be within (0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = TopicaConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert!(config.tokenizer.stopwords_file.is_none());
        assert!(config.tokenizer.lowercase);
        assert_eq!(config.tokenizer.segmenter, Segmenter::Jieba);
        assert_eq!(config.vectorizer.pivot, 10.0);
        assert_eq!(config.vectorizer.slope, 0.1);
        assert!(config.vectorizer.smooth_idf);
        assert!(!config.vectorizer.sublinear_tf);
        assert_eq!(config.clustering.default_theta, 0.5);
        assert_eq!(config.clustering.result_theta, 0.25);
        assert_eq!(config.clustering.progress_interval, 1000);
        assert_eq!(config.clustering.shuffle_seed, 2020);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[tokenizer]
stopwords_file = "/tmp/stopwords.txt"
lowercase = false
segmenter = "unicode"

[vectorizer]
pivot = 8.0
slope = 0.25
smooth_idf = false
sublinear_tf = true

[clustering]
default_theta = 0.6
result_theta = 0.3
progress_interval = 50
shuffle_seed = 7
"#;
        let file = create_temp_config(content);
        let config = TopicaConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(
            config.tokenizer.stopwords_file.as_deref(),
            Some(Path::new("/tmp/stopwords.txt"))
        );
        assert!(!config.tokenizer.lowercase);
        assert_eq!(config.tokenizer.segmenter, Segmenter::Unicode);
        assert_eq!(config.vectorizer.pivot, 8.0);
        assert_eq!(config.vectorizer.slope, 0.25);
        assert!(!config.vectorizer.smooth_idf);
        assert!(config.vectorizer.sublinear_tf);
        assert_eq!(config.clustering.default_theta, 0.6);
        assert_eq!(config.clustering.result_theta, 0.3);
        assert_eq!(config.clustering.progress_interval, 50);
        assert_eq!(config.clustering.shuffle_seed, 7);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let file = create_temp_config("[clustering]\nresult_theta = 0.4\n");
        let config = TopicaConfig::load(file.path()).unwrap();
        assert_eq!(config.clustering.result_theta, 0.4);
        assert_eq!(config.clustering.default_theta, 0.5);
        assert_eq!(config.vectorizer.pivot, 10.0);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = TopicaConfig::load(file.path()).unwrap();
        assert_eq!(config.clustering.shuffle_seed, 2020);
        assert_eq!(config.vectorizer.slope, 0.1);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = TopicaConfig::load_or_default(Path::new("/nonexistent/topica.toml"));
        assert_eq!(config.clustering.result_theta, 0.25);
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is [not valid toml");
        let err = TopicaConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, TopicaError::Config(_)));
    }

    #[test]
    fn test_load_rejects_unknown_segmenter() {
        let file = create_temp_config("[tokenizer]\nsegmenter = \"whitespace\"\n");
        let err = TopicaConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, TopicaError::Config(_)));
    }

    #[test]
    fn test_load_rejects_out_of_range_slope() {
        let file = create_temp_config("[vectorizer]\nslope = 1.5\n");
        let err = TopicaConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("slope"));
    }

    #[test]
    fn test_validate_rejects_non_positive_pivot() {
        let mut config = TopicaConfig::default();
        config.vectorizer.pivot = 0.0;
        assert!(matches!(config.validate(), Err(TopicaError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_theta() {
        let mut config = TopicaConfig::default();
        config.clustering.result_theta = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("result_theta"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = TopicaConfig::default();
        config.clustering.result_theta = 0.35;
        config.tokenizer.stopwords_file = Some(PathBuf::from("stop.txt"));
        config.save(&path).unwrap();

        let reloaded = TopicaConfig::load(&path).unwrap();
        assert_eq!(reloaded.clustering.result_theta, 0.35);
        assert_eq!(
            reloaded.tokenizer.stopwords_file,
            Some(PathBuf::from("stop.txt"))
        );
    }
}
