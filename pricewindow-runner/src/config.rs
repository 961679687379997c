//! Serializable run configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pricewindow_core::{PipelineConfig, PipelineError, Period};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data_loader::LoadOptions;

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

/// Errors from loading or validating a [`RunConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Everything needed to reproduce a preparation run:
/// - Tickers and the amount of history to load
/// - Where CSV bars live, and whether synthetic fallback is allowed
/// - Lookback and split ratios
///
/// ```toml
/// tickers = ["SPY", "QQQ"]
/// period = "5y"
/// data_dir = "data"
/// synthetic = false
///
/// [pipeline]
/// lookback = 60
/// train_ratio = 0.70
/// val_ratio = 0.15
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    pub tickers: Vec<String>,

    #[serde(default)]
    pub period: Period,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Generate synthetic bars for tickers with no data.
    #[serde(default)]
    pub synthetic: bool,

    /// Last date of synthetic bars. Defaults to today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthetic_end: Option<NaiveDate>,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl RunConfig {
    /// A config for the given tickers with every other field defaulted.
    pub fn for_tickers<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tickers: tickers.into_iter().map(Into::into).collect(),
            period: Period::default(),
            data_dir: default_data_dir(),
            synthetic: false,
            synthetic_end: None,
            pipeline: PipelineConfig::default(),
        }
    }

    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Tickers must be non-empty, non-blank and unique; the pipeline
    /// parameters must be valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tickers.is_empty() {
            return Err(ConfigError::Invalid("no tickers configured".into()));
        }
        let mut seen = HashSet::new();
        for ticker in &self.tickers {
            if ticker.trim().is_empty() {
                return Err(ConfigError::Invalid("blank ticker".into()));
            }
            if !seen.insert(ticker.to_ascii_uppercase()) {
                return Err(ConfigError::Invalid(format!("duplicate ticker '{ticker}'")));
            }
        }
        self.pipeline.validate()?;
        Ok(())
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs have the same RunId.
    pub fn run_id(&self) -> Result<RunId, ConfigError> {
        let json = serde_json::to_string(self)?;
        let hash = blake3::hash(json.as_bytes());
        Ok(hash.to_hex().to_string())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            period: self.period,
            synthetic: self.synthetic,
            synthetic_end: self
                .synthetic_end
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
tickers = ["SPY", "QQQ"]
period = "2y"
data_dir = "bars"
synthetic = true
synthetic_end = "2024-06-28"

[pipeline]
lookback = 30
"#;

    #[test]
    fn parses_toml_with_partial_pipeline() {
        let config = RunConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.tickers, vec!["SPY", "QQQ"]);
        assert_eq!(config.period, Period::TwoYears);
        assert_eq!(config.data_dir, PathBuf::from("bars"));
        assert!(config.synthetic);
        assert_eq!(config.pipeline.lookback, 30);
        assert_eq!(config.pipeline.train_ratio, 0.70);
        assert_eq!(config.pipeline.val_ratio, 0.15);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = RunConfig::from_toml(r#"tickers = ["SPY"]"#).unwrap();
        assert_eq!(config.period, Period::FiveYears);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(!config.synthetic);
        assert_eq!(config.pipeline, PipelineConfig::default());
        assert_eq!(config, RunConfig::for_tickers(["SPY"]));
    }

    #[test]
    fn test_run_id_deterministic() {
        let config = RunConfig::from_toml(SAMPLE).unwrap();
        let id1 = config.run_id().unwrap();
        let id2 = config.run_id().unwrap();
        assert_eq!(id1, id2, "RunId should be deterministic");
        assert_eq!(id1.len(), 64);
    }

    #[test]
    fn test_run_id_changes_with_params() {
        let config1 = RunConfig::from_toml(SAMPLE).unwrap();
        let mut config2 = config1.clone();
        config2.pipeline.lookback = 31;
        assert_ne!(
            config1.run_id().unwrap(),
            config2.run_id().unwrap(),
            "Different configs should have different RunIds"
        );
    }

    #[test]
    fn rejects_invalid_configs() {
        assert!(matches!(
            RunConfig::from_toml("tickers = []"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RunConfig::from_toml(r#"tickers = ["SPY", "spy"]"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RunConfig::from_toml("tickers = [\"SPY\"]\n[pipeline]\ntrain_ratio = 0.9\nval_ratio = 0.2"),
            Err(ConfigError::Pipeline(PipelineError::Configuration(_)))
        ));
        assert!(matches!(
            RunConfig::from_toml(r#"tickers = ["SPY"]
period = "3w""#),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = RunConfig::from_file(Path::new("/nonexistent/run.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/run.toml"));
    }

    #[test]
    fn test_config_serialization() {
        let config = RunConfig::from_toml(SAMPLE).unwrap();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);

        let toml_text = toml::to_string(&config).unwrap();
        assert_eq!(RunConfig::from_toml(&toml_text).unwrap(), config);
    }

    #[test]
    fn load_options_follow_config() {
        let config = RunConfig::from_toml(SAMPLE).unwrap();
        let opts = config.load_options();
        assert_eq!(opts.period, Period::TwoYears);
        assert!(opts.synthetic);
        assert_eq!(opts.synthetic_end, NaiveDate::from_ymd_opt(2024, 6, 28).unwrap());
    }
}
