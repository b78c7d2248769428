//! Runtime configuration loaded from YAML.
//!
//! Every tunable the tagger depends on lives here: the history start date,
//! the cache directory and endpoint, window and ranking sizes, and the
//! known-entity and blacklist word lists. A default file is compiled into the
//! binary from `config/default.yaml`; `--config` swaps in a user file whose
//! missing keys fall back to the values in [`Config::default`].

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// The configuration file shipped with the binary.
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../config/default.yaml");

/// Upper bound for `window_days`, roughly a century.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Retry policy for remote fetches.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Extra attempts after the first failure. Zero aborts on the first error.
    pub max_retries: usize,
    /// Delay before the first retry; doubles on each further attempt.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 1000,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// First day of the historical sweep.
    pub start_date: NaiveDate,
    /// Directory holding one cached JSON file per day.
    pub data_dir: PathBuf,
    /// Base URL of the best-reply service, without the trailing date segment.
    pub endpoint: String,
    /// `limit` query parameter sent with every fetch.
    pub fetch_limit: usize,
    /// Half width of the trending window, in days.
    pub window_days: i64,
    /// Articles sampled per day when building the trending vocabulary.
    pub sample_size: usize,
    /// Maximum number of words kept in a trending vocabulary.
    pub vocabulary_size: usize,
    /// Most frequent nouns considered per article.
    pub top_nouns: usize,
    /// Capacity of the per-day word list memo.
    pub memo_capacity: usize,
    pub retry: RetryConfig,
    /// Publisher name to the marker at which its summaries are cut.
    pub summary_terminators: BTreeMap<String, String>,
    pub known_entities: Vec<String>,
    pub blacklist: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2012, 1, 1).unwrap_or_default(),
            data_dir: PathBuf::from("data"),
            endpoint: "http://m.media.daum.net/api/service/bestreply".to_string(),
            fetch_limit: 100,
            window_days: 30,
            sample_size: 20,
            vocabulary_size: 3000,
            top_nouns: 30,
            memo_capacity: 128,
            retry: RetryConfig::default(),
            summary_terminators: BTreeMap::new(),
            known_entities: Vec::new(),
            blacklist: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a configuration from YAML text and validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// The configuration compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(DEFAULT_CONFIG_YAML)
    }

    /// Load from `path` when given, otherwise use [`Config::builtin`].
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let yaml = std::fs::read_to_string(path)?;
                let config = Self::from_yaml_str(&yaml)?;
                info!(
                    path = %path.display(),
                    known_entities = config.known_entities.len(),
                    blacklist = config.blacklist.len(),
                    "Loaded configuration file"
                );
                Ok(config)
            }
            None => {
                let config = Self::builtin()?;
                info!(
                    known_entities = config.known_entities.len(),
                    blacklist = config.blacklist.len(),
                    "Using built-in configuration"
                );
                Ok(config)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let sizes = [
            ("sample_size", self.sample_size),
            ("vocabulary_size", self.vocabulary_size),
            ("top_nouns", self.top_nouns),
            ("memo_capacity", self.memo_capacity),
            ("fetch_limit", self.fetch_limit),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, value)| *value == 0) {
            return Err(Error::InvalidConfig(format!("{name} must be greater than zero")));
        }
        if self.window_days < 0 {
            return Err(Error::InvalidConfig(
                "window_days must not be negative".to_string(),
            ));
        }
        if self.window_days > MAX_WINDOW_DAYS {
            return Err(Error::InvalidConfig(format!(
                "window_days must be at most {MAX_WINDOW_DAYS}"
            )));
        }
        if self.summary_terminators.values().any(|m| m.is_empty()) {
            return Err(Error::InvalidConfig(
                "summary_terminators markers must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_config_parses() {
        let config = Config::builtin().unwrap();
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2012, 1, 1).unwrap());
        assert_eq!(config.fetch_limit, 100);
        assert_eq!(config.window_days, 30);
        assert_eq!(config.sample_size, 20);
        assert_eq!(config.vocabulary_size, 3000);
        assert_eq!(config.top_nouns, 30);
        assert_eq!(config.retry.max_retries, 0);
        assert!(config.known_entities.iter().any(|e| e == "세월호"));
        assert!(config.known_entities.iter().any(|e| e == "TV조선"));
        assert_eq!(config.blacklist.len(), 4);
        assert_eq!(
            config.summary_terminators.get("연합뉴스").map(String::as_str),
            Some("(끝)")
        );
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let config = Config::from_yaml_str(
            r#"
start_date: "2015-03-01"
known_entities: [메르스]
"#,
        )
        .unwrap();

        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2015, 3, 1).unwrap());
        assert_eq!(config.known_entities, vec!["메르스".to_string()]);
        assert_eq!(config.vocabulary_size, 3000);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.blacklist.is_empty());
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let err = Config::from_yaml_str("top_nouns: 0").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("top_nouns"));
    }

    #[test]
    fn test_negative_window_rejected() {
        let err = Config::from_yaml_str("window_days: -1").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_huge_window_rejected() {
        let err = Config::from_yaml_str("window_days: 100000000").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("window_days"));

        let config = Config::from_yaml_str(&format!("window_days: {MAX_WINDOW_DAYS}")).unwrap();
        assert_eq!(config.window_days, MAX_WINDOW_DAYS);
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let err = Config::from_yaml_str("sample_size: [").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, "blacklist: [속보]\nmemo_capacity: 4\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.blacklist, vec!["속보".to_string()]);
        assert_eq!(config.memo_capacity, 4);
    }
}
