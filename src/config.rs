//! Run configuration.
//!
//! Every value has a built-in default, so a run needs no configuration at all.
//! A YAML file can override any subset of fields, and command-line flags
//! override the file (see [`crate::cli::Cli`]).
//!
//! # Example
//!
//! ```yaml
//! base_url: https://news.ycombinator.com/news
//! output_path: ./data.json
//! strategy: parallel
//! parallel_pages: 4
//! concurrency: 4
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, instrument};
use url::Url;

/// The upstream site tolerates at most this many simultaneous requests.
pub const MAX_CONCURRENT_REQUESTS: usize = 4;

pub const DEFAULT_BASE_URL: &str = "https://news.ycombinator.com/news";
pub const DEFAULT_OUTPUT_PATH: &str = "data.json";
pub const DEFAULT_PARALLEL_PAGES: u32 = 4;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// How the orchestrator walks the listing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Follow the "load more" control one page at a time.
    #[default]
    Sequential,
    /// Fetch a fixed batch of pages concurrently.
    Parallel,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sequential => f.write_str("sequential"),
            Strategy::Parallel => f.write_str("parallel"),
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(Strategy::Sequential),
            "parallel" => Ok(Strategy::Parallel),
            other => Err(ConfigError::Invalid(format!(
                "unknown strategy `{other}` (expected `sequential` or `parallel`)"
            ))),
        }
    }
}

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Listing resource; the page number is appended as the `p` query parameter.
    pub base_url: String,
    /// Where the dataset is written.
    pub output_path: PathBuf,
    pub strategy: Strategy,
    /// Number of pages fetched by the parallel strategy (pages `1..=parallel_pages`).
    pub parallel_pages: u32,
    /// Maximum requests in flight. Never above [`MAX_CONCURRENT_REQUESTS`].
    pub concurrency: usize,
    /// Optional cap on pages walked by the sequential strategy.
    pub max_pages: Option<u32>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            strategy: Strategy::default(),
            parallel_pages: DEFAULT_PARALLEL_PAGES,
            concurrency: MAX_CONCURRENT_REQUESTS,
            max_pages: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Load a configuration file, filling unspecified fields with defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(?config, "Loaded configuration file");
        Ok(config)
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to an empty mapping.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Check the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url `{}`: {e}", self.base_url)))?;

        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENT_REQUESTS {
            return Err(ConfigError::Invalid(format!(
                "concurrency must be between 1 and {MAX_CONCURRENT_REQUESTS}, got {}",
                self.concurrency
            )));
        }
        if self.parallel_pages == 0 {
            return Err(ConfigError::Invalid("parallel_pages must be at least 1".into()));
        }
        if self.max_pages == Some(0) {
            return Err(ConfigError::Invalid("max_pages must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_path must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.strategy, Strategy::Sequential);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.parallel_pages, 4);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("strategy: parallel\nparallel_pages: 14\n").unwrap();
        assert_eq!(config.strategy, Strategy::Parallel);
        assert_eq!(config.parallel_pages, 14);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(Config::from_yaml("retries: 3\n").is_err());
    }

    #[test]
    fn test_concurrency_above_ceiling_is_rejected() {
        let config = Config {
            concurrency: 5,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("between 1 and 4"));
    }

    #[test]
    fn test_zero_values_are_rejected() {
        for config in [
            Config { concurrency: 0, ..Config::default() },
            Config { parallel_pages: 0, ..Config::default() },
            Config { max_pages: Some(0), ..Config::default() },
            Config { request_timeout_secs: 0, ..Config::default() },
        ] {
            assert!(config.validate().is_err(), "{config:?} should be invalid");
        }
    }

    #[test]
    fn test_bad_base_url_is_rejected() {
        let config = Config {
            base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Parallel".parse::<Strategy>().unwrap(), Strategy::Parallel);
        assert_eq!("sequential".parse::<Strategy>().unwrap(), Strategy::Sequential);
        assert!("random".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "output_path: /tmp/out/data.json\nmax_pages: 20").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.output_path, PathBuf::from("/tmp/out/data.json"));
        assert_eq!(config.max_pages, Some(20));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
