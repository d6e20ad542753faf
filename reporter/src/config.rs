//! Configuration module for the weekboard reporter.
//!
//! This module handles parsing configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `WEEKBOARD_API_KEY` | Yes | - | API key for the board service |
//! | `WEEKBOARD_API_TOKEN` | Yes | - | API token for the board service |
//! | `WEEKBOARD_BASE_URL` | No | `https://api.trello.com/1` | API base URL |
//! | `WEEKBOARD_BOARDS` | Yes | - | Comma-separated board-name allow-list |
//! | `WEEKBOARD_EXCLUDE_LABELS` | No | `canceled,pending,done` | Labels that exclude a card |
//!
//! Board and label names are matched case-insensitively.
//!
//! # Example
//!
//! ```no_run
//! use weekboard_reporter::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("Base URL: {}", config.base_url);
//! ```

use std::env;

use thiserror::Error;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

/// Default card-label exclusion set.
const DEFAULT_EXCLUDE_LABELS: &[&str] = &["canceled", "pending", "done"];

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Configuration for the weekboard reporter.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key, passed as a query parameter on every request.
    pub api_key: String,

    /// API token, passed as a query parameter on every request.
    pub api_token: String,

    /// Base URL of the board service API.
    pub base_url: String,

    /// Board names to report on, lowercased for case-insensitive matching.
    pub boards: Vec<String>,

    /// Card labels that exclude a card from the todo pass, lowercased.
    pub exclude_labels: Vec<String>,
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - `WEEKBOARD_API_KEY` or `WEEKBOARD_API_TOKEN` is not set
    /// - `WEEKBOARD_BOARDS` is not set or contains no board names
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("WEEKBOARD_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("WEEKBOARD_API_KEY".to_string()))?;

        let api_token = env::var("WEEKBOARD_API_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("WEEKBOARD_API_TOKEN".to_string()))?;

        let base_url = env::var("WEEKBOARD_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let boards_raw = env::var("WEEKBOARD_BOARDS")
            .map_err(|_| ConfigError::MissingEnvVar("WEEKBOARD_BOARDS".to_string()))?;
        let boards = parse_name_list(&boards_raw);
        if boards.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "WEEKBOARD_BOARDS".to_string(),
                message: "expected at least one board name".to_string(),
            });
        }

        let exclude_labels = match env::var("WEEKBOARD_EXCLUDE_LABELS") {
            Ok(raw) => parse_name_list(&raw),
            Err(_) => DEFAULT_EXCLUDE_LABELS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        };

        Ok(Self {
            api_key,
            api_token,
            base_url,
            boards,
            exclude_labels,
        })
    }

    /// Returns true if the given board name is on the allow-list.
    #[must_use]
    pub fn board_selected(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.boards.iter().any(|b| *b == lowered)
    }

    /// Returns true if the given label name is in the exclusion set.
    #[must_use]
    pub fn label_excluded(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.exclude_labels.iter().any(|l| *l == lowered)
    }
}

/// Splits a comma-separated name list, trimming whitespace, dropping empty
/// entries, and lowercasing for case-insensitive matching.
fn parse_name_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
