use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::search::DEFAULT_QUIET_PERIOD;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub images: ImagesConfig,
}

impl Config {
    /// Create a new config with just the bearer token, using defaults for everything else
    pub fn new(bearer_token: String) -> Self {
        Self {
            api: ApiConfig {
                bearer_token,
                ..ApiConfig::default()
            },
            ..Self::default()
        }
    }

    /// Check that the catalog API can be reached with this config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        if self.api.bearer_token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(())
    }

    /// Apply a `key=value` assignment from the command line
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |e: std::num::ParseIntError| ConfigError::Invalid(format!("{}: {}", key, e));

        match key {
            "base_url" => self.api.base_url = value.to_string(),
            "bearer_token" => self.api.bearer_token = value.to_string(),
            "timeout_secs" => self.api.timeout_secs = value.parse().map_err(invalid)?,
            "debounce_ms" => self.search.debounce_ms = value.parse().map_err(invalid)?,
            "poster_width" => self.images.poster_width = value.parse().map_err(invalid)?,
            "backdrop_width" => self.images.backdrop_width = value.parse().map_err(invalid)?,
            _ => return Err(ConfigError::Invalid(format!("unknown key '{}'", key))),
        }
        Ok(())
    }
}

/// Keys accepted by [`Config::set`]
pub const SETTABLE_KEYS: &[(&str, &str)] = &[
    ("base_url", "Catalog API base URL"),
    ("bearer_token", "API read access token"),
    ("timeout_secs", "HTTP request timeout in seconds"),
    ("debounce_ms", "Quiet period before a query is evaluated"),
    ("poster_width", "Desired poster width in pixels"),
    ("backdrop_width", "Desired backdrop width in pixels"),
];

/// Catalog API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Read access token sent as `Authorization: Bearer ...`
    #[serde(default)]
    pub bearer_token: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            bearer_token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl SearchConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    DEFAULT_QUIET_PERIOD.as_millis() as u64
}

/// Desired on-screen image widths, resolved against the server size tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    #[serde(default = "default_poster_width")]
    pub poster_width: u32,

    #[serde(default = "default_backdrop_width")]
    pub backdrop_width: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            poster_width: default_poster_width(),
            backdrop_width: default_backdrop_width(),
        }
    }
}

fn default_poster_width() -> u32 {
    185
}

fn default_backdrop_width() -> u32 {
    780
}
