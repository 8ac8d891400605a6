//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::api::client::DEFAULT_TIMEOUT_SECS;
use crate::api::languages::Language;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API access token
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API endpoint override
    #[serde(default)]
    pub api_url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Preferred language for product names
    #[serde(default)]
    pub language: Language,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            timeout_secs: default_timeout_secs(),
            api_url: None,
            proxy: None,
            language: Language::English,
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        ensure!(
            config.timeout_secs > 0,
            "Invalid config file {}: timeout_secs must be at least 1",
            path.display()
        );

        Ok(config)
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("ean-search.toml");
        if local_config.exists() {
            debug!("Found ean-search.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("ean-search").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides. Unparsable values are ignored.
    pub fn with_env(mut self) -> Self {
        if let Ok(token) = std::env::var("EAN_SEARCH_TOKEN") {
            if !token.is_empty() {
                self.token = Some(token);
            }
        }

        if let Ok(timeout) = std::env::var("EAN_SEARCH_TIMEOUT") {
            match timeout.parse::<u64>() {
                Ok(t) if t > 0 => self.timeout_secs = t,
                _ => debug!("Ignoring invalid EAN_SEARCH_TIMEOUT: {}", timeout),
            }
        }

        if let Ok(proxy) = std::env::var("EAN_SEARCH_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(language) = std::env::var("EAN_SEARCH_LANGUAGE") {
            if let Ok(l) = language.parse() {
                self.language = l;
            }
        }

        self
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
