//! Configuration for crudlist
//!
//! Stored in `$XDG_CONFIG_HOME/crudlist/config.toml` unless a path is given
//! explicitly or through `CRUDLIST_CONFIG`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "CRUDLIST_CONFIG";
pub const API_PORT_ENV: &str = "CRUDLIST_API_PORT";

/// crudlist configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed file loaded at startup (JSON array, keyed object, or JSONL)
    pub seed: Option<PathBuf>,

    /// Start from the demo records when no seed file is set
    pub demo_seed: bool,

    /// CLI log filter when RUST_LOG is unset
    pub log_level: String,

    /// HTTP API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            demo_seed: true,
            log_level: "warn".to_string(),
            api: ApiConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Address to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Log filter for the server when RUST_LOG is unset
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3848,
            log_level: "info".to_string(),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use colors in output
    pub colors: bool,

    /// Show record count in list header
    pub show_count: bool,

    /// Maximum title length before truncation
    pub max_title_length: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            colors: true,
            show_count: true,
            max_title_length: 60,
        }
    }
}

impl Config {
    /// Load config from a TOML file, falling back to defaults if it is missing
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("failed to serialize config: {}", e)))
    }

    /// Save config to a TOML file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Where to read the config from: explicit path, env var, then user config dir
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("crudlist")
            .join("config.toml")
    }

    /// Resolve and load in one step
    pub fn discover(explicit: Option<&Path>) -> crate::Result<(PathBuf, Self)> {
        let path = Self::resolve_path(explicit);
        let config = Self::load(&path)?;
        Ok((path, config))
    }

    /// API port, with `CRUDLIST_API_PORT` taking precedence
    pub fn api_port(&self) -> u16 {
        std::env::var(API_PORT_ENV)
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(self.api.port)
    }

    /// Records the store starts with: seed file, demo list, or nothing
    pub fn initial_records(&self) -> crate::Result<crate::Collection> {
        match &self.seed {
            Some(path) => crate::seed::load(path),
            None if self.demo_seed => Ok(crate::Collection::demo()),
            None => Ok(crate::Collection::new()),
        }
    }

    /// Generate a default config file with comments
    pub fn default_with_comments() -> String {
        r#"# crudlist configuration

# Seed file loaded at startup (JSON array, keyed JSON object, or JSONL)
# seed = "records.jsonl"

# Start from the demo records when no seed file is set
demo_seed = true

# CLI log filter when RUST_LOG is unset
log_level = "warn"

[api]
# Address and port for crudlist-api (CRUDLIST_API_PORT overrides the port)
host = "127.0.0.1"
port = 3848

# Server log filter when RUST_LOG is unset
log_level = "info"

[display]
# Use colors in output
colors = true

# Show record count in list header
show_count = true

# Maximum title length before truncation
max_title_length = 60
"#
        .to_string()
    }
}
