//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::realtime::RealtimeConfig;
use crate::session::SessionClientConfig;
use crate::viewer::ViewerConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub driver: DriverConfig,

    #[serde(default)]
    pub viewer: ViewerSettings,

    #[serde(default)]
    pub realtime: RealtimeSettings,

    #[serde(default)]
    pub devserver: DevServerSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend the client talks to
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Script driver settings
#[derive(Debug, Clone, Deserialize)]
pub struct DriverConfig {
    #[serde(default = "default_delay")]
    pub delay_ms: u64,
}

fn default_delay() -> u64 {
    1000
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay(),
        }
    }
}

/// Viewer settings
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerSettings {
    #[serde(default = "default_placeholder")]
    pub placeholder_image: String,

    #[serde(default = "default_swap_delay")]
    pub image_swap_delay_ms: u64,
}

fn default_placeholder() -> String {
    "/static/img/animate.svg".to_string()
}

fn default_swap_delay() -> u64 {
    1250
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            placeholder_image: default_placeholder(),
            image_swap_delay_ms: default_swap_delay(),
        }
    }
}

/// Real-time channel settings
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeSettings {
    #[serde(default = "default_ws_path")]
    pub ws_path: String,

    #[serde(default = "default_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
}

fn default_ws_path() -> String {
    "/ws".to_string()
}

fn default_reconnect_attempts() -> u32 {
    5
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        Self {
            ws_path: default_ws_path(),
            max_reconnect_attempts: default_reconnect_attempts(),
        }
    }
}

/// Local development backend settings
#[derive(Debug, Clone, Deserialize)]
pub struct DevServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub cards_path: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for DevServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cards_path: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("draftview").join("config.toml")),
            Some(PathBuf::from("./draftview.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("DRAFTVIEW_BASE_URL") {
            self.server.base_url = url;
        }
        if let Some(delay) = var("DRAFTVIEW_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.driver.delay_ms = delay;
        }
        if let Some(host) = var("DRAFTVIEW_DEVSERVER_HOST") {
            self.devserver.host = host;
        }
        if let Some(port) = var("DRAFTVIEW_DEVSERVER_PORT").and_then(|v| v.parse().ok()) {
            self.devserver.port = port;
        }
        if let Some(path) = var("DRAFTVIEW_CARDS_PATH") {
            self.devserver.cards_path = Some(path);
        }
        if let Some(level) = var("DRAFTVIEW_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("DRAFTVIEW_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    pub fn session_client(&self) -> SessionClientConfig {
        SessionClientConfig {
            base_url: self.server.base_url.clone(),
            request_timeout_ms: self.server.request_timeout_ms,
        }
    }

    pub fn realtime(&self) -> RealtimeConfig {
        RealtimeConfig {
            max_reconnect_attempts: self.realtime.max_reconnect_attempts,
            ..RealtimeConfig::from_base_url(&self.server.base_url, &self.realtime.ws_path)
        }
    }

    pub fn viewer(&self) -> ViewerConfig {
        ViewerConfig {
            placeholder_image: self.viewer.placeholder_image.clone(),
            image_swap_delay: Duration::from_millis(self.viewer.image_swap_delay_ms),
            ..Default::default()
        }
    }

    pub fn driver_delay(&self) -> Duration {
        Duration::from_millis(self.driver.delay_ms)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Draftview Configuration
#
# Environment variables override these settings:
# - DRAFTVIEW_BASE_URL
# - DRAFTVIEW_DELAY_MS
# - DRAFTVIEW_DEVSERVER_HOST
# - DRAFTVIEW_DEVSERVER_PORT
# - DRAFTVIEW_CARDS_PATH
# - DRAFTVIEW_LOG_LEVEL
# - DRAFTVIEW_LOG_FORMAT

[server]
# Session API base URL
base_url = "http://localhost:5000"

# Request timeout (ms)
request_timeout_ms = 10000

[driver]
# Interval between script actions (ms)
delay_ms = 1000

[viewer]
# Image shown while a new card or hero image loads
placeholder_image = "/static/img/animate.svg"

# How long the placeholder is shown (ms)
image_swap_delay_ms = 1250

[realtime]
# WebSocket path on the backend
ws_path = "/ws"

# Reconnect attempts before giving up
max_reconnect_attempts = 5

[devserver]
host = "127.0.0.1"
port = 5000

# Card database: JSON array of {id, cost, name}
# cards_path = "cards.collectible.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
