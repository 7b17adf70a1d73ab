//! Configuration management for the console core
//!
//! Configuration is loaded from, in order of precedence (highest first):
//! 1. Command-line arguments (applied by the binary)
//! 2. Environment variables prefixed with `MONGO_CONSOLE_`
//! 3. Configuration file (TOML)
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Database client configuration
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Result shaping configuration
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Localizable user-facing messages
    #[serde(default)]
    pub messages: MessagesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection-related configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionConfig {
    /// MongoDB connection URI
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Connect / server selection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Upper bound for any single database call, in milliseconds
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,

    /// Maximum pool size
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,

    /// Minimum pool size
    #[serde(default = "default_min_pool_size")]
    pub min_pool_size: u32,
}

/// Pagination, projection and sort display settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsoleConfig {
    /// Page title placed in every response
    #[serde(default = "default_title")]
    pub title: String,

    /// Documents per result page
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Number of page links shown on each side of the current page
    #[serde(default = "default_page_window")]
    pub page_window: u64,

    /// Number of sort slots reflected back to the UI
    #[serde(default = "default_sort_slots")]
    pub sort_slots: usize,
}

/// User-facing message catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessagesConfig {
    #[serde(default = "default_no_records_found")]
    pub no_records_found: String,

    /// Result count message; `%d` is replaced with the count
    #[serde(default = "default_results")]
    pub results: String,

    #[serde(default = "default_rows_affected")]
    pub rows_affected: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_operation_timeout_ms() -> u64 {
    30_000
}

fn default_max_pool_size() -> u32 {
    10
}

fn default_min_pool_size() -> u32 {
    0
}

fn default_title() -> String {
    "EucaMongo".to_string()
}

fn default_page_size() -> u64 {
    10
}

fn default_page_window() -> u64 {
    6
}

fn default_sort_slots() -> usize {
    4
}

fn default_no_records_found() -> String {
    "No records found".to_string()
}

fn default_results() -> String {
    "%d results".to_string()
}

fn default_rows_affected() -> String {
    "Rows affected".to_string()
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            connect_timeout: default_connect_timeout(),
            operation_timeout_ms: default_operation_timeout_ms(),
            max_pool_size: default_max_pool_size(),
            min_pool_size: default_min_pool_size(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            page_size: default_page_size(),
            page_window: default_page_window(),
            sort_slots: default_sort_slots(),
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            no_records_found: default_no_records_found(),
            results: default_results(),
            rows_affected: default_rows_affected(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                ConfigError::FileNotFound(path.display().to_string())
            }
            _ => ConfigError::InvalidFormat(format!("{}: {}", path.display(), e)),
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default file (if present) and environment
    ///
    /// A missing default file is not an error; an explicitly given path is.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MONGO_CONSOLE_*` overrides using the given variable lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup("MONGO_CONSOLE_URI") {
            self.connection.uri = uri;
        }
        if let Some(value) = lookup("MONGO_CONSOLE_OPERATION_TIMEOUT_MS") {
            self.connection.operation_timeout_ms =
                parse_env_number("MONGO_CONSOLE_OPERATION_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("MONGO_CONSOLE_PAGE_SIZE") {
            self.console.page_size = parse_env_number("MONGO_CONSOLE_PAGE_SIZE", &value)?;
        }
        if let Some(value) = lookup("MONGO_CONSOLE_LOG_LEVEL") {
            self.logging.level = LogLevel::parse(&value).ok_or_else(|| {
                ConfigError::InvalidValue {
                    field: "MONGO_CONSOLE_LOG_LEVEL".to_string(),
                    value: value.clone(),
                }
            })?;
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mongo-console")
            .join("config.toml")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.connection.uri.starts_with("mongodb://")
            && !self.connection.uri.starts_with("mongodb+srv://")
        {
            return Err(ConfigError::InvalidValue {
                field: "connection.uri".to_string(),
                value: self.connection.uri.clone(),
            }
            .into());
        }
        if self.console.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "console.page_size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if self.connection.operation_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "connection.operation_timeout_ms".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Get connect timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connection.connect_timeout)
    }

    /// Get per-operation timeout as Duration
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.connection.operation_timeout_ms)
    }
}

impl MessagesConfig {
    /// Render the result count message
    pub fn results(&self, count: u64) -> String {
        self.results.replace("%d", &count.to_string())
    }

    /// Render the modified-count message of an update
    pub fn rows_affected(&self, count: u64) -> String {
        format!("{}: {}", self.rows_affected, count)
    }
}

impl LogLevel {
    /// Parse a level name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn parse_env_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| {
        ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
        .into()
    })
}
