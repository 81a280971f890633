//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Churn service connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Bearer token for the prediction endpoint
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub routes: RoutesConfig,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            token: None,
            request_timeout_secs: default_request_timeout(),
            routes: RoutesConfig::default(),
        }
    }
}

impl BackendConfig {
    /// Full URL for a route path
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Paths of the churn service endpoints, relative to the base URL
///
/// The customer route may contain `{id}`, which is replaced by the
/// URL-encoded customer ID; otherwise the ID is sent as `?customer_id=`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutesConfig {
    #[serde(default = "default_chat_route")]
    pub chat: String,

    #[serde(default = "default_predict_route")]
    pub predict: String,

    #[serde(default = "default_customer_route")]
    pub customer: String,

    #[serde(default = "default_dashboard_route")]
    pub dashboard: String,

    #[serde(default = "default_health_route")]
    pub health: String,

    #[serde(default = "default_login_route")]
    pub login: String,

    #[serde(default = "default_register_route")]
    pub register: String,
}

fn default_chat_route() -> String {
    "/chat".to_string()
}

fn default_predict_route() -> String {
    "/predict".to_string()
}

fn default_customer_route() -> String {
    "/customer-profile".to_string()
}

fn default_dashboard_route() -> String {
    "/dashboard-data".to_string()
}

fn default_health_route() -> String {
    "/health".to_string()
}

fn default_login_route() -> String {
    "/token".to_string()
}

fn default_register_route() -> String {
    "/register".to_string()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            chat: default_chat_route(),
            predict: default_predict_route(),
            customer: default_customer_route(),
            dashboard: default_dashboard_route(),
            health: default_health_route(),
            login: default_login_route(),
            register: default_register_route(),
        }
    }
}

/// Offline dataset configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetConfig {
    /// Telco customer churn CSV; when set, stats and lookups read it instead
    /// of calling the service
    pub path: Option<PathBuf>,
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
    "warn".to_string()
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

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
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
            dirs::config_dir().map(|p| p.join("churnwise").join("config.toml")),
            Some(PathBuf::from("/etc/churnwise/config.toml")),
            Some(PathBuf::from("./churnwise.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Backend overrides
        if let Ok(url) = std::env::var("CHURNWISE_API_URL") {
            self.backend.url = url;
        }
        if let Ok(token) = std::env::var("CHURNWISE_API_TOKEN") {
            self.backend.token = Some(token).filter(|t| !t.is_empty());
        }
        if let Ok(timeout) = std::env::var("CHURNWISE_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.backend.request_timeout_secs = t;
            }
        }

        // Dataset override
        if let Ok(path) = std::env::var("CHURNWISE_DATASET") {
            self.dataset.path = Some(PathBuf::from(path));
        }

        // Logging overrides
        if let Ok(level) = std::env::var("CHURNWISE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CHURNWISE_LOG_FORMAT") {
            self.logging.format = format;
        }
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
    r#"# Churnwise Configuration
#
# Environment variables override these settings:
# - CHURNWISE_API_URL
# - CHURNWISE_API_TOKEN
# - CHURNWISE_TIMEOUT_SECS
# - CHURNWISE_DATASET
# - CHURNWISE_LOG_LEVEL
# - CHURNWISE_LOG_FORMAT

[backend]
# Churn service base URL
url = "http://127.0.0.1:8000"

# Bearer token for predictions (see `churnwise login`)
# token = ""

# Request timeout in seconds
request_timeout_secs = 30

[backend.routes]
chat = "/chat"
predict = "/predict"
# Use "/customer/{id}" for services that take the ID in the path
customer = "/customer-profile"
dashboard = "/dashboard-data"
health = "/health"
login = "/token"
register = "/register"

[dataset]
# Read stats and customer profiles from a local Telco churn CSV instead
# path = "./Telco-Customer-Churn.csv"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
