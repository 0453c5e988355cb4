use std::env;
use std::path::{Path, PathBuf};

use crate::domain::entities::ProcessorConfig;
use crate::error::ConfigError;

/// Deployment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// YAML processor settings; a missing file means defaults
    pub processor_config_path: Option<PathBuf>,
    /// Log file written alongside stdout; `None` disables file logging
    pub log_file: Option<PathBuf>,
    /// Upper bound on a request body, in bytes
    pub max_upload_bytes: usize,
    /// Seconds to replenish one `/process` request per client; 0 disables rate limiting
    pub rate_limit_replenish_secs: u64,
    pub rate_limit_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            environment: Environment::Production,
            processor_config_path: Some(PathBuf::from("processor.yaml")),
            log_file: Some(PathBuf::from("image_processor.log")),
            max_upload_bytes: 64 * 1024 * 1024,
            rate_limit_replenish_secs: 2,
            rate_limit_burst: 5,
        }
    }
}

/// Treat an empty variable as unset
fn non_empty_path(value: String) -> Option<PathBuf> {
    if value.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from a variable lookup. Values that do not parse
    /// keep their defaults.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            environment: var("APP_ENV")
                .and_then(|e| e.parse().ok())
                .unwrap_or(defaults.environment),
            processor_config_path: match var("PROCESSOR_CONFIG") {
                Some(path) => non_empty_path(path),
                None => defaults.processor_config_path,
            },
            log_file: match var("LOG_FILE") {
                Some(path) => non_empty_path(path),
                None => defaults.log_file,
            },
            max_upload_bytes: var("MAX_UPLOAD_MB")
                .and_then(|mb| mb.parse::<usize>().ok()?.checked_mul(1024 * 1024))
                .unwrap_or(defaults.max_upload_bytes),
            rate_limit_replenish_secs: var("RATE_LIMIT_REPLENISH_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.rate_limit_replenish_secs),
            rate_limit_burst: var("RATE_LIMIT_BURST")
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.rate_limit_burst),
        }
    }

    /// Check if `/process` is rate limited
    pub fn rate_limit_enabled(&self) -> bool {
        self.rate_limit_replenish_secs > 0 && self.rate_limit_burst > 0
    }
}

/// Load processor settings, falling back to defaults when there is no file
pub fn load_processor_config(path: Option<&Path>) -> Result<ProcessorConfig, ConfigError> {
    let Some(path) = path.filter(|p| p.exists()) else {
        tracing::info!("No processor config file found, using defaults");
        return Ok(ProcessorConfig::default());
    };

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_processor_config(&contents)?;
    tracing::info!("Loaded processor config from {}", path.display());
    Ok(config)
}

/// Parse YAML processor settings over the defaults.
///
/// Each top-level key in the document replaces the whole default section;
/// fields missing from a replaced section take their defaults.
pub fn parse_processor_config(yaml: &str) -> Result<ProcessorConfig, ConfigError> {
    let overrides: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    let overrides = match overrides {
        serde_yaml::Value::Null => return Ok(ProcessorConfig::default()),
        serde_yaml::Value::Mapping(map) => map,
        _ => {
            return Err(ConfigError::Invalid(
                "top level must be a mapping".to_string(),
            ))
        }
    };

    let mut merged = match serde_yaml::to_value(ProcessorConfig::default())? {
        serde_yaml::Value::Mapping(map) => map,
        _ => return Err(ConfigError::Invalid("defaults are not a mapping".to_string())),
    };
    for (key, value) in overrides {
        merged.insert(key, value);
    }

    let config: ProcessorConfig = serde_yaml::from_value(serde_yaml::Value::Mapping(merged))?;
    config.validate().map_err(ConfigError::Invalid)?;
    Ok(config)
}
