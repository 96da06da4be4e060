use std::{env, io::ErrorKind, str::FromStr};

use serde::Deserialize;
use tracing::Level;

use crate::{
    errors::{constants::*, HatsuonError, Result},
    scoring::breakdown::BreakdownMode,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub word_bank_path: Option<String>,
    #[serde(default)]
    pub breakdown: BreakdownMode,
    pub seed: Option<u64>,
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub otel_http_url: Option<String>,
}

fn default_cache_size() -> usize {
    DEFAULT_CACHE_SIZE
}

fn default_log_level() -> String {
    String::from("info")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            word_bank_path: None,
            breakdown: BreakdownMode::default(),
            seed: None,
            cache_size: default_cache_size(),
            log_level: default_log_level(),
            otel_http_url: None,
        }
    }
}

impl Config {
    /// Load config from `$HATSUON_CONFIG`, else `./config.toml`, else the
    /// environment.
    pub fn load() -> Result<Self> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                HatsuonError::config(format!("Cannot read config file {}: {}", path, e))
            })?;
            return Self::from_toml(&contents);
        }

        match std::fs::read_to_string(DEFAULT_CONFIG_PATH) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_env(),
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.tracing_level()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Config {
            word_bank_path: optional_env(WORD_BANK_ENV),
            otel_http_url: optional_env(OTEL_HTTP_URL_ENV),
            ..Default::default()
        };

        if let Some(mode) = optional_env(BREAKDOWN_ENV) {
            config.breakdown = mode.parse()?;
        }
        if let Some(seed) = optional_env(SEED_ENV) {
            config.seed = Some(parse_env(SEED_ENV, &seed)?);
        }
        if let Some(size) = optional_env(CACHE_SIZE_ENV) {
            config.cache_size = parse_env(CACHE_SIZE_ENV, &size)?;
        }
        if let Some(level) = optional_env(LOG_LEVEL_ENV) {
            config.log_level = level;
        }

        config.tracing_level()?;
        Ok(config)
    }

    pub fn tracing_level(&self) -> Result<Level> {
        Level::from_str(&self.log_level)
            .map_err(|_| HatsuonError::config(format!("Invalid log level {:?}", self.log_level)))
    }
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| HatsuonError::invalid_env_var(name, value))
}
