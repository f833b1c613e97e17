//! Environment-backed configuration.
//!
//! Everything has a default; override with `DEALFLOW_*` variables or
//! `DATABASE_URL`. A `.env` file is honoured by the binaries via `dotenvy`.

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Which text embedder backs similarity scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmbedderKind {
    /// Feature hashing, no model files.
    #[default]
    Hashing,
    /// all-MiniLM-L6-v2 through fastembed.
    MiniLm,
}

impl FromStr for EmbedderKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "hashing" | "hash" => Ok(Self::Hashing),
            "minilm" | "all-minilm-l6-v2" => Ok(Self::MiniLm),
            _ => Err(()),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// HTTP port. Default: `3000`.
    pub port: u16,

    /// sea-orm connection URL. Default: a local SQLite file.
    pub database_url: String,

    /// Matches returned by analyze-thesis when the request does not say. Default: `10`.
    pub default_top_n: usize,

    /// Per-IP request quota for the API routes; `None` disables rate limiting.
    pub rate_limit_per_minute: Option<u32>,

    /// Burst allowance for the rate limiter. Default: `10`.
    pub rate_limit_burst: u32,

    /// Seed the catalog at startup when the companies table is empty. Default: `true`.
    pub seed_on_start: bool,

    /// Catalog size used by startup seeding. Default: `500`.
    pub seed_companies: usize,

    /// Text embedder. Default: `hashing`.
    pub embedder: EmbedderKind,

    /// Where downloaded embedding models are kept; `None` uses fastembed's default.
    pub model_cache_dir: Option<PathBuf>,
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./dealflow.sqlite?mode=rwc";

/// Upper bound for `top_n`, both from config and per request.
pub const MAX_TOP_N: usize = 50;

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            port: 3000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            default_top_n: 10,
            rate_limit_per_minute: Some(60),
            rate_limit_burst: 10,
            seed_on_start: true,
            seed_companies: 500,
            embedder: EmbedderKind::Hashing,
            model_cache_dir: None,
        }
    }
}

impl Config {
    const ENV_BIND_ADDR: &'static str = "DEALFLOW_BIND_ADDR";
    const ENV_PORT: &'static str = "DEALFLOW_PORT";
    const ENV_DATABASE_URL: &'static str = "DATABASE_URL";
    const ENV_TOP_N: &'static str = "DEALFLOW_TOP_N";
    const ENV_RATE_LIMIT: &'static str = "DEALFLOW_RATE_LIMIT_PER_MINUTE";
    const ENV_RATE_BURST: &'static str = "DEALFLOW_RATE_LIMIT_BURST";
    const ENV_SEED_ON_START: &'static str = "DEALFLOW_SEED_ON_START";
    const ENV_SEED_COMPANIES: &'static str = "DEALFLOW_SEED_COMPANIES";
    const ENV_EMBEDDER: &'static str = "DEALFLOW_EMBEDDER";
    const ENV_MODEL_CACHE_DIR: &'static str = "DEALFLOW_MODEL_CACHE_DIR";

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = match get(Self::ENV_BIND_ADDR) {
            Some(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e })?,
            None => defaults.bind_addr,
        };

        let port = match get(Self::ENV_PORT) {
            Some(value) => match value.parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort { value }),
            },
            None => defaults.port,
        };

        let database_url = get(Self::ENV_DATABASE_URL).unwrap_or(defaults.database_url);

        let default_top_n = match get(Self::ENV_TOP_N) {
            Some(value) => match value.parse::<usize>() {
                Ok(n) if (1..=MAX_TOP_N).contains(&n) => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: Self::ENV_TOP_N,
                        value,
                        reason: "expected an integer between 1 and 50",
                    })
                }
            },
            None => defaults.default_top_n,
        };

        // 0 turns the limiter off
        let rate_limit_per_minute = match get(Self::ENV_RATE_LIMIT) {
            Some(value) => match value.parse::<u32>() {
                Ok(0) => None,
                Ok(n) => Some(n),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        var: Self::ENV_RATE_LIMIT,
                        value,
                        reason: "expected a non-negative integer",
                    })
                }
            },
            None => defaults.rate_limit_per_minute,
        };

        let rate_limit_burst = match get(Self::ENV_RATE_BURST) {
            Some(value) => match value.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: Self::ENV_RATE_BURST,
                        value,
                        reason: "expected a positive integer",
                    })
                }
            },
            None => defaults.rate_limit_burst,
        };

        let seed_on_start = match get(Self::ENV_SEED_ON_START) {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue {
                var: Self::ENV_SEED_ON_START,
                value,
                reason: "expected true/false",
            })?,
            None => defaults.seed_on_start,
        };

        let seed_companies = get(Self::ENV_SEED_COMPANIES)
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.seed_companies);

        let embedder = match get(Self::ENV_EMBEDDER) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                var: Self::ENV_EMBEDDER,
                value,
                reason: "expected hashing or minilm",
            })?,
            None => defaults.embedder,
        };

        let model_cache_dir = get(Self::ENV_MODEL_CACHE_DIR).map(PathBuf::from);

        Ok(Self {
            bind_addr,
            port,
            database_url,
            default_top_n,
            rate_limit_per_minute,
            rate_limit_burst,
            seed_on_start,
            seed_companies,
            embedder,
            model_cache_dir,
        })
    }

    /// Returns `"{bind_addr}:{port}"`.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.default_top_n, 10);
        assert_eq!(config.rate_limit_per_minute, Some(60));
        assert!(config.seed_on_start);
        assert_eq!(config.embedder, EmbedderKind::Hashing);
        assert_eq!(config.model_cache_dir, None);
        assert_eq!(config.socket_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DEALFLOW_PORT", "8081"),
            ("DEALFLOW_BIND_ADDR", "0.0.0.0"),
            ("DATABASE_URL", "postgres://localhost/dealflow"),
            ("DEALFLOW_TOP_N", "25"),
            ("DEALFLOW_RATE_LIMIT_PER_MINUTE", "0"),
            ("DEALFLOW_SEED_ON_START", "no"),
            ("DEALFLOW_EMBEDDER", "MiniLM"),
            ("DEALFLOW_MODEL_CACHE_DIR", "/var/cache/dealflow"),
        ])
        .unwrap();
        assert_eq!(config.embedder, EmbedderKind::MiniLm);
        assert_eq!(config.model_cache_dir, Some(PathBuf::from("/var/cache/dealflow")));
        assert_eq!(config.socket_addr(), "0.0.0.0:8081");
        assert_eq!(config.database_url, "postgres://localhost/dealflow");
        assert_eq!(config.default_top_n, 25);
        assert_eq!(config.rate_limit_per_minute, None);
        assert!(!config.seed_on_start);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            config_from(&[("DEALFLOW_PORT", "0")]),
            Err(ConfigError::InvalidPort { .. })
        ));
        assert!(matches!(
            config_from(&[("DEALFLOW_BIND_ADDR", "not-an-ip")]),
            Err(ConfigError::InvalidBindAddr { .. })
        ));
        assert!(matches!(
            config_from(&[("DEALFLOW_EMBEDDER", "word2vec")]),
            Err(ConfigError::InvalidValue { var: "DEALFLOW_EMBEDDER", .. })
        ));
        assert!(matches!(
            config_from(&[("DEALFLOW_TOP_N", "500")]),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
