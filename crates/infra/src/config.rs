//! Configuration loading and representation.
//!
//! Everything comes from environment variables with development defaults.
//! Values are parsed and validated once at startup; the result is immutable.

use std::path::PathBuf;

use thiserror::Error;

use eventreg_auth::TokenConfig;

/// Development-only signing secret used when `JWT_SECRET_KEY` is unset.
pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
}

/// Full process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub token: TokenConfig,
    pub logging: LoggingConfig,
    /// True when no secret was supplied and `DEV_JWT_SECRET` is in use.
    pub insecure_default_secret: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let server = ServerConfig {
            host: get("SERVER_HOST", "127.0.0.1"),
            port: parse(&lookup, "SERVER_PORT", 8081)?,
        };

        let database = DatabaseConfig {
            path: PathBuf::from(get("DB_PATH", "./api.db")),
            max_connections: positive(&lookup, "DB_MAX_OPEN_CONNS", 10)?,
        };

        let secret = lookup("JWT_SECRET_KEY").filter(|s| !s.is_empty());
        let insecure_default_secret = secret.is_none();
        let expiry_hours = positive(&lookup, "JWT_TOKEN_EXPIRY_HRS", 2)?;
        let token = TokenConfig::new(secret.unwrap_or_else(|| DEV_JWT_SECRET.to_string()), expiry_hours)
            .map_err(|e| ConfigError::Invalid {
                key: "JWT_SECRET_KEY",
                value: "<redacted>".to_string(),
                reason: e.to_string(),
            })?;

        let logging = LoggingConfig {
            level: get("LOG_LEVEL", "info"),
        };

        Ok(Self {
            server,
            database,
            token,
            logging,
            insecure_default_secret,
        })
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn positive<F>(lookup: &F, key: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse(lookup, key, default)?;
    if value == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: "0".to_string(),
            reason: "must be a positive integer".to_string(),
        });
    }
    Ok(value)
}
