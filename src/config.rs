// Runtime configuration loaded from the environment (after .env)

use chrono::Duration;
use std::net::SocketAddr;
use thiserror::Error;

use crate::auth::password::DEFAULT_COST;

const DEV_JWT_SECRET: &str = "dev-secret-key";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` runs the server on in-memory adapters
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub session_ttl: Duration,
    pub bcrypt_cost: u32,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Reads configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, applying defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if database_url.is_none() {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
        }

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set, using development secret");
            DEV_JWT_SECRET.to_string()
        });

        let session_ttl_hours: i64 = parse(&lookup, "SESSION_TTL_HOURS", 8)?;
        if session_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_HOURS",
                value: session_ttl_hours.to_string(),
            });
        }

        let bcrypt_cost: u32 = parse(&lookup, "BCRYPT_COST", DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(Self {
            database_url,
            database_max_connections: parse(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret,
            session_ttl: Duration::hours(session_ttl_hours),
            bcrypt_cost,
            bind_addr: parse(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
        })
    }
}

fn parse<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
