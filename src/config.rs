//! Runtime configuration read from the environment (and `.env` via dotenvy)

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub database_max_connections: u32,
    /// Currency code attached to every amount in responses
    pub default_currency: String,
    pub pricing_cache_ttl: Duration,
    pub cache_warm_interval: Duration,
}

impl Config {
    /// Config with defaults for everything but the database URL
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            port: 8080,
            database_max_connections: 5,
            default_currency: "INR".to_string(),
            pricing_cache_ttl: Duration::from_secs(5 * 60),
            cache_warm_interval: Duration::from_secs(10 * 60),
        }
    }

    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let defaults = Self::new(database_url);

        Ok(Self {
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                .unwrap_or(defaults.database_max_connections),
            default_currency: env::var("DEFAULT_CURRENCY")
                .unwrap_or_else(|_| defaults.default_currency.clone()),
            pricing_cache_ttl: parse_var("PRICING_CACHE_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.pricing_cache_ttl),
            cache_warm_interval: parse_var("CACHE_WARM_INTERVAL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_warm_interval),
            ..defaults
        })
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a number (got '{}')", name, raw)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("postgres://localhost/sportshub");
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_currency, "INR");
        assert_eq!(config.pricing_cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        // Unique name so parallel tests never race on it
        env::set_var("SPORTSHUB_TEST_BAD_PORT", "eighty");
        assert!(parse_var::<u16>("SPORTSHUB_TEST_BAD_PORT").is_err());
        env::set_var("SPORTSHUB_TEST_GOOD_PORT", " 9000 ");
        assert_eq!(parse_var::<u16>("SPORTSHUB_TEST_GOOD_PORT").unwrap(), Some(9000));
        assert_eq!(parse_var::<u16>("SPORTSHUB_TEST_UNSET").unwrap(), None);
    }
}
