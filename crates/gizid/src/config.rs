//! TOML configuration for gizid
//!
//! Every value has a default, so the daemon also runs with no file at all.
//! Environment variables override the file:
//! `PORT`, `DATABASE_URL`, `JWT_SECRET`, `PREDICTOR_URL`.

use std::time::Duration;

use anyhow::Context;
use gizi_core::DEFAULT_JWT_SECRET;
use gizi_predict::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_PREDICTOR_URL, DEFAULT_TIMEOUT};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 shared secret; falls back to an insecure default when unset
    pub jwt_secret: Option<String>,
    /// Only let callers delete their own analyses
    pub enforce_ownership: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_PREDICTOR_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT.as_secs(),
        }
    }
}

impl PredictorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Top-level daemon configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub predictor: PredictorConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file '{}'", path))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every request fail
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.predictor.timeout_secs == 0 {
            anyhow::bail!("predictor.timeout_secs must be greater than 0");
        }
        if self.predictor.connect_timeout_secs == 0 {
            anyhow::bail!("predictor.connect_timeout_secs must be greater than 0");
        }
        Ok(())
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(url) = lookup("PREDICTOR_URL") {
            self.predictor.url = url;
        }
        self.validate()
    }

    /// Signing secret, warning loudly when the insecure fallback is used
    pub fn jwt_secret(&self) -> &str {
        match self.auth.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!(
                    "JWT_SECRET not set, using the built-in default secret. \
                     Do not run like this in production."
                );
                DEFAULT_JWT_SECRET
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.predictor.url, DEFAULT_PREDICTOR_URL);
        assert_eq!(config.predictor.timeout(), DEFAULT_TIMEOUT);
        assert!(config.database.url.is_none());
        assert!(!config.auth.enforce_ownership);
        assert_eq!(config.jwt_secret(), DEFAULT_JWT_SECRET);
    }

    #[test]
    fn test_parse_file() {
        let config = Config::parse(
            r#"
            [server]
            port = 8080

            [database]
            url = "postgres://localhost/gizi"

            [auth]
            jwt_secret = "s3cret"
            enforce_ownership = true

            [predictor]
            url = "http://localhost:5000"
            timeout_secs = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/gizi"));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.jwt_secret(), "s3cret");
        assert!(config.auth.enforce_ownership);
        assert_eq!(config.predictor.timeout(), Duration::from_secs(3));
        assert_eq!(config.predictor.connect_timeout(), DEFAULT_CONNECT_TIMEOUT);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PORT", "9000"),
            ("JWT_SECRET", "from-env"),
            ("PREDICTOR_URL", "http://predictor:8000"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.jwt_secret(), "from-env");
        assert_eq!(config.predictor.url, "http://predictor:8000");
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_bad_port_rejected() {
        let mut config = Config::default();
        assert!(config
            .apply_env(|key| (key == "PORT").then(|| "eighty".to_string()))
            .is_err());
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        assert!(Config::parse("[predictor]\ntimeout_secs = 0").is_err());
        assert!(Config::parse("[predictor]\nconnect_timeout_secs = 0").is_err());

        let mut config = Config::default();
        config.predictor.timeout_secs = 0;
        assert!(config.apply_env(|_| None).is_err());
    }
}
