//! Application settings loaded from environment variables.

use std::env;

use thiserror::Error;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEV_JWT_SECRET, MIN_JWT_SECRET_LENGTH,
};

/// Configuration errors raised at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET environment variable must be set in production")]
    MissingJwtSecret,

    #[error("JWT_SECRET must be at least {0} characters long")]
    JwtSecretTooShort(usize),

    #[error("JWT_EXPIRATION_HOURS must be a positive number of hours")]
    InvalidExpiration,
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub cors_origin: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("cors_origin", &self.cors_origin)
            .finish()
    }
}

impl Config {
    /// Build a configuration with defaults for everything but the store and signing key.
    ///
    /// # Errors
    /// Returns [`ConfigError::JwtSecretTooShort`] if the secret is too short to sign with.
    pub fn new(
        database_url: impl Into<String>,
        jwt_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::JwtSecretTooShort(MIN_JWT_SECRET_LENGTH));
        }

        Ok(Self {
            database_url: database_url.into(),
            jwt_secret,
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            cors_origin: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Release builds refuse to start without `JWT_SECRET`; debug builds fall
    /// back to an insecure development key and log a warning.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => return Err(ConfigError::MissingJwtSecret),
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let mut config = Self::new(database_url, jwt_secret)?;

        if let Ok(hours) = env::var("JWT_EXPIRATION_HOURS") {
            config.jwt_expiration_hours = hours
                .parse()
                .ok()
                .filter(|h: &i64| *h > 0)
                .ok_or(ConfigError::InvalidExpiration)?;
        }
        if let Ok(host) = env::var("SERVER_HOST") {
            config.server_host = host;
        }
        if let Some(port) = env::var("SERVER_PORT").ok().and_then(|v| v.parse().ok()) {
            config.server_port = port;
        }
        config.cors_origin = env::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty());

        Ok(config)
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_rejected() {
        let result = Config::new("sqlite::memory:", "too-short");
        assert!(matches!(result, Err(ConfigError::JwtSecretTooShort(_))));
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::new("sqlite::memory:", DEV_JWT_SECRET).unwrap();
        assert_eq!(config.jwt_expiration_hours, DEFAULT_JWT_EXPIRATION_HOURS);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::new("postgres://user:pw@db/shop", DEV_JWT_SECRET).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains(DEV_JWT_SECRET));
        assert!(!debug.contains("pw@db"));
    }
}
