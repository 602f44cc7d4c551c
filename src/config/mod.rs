use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use url::Url;

use crate::auth::MAX_TOKEN_TTL_MINUTES;

/// Errors raised while loading configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string. `None` selects the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

/// Where the auth middleware looks for a token first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenSource {
    Header,
    Cookie,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,
    pub cors_origins: Vec<String>,
    pub token_source: TokenSource,
    pub cookie_name: String,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let selector = lookup("APP_ENV").or_else(|| lookup("NODE_ENV"));
        let environment = match selector.as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Secret has no preset: refuse to start without one
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "JWT_SECRET",
                value: "<blank>".to_string(),
            });
        }

        let mut config = match environment {
            Environment::Production => Self::production(jwt_secret),
            Environment::Staging => Self::staging(jwt_secret),
            Environment::Development => Self::development(jwt_secret),
        };
        config.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PORT") {
            self.server.port = parse_value("PORT", &v)?;
        }

        if let Some(v) = lookup("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v.trim().to_string());
            }
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_value("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse_value("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }

        if let Some(v) = lookup("JWT_EXPIRY_MINUTES") {
            let minutes: i64 = parse_value("JWT_EXPIRY_MINUTES", &v)?;
            if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes) {
                return Err(ConfigError::InvalidValue { name: "JWT_EXPIRY_MINUTES", value: v });
            }
            self.security.jwt_expiry_minutes = minutes;
        }
        if let Some(v) = lookup("FRONTEND_URL") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = lookup("AUTH_TOKEN_SOURCE") {
            self.security.token_source = match v.trim().to_ascii_lowercase().as_str() {
                "header" | "bearer" => TokenSource::Header,
                "cookie" => TokenSource::Cookie,
                _ => return Err(ConfigError::InvalidValue { name: "AUTH_TOKEN_SOURCE", value: v }),
            };
        }
        if let Some(v) = lookup("AUTH_COOKIE_NAME") {
            if !v.trim().is_empty() {
                self.security.cookie_name = v.trim().to_string();
            }
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match &self.database.url {
            Some(raw) => {
                Url::parse(raw).map_err(|_| ConfigError::InvalidDatabaseUrl)?;
            }
            None if self.environment == Environment::Production => {
                return Err(ConfigError::Missing("DATABASE_URL"));
            }
            None => {}
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    fn development(jwt_secret: String) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 8000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_minutes: 15,
                cors_origins: vec!["http://localhost:3000".to_string()],
                token_source: TokenSource::Header,
                cookie_name: "token".to_string(),
            },
        }
    }

    fn staging(jwt_secret: String) -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            ..Self::development(jwt_secret)
        }
    }

    fn production(jwt_secret: String) -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            ..Self::development(jwt_secret)
        }
    }
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}
