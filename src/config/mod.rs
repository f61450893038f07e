use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: set DATABASE_URL or {0}")]
    DatabaseMissing(&'static str),
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
    pub host: String,
    pub port: u16,
}

/// Backend connection parameters. A connection string wins over the
/// discrete host/user/password/port/name fields when both are present.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub ssl: bool,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
}

// Keep credentials out of startup logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<set>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("ssl", &self.ssl)
            .field("max_connections", &self.max_connections)
            .field("connection_timeout", &self.connection_timeout)
            .finish()
    }
}

impl DatabaseConfig {
    /// Check that enough parameters are present to reach a backend
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_some() {
            return Ok(());
        }
        if self.host.is_none() {
            return Err(ConfigError::DatabaseMissing("DB_HOST"));
        }
        if self.user.is_none() {
            return Err(ConfigError::DatabaseMissing("DB_USER"));
        }
        if self.name.is_none() {
            return Err(ConfigError::DatabaseMissing("DB_NAME"));
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a fixed map.
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Server overrides
        if let Some(v) = non_empty("ACCOUNTS_API_PORT").or_else(|| non_empty("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = non_empty("HOST") {
            self.server.host = v;
        }

        // Database overrides
        self.database.url = non_empty("DATABASE_URL");
        self.database.host = non_empty("DB_HOST");
        self.database.user = non_empty("DB_USER");
        self.database.password = lookup("DB_PASSWORD");
        self.database.name = non_empty("DB_NAME");
        if let Some(v) = non_empty("DB_PORT") {
            self.database.port = v.parse().unwrap_or(self.database.port);
        }
        if let Some(v) = non_empty("DB_SSL") {
            self.database.ssl = parse_flag(&v).unwrap_or(self.database.ssl);
        }
        if let Some(v) = non_empty("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = non_empty("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Some(v) = non_empty("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = parse_flag(&v).unwrap_or(self.security.enable_cors);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                ssl: false,
                max_connections: 10,
                connection_timeout: 30,
                ..DatabaseConfig::default()
            },
            security: SecurityConfig { enable_cors: true },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                ssl: false,
                max_connections: 20,
                connection_timeout: 10,
                ..DatabaseConfig::default()
            },
            security: SecurityConfig { enable_cors: true },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                ssl: true,
                max_connections: 50,
                connection_timeout: 5,
                ..DatabaseConfig::default()
            },
            security: SecurityConfig { enable_cors: true },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: None,
            port: 5432,
            user: None,
            password: None,
            name: None,
            ssl: false,
            max_connections: 10,
            connection_timeout: 30,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
