use serde::Serialize;
use std::env;
use thiserror::Error;

pub const DEFAULT_REALM_KEY: &str = "!NoT--R4nD0m__R34Lm_K3Y@";
pub const DEFAULT_SESSION_KEY: &str = "!NoT--R4nD0m__s3ßioN_K3Y@";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DSN not set.")]
    MissingDsn,

    #[error("Realm key is not set!")]
    DefaultRealmKey,

    #[error("Session key is not set!")]
    DefaultSessionKey,

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub app_name: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub collection: CollectionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseConfig {
    #[serde(skip)]
    pub url: String,
    pub driver: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecurityConfig {
    #[serde(skip)]
    pub realm_key: String,
    #[serde(skip)]
    pub session_key: String,
    pub token_timeout_secs: i64,
    pub max_refresh_secs: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionConfig {
    pub default_limit: i64,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let environment = match get("MODE").as_deref() {
            Some("production") => Environment::Production,
            _ => Environment::Development,
        };

        let url = get("DSN")
            .or_else(|| get("DATABASE_URL"))
            .ok_or(ConfigError::MissingDsn)?;

        let mut config = match environment {
            Environment::Production => Self::production(url),
            Environment::Development => Self::development(url),
        };

        if let Some(driver) = get("DB").or_else(|| get("DBDRIVER")) {
            config.database.driver = driver;
        }
        if let Some(v) = get("PORT") {
            config.port = parse("PORT", v)?;
        }
        if let Some(v) = get("APP_NAME") {
            config.app_name = v;
        }
        if let Some(v) = get("REALM") {
            config.security.realm_key = v;
        }
        if let Some(v) = get("SESSION") {
            config.security.session_key = v;
        }
        if let Some(v) = get("DATABASE_MAX_CONNECTIONS") {
            config.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", v)?;
        }
        if let Some(v) = get("DATABASE_CONNECTION_TIMEOUT") {
            config.database.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", v)?;
        }
        if let Some(v) = get("COLLECTION_DEFAULT_LIMIT") {
            config.collection.default_limit = parse("COLLECTION_DEFAULT_LIMIT", v)?;
        }

        if config.is_production() {
            if config.security.realm_key == DEFAULT_REALM_KEY {
                return Err(ConfigError::DefaultRealmKey);
            }
            if config.security.session_key == DEFAULT_SESSION_KEY {
                return Err(ConfigError::DefaultSessionKey);
            }
        }

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub(crate) fn development(url: String) -> Self {
        Self {
            environment: Environment::Development,
            app_name: "statements-api".to_string(),
            port: 4000,
            database: DatabaseConfig {
                url,
                driver: "postgres".to_string(),
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                realm_key: DEFAULT_REALM_KEY.to_string(),
                session_key: DEFAULT_SESSION_KEY.to_string(),
                token_timeout_secs: 3600,
                max_refresh_secs: 3600,
            },
            collection: CollectionConfig { default_limit: 25 },
        }
    }

    fn production(url: String) -> Self {
        let mut config = Self::development(url);
        config.environment = Environment::Production;
        config.database.max_connections = 50;
        config.database.connection_timeout = 5;
        config
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
