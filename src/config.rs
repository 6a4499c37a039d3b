/*
 * Responsibility
 * - Load settings from the environment (DATABASE_URL, CORS allowlist, locale, auth)
 * - Validate values up front (missing required keys fail startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::services::i18n::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,

    pub database_url: String,
    pub database_max_connections: u32,

    pub app_env: AppEnv,
    pub locale: Locale,
    pub cors_allowed_origins: Vec<String>,

    // When present, session tokens must carry a valid HS256 signature.
    pub auth_jwt_secret: Option<String>,

    pub request_body_limit_bytes: usize,
    pub request_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the database url or the jwt secret
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("database_max_connections", &self.database_max_connections)
            .field("app_env", &self.app_env)
            .field("locale", &self.locale)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("verify_signatures", &self.auth_jwt_secret.is_some())
            .field("request_body_limit_bytes", &self.request_body_limit_bytes)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = match std::env::var("PORT") {
            Ok(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(5);

        let app_env = AppEnv::from_env();

        let locale = std::env::var("APP_LOCALE")
            .map(|v| Locale::parse(&v))
            .unwrap_or_default();

        let cors_allowed_origins =
            parse_origins(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let auth_jwt_secret = std::env::var("AUTH_JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let request_body_limit_bytes = std::env::var("REQUEST_BODY_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        let request_timeout = std::env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Ok(Self {
            addr,
            database_url,
            database_max_connections,
            app_env,
            locale,
            cors_allowed_origins,
            auth_jwt_secret,
            request_body_limit_bytes,
            request_timeout,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
