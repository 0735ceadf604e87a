//! Application configuration structs
//!
//! Loaded from environment variables (with an optional `.env` file).

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use presence_core::PresenceWindows;
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    /// Only required when the viewer store is Redis
    pub redis: Option<RedisConfig>,
    pub auth: AuthConfig,
    pub presence: PresenceConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            _ => Err(format!("unknown environment: {s}")),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Directory holding SQL migrations applied on startup
    pub migrations_dir: String,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Identity provider settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 secret used to verify caller tokens
    pub jwt_secret: String,
    /// Expected `iss` claim, if any
    pub issuer: Option<String>,
    /// Expected `aud` claim, if any
    pub audience: Option<String>,
    /// Accounts provisioned with this email become owners
    pub super_admin_email: Option<String>,
}

/// Which backend holds viewer records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerStoreKind {
    #[default]
    Postgres,
    Redis,
}

impl FromStr for ViewerStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "redis" => Ok(Self::Redis),
            _ => Err(format!("expected postgres or redis, got {s}")),
        }
    }
}

/// Presence registry tuning
#[derive(Debug, Clone)]
pub struct PresenceConfig {
    pub windows: PresenceWindows,
    pub reap_interval: Duration,
    pub reap_batch_size: u32,
    pub store: ViewerStoreKind,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            windows: PresenceWindows::default(),
            reap_interval: Duration::from_millis(DEFAULT_REAP_INTERVAL_MS),
            reap_batch_size: DEFAULT_REAP_BATCH_SIZE,
            store: ViewerStoreKind::default(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Default)]
pub struct SnowflakeConfig {
    pub worker_id: u16,
}

const DEFAULT_APP_NAME: &str = "presence-server";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_MIN_CONNECTIONS: u32 = 5;
const DEFAULT_MIGRATIONS_DIR: &str = "./migrations";
const DEFAULT_REDIS_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_REAP_INTERVAL_MS: u64 = 30_000;
const DEFAULT_REAP_BATCH_SIZE: u32 = 500;
const DEFAULT_REQUESTS_PER_SECOND: u32 = 10;
const DEFAULT_BURST: u32 = 50;

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value is malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let store = vars.parse_or("VIEWER_STORE", ViewerStoreKind::default())?;
        let redis = match vars.get("REDIS_URL") {
            Some(url) => Some(RedisConfig {
                url,
                max_connections: vars
                    .parse_or("REDIS_MAX_CONNECTIONS", DEFAULT_REDIS_MAX_CONNECTIONS)?,
            }),
            None if store == ViewerStoreKind::Redis => {
                return Err(ConfigError::MissingVar("REDIS_URL"))
            }
            None => None,
        };

        let active_ms = vars.parse_or("PRESENCE_ACTIVE_WINDOW_MS", PresenceWindows::DEFAULT_ACTIVE_MS)?;
        let reap_ms = vars.parse_or("PRESENCE_REAP_WINDOW_MS", PresenceWindows::DEFAULT_REAP_MS)?;
        let windows = PresenceWindows::from_millis(active_ms, reap_ms)
            .map_err(|e| ConfigError::InvalidValue("PRESENCE_REAP_WINDOW_MS", e.to_string()))?;

        let reap_batch_size = vars.parse_or("PRESENCE_REAP_BATCH_SIZE", DEFAULT_REAP_BATCH_SIZE)?;
        if reap_batch_size == 0 {
            return Err(ConfigError::InvalidValue(
                "PRESENCE_REAP_BATCH_SIZE",
                "must be at least 1".to_string(),
            ));
        }

        let reap_interval_ms: u64 =
            vars.parse_or("PRESENCE_REAP_INTERVAL_MS", DEFAULT_REAP_INTERVAL_MS)?;
        if reap_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "PRESENCE_REAP_INTERVAL_MS",
                "must be at least 1".to_string(),
            ));
        }

        let worker_id: u16 = vars.parse_or("WORKER_ID", 0)?;
        if worker_id >= 1024 {
            return Err(ConfigError::InvalidValue(
                "WORKER_ID",
                "must be below 1024".to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
                env: vars.parse_or("APP_ENV", Environment::default())?,
            },
            api: ServerConfig {
                host: vars.get("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: vars.parse_required("API_PORT")?,
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
                min_connections: vars.parse_or("DATABASE_MIN_CONNECTIONS", DEFAULT_MIN_CONNECTIONS)?,
                migrations_dir: vars
                    .get("DATABASE_MIGRATIONS")
                    .unwrap_or_else(|| DEFAULT_MIGRATIONS_DIR.to_string()),
            },
            redis,
            auth: AuthConfig {
                jwt_secret: vars.required("AUTH_JWT_SECRET")?,
                issuer: vars.get("AUTH_ISSUER"),
                audience: vars.get("AUTH_AUDIENCE"),
                super_admin_email: vars.get("SUPER_ADMIN_EMAIL"),
            },
            presence: PresenceConfig {
                windows,
                reap_interval: Duration::from_millis(reap_interval_ms),
                reap_batch_size,
                store,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parse_or("RATE_LIMIT_REQUESTS_PER_SECOND", DEFAULT_REQUESTS_PER_SECOND)?,
                burst: vars.parse_or("RATE_LIMIT_BURST", DEFAULT_BURST)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig { worker_id },
        })
    }
}

/// Typed access to the variable lookup; empty values count as unset
struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingVar(key))
    }

    fn parse_required<T>(&self, key: &'static str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.required(key)?;
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(key, e.to_string()))
    }

    fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            Some(_) => self.parse_required(key),
            None => Ok(default),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
