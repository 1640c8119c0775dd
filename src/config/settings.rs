//! Process settings from environment variables (optionally seeded from `.env`).

use crate::error::ConfigError;
use regex::Regex;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ServerSettings {
    pub listen_addr: SocketAddr,
    pub body_limit: usize,
}

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    /// Full connection URL; when set it takes precedence over the discrete fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: Option<String>,
    pub schema: String,
    pub max_connections: u32,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
    pub ensure_tables: bool,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let server = ServerSettings {
            listen_addr: parse_or(&get, "LISTEN_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            body_limit: parse_or(&get, "BODY_LIMIT_BYTES", 64 * 1024)?,
        };

        let schema = get("DB_SCHEMA").unwrap_or_else(|| "public".into());
        if !is_identifier(&schema) {
            return Err(ConfigError::Invalid { key: "DB_SCHEMA", value: schema });
        }
        let max_connections: u32 = parse_or(&get, "DB_POOL_MAX", 20)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_POOL_MAX",
                value: "0".into(),
            });
        }

        let database = DatabaseSettings {
            url: get("DATABASE_URL"),
            host: get("DB_HOST").unwrap_or_else(|| "localhost".into()),
            port: parse_or(&get, "DB_PORT", 5432)?,
            database: get("DB_NAME").unwrap_or_else(|| "test_db".into()),
            user: get("DB_USER").unwrap_or_else(|| "postgres".into()),
            password: get("DB_PASSWORD"),
            schema,
            max_connections,
            idle_timeout: Duration::from_millis(parse_or(&get, "DB_IDLE_TIMEOUT_MS", 30_000)?),
            acquire_timeout: Duration::from_millis(parse_or(&get, "DB_ACQUIRE_TIMEOUT_MS", 2_000)?),
            ensure_tables: parse_bool_or(&get, "DB_ENSURE_TABLES", true)?,
        };

        Ok(Settings { server, database })
    }
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url).map_err(ConfigError::DatabaseUrl);
        }
        let opts = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user);
        Ok(match &self.password {
            Some(p) => opts.password(p),
            None => opts,
        })
    }

    /// Bounded pool: max size, idle timeout and acquire timeout from settings.
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .idle_timeout(self.idle_timeout)
            .acquire_timeout(self.acquire_timeout)
    }
}

fn is_identifier(s: &str) -> bool {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$")
        .map(|re| re.is_match(s))
        .unwrap_or(false)
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
        None => Ok(default),
    }
}

fn parse_bool_or<G>(get: &G, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(v) => match v.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value: v }),
        },
        None => Ok(default),
    }
}
