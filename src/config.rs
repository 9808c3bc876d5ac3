use rocket::figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_PATH: &str = "/v1";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
    pub idle_timeout: u64,
    pub max_lifetime: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
    /// Include source file and line number in every log line.
    pub with_caller: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    /// Upper bound for a single request, storage round trip included.
    pub request_timeout_secs: u64,
    pub enable_swagger: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/users_db".to_string(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: 5,
            idle_timeout: 30,
            max_lifetime: 1800,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            address: "127.0.0.1".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_caller: false,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            enable_swagger: false,
        }
    }
}

impl ServerConfig {
    /// Parses a `host:port` pair such as `0.0.0.0:8080`.
    pub fn from_addr(addr: &str) -> Result<Self, String> {
        let (address, port) = addr
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| format!("server address '{}' must have the form host:port", addr))?;

        if address.is_empty() {
            return Err(format!("server address '{}' has an empty host", addr));
        }

        let port = port.parse::<u16>().map_err(|e| format!("server address '{}' has an invalid port: {}", addr, e))?;

        Ok(Self {
            port,
            address: address.trim_start_matches('[').trim_end_matches(']').to_string(),
        })
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Users.toml (base configuration file)
    /// 2. Environment variables (prefixed with USERS_, sections split on `__`)
    /// 3. Unprefixed variables kept for compatibility with older deployments:
    ///    DATABASE_URL / DB_CONN, DB_MAX_OPEN_CONNS, DB_MAX_IDLE_CONNS,
    ///    LOG_LEVEL, LOG_CALLER and SERVER_ADDR
    pub fn load() -> Result<Self, figment::Error> {
        let defaults = toml::to_string(&Config::default()).map_err(|e| figment::Error::from(e.to_string()))?;

        let figment = Figment::new()
            // Start with defaults
            .merge(Toml::string(&defaults))
            // Layer on Users.toml if it exists
            .merge(Toml::file("Users.toml"))
            // Layer on environment variables (e.g., USERS_DATABASE__URL)
            .merge(Env::prefixed("USERS_").split("__"))
            .merge(Env::raw().only(&["DB_CONN", "DATABASE_URL"]).map(|_| "database.url".into()))
            .merge(Env::raw().only(&["DB_MAX_OPEN_CONNS"]).map(|_| "database.max_connections".into()))
            // sqlx has no idle cap; the connections kept open when idle are its minimum.
            .merge(Env::raw().only(&["DB_MAX_IDLE_CONNS"]).map(|_| "database.min_connections".into()))
            .merge(Env::raw().only(&["LOG_LEVEL"]).map(|_| "logging.level".into()))
            .merge(Env::raw().only(&["LOG_CALLER"]).map(|_| "logging.with_caller".into()));

        let mut config: Config = figment.extract()?;

        if let Ok(addr) = std::env::var("SERVER_ADDR") {
            config.server = ServerConfig::from_addr(&addr).map_err(figment::Error::from)?;
        }

        Ok(config)
    }
}
