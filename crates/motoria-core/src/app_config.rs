use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// The subset of configuration the location resolver needs: geocoding
/// client settings and the optional markets file. Loadable without a
/// database, for callers that never open a pool.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Optional YAML file extending the built-in city dictionary.
    pub markets_path: Option<PathBuf>,
    pub geocode_base_url: String,
    pub geocode_request_timeout_secs: u64,
    pub geocode_user_agent: String,
    pub geocode_max_retries: u32,
    pub geocode_retry_backoff_base_ms: u64,
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Optional YAML file extending the built-in city dictionary.
    pub markets_path: Option<PathBuf>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub geocode_base_url: String,
    pub geocode_request_timeout_secs: u64,
    pub geocode_user_agent: String,
    pub geocode_max_retries: u32,
    pub geocode_retry_backoff_base_ms: u64,
    pub stats_refresh_cron: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("markets_path", &self.markets_path)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("geocode_base_url", &self.geocode_base_url)
            .field(
                "geocode_request_timeout_secs",
                &self.geocode_request_timeout_secs,
            )
            .field("geocode_user_agent", &self.geocode_user_agent)
            .field("geocode_max_retries", &self.geocode_max_retries)
            .field(
                "geocode_retry_backoff_base_ms",
                &self.geocode_retry_backoff_base_ms,
            )
            .field("stats_refresh_cron", &self.stats_refresh_cron)
            .finish()
    }
}
