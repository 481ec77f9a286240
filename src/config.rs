use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default broker channel carrying group notifications
pub const DEFAULT_CHANNEL: &str = "notifications:groups";

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Connection settings for the pub/sub broker, shared by publisher and relay
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub url: String,
    pub channel: String,
    /// Upper bound on the one-shot connection attempt made at startup
    pub connect_timeout: Duration,
}

impl BrokerConfig {
    pub fn from_env() -> Self {
        Self {
            url: env_or("REDIS_URL", "redis://localhost:6379"),
            channel: env_or("NOTIFY_CHANNEL", DEFAULT_CHANNEL),
            connect_timeout: Duration::from_secs(env_parse_or("BROKER_CONNECT_TIMEOUT_SECS", 3)),
        }
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            channel: DEFAULT_CHANNEL.to_string(),
            connect_timeout: Duration::from_secs(3),
        }
    }
}

/// Configuration for the notification relay process
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub broker: BrokerConfig,
    pub bind_addr: SocketAddr,
    /// Bounded wait for the next broker message; expiry is the idle case
    pub poll_timeout: Duration,
    /// Fixed delay after an unexpected error in the polling loop
    pub error_backoff: Duration,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            broker: BrokerConfig::from_env(),
            bind_addr: env_parse_or("RELAY_ADDR", defaults.bind_addr),
            poll_timeout: Duration::from_millis(env_parse_or("RELAY_POLL_TIMEOUT_MS", 1000)),
            error_backoff: Duration::from_secs(env_parse_or("RELAY_BACKOFF_SECS", 5)),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            broker: BrokerConfig::default(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8001)),
            poll_timeout: Duration::from_secs(1),
            error_backoff: Duration::from_secs(5),
        }
    }
}

/// Configuration for the CRUD HTTP process
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub broker: BrokerConfig,
    pub bind_addr: SocketAddr,
    /// Postgres connection string; in-memory repositories are used when absent
    pub database_url: Option<String>,
    pub tasks_file: PathBuf,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            broker: BrokerConfig::from_env(),
            bind_addr: env_parse_or("API_ADDR", defaults.bind_addr),
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            tasks_file: std::env::var("TASKS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.tasks_file),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            broker: BrokerConfig::default(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            database_url: None,
            tasks_file: PathBuf::from("data/tasks.json"),
        }
    }
}
