use log::*;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/brokerage.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// The sqlx connection url, e.g. "sqlite://data/brokerage.db". The database file is created if it does not exist.
    pub database_url: String,
    pub max_connections: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { database_url: DEFAULT_DATABASE_URL.to_string(), max_connections: DEFAULT_MAX_CONNECTIONS }
    }
}

impl EngineConfig {
    pub fn new_from_env_or_default() -> Self {
        let database_url = std::env::var("BROKER_DATABASE_URL").unwrap_or_else(|_| {
            warn!("BROKER_DATABASE_URL not set, using {DEFAULT_DATABASE_URL} as default");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = max_connections_or_default(std::env::var("BROKER_DB_MAX_CONNECTIONS").ok().as_deref());
        Self { database_url, max_connections }
    }
}

/// Pool sizes must be positive integers. Anything else falls back to the default.
fn max_connections_or_default(value: Option<&str>) -> u32 {
    value
        .and_then(|s| {
            s.trim()
                .parse::<u32>()
                .map_err(|e| warn!("Invalid value for BROKER_DB_MAX_CONNECTIONS: {s}. {e}"))
                .ok()
                .filter(|n| *n > 0)
        })
        .unwrap_or_else(|| {
            warn!("BROKER_DB_MAX_CONNECTIONS not set, using {DEFAULT_MAX_CONNECTIONS} as default");
            DEFAULT_MAX_CONNECTIONS
        })
}
