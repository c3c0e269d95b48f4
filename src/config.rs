use dotenv::dotenv;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const BIND_ADDR: &str = "BIND_ADDR";
const DELIVERY_TIMEOUT_MS: &str = "DELIVERY_TIMEOUT_MS";
const SUBSCRIBER_BUFFER: &str = "SUBSCRIBER_BUFFER";
const AGGREGATION_ATTEMPTS: &str = "AGGREGATION_ATTEMPTS";
const ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";

const DEFAULT_DELIVERY_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_SUBSCRIBER_BUFFER: usize = 64;
const DEFAULT_AGGREGATION_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Upper bound on a single subscriber delivery.
    pub delivery_timeout: Duration,
    /// Frames queued per websocket connection before delivery waits.
    pub subscriber_buffer: usize,
    /// Full upsert passes tried before a standings recompute is abandoned.
    pub aggregation_attempts: u32,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Loads the configuration from the environment (and `.env` when present).
    ///
    /// Every variable is optional; unset ones fall back to `Config::default()`.
    pub fn try_from_env() -> Result<Config, String> {
        dotenv().ok();
        let defaults = Config::default();

        let bind_addr = parse_var(BIND_ADDR)?.unwrap_or(defaults.bind_addr);
        let delivery_timeout = parse_var::<u64>(DELIVERY_TIMEOUT_MS)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.delivery_timeout);
        let subscriber_buffer = parse_var(SUBSCRIBER_BUFFER)?.unwrap_or(defaults.subscriber_buffer);
        let aggregation_attempts =
            parse_var(AGGREGATION_ATTEMPTS)?.unwrap_or(defaults.aggregation_attempts);

        let allowed_origins = match env::var(ALLOWED_ORIGINS) {
            Ok(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => defaults.allowed_origins,
        };
        info!("Allowed origins: {:?}", allowed_origins);

        Ok(Config {
            bind_addr,
            delivery_timeout,
            subscriber_buffer,
            aggregation_attempts,
            allowed_origins,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            delivery_timeout: Duration::from_millis(DEFAULT_DELIVERY_TIMEOUT_MS),
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
            aggregation_attempts: DEFAULT_AGGREGATION_ATTEMPTS,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| format!("failed to parse environment variable {}: {}", name, raw)),
        Err(_) => Ok(None),
    }
}
