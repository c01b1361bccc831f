use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

/// Process configuration, read from the environment once in `main` and
/// passed into the client constructors. Nothing else reads env vars.
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub ors_api_key: String,
    pub ors_base_url: String,
    pub stops_path: PathBuf,
    pub upstream_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let timeout_secs = match std::env::var("ORS_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("ORS_TIMEOUT_SECS is not a number")?,
            Err(_) => 30,
        };

        Ok(Self {
            bind_addr: env_or("BIND_ADDR", "127.0.0.1:8080"),
            jwt_secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            ors_api_key: std::env::var("ORS_API_KEY").context("ORS_API_KEY is not set")?,
            ors_base_url: env_or("ORS_BASE_URL", fieldroute_ors::ORS_BASE_URL),
            stops_path: env_or("STOPS_PATH", "./data/stops.json").into(),
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| String::from(default))
}
