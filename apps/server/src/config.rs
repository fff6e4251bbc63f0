use std::{net::SocketAddr, time::Duration};

use anyhow::{anyhow, Context};

/// Backing store for tracks and webhooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub storage: StorageKind,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub webhook_timeout: Duration,
    pub fetch_timeout: Duration,
    pub clock_sink_url: Option<String>,
    pub clock_interval: Duration,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let listen_addr: SocketAddr = var("PG_LISTEN_ADDR")
            .or_else(|| var("PORT").map(|port| format!("0.0.0.0:{}", port.trim())))
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid PG_LISTEN_ADDR")?;

        let storage = match var("PG_STORAGE")
            .unwrap_or_else(|| "sqlite".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "sqlite" => StorageKind::Sqlite,
            "memory" => StorageKind::Memory,
            other => return Err(anyhow!("Invalid PG_STORAGE '{}'", other)),
        };

        let db_path = var("PG_DB_PATH").unwrap_or_else(|| "./db/paragliding.db".into());
        let cors_allow = var("PG_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let millis = |key: &str, default: u64| {
            Duration::from_millis(
                var(key)
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(default),
            )
        };
        let clock_interval_secs: u64 = var("PG_CLOCK_INTERVAL_SECS")
            .and_then(|v| v.trim().parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(600);

        let log_format = match var("PG_LOG_FORMAT") {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            storage,
            db_path,
            cors_allow,
            request_timeout: millis("PG_REQUEST_TIMEOUT_MS", 30_000),
            webhook_timeout: millis("PG_WEBHOOK_TIMEOUT_MS", 10_000),
            fetch_timeout: millis("PG_FETCH_TIMEOUT_MS", 30_000),
            clock_sink_url: var("PG_CLOCK_SINK_URL").filter(|url| !url.trim().is_empty()),
            clock_interval: Duration::from_secs(clock_interval_secs),
            log_format,
        })
    }
}
