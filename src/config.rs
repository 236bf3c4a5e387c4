//! Process configuration, read from the environment.
//! A `.env` file in the working directory is loaded first when present.

use crate::errors::ConfigError;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: String,
    pub bind_addr: SocketAddr,
    pub workers: usize,
    pub log_level: log::LevelFilter,
    pub webhook_timeout: Duration,
    pub webhook_max_redirects: usize,
    /// Shared secret the store sends in `X-Relay-Token`.
    pub hook_token: Option<String>,
    /// Secret guarding the settings pages.
    pub admin_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "sheets_relay.sqlite3".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            workers: 8,
            log_level: log::LevelFilter::Info,
            webhook_timeout: Duration::from_secs(45),
            webhook_max_redirects: 5,
            hook_token: None,
            admin_token: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // ignore a missing .env
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any name -> value source. Unset or blank variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(path) = get("RELAY_DB_PATH") {
            cfg.db_path = path;
        }
        if let Some(v) = get("RELAY_BIND") {
            cfg.bind_addr = parse_var("RELAY_BIND", &v)?;
        }
        if let Some(v) = get("RELAY_WORKERS") {
            cfg.workers = parse_var("RELAY_WORKERS", &v)?;
        }
        if let Some(v) = get("RELAY_LOG") {
            cfg.log_level = parse_var("RELAY_LOG", &v)?;
        }
        if let Some(v) = get("RELAY_WEBHOOK_TIMEOUT_SECS") {
            cfg.webhook_timeout = Duration::from_secs(parse_var("RELAY_WEBHOOK_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = get("RELAY_WEBHOOK_MAX_REDIRECTS") {
            cfg.webhook_max_redirects = parse_var("RELAY_WEBHOOK_MAX_REDIRECTS", &v)?;
        }
        cfg.hook_token = get("RELAY_HOOK_TOKEN");
        cfg.admin_token = get("ADMIN_TOKEN");

        Ok(cfg)
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
