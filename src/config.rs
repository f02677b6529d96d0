use dotenvy::dotenv;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::error::ConfigError;
use crate::payment::PollPolicy;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const API_URL_ENV: &str = "LUXE_API_URL";
const API_URL_FALLBACK_ENV: &str = "API_URL";
const SESSION_PATH_ENV: &str = "LUXE_SESSION_PATH";
const SIMULATION_ENV: &str = "LUXE_PAYMENT_SIMULATION";
const POLL_INTERVAL_ENV: &str = "LUXE_POLL_INTERVAL_MS";
const POLL_ATTEMPTS_ENV: &str = "LUXE_POLL_ATTEMPTS";
const HTTP_TIMEOUT_ENV: &str = "LUXE_HTTP_TIMEOUT_SECS";

/// Runtime settings, read from the environment (and `.env`)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// API host, without trailing slash
    pub api_url: String,
    pub session_path: PathBuf,
    /// Allow client-triggered provider webhooks (development backends only)
    pub payment_simulation: bool,
    pub poll: PollPolicy,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url = get(API_URL_ENV)
            .or_else(|| get(API_URL_FALLBACK_ENV))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = normalize_api_url(&api_url)?;

        let session_path = match get(SESSION_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => default_session_path()?,
        };

        let payment_simulation = match get(SIMULATION_ENV) {
            Some(value) => parse_bool(SIMULATION_ENV, &value)?,
            None => false,
        };

        let defaults = PollPolicy::default();
        let interval = match get(POLL_INTERVAL_ENV) {
            Some(value) => Duration::from_millis(parse_number(POLL_INTERVAL_ENV, &value)?),
            None => defaults.interval,
        };
        let max_attempts = match get(POLL_ATTEMPTS_ENV) {
            Some(value) => {
                let attempts = parse_number(POLL_ATTEMPTS_ENV, &value)?;
                u32::try_from(attempts)
                    .ok()
                    .filter(|a| *a > 0)
                    .ok_or_else(|| ConfigError::InvalidValue {
                        key: POLL_ATTEMPTS_ENV,
                        value: value.clone(),
                        reason: "must be between 1 and 4294967295".to_string(),
                    })?
            }
            None => defaults.max_attempts,
        };

        let http_timeout = match get(HTTP_TIMEOUT_ENV) {
            Some(value) => Duration::from_secs(parse_number(HTTP_TIMEOUT_ENV, &value)?),
            None => Duration::from_secs(30),
        };

        let config = Self {
            api_url,
            session_path,
            payment_simulation,
            poll: PollPolicy {
                interval,
                max_attempts,
            },
            http_timeout,
        };
        debug!(?config, "Loaded configuration");
        Ok(config)
    }
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        key: API_URL_ENV,
        value: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid("scheme must be http or https".to_string()));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn default_session_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("luxe-estates").join("session.json"))
        .ok_or(ConfigError::NoSessionLocation)
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
pub fn create_test_config() -> Config {
    Config {
        api_url: DEFAULT_API_URL.to_string(),
        session_path: PathBuf::from("session.json"),
        payment_simulation: true,
        poll: PollPolicy::default(),
        http_timeout: Duration::from_secs(30),
    }
}
