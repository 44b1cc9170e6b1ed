use std::{env, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub service_url: String,
    /// Base used to display resolved short links.
    pub short_link_base: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => parse_number("PORT", value)?,
            None => DEFAULT_PORT,
        };

        let service_url = lookup("LINK_SERVICE_URL")
            .map(|value| trim_base(&value))
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());

        let short_link_base = lookup("SHORT_LINK_BASE")
            .map(|value| trim_base(&value))
            .unwrap_or_else(|| service_url.clone());

        let timeout_secs = match lookup("LINK_SERVICE_TIMEOUT_SECS") {
            Some(value) => parse_number("LINK_SERVICE_TIMEOUT_SECS", value)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            port,
            service_url,
            short_link_base,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { name, value })
}

fn trim_base(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}
