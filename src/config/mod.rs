// src/config/mod.rs
//! Process configuration, read from the environment (`.env` is loaded by the binaries).

use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_TTL;
use crate::error::ConfigError;
use crate::notify::mail::DEFAULT_MAIL_ENDPOINT;
use crate::notify::retry::RetryPolicy;
use crate::synth::completion::{DEFAULT_COMPLETION_MODEL, DEFAULT_COMPLETION_URL};

pub const ENV_API_KEY: &str = "COMPLETION_API_KEY";
/// Older deployments name the key after the provider.
pub const ENV_API_KEY_LEGACY: &str = "DEEPSEEK_API_KEY";
pub const DEFAULT_PORT: u16 = 3000;
/// Whole-request timeout shared by every outbound HTTP client.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailTransportKind {
    Http,
    Smtp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub user: String,
    pub pass: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub port: u16,
    pub completion_url: String,
    pub completion_model: String,
    pub mail_endpoint: String,
    pub mail_transport: MailTransportKind,
    pub smtp: Option<SmtpConfig>,
    pub cache_ttl: Duration,
    pub http_timeout: Duration,
    pub retry: RetryPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(ENV_API_KEY)
            .or_else(|| get(ENV_API_KEY_LEGACY))
            .ok_or(ConfigError::Missing(ENV_API_KEY))?;

        let port = parse_opt(get("PORT"), "PORT")?.unwrap_or(DEFAULT_PORT);
        let cache_ttl = parse_opt::<u64>(get("CACHE_TTL_SECS"), "CACHE_TTL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TTL);
        let http_timeout = parse_opt::<u64>(get("HTTP_TIMEOUT_SECS"), "HTTP_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT);

        let max_attempts = parse_opt(get("DELIVERY_MAX_ATTEMPTS"), "DELIVERY_MAX_ATTEMPTS")?
            .unwrap_or(RetryPolicy::DEFAULT_MAX_ATTEMPTS);
        let delay = parse_opt::<u64>(get("DELIVERY_RETRY_DELAY_MS"), "DELIVERY_RETRY_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(RetryPolicy::DEFAULT_DELAY);

        let mail_transport = match get("MAIL_TRANSPORT").map(|v| v.to_ascii_lowercase()) {
            None => MailTransportKind::Http,
            Some(v) if v == "http" => MailTransportKind::Http,
            Some(v) if v == "smtp" => MailTransportKind::Smtp,
            Some(v) => {
                return Err(ConfigError::Invalid {
                    name: "MAIL_TRANSPORT",
                    value: v,
                })
            }
        };

        let smtp = match mail_transport {
            MailTransportKind::Smtp => Some(SmtpConfig {
                host: get("SMTP_HOST").ok_or(ConfigError::Missing("SMTP_HOST"))?,
                user: get("SMTP_USER").ok_or(ConfigError::Missing("SMTP_USER"))?,
                pass: get("SMTP_PASS").ok_or(ConfigError::Missing("SMTP_PASS"))?,
                from: get("MAIL_FROM").ok_or(ConfigError::Missing("MAIL_FROM"))?,
                to: get("MAIL_TO").ok_or(ConfigError::Missing("MAIL_TO"))?,
            }),
            MailTransportKind::Http => None,
        };

        Ok(Self {
            api_key,
            port,
            completion_url: get("COMPLETION_URL").unwrap_or_else(|| DEFAULT_COMPLETION_URL.into()),
            completion_model: get("COMPLETION_MODEL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.into()),
            mail_endpoint: get("MAIL_ENDPOINT").unwrap_or_else(|| DEFAULT_MAIL_ENDPOINT.into()),
            mail_transport,
            smtp,
            cache_ttl,
            http_timeout,
            retry: RetryPolicy::fixed(max_attempts, delay),
        })
    }
}

fn parse_opt<T: FromStr>(raw: Option<String>, name: &'static str) -> Result<Option<T>, ConfigError> {
    raw.map(|v| v.parse::<T>().map_err(|_| ConfigError::Invalid { name, value: v }))
        .transpose()
}
