//! Configuration management for the notification dispatcher.
//!
//! This module handles loading and validating configuration from environment
//! variables. Everything is read once at startup; a missing or malformed
//! credential fails here rather than at the first send.

use crate::domain::PhoneNumber;
use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::str::FromStr;

/// Which transport outbound messages go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsBackend {
    /// Twilio Messages API
    Twilio,
    /// Log only, nothing is sent
    Noop,
}

impl FromStr for SmsBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twilio" => Ok(Self::Twilio),
            "noop" => Ok(Self::Noop),
            other => Err(format!("Must be 'twilio' or 'noop', got: {}", other)),
        }
    }
}

/// Configuration for the notification dispatcher.
#[derive(Debug, Clone)]
pub struct Config {
    /// Transport backend (default: twilio)
    pub backend: SmsBackend,

    /// Twilio account SID
    pub twilio_account_sid: String,

    /// Twilio auth token
    pub twilio_auth_token: String,

    /// Sender number messages are sent from
    pub twilio_phone_number: String,

    /// Twilio API base URL (default: https://api.twilio.com)
    pub twilio_api_url: String,

    /// Storefront base URL used for tracking links
    pub storefront_url: String,

    /// Per-send timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Sustained send rate in messages per second, 0 disables (default: 10)
    pub rate_limit_per_sec: u32,

    /// Messages that may be sent back-to-back before pacing (default: 1)
    pub rate_limit_burst: u32,

    /// Extra attempts for retryable transport failures (default: 2)
    pub max_retries: u32,

    /// Initial retry backoff in milliseconds, doubled each attempt (default: 500)
    pub retry_backoff_ms: u64,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required when `SMS_BACKEND=twilio` (the default):
    /// - `TWILIO_ACCOUNT_SID`
    /// - `TWILIO_AUTH_TOKEN`
    /// - `TWILIO_PHONE_NUMBER`
    ///
    /// Optional environment variables:
    /// - `SMS_BACKEND`: `twilio` or `noop` (default: twilio)
    /// - `TWILIO_API_URL`: API base URL (default: https://api.twilio.com)
    /// - `STOREFRONT_URL`: tracking link base (default: https://hashindia.in)
    /// - `SMS_REQUEST_TIMEOUT`: per-send timeout in seconds (default: 10)
    /// - `SMS_RATE_LIMIT_PER_SEC`: send rate (default: 10)
    /// - `SMS_RATE_LIMIT_BURST`: burst size (default: 1)
    /// - `SMS_MAX_RETRIES`: retries for retryable failures (default: 2)
    /// - `SMS_RETRY_BACKOFF_MS`: initial backoff (default: 500)
    /// - `LOG_LEVEL`: logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // Try to load .env file if it exists (but don't fail if it doesn't)
        let _ = dotenvy::dotenv();

        let defaults = Config::default();

        let backend = match env::var("SMS_BACKEND") {
            Ok(val) => val.parse::<SmsBackend>().map_err(|reason| ConfigError::InvalidValue {
                var: "SMS_BACKEND".to_string(),
                reason,
            })?,
            Err(_) => SmsBackend::Twilio,
        };

        let (twilio_account_sid, twilio_auth_token, twilio_phone_number) = match backend {
            SmsBackend::Twilio => (
                Self::required("TWILIO_ACCOUNT_SID")?,
                Self::required("TWILIO_AUTH_TOKEN")?,
                Self::required("TWILIO_PHONE_NUMBER")?,
            ),
            SmsBackend::Noop => (
                env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
                env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
                env::var("TWILIO_PHONE_NUMBER").unwrap_or_else(|_| "+910000000000".to_string()),
            ),
        };

        if backend == SmsBackend::Twilio && !twilio_account_sid.starts_with("AC") {
            return Err(ConfigError::InvalidValue {
                var: "TWILIO_ACCOUNT_SID".to_string(),
                reason: "Must start with AC".to_string(),
            });
        }

        if let Err(e) = PhoneNumber::parse(&twilio_phone_number) {
            return Err(ConfigError::InvalidValue {
                var: "TWILIO_PHONE_NUMBER".to_string(),
                reason: e.to_string(),
            });
        }

        let twilio_api_url =
            env::var("TWILIO_API_URL").unwrap_or(defaults.twilio_api_url);
        Self::require_http_url("TWILIO_API_URL", &twilio_api_url)?;

        let storefront_url = env::var("STOREFRONT_URL").unwrap_or(defaults.storefront_url);
        Self::require_http_url("STOREFRONT_URL", &storefront_url)?;

        let request_timeout = Self::parse_env("SMS_REQUEST_TIMEOUT", defaults.request_timeout)?;
        if request_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                var: "SMS_REQUEST_TIMEOUT".to_string(),
                reason: "Must be at least 1 second".to_string(),
            });
        }

        let rate_limit_per_sec =
            Self::parse_env("SMS_RATE_LIMIT_PER_SEC", defaults.rate_limit_per_sec)?;
        let rate_limit_burst = Self::parse_env("SMS_RATE_LIMIT_BURST", defaults.rate_limit_burst)?;
        if rate_limit_burst == 0 {
            return Err(ConfigError::InvalidValue {
                var: "SMS_RATE_LIMIT_BURST".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        let max_retries = Self::parse_env("SMS_MAX_RETRIES", defaults.max_retries)?;
        let retry_backoff_ms = Self::parse_env("SMS_RETRY_BACKOFF_MS", defaults.retry_backoff_ms)?;

        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Config {
            backend,
            twilio_account_sid,
            twilio_auth_token,
            twilio_phone_number,
            twilio_api_url,
            storefront_url,
            request_timeout,
            rate_limit_per_sec,
            rate_limit_burst,
            max_retries,
            retry_backoff_ms,
            log_level,
        })
    }

    /// Read a required, non-blank environment variable.
    fn required(var_name: &str) -> ConfigResult<String> {
        let value =
            env::var(var_name).map_err(|_| ConfigError::MissingVar(var_name.to_string()))?;

        if value.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        Ok(value)
    }

    fn require_http_url(var_name: &str, value: &str) -> ConfigResult<()> {
        if !value.starts_with("http://") && !value.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }
        Ok(())
    }

    /// Parse an environment variable as a number with a default value.
    fn parse_env<T: FromStr>(var_name: &str, default: T) -> ConfigResult<T> {
        match env::var(var_name) {
            Ok(val) => val.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a non-negative number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: SmsBackend::Noop,
            twilio_account_sid: String::new(),
            twilio_auth_token: String::new(),
            twilio_phone_number: "+910000000000".to_string(),
            twilio_api_url: "https://api.twilio.com".to_string(),
            storefront_url: "https://hashindia.in".to_string(),
            request_timeout: 10,
            rate_limit_per_sec: 10,
            rate_limit_burst: 1,
            max_retries: 2,
            retry_backoff_ms: 500,
            log_level: "error".to_string(),
        }
    }
}
