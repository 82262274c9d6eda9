//! HTTP client for the Twilio Messages API.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. The client handles authentication and maps
//! provider failures onto [`TransportError`].

mod async_wrapper;
mod noop;

pub use async_wrapper::{AsyncTwilioTransport, SmsTransport};
pub use noop::NoopTransport;

use crate::config::Config;
use crate::domain::PhoneNumber;
use crate::error::{TransportError, TransportResult};
use crate::metrics::{Metrics, TransportTimer};
use crate::models::MessageReceipt;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Error body returned by Twilio on non-2xx responses.
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    #[serde(default)]
    code: Option<u32>,
    #[serde(default)]
    message: String,
}

/// HTTP client for the Twilio Messages API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct TwilioClient {
    /// Base URL for the Twilio API
    base_url: String,

    /// Account SID, also the Basic auth user
    account_sid: String,

    /// Auth token, the Basic auth password
    auth_token: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl TwilioClient {
    /// Create a new TwilioClient from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.twilio_api_url.clone(),
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a TwilioClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, account_sid: String, auth_token: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            account_sid,
            auth_token,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Share a metrics collector with the rest of the dispatcher.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.account_sid, self.auth_token);
        format!("Basic {}", STANDARD.encode(credentials))
    }

    /// Execute a form-encoded POST request with authentication.
    fn post_form(&self, path: &str, form: &[(&str, &str)]) -> TransportResult<ureq::Response> {
        let timer = TransportTimer::new(self.metrics.clone());
        let url = self.build_url(path);

        tracing::debug!("POST {}", url);

        let result = self
            .agent
            .post(&url)
            .set("Authorization", &self.auth_header())
            .set("Accept", "application/json")
            .send_form(form)
            .map_err(|e| self.map_error(e));

        match &result {
            Ok(response) => {
                tracing::debug!("POST {} - Success (status: {})", url, response.status());
                timer.complete();
            }
            Err(e) => {
                tracing::error!("POST {} - Error: {:?}", url, e);
                timer.complete_with_error();
            }
        }

        result
    }

    /// Map a ureq error to a TransportError.
    fn map_error(&self, error: ureq::Error) -> TransportError {
        match error {
            ureq::Error::Status(code, response) => {
                let retry_after = response
                    .header("Retry-After")
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .map(Duration::from_secs);

                let raw = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                let (provider_code, message) = match serde_json::from_str::<TwilioErrorBody>(&raw)
                {
                    Ok(body) if !body.message.is_empty() => (body.code, body.message),
                    _ => (None, raw),
                };

                match code {
                    401 => TransportError::Unauthorized,
                    429 => TransportError::RateLimitExceeded { retry_after },
                    _ => TransportError::ApiError {
                        status: code,
                        code: provider_code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    TransportError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    TransportError::Timeout
                } else {
                    TransportError::HttpError(transport.to_string())
                }
            }
        }
    }

    /// Submit one SMS to the provider.
    pub fn create_message(
        &self,
        to: &PhoneNumber,
        from: &PhoneNumber,
        body: &str,
    ) -> TransportResult<MessageReceipt> {
        let path = format!(
            "/2010-04-01/Accounts/{}/Messages.json",
            urlencoding::encode(&self.account_sid)
        );

        let response = self.post_form(
            &path,
            &[("To", to.as_str()), ("From", from.as_str()), ("Body", body)],
        )?;

        let response_body = response
            .into_string()
            .map_err(|e| TransportError::HttpError(e.to_string()))?;

        let receipt: MessageReceipt =
            serde_json::from_str(&response_body).map_err(TransportError::JsonError)?;

        tracing::info!(
            to = %to.masked(),
            sid = %receipt.id,
            status = %receipt.status,
            "SMS accepted by provider"
        );

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TwilioClient {
        TwilioClient::with_base_url(
            "https://api.twilio.com/".to_string(),
            "AC123".to_string(),
            "token".to_string(),
        )
    }

    #[test]
    fn test_build_url() {
        assert_eq!(
            client().build_url("/2010-04-01/Accounts/AC123/Messages.json"),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn test_auth_header() {
        // base64("AC123:token")
        assert_eq!(client().auth_header(), "Basic QUMxMjM6dG9rZW4=");
    }

    #[test]
    fn test_new_uses_config() {
        let config = Config {
            twilio_api_url: "https://example.test".to_string(),
            twilio_account_sid: "AC999".to_string(),
            ..Default::default()
        };
        let client = TwilioClient::new(&config);
        assert_eq!(client.base_url, "https://example.test");
        assert_eq!(client.account_sid, "AC999");
    }
}
