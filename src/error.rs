//! Error types for the HASH India notification dispatcher.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use crate::domain::ValidationError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the SMS provider.
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Provider returned an error status code
    #[error("SMS provider error (status {status}): {message}")]
    ApiError {
        status: u16,
        /// Provider-specific error code (Twilio: e.g. 21211)
        code: Option<u32>,
        message: String,
    },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// The send outlived the dispatcher's deadline and was left running;
    /// the provider may still accept it
    #[error("Send deadline exceeded, delivery status unknown")]
    DeadlineExceeded,

    /// Authentication failed
    #[error("Authentication failed")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded {
        /// Provider's `Retry-After` hint, when given
        retry_after: Option<Duration>,
    },
}

impl TransportError {
    /// Whether a later attempt could reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::RateLimitExceeded { .. } => true,
            Self::ApiError { status, .. } => *status >= 500,
            Self::HttpError(_)
            | Self::JsonError(_)
            | Self::Unauthorized
            | Self::DeadlineExceeded => false,
        }
    }

    /// Provider-requested wait before retrying.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimitExceeded { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Errors surfaced by single-message dispatch operations.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Recipient could not be normalized to a dialable number
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(ValidationError),

    /// Message body rejected before sending
    #[error("Invalid message: {0}")]
    InvalidMessage(ValidationError),

    /// Provider did not accept the message
    #[error("Notification delivery to {recipient} failed: {source}")]
    DeliveryFailed {
        recipient: String,
        #[source]
        source: TransportError,
    },
}

impl DispatchError {
    /// HTTP-equivalent status code: client errors are 400, delivery is 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRecipient(_) | Self::InvalidMessage(_) => 400,
            Self::DeliveryFailed { .. } => 500,
        }
    }

    /// The underlying transport failure, if any.
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::DeliveryFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with TransportError
pub type TransportResult<T> = Result<T, TransportError>;

/// Convenience type alias for Results with DispatchError
pub type DispatchOutcome<T> = Result<T, DispatchError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
