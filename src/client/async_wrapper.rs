//! Async transport seam over the synchronous TwilioClient.
//!
//! The dispatcher depends only on [`SmsTransport`]; production wires in
//! [`AsyncTwilioTransport`], which runs the blocking HTTP call on tokio's
//! blocking thread pool.

use crate::client::TwilioClient;
use crate::domain::PhoneNumber;
use crate::error::{TransportError, TransportResult};
use crate::models::MessageReceipt;
use async_trait::async_trait;
use std::sync::Arc;

/// The one capability the dispatcher needs from an SMS provider.
#[async_trait]
pub trait SmsTransport: Send + Sync {
    /// Submit `body` to `to`, sent from `from`.
    async fn create_message(
        &self,
        to: &PhoneNumber,
        from: &PhoneNumber,
        body: &str,
    ) -> TransportResult<MessageReceipt>;
}

/// Async wrapper around synchronous TwilioClient.
#[derive(Clone)]
pub struct AsyncTwilioTransport {
    client: Arc<TwilioClient>,
}

impl AsyncTwilioTransport {
    pub fn new(client: TwilioClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl SmsTransport for AsyncTwilioTransport {
    async fn create_message(
        &self,
        to: &PhoneNumber,
        from: &PhoneNumber,
        body: &str,
    ) -> TransportResult<MessageReceipt> {
        let client = self.client.clone();
        let to = to.clone();
        let from = from.clone();
        let body = body.to_string();

        tokio::task::spawn_blocking(move || client.create_message(&to, &from, &body))
            .await
            .map_err(|e| TransportError::HttpError(format!("Task join error: {}", e)))?
    }
}
