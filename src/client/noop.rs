//! Log-only transport, selected with `SMS_BACKEND=noop`.

use super::SmsTransport;
use crate::domain::PhoneNumber;
use crate::error::TransportResult;
use crate::models::MessageReceipt;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

/// Accepts every message without sending it.
#[derive(Debug, Default)]
pub struct NoopTransport {
    sequence: AtomicU64,
}

impl NoopTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SmsTransport for NoopTransport {
    async fn create_message(
        &self,
        to: &PhoneNumber,
        _from: &PhoneNumber,
        body: &str,
    ) -> TransportResult<MessageReceipt> {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;

        tracing::info!(
            to = %to.masked(),
            body_len = body.chars().count(),
            "Noop: skipping SMS send"
        );

        Ok(MessageReceipt {
            id: format!("NOOP{:08}", n),
            status: "skipped".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_returns_sequential_receipts() {
        let transport = NoopTransport::new();
        let to = PhoneNumber::parse("9876543210").unwrap();
        let from = PhoneNumber::parse("+15005550006").unwrap();

        let first = transport.create_message(&to, &from, "hi").await.unwrap();
        let second = transport.create_message(&to, &from, "hi").await.unwrap();

        assert_eq!(first.id, "NOOP00000001");
        assert_eq!(second.id, "NOOP00000002");
        assert_eq!(second.status, "skipped");
    }
}
