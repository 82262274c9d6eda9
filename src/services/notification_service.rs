//! Notification service layer.
//!
//! Normalizes recipients, renders templates and submits messages through an
//! injected [`SmsTransport`], one at a time or as a paced batch.

use crate::client::SmsTransport;
use crate::config::Config;
use crate::domain::{Message, PhoneNumber};
use crate::error::{
    ConfigError, ConfigResult, DispatchError, DispatchOutcome, TransportError, TransportResult,
};
use crate::metrics::Metrics;
use crate::models::{DispatchResult, DomainEvent, MessageReceipt, Order};
use crate::rate_limit::RateLimiter;
use crate::services::RetryPolicy;
use crate::templates::TemplateRenderer;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// Error text recorded for recipients skipped by a cancelled batch.
pub const CANCELLED: &str = "cancelled";

/// Headroom over the transport's own request timeout, so a slow request
/// ends inside the transport before the dispatcher gives up on it.
const SEND_TIMEOUT_MARGIN: Duration = Duration::from_secs(2);

/// Notification service trait for business operations.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Render the SMS body for an event.
    fn render_template(&self, event: &DomainEvent) -> String;

    /// Send one message. Transport failures surface as
    /// `DispatchError::DeliveryFailed`.
    async fn send(&self, recipient: &str, body: &str) -> DispatchOutcome<DispatchResult>;

    /// Send the same body to every recipient, in order, one at a time.
    /// Always returns one result per recipient.
    async fn send_batch(&self, recipients: &[String], body: &str) -> Vec<DispatchResult>;

    /// Like [`send_batch`](Self::send_batch), but stops sending once `cancel`
    /// reads `true`; skipped recipients get a failed "cancelled" result.
    async fn send_batch_cancellable(
        &self,
        recipients: &[String],
        body: &str,
        cancel: watch::Receiver<bool>,
    ) -> Vec<DispatchResult>;

    /// Render an event and send it to one recipient.
    async fn dispatch(&self, event: &DomainEvent, recipient: &str)
        -> DispatchOutcome<DispatchResult>;

    async fn send_otp(&self, phone: &str, otp: &str, name: &str)
        -> DispatchOutcome<DispatchResult>;

    async fn send_order_confirmation(&self, order: &Order) -> DispatchOutcome<DispatchResult>;

    async fn send_shipping_update(&self, order: &Order) -> DispatchOutcome<DispatchResult>;

    async fn send_delivery_otp(&self, order: &Order, otp: &str)
        -> DispatchOutcome<DispatchResult>;

    async fn send_status_update(&self, order: &Order, status: &str)
        -> DispatchOutcome<DispatchResult>;

    async fn send_password_reset(
        &self,
        phone: &str,
        code: &str,
        name: &str,
    ) -> DispatchOutcome<DispatchResult>;

    /// Promotional blast to many recipients, sent as a batch.
    async fn send_promotional(
        &self,
        recipients: &[String],
        body: &str,
        name: &str,
    ) -> Vec<DispatchResult>;
}

/// Outcome of one recipient's attempt chain.
struct Attempt {
    /// As given by the caller
    recipient: String,
    normalized: Option<String>,
    attempts: u32,
    outcome: DispatchOutcome<MessageReceipt>,
}

impl Attempt {
    fn rejected(recipient: &str, normalized: Option<String>, error: DispatchError) -> Self {
        Self {
            recipient: recipient.to_string(),
            normalized,
            attempts: 0,
            outcome: Err(error),
        }
    }

    fn into_result(self) -> DispatchOutcome<DispatchResult> {
        let Attempt {
            recipient,
            normalized,
            attempts,
            outcome,
        } = self;
        outcome.map(|receipt| {
            DispatchResult::delivered(recipient, receipt, attempts).with_normalized(normalized)
        })
    }

    fn into_batch_result(self) -> DispatchResult {
        let result = match self.outcome {
            Ok(receipt) => DispatchResult::delivered(self.recipient, receipt, self.attempts),
            Err(DispatchError::DeliveryFailed { source, .. }) => {
                DispatchResult::failed(self.recipient, source, self.attempts)
            }
            Err(e) => DispatchResult::failed(self.recipient, e, self.attempts),
        };
        result.with_normalized(self.normalized)
    }
}

/// Default implementation of NotificationService.
pub struct NotificationDispatcher {
    transport: Arc<dyn SmsTransport>,
    sender: PhoneNumber,
    renderer: TemplateRenderer,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
    send_timeout: Duration,
    metrics: Metrics,
    /// A transport call that outlived `send_timeout` and is still running
    abandoned: Mutex<Option<JoinHandle<TransportResult<MessageReceipt>>>>,
}

impl NotificationDispatcher {
    /// Create a dispatcher with default pacing (10/s), retries and timeout.
    pub fn new(
        transport: Arc<dyn SmsTransport>,
        sender: PhoneNumber,
        renderer: TemplateRenderer,
    ) -> Self {
        Self {
            transport,
            sender,
            renderer,
            limiter: Arc::new(RateLimiter::default()),
            retry: RetryPolicy::default(),
            send_timeout: Duration::from_secs(10) + SEND_TIMEOUT_MARGIN,
            metrics: Metrics::new(),
            abandoned: Mutex::new(None),
        }
    }

    /// Create a dispatcher wired from configuration.
    pub fn from_config(config: &Config, transport: Arc<dyn SmsTransport>) -> ConfigResult<Self> {
        let sender =
            PhoneNumber::parse(&config.twilio_phone_number).map_err(|e| {
                ConfigError::InvalidValue {
                    var: "TWILIO_PHONE_NUMBER".to_string(),
                    reason: e.to_string(),
                }
            })?;

        Ok(Self::new(
            transport,
            sender,
            TemplateRenderer::new(config.storefront_url.clone()),
        )
        .with_rate_limiter(RateLimiter::new(
            config.rate_limit_per_sec,
            config.rate_limit_burst,
        ))
        .with_retry_policy(RetryPolicy::from_config(config))
        .with_send_timeout(
            Duration::from_secs(config.request_timeout) + SEND_TIMEOUT_MARGIN,
        ))
    }

    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = Arc::new(limiter);
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn sender(&self) -> &PhoneNumber {
        &self.sender
    }

    /// Wait out a call left running by an earlier deadline, so at most one
    /// request is ever in flight.
    async fn settle_abandoned(&self) {
        let Some(handle) = self.abandoned.lock().await.take() else {
            return;
        };

        match handle.await {
            Ok(Ok(receipt)) => tracing::warn!(
                transport_id = %receipt.id,
                "SMS accepted after the send deadline"
            ),
            Ok(Err(e)) => tracing::debug!(error = %e, "Abandoned SMS send failed"),
            Err(e) => tracing::debug!(error = %e, "Abandoned SMS send task ended"),
        }
    }

    /// One call to the transport, bounded by the send timeout.
    ///
    /// A call that misses the deadline keeps running; it is reported as
    /// `DeadlineExceeded` and the next call waits for it to finish.
    async fn call_transport(&self, message: &Message) -> Result<MessageReceipt, TransportError> {
        self.settle_abandoned().await;

        let transport = self.transport.clone();
        let to = message.recipient().clone();
        let from = self.sender.clone();
        let body = message.body().to_string();
        let mut handle =
            tokio::spawn(async move { transport.create_message(&to, &from, &body).await });

        match tokio::time::timeout(self.send_timeout, &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(TransportError::HttpError(format!("Task join error: {}", e))),
            Err(_) => {
                *self.abandoned.lock().await = Some(handle);
                Err(TransportError::DeadlineExceeded)
            }
        }
    }

    /// Validate, then send with retries.
    async fn attempt(&self, raw_recipient: &str, body: &str) -> Attempt {
        let to = match PhoneNumber::parse(raw_recipient) {
            Ok(to) => to,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected SMS with invalid recipient");
                self.metrics.record_rejected();
                return Attempt::rejected(raw_recipient, None, DispatchError::InvalidRecipient(e));
            }
        };

        let message = match Message::new(to.clone(), body) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(to = %to.masked(), error = %e, "Rejected SMS with invalid body");
                self.metrics.record_rejected();
                return Attempt::rejected(
                    raw_recipient,
                    Some(to.into_inner()),
                    DispatchError::InvalidMessage(e),
                );
            }
        };

        let mut attempts = 0;
        loop {
            self.limiter.acquire().await;
            attempts += 1;

            match self.call_transport(&message).await {
                Ok(receipt) => {
                    tracing::info!(
                        to = %to.masked(),
                        transport_id = %receipt.id,
                        attempts,
                        "SMS sent"
                    );
                    self.metrics.record_sent();
                    return Attempt {
                        recipient: raw_recipient.to_string(),
                        normalized: Some(to.into_inner()),
                        attempts,
                        outcome: Ok(receipt),
                    };
                }
                Err(e) if e.is_retryable() && attempts <= self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempts, e.retry_after());
                    tracing::warn!(
                        to = %to.masked(),
                        error = %e,
                        attempts,
                        delay_ms = delay.as_millis() as u64,
                        "SMS send failed, retrying"
                    );
                    self.metrics.record_retry();
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(to = %to.masked(), error = %e, attempts, "SMS send failed");
                    self.metrics.record_failed();
                    let normalized = to.into_inner();
                    return Attempt {
                        recipient: raw_recipient.to_string(),
                        normalized: Some(normalized.clone()),
                        attempts,
                        outcome: Err(DispatchError::DeliveryFailed {
                            recipient: normalized,
                            source: e,
                        }),
                    };
                }
            }
        }
    }

    async fn run_batch(
        &self,
        recipients: &[String],
        body: &str,
        cancel: Option<watch::Receiver<bool>>,
    ) -> Vec<DispatchResult> {
        let mut results = Vec::with_capacity(recipients.len());

        for recipient in recipients {
            let cancelled = cancel.as_ref().is_some_and(|rx| *rx.borrow());
            if cancelled {
                results.push(DispatchResult::failed(recipient.as_str(), CANCELLED, 0));
                continue;
            }

            results.push(self.attempt(recipient, body).await.into_batch_result());
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        tracing::info!(
            total = results.len(),
            succeeded,
            failed = results.len() - succeeded,
            "Batch send complete"
        );

        results
    }

    fn order_event_recipient(order: &Order) -> &str {
        order.phone.as_str()
    }
}

#[async_trait]
impl NotificationService for NotificationDispatcher {
    fn render_template(&self, event: &DomainEvent) -> String {
        self.renderer.render(event)
    }

    async fn send(&self, recipient: &str, body: &str) -> DispatchOutcome<DispatchResult> {
        self.attempt(recipient, body).await.into_result()
    }

    async fn send_batch(&self, recipients: &[String], body: &str) -> Vec<DispatchResult> {
        self.run_batch(recipients, body, None).await
    }

    async fn send_batch_cancellable(
        &self,
        recipients: &[String],
        body: &str,
        cancel: watch::Receiver<bool>,
    ) -> Vec<DispatchResult> {
        self.run_batch(recipients, body, Some(cancel)).await
    }

    async fn dispatch(
        &self,
        event: &DomainEvent,
        recipient: &str,
    ) -> DispatchOutcome<DispatchResult> {
        tracing::debug!(
            kind = event.kind(),
            order = event.order().map(|o| o.order_number.as_str()),
            "Dispatching notification"
        );
        let body = self.render_template(event);
        self.send(recipient, &body).await
    }

    async fn send_otp(
        &self,
        phone: &str,
        otp: &str,
        name: &str,
    ) -> DispatchOutcome<DispatchResult> {
        let event = DomainEvent::Otp {
            otp: otp.to_string(),
            name: name.to_string(),
        };
        self.dispatch(&event, phone).await
    }

    async fn send_order_confirmation(&self, order: &Order) -> DispatchOutcome<DispatchResult> {
        let event = DomainEvent::OrderConfirmed {
            order: order.clone(),
        };
        self.dispatch(&event, Self::order_event_recipient(order))
            .await
    }

    async fn send_shipping_update(&self, order: &Order) -> DispatchOutcome<DispatchResult> {
        let event = DomainEvent::Shipped {
            order: order.clone(),
        };
        self.dispatch(&event, Self::order_event_recipient(order))
            .await
    }

    async fn send_delivery_otp(
        &self,
        order: &Order,
        otp: &str,
    ) -> DispatchOutcome<DispatchResult> {
        let event = DomainEvent::DeliveryOtp {
            order: order.clone(),
            otp: otp.to_string(),
        };
        self.dispatch(&event, Self::order_event_recipient(order))
            .await
    }

    async fn send_status_update(
        &self,
        order: &Order,
        status: &str,
    ) -> DispatchOutcome<DispatchResult> {
        let event = DomainEvent::StatusChanged {
            order: order.clone(),
            status: status.to_string(),
        };
        self.dispatch(&event, Self::order_event_recipient(order))
            .await
    }

    async fn send_password_reset(
        &self,
        phone: &str,
        code: &str,
        name: &str,
    ) -> DispatchOutcome<DispatchResult> {
        let event = DomainEvent::PasswordReset {
            code: code.to_string(),
            name: name.to_string(),
        };
        self.dispatch(&event, phone).await
    }

    async fn send_promotional(
        &self,
        recipients: &[String],
        body: &str,
        name: &str,
    ) -> Vec<DispatchResult> {
        let event = DomainEvent::Promotional {
            body: body.to_string(),
            name: name.to_string(),
        };
        let rendered = self.render_template(&event);
        self.send_batch(recipients, &rendered).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NoopTransport;
    use crate::domain::ValidationError;

    fn dispatcher() -> NotificationDispatcher {
        NotificationDispatcher::new(
            Arc::new(NoopTransport::new()),
            PhoneNumber::parse("+15005550006").unwrap(),
            TemplateRenderer::new("https://hashindia.in"),
        )
        .with_rate_limiter(RateLimiter::unlimited())
    }

    #[tokio::test]
    async fn test_send_normalizes_recipient() {
        let result = dispatcher().send("098765 43210", "hello").await.unwrap();
        assert!(result.success);
        assert_eq!(result.recipient, "098765 43210");
        assert_eq!(result.normalized.as_deref(), Some("+919876543210"));
        assert_eq!(result.attempts, 1);
        assert!(result.transport_id.is_some());
    }

    #[tokio::test]
    async fn test_send_rejects_bad_recipient_before_transport() {
        let dispatcher = dispatcher();
        let err = dispatcher.send("12345", "hello").await.unwrap_err();
        assert!(matches!(err, DispatchError::InvalidRecipient(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(dispatcher.metrics().messages_rejected_total(), 1);
        assert_eq!(dispatcher.metrics().messages_sent_total(), 0);
    }

    #[tokio::test]
    async fn test_send_rejects_empty_body() {
        let err = dispatcher().send("9876543210", "  ").await.unwrap_err();
        assert!(matches!(
            err,
            DispatchError::InvalidMessage(ValidationError::EmptyMessage)
        ));
    }

    #[tokio::test]
    async fn test_from_config_rejects_bad_sender() {
        let config = Config {
            twilio_phone_number: "abc".to_string(),
            ..Default::default()
        };
        let result = NotificationDispatcher::from_config(&config, Arc::new(NoopTransport::new()));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_send_deadline_outlasts_transport_timeout() {
        let config = Config {
            request_timeout: 7,
            ..Default::default()
        };
        let dispatcher =
            NotificationDispatcher::from_config(&config, Arc::new(NoopTransport::new())).unwrap();
        assert!(dispatcher.send_timeout > Duration::from_secs(config.request_timeout));
    }
}
