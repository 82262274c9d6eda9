use async_trait::async_trait;
use hash_notify::error::{TransportError, TransportResult};
use hash_notify::{MessageReceipt, PhoneNumber, SmsTransport};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

type ErrorFactory = Arc<dyn Fn() -> TransportError + Send + Sync>;

/// A message the mock transport was asked to send.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub to: String,
    pub from: String,
    pub body: String,
    pub at: Instant,
}

/// Mock SMS transport for testing.
///
/// Accepts every message by default. Failures can be scripted for specific
/// recipients or for the next N calls, and every call is recorded for
/// verification.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockTransport {
    calls: Arc<Mutex<Vec<SentMessage>>>,
    failing_recipients: Arc<Mutex<HashMap<String, ErrorFactory>>>,
    scripted: Arc<Mutex<VecDeque<ErrorFactory>>>,
    latency: Arc<Mutex<Option<Duration>>>,
}

#[allow(dead_code)]
impl MockTransport {
    /// Create a new MockTransport that accepts everything.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failing_recipients: Arc::new(Mutex::new(HashMap::new())),
            scripted: Arc::new(Mutex::new(VecDeque::new())),
            latency: Arc::new(Mutex::new(None)),
        }
    }

    /// Always fail sends to `recipient` (normalized form).
    pub fn fail_recipient<F>(&self, recipient: &str, error: F)
    where
        F: Fn() -> TransportError + Send + Sync + 'static,
    {
        let mut failing = self.failing_recipients.lock().unwrap();
        failing.insert(recipient.to_string(), Arc::new(error));
    }

    /// Fail the next `times` calls, whoever they are for.
    pub fn fail_next<F>(&self, times: usize, error: F)
    where
        F: Fn() -> TransportError + Send + Sync + 'static,
    {
        let error: ErrorFactory = Arc::new(error);
        let mut scripted = self.scripted.lock().unwrap();
        for _ in 0..times {
            scripted.push_back(error.clone());
        }
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<SentMessage> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Recipients of every call made so far, in order.
    pub fn recipients(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.to).collect()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsTransport for MockTransport {
    async fn create_message(
        &self,
        to: &PhoneNumber,
        from: &PhoneNumber,
        body: &str,
    ) -> TransportResult<MessageReceipt> {
        let sequence = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(SentMessage {
                to: to.as_str().to_string(),
                from: from.as_str().to_string(),
                body: body.to_string(),
                at: Instant::now(),
            });
            calls.len()
        };

        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let scripted = self.scripted.lock().unwrap().pop_front();
        if let Some(error) = scripted {
            return Err(error());
        }

        let recipient_error = self
            .failing_recipients
            .lock()
            .unwrap()
            .get(to.as_str())
            .cloned();
        if let Some(error) = recipient_error {
            return Err(error());
        }

        Ok(MessageReceipt {
            id: format!("SM{:032}", sequence),
            status: "queued".to_string(),
        })
    }
}
