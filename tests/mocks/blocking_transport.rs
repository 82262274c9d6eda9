use async_trait::async_trait;
use hash_notify::error::{TransportError, TransportResult};
use hash_notify::{MessageReceipt, PhoneNumber, SmsTransport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Transport that sends on tokio's blocking pool, like the Twilio wrapper.
///
/// Every call sleeps the thread for `latency` and is then accepted. Tracks
/// how many calls were started, accepted, and running at once.
#[allow(dead_code)]
#[derive(Clone)]
pub struct BlockingTransport {
    latency: Duration,
    started: Arc<AtomicUsize>,
    accepted: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl BlockingTransport {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            started: Arc::new(AtomicUsize::new(0)),
            accepted: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsTransport for BlockingTransport {
    async fn create_message(
        &self,
        _to: &PhoneNumber,
        _from: &PhoneNumber,
        _body: &str,
    ) -> TransportResult<MessageReceipt> {
        let this = self.clone();

        tokio::task::spawn_blocking(move || {
            let n = this.started.fetch_add(1, Ordering::SeqCst) + 1;
            let running = this.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            this.max_in_flight.fetch_max(running, Ordering::SeqCst);

            std::thread::sleep(this.latency);

            this.in_flight.fetch_sub(1, Ordering::SeqCst);
            this.accepted.fetch_add(1, Ordering::SeqCst);
            MessageReceipt {
                id: format!("SM{:032}", n),
                status: "queued".to_string(),
            }
        })
        .await
        .map_err(|e| TransportError::HttpError(format!("Task join error: {}", e)))
    }
}
