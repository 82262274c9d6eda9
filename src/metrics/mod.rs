//! Basic metrics instrumentation for tracking dispatch health.
//!
//! Provides counters for messages sent, failed, rejected and retried, plus
//! duration tracking for calls to the SMS provider.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector for the dispatcher and its transport.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of calls made to the SMS provider
    transport_requests_total: Arc<AtomicU64>,

    /// Total number of failed provider calls
    transport_errors_total: Arc<AtomicU64>,

    /// Total duration of all provider calls in milliseconds
    transport_duration_total_ms: Arc<AtomicU64>,

    /// Messages accepted by the provider
    messages_sent_total: Arc<AtomicU64>,

    /// Messages that failed after all attempts
    messages_failed_total: Arc<AtomicU64>,

    /// Messages rejected before reaching the provider
    messages_rejected_total: Arc<AtomicU64>,

    /// Extra attempts made for retryable failures
    retries_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            transport_requests_total: Arc::new(AtomicU64::new(0)),
            transport_errors_total: Arc::new(AtomicU64::new(0)),
            transport_duration_total_ms: Arc::new(AtomicU64::new(0)),
            messages_sent_total: Arc::new(AtomicU64::new(0)),
            messages_failed_total: Arc::new(AtomicU64::new(0)),
            messages_rejected_total: Arc::new(AtomicU64::new(0)),
            retries_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record a provider call with duration.
    pub fn record_transport_request(&self, duration: Duration) {
        self.transport_requests_total.fetch_add(1, Ordering::Relaxed);
        self.transport_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a failed provider call.
    pub fn record_transport_error(&self) {
        self.transport_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sent(&self) {
        self.messages_sent_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.messages_failed_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.messages_rejected_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn transport_requests_total(&self) -> u64 {
        self.transport_requests_total.load(Ordering::Relaxed)
    }

    pub fn transport_errors_total(&self) -> u64 {
        self.transport_errors_total.load(Ordering::Relaxed)
    }

    pub fn transport_duration_total_ms(&self) -> u64 {
        self.transport_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average provider call duration in milliseconds.
    pub fn transport_duration_avg_ms(&self) -> f64 {
        let total = self.transport_duration_total_ms();
        let count = self.transport_requests_total();
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn messages_sent_total(&self) -> u64 {
        self.messages_sent_total.load(Ordering::Relaxed)
    }

    pub fn messages_failed_total(&self) -> u64 {
        self.messages_failed_total.load(Ordering::Relaxed)
    }

    pub fn messages_rejected_total(&self) -> u64 {
        self.messages_rejected_total.load(Ordering::Relaxed)
    }

    pub fn retries_total(&self) -> u64 {
        self.retries_total.load(Ordering::Relaxed)
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            transport_requests_total: self.transport_requests_total(),
            transport_errors_total: self.transport_errors_total(),
            transport_duration_avg_ms: self.transport_duration_avg_ms(),
            messages_sent_total: self.messages_sent_total(),
            messages_failed_total: self.messages_failed_total(),
            messages_rejected_total: self.messages_rejected_total(),
            retries_total: self.retries_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub transport_requests_total: u64,
    pub transport_errors_total: u64,
    pub transport_duration_avg_ms: f64,
    pub messages_sent_total: u64,
    pub messages_failed_total: u64,
    pub messages_rejected_total: u64,
    pub retries_total: u64,
}

/// Helper for timing provider calls.
pub struct TransportTimer {
    start: Instant,
    metrics: Metrics,
}

impl TransportTimer {
    /// Start timing a provider call.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        self.metrics.record_transport_request(self.start.elapsed());
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        self.metrics.record_transport_request(self.start.elapsed());
        self.metrics.record_transport_error();
    }
}
