//! HASH India notification dispatcher.
//!
//! Sends the storefront's customer SMS (OTPs, order confirmations, shipping
//! and delivery updates, password resets, promotional blasts) through an
//! injected SMS transport, and exposes the same operations over MCP.
//!
//! # Architecture
//!
//! - **domain**: `PhoneNumber` normalization/validation and the `Message` value object
//! - **models**: orders, domain events and dispatch results
//! - **templates**: event → SMS body rendering
//! - **client**: Twilio HTTP client and the `SmsTransport` seam
//! - **rate_limit**: token-bucket pacing for outbound sends
//! - **services**: the `NotificationDispatcher` (send, batch, retries, cancellation)
//! - **metrics**: dispatch and transport counters
//! - **config**: configuration from environment variables
//! - **error**: error types for config, transport and dispatch failures
//! - **server**: MCP protocol server

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod server;
pub mod services;
pub mod templates;

pub use client::{AsyncTwilioTransport, NoopTransport, SmsTransport, TwilioClient};
pub use config::{Config, SmsBackend};
pub use domain::{Message, PhoneNumber, ValidationError};
pub use error::{ConfigError, DispatchError, TransportError};
pub use metrics::{Metrics, MetricsSummary};
pub use models::{DispatchResult, DomainEvent, MessageReceipt, Order};
pub use rate_limit::RateLimiter;
pub use server::HashNotifyServer;
pub use services::{NotificationDispatcher, NotificationService, RetryPolicy};
pub use templates::TemplateRenderer;
