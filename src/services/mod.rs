//! Application service layer.
//!
//! Services contain the dispatch logic and sit between the MCP handlers and
//! the SMS transport.

mod notification_service;
mod retry;

pub use notification_service::{NotificationDispatcher, NotificationService, CANCELLED};
pub use retry::RetryPolicy;
