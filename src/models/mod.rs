//! Data models for notification dispatch.
//!
//! This module contains the orders and events the storefront hands to the
//! dispatcher, and the results it hands back.

pub mod dispatch;
pub mod event;
pub mod order;

pub use dispatch::{DispatchResult, MessageReceipt};
pub use event::DomainEvent;
pub use order::Order;
