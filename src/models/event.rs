//! Domain events that trigger a customer notification.

use super::order::Order;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A notification-worthy event. Each variant carries exactly what its
/// template needs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Login/sign-up verification code
    Otp { otp: String, name: String },

    /// Order placed and paid
    OrderConfirmed { order: Order },

    /// Order handed to the courier
    Shipped { order: Order },

    /// Order out for delivery, with the handover OTP
    DeliveryOtp { order: Order, otp: String },

    /// Any other order status transition
    StatusChanged { order: Order, status: String },

    /// Password reset code
    PasswordReset { code: String, name: String },

    /// Marketing blast
    Promotional { body: String, name: String },
}

impl DomainEvent {
    /// Short name used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Otp { .. } => "otp",
            Self::OrderConfirmed { .. } => "order_confirmed",
            Self::Shipped { .. } => "shipped",
            Self::DeliveryOtp { .. } => "delivery_otp",
            Self::StatusChanged { .. } => "status_changed",
            Self::PasswordReset { .. } => "password_reset",
            Self::Promotional { .. } => "promotional",
        }
    }

    /// The order this event concerns, if any.
    pub fn order(&self) -> Option<&Order> {
        match self {
            Self::OrderConfirmed { order }
            | Self::Shipped { order }
            | Self::DeliveryOtp { order, .. }
            | Self::StatusChanged { order, .. } => Some(order),
            _ => None,
        }
    }
}
