//! Event-to-SMS body rendering.

use crate::models::{DomainEvent, Order};

/// Renders SMS bodies for domain events.
///
/// Values are interpolated verbatim. SMS is plain text, so nothing is
/// escaped; free text from users (e.g. a promotional body) must be
/// sanitized by the caller.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    storefront_url: String,
}

impl TemplateRenderer {
    /// Create a renderer that builds tracking links under `storefront_url`.
    pub fn new(storefront_url: impl Into<String>) -> Self {
        Self {
            storefront_url: storefront_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Public tracking page for an order.
    pub fn tracking_url(&self, order: &Order) -> String {
        format!(
            "{}/track-order/{}",
            self.storefront_url,
            urlencoding::encode(&order.order_number)
        )
    }

    /// Render the SMS body for an event.
    pub fn render(&self, event: &DomainEvent) -> String {
        match event {
            DomainEvent::Otp { otp, name } => format!(
                "Hello {}! Your verification code is: {}. Expires in 10 minutes. Do not share.",
                name, otp
            ),
            DomainEvent::OrderConfirmed { order } => format!(
                "Hi {}! Your order #{} has been confirmed. Total: {}. Track at: {}",
                order.customer_name,
                order.order_number,
                format_total(order.total),
                self.tracking_url(order)
            ),
            DomainEvent::Shipped { order } => {
                let mut body = format!(
                    "Hi {}! Your order #{} has been shipped",
                    order.customer_name, order.order_number
                );
                if let Some(tracking) = order.tracking_number() {
                    body.push_str(&format!(". Tracking: {}", tracking));
                }
                body.push_str(&format!(". Track at: {}", self.tracking_url(order)));
                body
            }
            DomainEvent::DeliveryOtp { order, otp } => format!(
                "Hi {}! Your order #{} is out for delivery. Share this OTP with delivery partner: {}. Valid for 24 hours.",
                order.customer_name, order.order_number, otp
            ),
            DomainEvent::StatusChanged { order, status } => {
                let base = format!(
                    "Hi {}! Your order #{} is now {}",
                    order.customer_name, order.order_number, status
                );
                match status_suffix(status) {
                    Some(suffix) => format!("{}. {}", base, suffix),
                    None => base,
                }
            }
            DomainEvent::PasswordReset { code, name } => format!(
                "Hi {}! Your password reset code is: {}. Expires in 1 hour. Do not share.",
                name, code
            ),
            DomainEvent::Promotional { body, name } => {
                if name.trim().is_empty() {
                    format!("{}\n\nReply STOP to opt out.", body)
                } else {
                    format!("Hi {}! {}\n\nReply STOP to opt out.", name, body)
                }
            }
        }
    }
}

/// Extra sentence appended to a status-change message, if the status has one.
pub fn status_suffix(status: &str) -> Option<&'static str> {
    match status.trim().to_ascii_lowercase().as_str() {
        "confirmed" => Some("We're preparing your order."),
        "packed" => Some("Your order has been packed and ready for shipment."),
        "delivered" => Some("Thank you for shopping with us!"),
        "cancelled" => Some("If you have any questions, contact our support."),
        _ => None,
    }
}

fn format_total(total: f64) -> String {
    format!("₹{:.2}", total)
}
