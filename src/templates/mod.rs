//! SMS message templates.
//!
//! Maps each [`DomainEvent`](crate::models::DomainEvent) to the plain-text
//! body sent to the customer.

mod sms_templates;

pub use sms_templates::{status_suffix, TemplateRenderer};
