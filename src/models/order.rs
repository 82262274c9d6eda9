//! Order model carrying the fields order notifications need.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A storefront order, as seen by the notification layer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Human-facing order number (e.g. "HASH-1042")
    pub order_number: String,

    /// Name the customer gave at checkout
    pub customer_name: String,

    /// Contact phone from the shipping address, unnormalized
    pub phone: String,

    /// Order total in rupees
    pub total: f64,

    /// Courier tracking number, once shipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

impl Order {
    /// Tracking number if present and non-blank.
    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_number
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_deserialization() {
        let json = r#"{
            "orderNumber": "HASH-1042",
            "customerName": "Asha",
            "phone": "98765 43210",
            "total": 1299.5
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_number, "HASH-1042");
        assert_eq!(order.customer_name, "Asha");
        assert_eq!(order.total, 1299.5);
        assert!(order.tracking_number.is_none());
    }

    #[test]
    fn test_blank_tracking_number_is_absent() {
        let order = Order {
            tracking_number: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(order.tracking_number(), None);
    }
}
