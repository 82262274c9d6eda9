use hash_notify::{DomainEvent, Order, TemplateRenderer};

fn renderer() -> TemplateRenderer {
    TemplateRenderer::new("https://hashindia.in")
}

fn order(tracking_number: Option<&str>) -> Order {
    Order {
        order_number: "HASH-1042".to_string(),
        customer_name: "Asha".to_string(),
        phone: "9876543210".to_string(),
        total: 2499.0,
        tracking_number: tracking_number.map(str::to_string),
    }
}

fn status_changed(status: &str) -> DomainEvent {
    DomainEvent::StatusChanged {
        order: order(None),
        status: status.to_string(),
    }
}

#[test]
fn test_shipped_includes_tracking_number_when_set() {
    let body = renderer().render(&DomainEvent::Shipped {
        order: order(Some("TRK1")),
    });
    assert!(body.contains("Tracking: TRK1"));
    assert!(body.ends_with("Track at: https://hashindia.in/track-order/HASH-1042"));
}

#[test]
fn test_shipped_omits_tracking_number_when_missing() {
    let body = renderer().render(&DomainEvent::Shipped { order: order(None) });
    assert!(!body.contains("Tracking:"));

    let body = renderer().render(&DomainEvent::Shipped {
        order: order(Some("  ")),
    });
    assert!(!body.contains("Tracking:"));
}

#[test]
fn test_status_with_known_suffix() {
    let body = renderer().render(&status_changed("delivered"));
    assert!(body.ends_with("Thank you for shopping with us!"));

    let body = renderer().render(&status_changed("packed"));
    assert!(body.ends_with("Your order has been packed and ready for shipment."));
}

#[test]
fn test_status_without_suffix() {
    let body = renderer().render(&status_changed("unknown_status"));
    assert_eq!(body, "Hi Asha! Your order #HASH-1042 is now unknown_status");
}

#[test]
fn test_order_confirmation_total() {
    let body = renderer().render(&DomainEvent::OrderConfirmed { order: order(None) });
    assert!(body.contains("Total: ₹2499.00."));
}

#[test]
fn test_promotional_with_name() {
    let body = renderer().render(&DomainEvent::Promotional {
        body: "New arrivals are in.".to_string(),
        name: "Asha".to_string(),
    });
    assert_eq!(body, "Hi Asha! New arrivals are in.\n\nReply STOP to opt out.");
}

#[test]
fn test_event_from_json() {
    let event: DomainEvent = serde_json::from_str(
        r#"{
            "type": "delivery_otp",
            "order": {
                "orderNumber": "HASH-7",
                "customerName": "Ravi",
                "phone": "9876543210",
                "total": 10.0
            },
            "otp": "1122"
        }"#,
    )
    .unwrap();

    let body = renderer().render(&event);
    assert_eq!(
        body,
        "Hi Ravi! Your order #HASH-7 is out for delivery. Share this OTP with delivery partner: 1122. Valid for 24 hours."
    );
}
