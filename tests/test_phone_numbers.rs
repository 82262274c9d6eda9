use hash_notify::domain::{normalize, validate};
use hash_notify::{PhoneNumber, ValidationError};

#[test]
fn test_normalize_bare_indian_number() {
    assert_eq!(normalize("9876543210"), "+919876543210");
}

#[test]
fn test_normalize_trunk_prefix() {
    assert_eq!(normalize("09876543210"), "+919876543210");
}

#[test]
fn test_normalize_formatted_international() {
    assert_eq!(normalize("+91 98765-43210"), "+919876543210");
    assert_eq!(normalize("(987) 654-3210"), "+919876543210");
}

#[test]
fn test_plus_inside_brackets_is_kept() {
    for raw in ["(+91) 98765-43210", " +91 (98765) 43210"] {
        assert_eq!(normalize(raw), "+919876543210");
        assert!(validate(raw), "{}", raw);
        assert_eq!(
            PhoneNumber::parse(raw).unwrap().as_str(),
            "+919876543210"
        );
    }
}

#[test]
fn test_normalize_leaves_other_lengths_alone() {
    assert_eq!(normalize("12345"), "12345");
    assert_eq!(normalize("+1 415 555 0100"), "+14155550100");
}

#[test]
fn test_validate() {
    assert!(validate("9876543210"));
    assert!(!validate("987654321"));
    assert!(validate("+1 9876543210"));
    assert!(validate("+91-98765-43210"));
    assert!(!validate(""));
    assert!(!validate("98765432101234"));
}

#[test]
fn test_parse_rejects_short_numbers() {
    let err = PhoneNumber::parse("12345").unwrap_err();
    assert!(matches!(err, ValidationError::InvalidPhone(_)));
}

#[test]
fn test_parse_output_is_e164() {
    let e164 = regex::Regex::new(r"^\+[1-9]\d{7,14}$").unwrap();
    for raw in ["9876543210", "09876543210", "+91 98765 43210", "+1 (415) 555-0100"] {
        let phone = PhoneNumber::parse(raw).unwrap();
        assert!(e164.is_match(phone.as_str()), "{} -> {}", raw, phone);
    }
}

#[test]
fn test_phone_number_json() {
    let phone: PhoneNumber = serde_json::from_str(r#""98765 43210""#).unwrap();
    assert_eq!(phone.as_str(), "+919876543210");
    assert_eq!(serde_json::to_string(&phone).unwrap(), r#""+919876543210""#);
    assert!(serde_json::from_str::<PhoneNumber>(r#""abc""#).is_err());
}
