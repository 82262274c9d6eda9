//! PhoneNumber value object.

use super::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Country code prepended to bare national numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

static E164_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9]\d{7,14}$").expect("Failed to compile E.164 regex"));

static LOOSE_PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+\d{1,3})?\d{10}$").expect("Failed to compile phone regex"));

/// Strip everything except digits and a leading `+`.
///
/// The `+` is kept when it comes before the first digit, so wrappers such as
/// `"(+91) 98765-43210"` still read as international.
fn clean(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    let digits: String = kept.chars().filter(char::is_ascii_digit).collect();

    if kept.starts_with('+') {
        format!("+{}", digits)
    } else {
        digits
    }
}

/// Reformat a raw phone number into international form.
///
/// Bare 10-digit numbers get the Indian country code, and 11-digit numbers
/// with a trunk `0` lose the `0` first. Anything else is returned cleaned but
/// otherwise untouched, so the result is not guaranteed to be valid.
///
/// ```
/// use hash_notify::domain::phone::normalize;
///
/// assert_eq!(normalize("98765 43210"), "+919876543210");
/// assert_eq!(normalize("09876543210"), "+919876543210");
/// ```
pub fn normalize(raw: &str) -> String {
    let cleaned = clean(raw);

    if cleaned.starts_with('+') {
        return cleaned;
    }

    match cleaned.len() {
        10 => format!("{}{}", DEFAULT_COUNTRY_CODE, cleaned),
        11 if cleaned.starts_with('0') => format!("{}{}", DEFAULT_COUNTRY_CODE, &cleaned[1..]),
        _ => cleaned,
    }
}

/// Check whether a raw phone number looks dialable.
///
/// Accepts an optional `+` country code of 1-3 digits followed by exactly
/// ten digits, after stripping formatting characters.
pub fn validate(raw: &str) -> bool {
    LOOSE_PHONE_REGEX.is_match(&clean(raw))
}

/// A normalized, E.164-formatted phone number.
///
/// Instances can only be built through [`PhoneNumber::parse`], which runs
/// [`normalize`] and then enforces `^\+[1-9]\d{7,14}$`.
///
/// # Example
///
/// ```
/// use hash_notify::domain::PhoneNumber;
///
/// let phone = PhoneNumber::parse("+91 98765-43210").unwrap();
/// assert_eq!(phone.as_str(), "+919876543210");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize and validate a raw phone number.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPhone` carrying the raw input if the
    /// normalized form is not E.164.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = raw.as_ref();
        let normalized = normalize(raw);

        if !E164_REGEX.is_match(&normalized) {
            return Err(ValidationError::InvalidPhone(raw.to_string()));
        }

        Ok(Self(normalized))
    }

    /// Get the phone number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Render the number for logs, keeping only the last four digits.
    pub fn masked(&self) -> String {
        let visible = self.0.len().saturating_sub(4);
        format!("{}{}", "*".repeat(visible), &self.0[visible..])
    }
}

// Serde support - serialize as string
impl Serialize for PhoneNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

// Serde support - deserialize from string with normalization
impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PhoneNumber::parse(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_national_number() {
        assert_eq!(normalize("9876543210"), "+919876543210");
    }

    #[test]
    fn test_normalize_trunk_prefix() {
        assert_eq!(normalize("09876543210"), "+919876543210");
    }

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(normalize("+91 98765-43210"), "+919876543210");
        assert_eq!(normalize("(987) 654-3210"), "+919876543210");
        assert_eq!(normalize("(+91) 98765-43210"), "+919876543210");
        assert_eq!(normalize(" +91 (98765) 43210"), "+919876543210");
    }

    #[test]
    fn test_normalize_leaves_malformed_input() {
        assert_eq!(normalize("12345"), "12345");
        assert_eq!(normalize("19876543210"), "19876543210");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_drops_inner_plus() {
        assert_eq!(normalize("98765+43210"), "+919876543210");
    }

    #[test]
    fn test_validate() {
        assert!(validate("9876543210"));
        assert!(!validate("987654321"));
        assert!(validate("+1 9876543210"));
        assert!(validate("+91-98765-43210"));
        assert!(validate("+971 9876543210"));
        assert!(!validate("+9712 9876543210"));
        assert!(!validate("919876543210"));
        assert!(!validate(""));
    }

    #[test]
    fn test_parse_normalizes() {
        let phone = PhoneNumber::parse("098765 43210").unwrap();
        assert_eq!(phone.as_str(), "+919876543210");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert_eq!(
            PhoneNumber::parse("12345"),
            Err(ValidationError::InvalidPhone("12345".to_string()))
        );
        assert!(PhoneNumber::parse("").is_err());
        assert!(PhoneNumber::parse("+0123456789").is_err());
        assert!(PhoneNumber::parse("+1234567890123456").is_err());
    }

    #[test]
    fn test_parse_output_is_e164() {
        for raw in ["9876543210", "+1 (415) 555-2671", "+44 20 7946 0958", "09876543210"] {
            let phone = PhoneNumber::parse(raw).unwrap();
            assert!(E164_REGEX.is_match(phone.as_str()), "{} -> {}", raw, phone);
        }
    }

    #[test]
    fn test_masked() {
        let phone = PhoneNumber::parse("9876543210").unwrap();
        assert_eq!(phone.masked(), "*********3210");
    }

    #[test]
    fn test_phone_display() {
        let phone = PhoneNumber::parse("9876543210").unwrap();
        assert_eq!(format!("{}", phone), "+919876543210");
    }

    #[test]
    fn test_phone_serialization() {
        let phone = PhoneNumber::parse("9876543210").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+919876543210\"");
    }

    #[test]
    fn test_phone_deserialization_normalizes() {
        let phone: PhoneNumber = serde_json::from_str("\"98765 43210\"").unwrap();
        assert_eq!(phone.as_str(), "+919876543210");
    }

    #[test]
    fn test_phone_deserialization_invalid_fails() {
        let result: Result<PhoneNumber, _> = serde_json::from_str("\"invalid\"");
        assert!(result.is_err());
    }
}
