//! Domain validation errors.

use std::fmt;

/// Errors that can occur during domain value object validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided phone number cannot be normalized to E.164 form.
    InvalidPhone(String),

    /// The message body is empty.
    EmptyMessage,

    /// The message body exceeds the transport limit.
    MessageTooLong { length: usize, max: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPhone(phone) => write!(f, "Invalid phone number: {}", phone),
            Self::EmptyMessage => write!(f, "Message body cannot be empty"),
            Self::MessageTooLong { length, max } => {
                write!(f, "Message body too long ({} characters, max {})", length, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
