//! Message value object.

use super::errors::ValidationError;
use super::phone::PhoneNumber;
use serde::Serialize;

/// Maximum body length accepted by the SMS transport (concatenated segments).
pub const MAX_BODY_CHARS: usize = 1600;

/// An outbound SMS, ready to hand to a transport.
///
/// Bodies are plain text and are not escaped; callers are responsible for
/// sanitizing any free text they interpolate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    recipient: PhoneNumber,
    body: String,
}

impl Message {
    /// Create a new Message, validating the body.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyMessage` for a blank body and
    /// `ValidationError::MessageTooLong` past [`MAX_BODY_CHARS`].
    pub fn new(recipient: PhoneNumber, body: impl Into<String>) -> Result<Self, ValidationError> {
        let body = body.into();

        if body.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }

        let length = body.chars().count();
        if length > MAX_BODY_CHARS {
            return Err(ValidationError::MessageTooLong {
                length,
                max: MAX_BODY_CHARS,
            });
        }

        Ok(Self { recipient, body })
    }

    pub fn recipient(&self) -> &PhoneNumber {
        &self.recipient
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}
