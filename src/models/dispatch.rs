//! Per-attempt dispatch outcomes and transport receipts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the SMS provider returns for an accepted message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageReceipt {
    /// Provider message identifier (Twilio: `sid`)
    #[serde(alias = "sid")]
    pub id: String,

    /// Provider delivery status (e.g. "queued")
    #[serde(default)]
    pub status: String,
}

/// Result of sending one message to one recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchResult {
    /// Recipient exactly as the caller gave it
    pub recipient: String,

    /// E.164 form actually sent to, absent when the recipient was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,

    pub success: bool,

    /// Provider message id when accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_id: Option<String>,

    /// Failure description when not accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Number of transport calls made (0 when rejected before sending)
    pub attempts: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

impl DispatchResult {
    /// Build a successful result from a transport receipt.
    pub fn delivered(recipient: impl Into<String>, receipt: MessageReceipt, attempts: u32) -> Self {
        Self {
            recipient: recipient.into(),
            normalized: None,
            success: true,
            transport_id: Some(receipt.id),
            error: None,
            attempts,
            sent_at: Some(Utc::now()),
        }
    }

    /// Build a failed result.
    pub fn failed(recipient: impl Into<String>, error: impl ToString, attempts: u32) -> Self {
        Self {
            recipient: recipient.into(),
            normalized: None,
            success: false,
            transport_id: None,
            error: Some(error.to_string()),
            attempts,
            sent_at: None,
        }
    }

    pub fn with_normalized(mut self, normalized: Option<String>) -> Self {
        self.normalized = normalized;
        self
    }
}
