//! Domain value objects and types.
//!
//! This module contains type-safe wrappers for the values the dispatcher
//! passes to the transport. These value objects normalize and validate at
//! construction time so malformed numbers never reach the SMS provider.

pub mod errors;
pub mod message;
pub mod phone;

pub use errors::ValidationError;
pub use message::{Message, MAX_BODY_CHARS};
pub use phone::{normalize, validate, PhoneNumber};
