//! Message event envelope and event kinds.
//!
//! Inbound payloads reach listeners wrapped in a [`MessageEvent`], the same
//! `{ data }` shape browser messaging APIs hand to `message` listeners.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// The only event name the channel accepts.
pub const MESSAGE_EVENT: &str = "message";

// ============================================================================
// EventKind
// ============================================================================

/// Event kinds a listener can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Inbound host-to-guest message.
    Message,
}

impl EventKind {
    /// Parses an event name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEventKind`] for anything but `"message"`.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            MESSAGE_EVENT => Ok(Self::Message),
            other => Err(Error::unsupported_event_kind(other)),
        }
    }

    /// Returns the event name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Message => MESSAGE_EVENT,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// MessageEvent
// ============================================================================

/// Envelope around one delivered payload.
///
/// # Format
///
/// ```json
/// { "data": <payload> }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// The raw payload, exactly as sent.
    pub data: Value,
}

impl MessageEvent {
    /// Wraps a payload.
    #[inline]
    #[must_use]
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// Consumes the event, returning the payload.
    #[inline]
    #[must_use]
    pub fn into_data(self) -> Value {
        self.data
    }
}

impl From<Value> for MessageEvent {
    fn from(data: Value) -> Self {
        Self::new(data)
    }
}

// ============================================================================
// Tests
// ============================================================================
