//! Error types for the webview bridge.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use webview_bridge::{Bridge, Result};
//!
//! fn example(bridge: &Bridge) -> Result<()> {
//!     bridge.chrome_webview().post_message(serde_json::json!({ "x": 1 }))?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Subscription | [`Error::UnsupportedEventKind`] |
//! | Dispatch | [`Error::MissingHandler`] |
//! | Transport | [`Error::Transport`], [`Error::TransportClosed`], [`Error::ReadyTimeout`] |
//! | Boundary | [`Error::GlobalNotFound`], [`Error::AlreadyInstalled`] |
//! | Configuration | [`Error::Config`] |
//! | External | [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Subscription Errors
    // ========================================================================
    /// Event name other than `"message"` passed to subscribe/unsubscribe.
    ///
    /// The registry is left untouched when this is returned.
    #[error("Unsupported event: {event}")]
    UnsupportedEventKind {
        /// The rejected event name.
        event: String,
    },

    // ========================================================================
    // Dispatch Errors
    // ========================================================================
    /// A legacy inbound callback slot was empty when a message arrived.
    #[error("No handler registered for {slot}")]
    MissingHandler {
        /// Global path of the empty slot.
        slot: String,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Failure raised by an outbound delivery function.
    ///
    /// Returned unchanged to whoever called the outbound path.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// Host side of the link has gone away.
    #[error("Transport closed")]
    TransportClosed,

    /// READY was not observed on the host link in time.
    #[error("READY not received after {timeout_ms}ms")]
    ReadyTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Boundary Errors
    // ========================================================================
    /// No global of the requested name and shape is installed.
    #[error("Global not found: {name}")]
    GlobalNotFound {
        /// Name that was looked up.
        name: String,
    },

    /// A bridge is already installed for this process.
    #[error("Bridge already installed")]
    AlreadyInstalled,

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when bridge configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an unsupported event kind error.
    #[inline]
    pub fn unsupported_event_kind(event: impl Into<String>) -> Self {
        Self::UnsupportedEventKind {
            event: event.into(),
        }
    }

    /// Creates a missing handler error.
    #[inline]
    pub fn missing_handler(slot: impl Into<String>) -> Self {
        Self::MissingHandler { slot: slot.into() }
    }

    /// Creates a transport error.
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a READY timeout error.
    #[inline]
    pub fn ready_timeout(timeout_ms: u64) -> Self {
        Self::ReadyTimeout { timeout_ms }
    }

    /// Creates a global not found error.
    #[inline]
    pub fn global_not_found(name: impl Into<String>) -> Self {
        Self::GlobalNotFound { name: name.into() }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error came from the transport collaborator.
    #[inline]
    #[must_use]
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::TransportClosed | Self::ReadyTimeout { .. }
        )
    }

    /// Returns `true` if the caller misused the guest-facing API.
    #[inline]
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedEventKind { .. } | Self::MissingHandler { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
