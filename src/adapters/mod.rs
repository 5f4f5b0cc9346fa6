//! Legacy-shaped messaging surfaces.
//!
//! Guest code written for older hosts looks for one of two objects:
//!
//! | Global | Type | Outbound | Inbound |
//! |--------|------|----------|---------|
//! | `qt.webChannelTransport` | [`QtTransport`] | `send` | `onmessage` slot |
//! | `chrome.webview` | [`ChromeWebview`] | `postMessage` | `addEventListener` / `removeEventListener` |
//!
//! Both are thin views over one shared [`Channel`], so a message the host
//! delivers once is observable through either convention.
//!
//! The capabilities they share are expressed as [`MessageSender`] and
//! [`MessageSubscriber`], which [`Channel`] implements as well.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::channel::{Channel, Listener};
use crate::error::Result;

// ============================================================================
// Submodules
// ============================================================================

/// `chrome.webview` surface.
pub mod chrome;

/// `qt.webChannelTransport` surface.
pub mod qt;

// ============================================================================
// Re-exports
// ============================================================================

pub use chrome::{CHROME_WEBVIEW_GLOBAL, ChromeWebview};
pub use qt::{QT_ONMESSAGE_SLOT, QT_TRANSPORT_GLOBAL, QtTransport};

// ============================================================================
// Capability Traits
// ============================================================================

/// Surfaces that can send a payload to the host.
pub trait MessageSender {
    /// Sends `data` to the host unmodified.
    fn send_message(&self, data: Value) -> Result<()>;
}

/// Surfaces that can (un)register inbound `message` listeners.
pub trait MessageSubscriber {
    /// Registers a listener.
    fn add_message_listener(&self, event_name: &str, listener: Listener) -> Result<()>;

    /// Removes every registration of a listener.
    fn remove_message_listener(&self, event_name: &str, listener: &Listener) -> Result<()>;
}

impl MessageSender for Channel {
    fn send_message(&self, data: Value) -> Result<()> {
        self.send_outbound(data)
    }
}

impl MessageSubscriber for Channel {
    fn add_message_listener(&self, event_name: &str, listener: Listener) -> Result<()> {
        self.subscribe(event_name, listener)
    }

    fn remove_message_listener(&self, event_name: &str, listener: &Listener) -> Result<()> {
        self.unsubscribe(event_name, listener)
    }
}
