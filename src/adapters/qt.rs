//! `qt.webChannelTransport` surface.
//!
//! The Qt WebChannel transport has a single outbound method, `send`, and a
//! single inbound callback slot, `onmessage`, which guest code assigns
//! directly. The slot is fed by a listener bootstrap registers on the
//! shared channel.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::bridge::MissingHandlerPolicy;
use crate::channel::{Channel, Listener, MessageEvent};
use crate::error::{Error, Result};

use super::MessageSender;

// ============================================================================
// Constants
// ============================================================================

/// Global path legacy guest code probes for.
pub const QT_TRANSPORT_GLOBAL: &str = "qt.webChannelTransport";

/// Path of the inbound callback slot.
pub const QT_ONMESSAGE_SLOT: &str = "qt.webChannelTransport.onmessage";

// ============================================================================
// Types
// ============================================================================

/// The `onmessage` slot and how to treat it when empty.
struct OnMessageSlot {
    handler: RwLock<Option<Listener>>,
    policy: MissingHandlerPolicy,
}

impl OnMessageSlot {
    fn deliver(&self, event: &MessageEvent) -> Result<()> {
        let handler = self.handler.read().clone();

        match (handler, self.policy) {
            (Some(handler), _) => handler.call(event),
            (None, MissingHandlerPolicy::Error) => Err(Error::missing_handler(QT_ONMESSAGE_SLOT)),
            (None, MissingHandlerPolicy::Drop) => {
                debug!(slot = QT_ONMESSAGE_SLOT, "Message dropped, slot unset");
                Ok(())
            }
        }
    }
}

// ============================================================================
// QtTransport
// ============================================================================

/// `qt.webChannelTransport` view over a [`Channel`].
#[derive(Clone)]
pub struct QtTransport {
    channel: Channel,
    onmessage: Arc<OnMessageSlot>,
}

impl fmt::Debug for QtTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QtTransport")
            .field("channel", &self.channel)
            .field("has_onmessage", &self.has_onmessage())
            .field("policy", &self.onmessage.policy)
            .finish()
    }
}

impl QtTransport {
    /// Creates the surface over `channel` with an empty `onmessage` slot.
    #[must_use]
    pub fn new(channel: Channel, policy: MissingHandlerPolicy) -> Self {
        Self {
            channel,
            onmessage: Arc::new(OnMessageSlot {
                handler: RwLock::new(None),
                policy,
            }),
        }
    }

    /// `send(data)`.
    pub fn send(&self, data: Value) -> Result<()> {
        self.channel.send_outbound(data)
    }

    /// Assigns `onmessage`, returning the previous handler.
    pub fn set_onmessage(&self, handler: Listener) -> Option<Listener> {
        self.onmessage.handler.write().replace(handler)
    }

    /// Clears `onmessage`, returning the previous handler.
    pub fn clear_onmessage(&self) -> Option<Listener> {
        self.onmessage.handler.write().take()
    }

    /// Returns the current `onmessage` handler.
    #[must_use]
    pub fn onmessage(&self) -> Option<Listener> {
        self.onmessage.handler.read().clone()
    }

    /// Returns `true` if `onmessage` is assigned.
    #[must_use]
    pub fn has_onmessage(&self) -> bool {
        self.onmessage.handler.read().is_some()
    }

    /// Returns the policy applied when `onmessage` is unset.
    #[inline]
    #[must_use]
    pub fn missing_handler_policy(&self) -> MissingHandlerPolicy {
        self.onmessage.policy
    }

    /// Invokes `onmessage` with `event`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingHandler`] if the slot is unset under
    ///   [`MissingHandlerPolicy::Error`]
    /// - Whatever the handler returns
    pub fn deliver(&self, event: &MessageEvent) -> Result<()> {
        self.onmessage.deliver(event)
    }

    /// Builds the channel listener that forwards every message to `onmessage`.
    ///
    /// The listener holds only the slot, not the channel, so registering it
    /// on the channel does not create a reference cycle.
    #[must_use]
    pub fn forwarding_listener(&self) -> Listener {
        let slot = Arc::clone(&self.onmessage);
        Listener::new(move |event| slot.deliver(event))
    }
}

impl MessageSender for QtTransport {
    fn send_message(&self, data: Value) -> Result<()> {
        self.send(data)
    }
}

// ============================================================================
// Tests
// ============================================================================
