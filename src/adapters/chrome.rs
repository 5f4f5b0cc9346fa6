//! `chrome.webview` surface.
//!
//! Mirrors the WebView2 guest API: `postMessage` for outbound traffic and
//! `addEventListener("message", …)` for inbound.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::channel::{Channel, Listener};
use crate::error::Result;

use super::{MessageSender, MessageSubscriber};

// ============================================================================
// Constants
// ============================================================================

/// Global path legacy guest code probes for.
pub const CHROME_WEBVIEW_GLOBAL: &str = "chrome.webview";

// ============================================================================
// ChromeWebview
// ============================================================================

/// `chrome.webview` view over a [`Channel`].
#[derive(Debug, Clone)]
pub struct ChromeWebview {
    channel: Channel,
}

impl ChromeWebview {
    /// Creates the surface over `channel`.
    #[inline]
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// `postMessage(data)`.
    pub fn post_message(&self, data: Value) -> Result<()> {
        self.channel.send_outbound(data)
    }

    /// `addEventListener(name, listener)`.
    pub fn add_event_listener(&self, event_name: &str, listener: Listener) -> Result<()> {
        self.channel.subscribe(event_name, listener)
    }

    /// `removeEventListener(name, listener)`.
    pub fn remove_event_listener(&self, event_name: &str, listener: &Listener) -> Result<()> {
        self.channel.unsubscribe(event_name, listener)
    }
}

impl MessageSender for ChromeWebview {
    fn send_message(&self, data: Value) -> Result<()> {
        self.post_message(data)
    }
}

impl MessageSubscriber for ChromeWebview {
    fn add_message_listener(&self, event_name: &str, listener: Listener) -> Result<()> {
        self.add_event_listener(event_name, listener)
    }

    fn remove_message_listener(&self, event_name: &str, listener: &Listener) -> Result<()> {
        self.remove_event_listener(event_name, listener)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use parking_lot::Mutex;
    use serde_json::json;

    use crate::error::Error;

    #[test]
    fn test_post_message_reaches_outbound_once() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&sent);
        let channel = Channel::new(Arc::new(move |payload: Value| -> Result<()> {
            sink.lock().push(payload);
            Ok(())
        }));
        let webview = ChromeWebview::new(channel);

        webview.post_message(json!({ "x": 1 })).unwrap();
        assert_eq!(*sent.lock(), vec![json!({ "x": 1 })]);
    }

    #[test]
    fn test_listeners_share_the_channel_registry() {
        let channel = Channel::new(Arc::new(|_: Value| -> Result<()> { Ok(()) }));
        let webview = ChromeWebview::new(channel.clone());
        let listener = Listener::new(|_| Ok(()));

        webview.add_event_listener("message", listener.clone()).unwrap();
        assert!(channel.is_subscribed(&listener));

        webview.remove_event_listener("message", &listener).unwrap();
        assert_eq!(channel.listener_count(), 0);
    }

    #[test]
    fn test_rejects_other_events() {
        let channel = Channel::new(Arc::new(|_: Value| -> Result<()> { Ok(()) }));
        let webview = ChromeWebview::new(channel.clone());
        let listener = Listener::new(|_| Ok(()));

        assert!(matches!(
            webview.add_event_listener("click", listener.clone()),
            Err(Error::UnsupportedEventKind { .. })
        ));
        assert!(matches!(
            webview.remove_event_listener("click", &listener),
            Err(Error::UnsupportedEventKind { .. })
        ));
        assert_eq!(channel.listener_count(), 0);
    }

    #[test]
    fn test_usable_through_capability_traits() {
        fn wire(
            surface: &(impl MessageSender + MessageSubscriber),
            listener: Listener,
        ) -> Result<()> {
            surface.add_message_listener("message", listener)?;
            surface.send_message(json!("hello"))
        }

        let channel = Channel::new(Arc::new(|_: Value| -> Result<()> { Ok(()) }));
        let listener = Listener::new(|_| Ok(()));

        wire(&ChromeWebview::new(channel.clone()), listener.clone()).unwrap();
        wire(&channel, listener.clone()).unwrap();
        assert_eq!(channel.listener_count(), 2);
    }
}
