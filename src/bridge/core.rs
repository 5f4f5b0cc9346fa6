//! Bridge bootstrap and handle.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::adapters::{CHROME_WEBVIEW_GLOBAL, ChromeWebview, QT_TRANSPORT_GLOBAL, QtTransport};
use crate::boundary::{Global, GlobalScope, InboundEntryPoint, OutboundFunction};
use crate::channel::{Channel, MESSAGE_EVENT};
use crate::error::Result;
use crate::transport::Outbound;

use super::builder::BridgeBuilder;
use super::config::BridgeConfig;

// ============================================================================
// Bridge
// ============================================================================

/// A bootstrapped guest environment.
///
/// Owns the channel, both legacy adapters and the global scope they are
/// installed into. Created through [`Bridge::builder`].
///
/// # Example
///
/// ```ignore
/// use webview_bridge::{Bridge, Listener, host_link};
///
/// let (sender, mut receiver) = host_link();
/// let bridge = Bridge::builder().outbound(sender).build()?;
///
/// bridge.qt_transport().set_onmessage(Listener::new(|event| {
///     println!("qt got {}", event.data);
///     Ok(())
/// }));
///
/// bridge.deliver_inbound(serde_json::json!({ "y": 2 }))?;
/// ```
pub struct Bridge {
    config: BridgeConfig,
    channel: Channel,
    qt: QtTransport,
    chrome: ChromeWebview,
    globals: GlobalScope,
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("config", &self.config)
            .field("channel", &self.channel)
            .field("globals", &self.globals.names())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Bridge - Bootstrap
// ============================================================================

impl Bridge {
    /// Creates a new bridge builder.
    #[inline]
    #[must_use]
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::new()
    }

    /// Runs bootstrap.
    ///
    /// 1. Creates the channel over `outbound`
    /// 2. Installs the inbound entry point, outbound function, channel and
    ///    both adapters into a fresh global scope
    /// 3. Registers the listener feeding `qt.webChannelTransport.onmessage`
    /// 4. Signals READY if configured
    pub(crate) fn bootstrap(config: BridgeConfig, outbound: Arc<dyn Outbound>) -> Result<Self> {
        let channel = Channel::new(Arc::clone(&outbound));
        let qt = QtTransport::new(channel.clone(), config.missing_handler);
        let chrome = ChromeWebview::new(channel.clone());

        let mut globals = GlobalScope::new();
        globals.install(
            config.inbound_global.as_str(),
            Global::InboundEntryPoint(InboundEntryPoint::new(channel.clone())),
        );
        globals.install(
            config.outbound_global.as_str(),
            Global::OutboundFunction(OutboundFunction::new(Arc::clone(&outbound))),
        );
        globals.install(config.channel_global.as_str(), Global::Channel(channel.clone()));
        globals.install(QT_TRANSPORT_GLOBAL, Global::QtTransport(qt.clone()));
        globals.install(CHROME_WEBVIEW_GLOBAL, Global::ChromeWebview(chrome.clone()));

        channel.subscribe(MESSAGE_EVENT, qt.forwarding_listener())?;

        if config.signal_ready {
            outbound.ready()?;
            debug!("READY signalled");
        }

        info!(
            inbound = %config.inbound_global,
            policy = ?config.missing_handler,
            "Bridge bootstrapped"
        );

        Ok(Self {
            config,
            channel,
            qt,
            chrome,
            globals,
        })
    }
}

// ============================================================================
// Bridge - Accessors
// ============================================================================

impl Bridge {
    /// Returns the configuration bootstrap ran with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Returns the channel.
    #[inline]
    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Returns `qt.webChannelTransport`.
    #[inline]
    #[must_use]
    pub fn qt_transport(&self) -> &QtTransport {
        &self.qt
    }

    /// Returns `chrome.webview`.
    #[inline]
    #[must_use]
    pub fn chrome_webview(&self) -> &ChromeWebview {
        &self.chrome
    }

    /// Returns the global scope.
    #[inline]
    #[must_use]
    pub fn globals(&self) -> &GlobalScope {
        &self.globals
    }
}

// ============================================================================
// Bridge - Host API
// ============================================================================

impl Bridge {
    /// Calls the installed inbound entry point with `payload`.
    ///
    /// Returns once every listener, including the `onmessage` forwarder, has
    /// run.
    ///
    /// # Errors
    ///
    /// - [`Error::GlobalNotFound`](crate::Error::GlobalNotFound) if the entry
    ///   point is missing
    /// - The first listener error, e.g.
    ///   [`Error::MissingHandler`](crate::Error::MissingHandler)
    pub fn deliver_inbound(&self, payload: Value) -> Result<()> {
        self.globals
            .inbound_entry_point(&self.config.inbound_global)?
            .call(payload)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use parking_lot::Mutex;
    use serde_json::json;

    use crate::bridge::MissingHandlerPolicy;
    use crate::channel::{Listener, MessageEvent};
    use crate::error::Error;
    use crate::transport::{HostMessage, host_link};

    type EventLog = Arc<Mutex<Vec<(&'static str, MessageEvent)>>>;

    fn recording(log: &EventLog, tag: &'static str) -> Listener {
        let log = Arc::clone(log);
        Listener::new(move |event| {
            log.lock().push((tag, event.clone()));
            Ok(())
        })
    }

    #[test]
    fn test_bootstrap_installs_globals() {
        let bridge = Bridge::builder()
            .outbound(|_: Value| -> Result<()> { Ok(()) })
            .build()
            .unwrap();

        assert_eq!(
            bridge.globals().names(),
            vec![
                "__onMessage",
                "__postMessage",
                "chrome.webview",
                "ipc",
                "qt.webChannelTransport",
            ]
        );
        // The onmessage forwarder.
        assert_eq!(bridge.channel().listener_count(), 1);
    }

    #[tokio::test]
    async fn test_end_to_end_over_host_link() {
        let (sender, mut receiver) = host_link();
        let bridge = Bridge::builder().outbound(sender).build().unwrap();

        receiver.wait_ready(Duration::from_secs(1)).await.unwrap();

        bridge.chrome_webview().post_message(json!({ "x": 1 })).unwrap();
        assert_eq!(
            receiver.try_recv().unwrap(),
            Some(HostMessage::Ipc(json!({ "x": 1 })))
        );
        assert_eq!(receiver.try_recv().unwrap(), None);

        let log: EventLog = Arc::default();
        bridge
            .channel()
            .subscribe("message", recording(&log, "ipc"))
            .unwrap();
        bridge
            .chrome_webview()
            .add_event_listener("message", recording(&log, "chrome"))
            .unwrap();
        bridge.qt_transport().set_onmessage(recording(&log, "qt"));

        bridge.deliver_inbound(json!({ "y": 2 })).unwrap();

        let expected = MessageEvent::new(json!({ "y": 2 }));
        let mut tags: Vec<_> = log.lock().iter().map(|(tag, _)| *tag).collect();
        tags.sort_unstable();
        assert_eq!(tags, vec!["chrome", "ipc", "qt"]);
        assert!(log.lock().iter().all(|(_, event)| *event == expected));
    }

    #[test]
    fn test_ready_precedes_ipc() {
        let (sender, mut receiver) = host_link();
        let bridge = Bridge::builder().outbound(sender).build().unwrap();
        bridge.qt_transport().send(json!("first")).unwrap();

        assert_eq!(receiver.try_recv().unwrap(), Some(HostMessage::Ready));
        assert_eq!(
            receiver.try_recv().unwrap(),
            Some(HostMessage::Ipc(json!("first")))
        );
    }

    #[test]
    fn test_ready_can_be_disabled() {
        let (sender, mut receiver) = host_link();
        let _bridge = Bridge::builder()
            .outbound(sender)
            .signal_ready(false)
            .build()
            .unwrap();

        assert_eq!(receiver.try_recv().unwrap(), None);
    }

    #[test]
    fn test_missing_onmessage_surfaces_error_after_all_listeners() {
        let bridge = Bridge::builder()
            .outbound(|_: Value| -> Result<()> { Ok(()) })
            .build()
            .unwrap();
        let log: EventLog = Arc::default();
        bridge
            .channel()
            .subscribe("message", recording(&log, "ipc"))
            .unwrap();

        let err = bridge.deliver_inbound(json!(1)).unwrap_err();
        assert!(matches!(err, Error::MissingHandler { .. }));
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_missing_onmessage_dropped_under_drop_policy() {
        let bridge = Bridge::builder()
            .outbound(|_: Value| -> Result<()> { Ok(()) })
            .missing_handler(MissingHandlerPolicy::Drop)
            .build()
            .unwrap();

        bridge.deliver_inbound(json!(1)).unwrap();
    }

    #[test]
    fn test_outbound_failure_reaches_every_adapter_caller() {
        let bridge = Bridge::builder()
            .outbound(|_: Value| -> Result<()> { Err(Error::transport("host gone")) })
            .signal_ready(false)
            .build()
            .unwrap();

        for result in [
            bridge.channel().send_outbound(json!(1)),
            bridge.qt_transport().send(json!(1)),
            bridge.chrome_webview().post_message(json!(1)),
        ] {
            assert!(matches!(
                result,
                Err(Error::Transport { ref message }) if message == "host gone"
            ));
        }
    }

    #[test]
    fn test_ready_failure_aborts_bootstrap() {
        let (sender, receiver) = host_link();
        drop(receiver);

        let err = Bridge::builder().outbound(sender).build().unwrap_err();
        assert!(matches!(err, Error::TransportClosed));
    }

    #[test]
    fn test_custom_inbound_global() {
        let bridge = Bridge::builder()
            .outbound(|_: Value| -> Result<()> { Ok(()) })
            .inbound_global("__hostToGuest")
            .missing_handler(MissingHandlerPolicy::Drop)
            .build()
            .unwrap();

        assert!(bridge.globals().contains("__hostToGuest"));
        assert!(!bridge.globals().contains("__postMessage"));
        bridge.deliver_inbound(json!(null)).unwrap();
    }
}
