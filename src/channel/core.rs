//! Channel: listener registry, outbound forwarding and inbound fan-out.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::transport::Outbound;

use super::event::{EventKind, MessageEvent};
use super::listener::Listener;

// ============================================================================
// Types
// ============================================================================

/// Shared state behind every [`Channel`] handle.
struct ChannelInner {
    /// Registered listeners in dispatch order.
    listeners: RwLock<Vec<Listener>>,
    /// Outbound delivery collaborator.
    outbound: Arc<dyn Outbound>,
}

// ============================================================================
// Channel
// ============================================================================

/// The single relay between guest code and the host.
///
/// Cloning a `Channel` yields another handle to the same registry.
///
/// # Dispatch
///
/// [`Channel::dispatch`] takes a snapshot of the registry and releases the
/// lock before calling anything, so listeners may subscribe, unsubscribe or
/// dispatch again. Changes made during a dispatch apply from the next one.
#[derive(Clone)]
pub struct Channel {
    inner: Arc<ChannelInner>,
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Channel - Constructor
// ============================================================================

impl Channel {
    /// Creates a channel forwarding outbound payloads to `outbound`.
    pub fn new(outbound: Arc<dyn Outbound>) -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                listeners: RwLock::new(Vec::new()),
                outbound,
            }),
        }
    }
}

// ============================================================================
// Channel - Guest API
// ============================================================================

impl Channel {
    /// Forwards `data` unmodified to the outbound collaborator.
    ///
    /// # Errors
    ///
    /// Whatever the collaborator returns, unchanged.
    pub fn send_outbound(&self, data: Value) -> Result<()> {
        trace!("Forwarding outbound payload");
        self.inner.outbound.deliver(data)
    }

    /// Registers `listener` for every future inbound message.
    ///
    /// Subscribing the same listener twice registers it twice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEventKind`](crate::Error::UnsupportedEventKind)
    /// if `event_name` is not `"message"`.
    pub fn subscribe(&self, event_name: &str, listener: Listener) -> Result<()> {
        EventKind::parse(event_name)?;

        let mut listeners = self.inner.listeners.write();
        listeners.push(listener);
        debug!(count = listeners.len(), "Listener subscribed");
        Ok(())
    }

    /// Removes every registration of `listener`.
    ///
    /// Unknown listeners are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEventKind`](crate::Error::UnsupportedEventKind)
    /// if `event_name` is not `"message"`.
    pub fn unsubscribe(&self, event_name: &str, listener: &Listener) -> Result<()> {
        EventKind::parse(event_name)?;

        let mut listeners = self.inner.listeners.write();
        let before = listeners.len();
        listeners.retain(|registered| !registered.same_as(listener));
        debug!(
            removed = before - listeners.len(),
            count = listeners.len(),
            "Listener unsubscribed"
        );
        Ok(())
    }
}

// ============================================================================
// Channel - Inbound
// ============================================================================

impl Channel {
    /// Delivers an inbound payload to every registered listener.
    ///
    /// Listeners run synchronously in registration order. A failing listener
    /// does not stop the others.
    ///
    /// # Errors
    ///
    /// The first error returned by a listener, after all have run.
    pub fn dispatch(&self, data: Value) -> Result<()> {
        let event = MessageEvent::new(data);
        let snapshot = self.inner.listeners.read().clone();

        trace!(listeners = snapshot.len(), "Dispatching inbound message");

        let mut first_error = None;
        for (index, listener) in snapshot.iter().enumerate() {
            if let Err(e) = listener.call(&event) {
                warn!(index, error = %e, "Listener failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Returns the number of registrations.
    #[inline]
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.read().len()
    }

    /// Returns `true` if `listener` is registered at least once.
    #[must_use]
    pub fn is_subscribed(&self, listener: &Listener) -> bool {
        self.inner
            .listeners
            .read()
            .iter()
            .any(|registered| registered.same_as(listener))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use parking_lot::Mutex;
    use proptest::prelude::*;
    use serde_json::json;

    use crate::error::Error;

    fn silent_channel() -> Channel {
        Channel::new(Arc::new(|_: Value| -> Result<()> { Ok(()) }))
    }

    fn recording(log: &Arc<Mutex<Vec<(&'static str, Value)>>>, tag: &'static str) -> Listener {
        let log = Arc::clone(log);
        Listener::new(move |event| {
            log.lock().push((tag, event.data.clone()));
            Ok(())
        })
    }

    #[test]
    fn test_send_outbound_forwards_unchanged() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&sent);
        let channel = Channel::new(Arc::new(move |payload: Value| -> Result<()> {
            sink.lock().push(payload);
            Ok(())
        }));

        channel.send_outbound(json!({ "x": 1 })).unwrap();
        assert_eq!(*sent.lock(), vec![json!({ "x": 1 })]);
    }

    #[test]
    fn test_send_outbound_propagates_failure() {
        let channel = Channel::new(Arc::new(|_: Value| -> Result<()> {
            Err(Error::transport("boom"))
        }));
        let err = channel.send_outbound(json!(1)).unwrap_err();
        assert!(matches!(err, Error::Transport { ref message } if message == "boom"));
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let channel = silent_channel();
        let log = Arc::new(Mutex::new(Vec::new()));

        for tag in ["l1", "l2", "l3"] {
            channel.subscribe("message", recording(&log, tag)).unwrap();
        }
        channel.dispatch(json!({ "y": 2 })).unwrap();

        let tags: Vec<_> = log.lock().iter().map(|(tag, _)| *tag).collect();
        assert_eq!(tags, vec!["l1", "l2", "l3"]);
        assert!(log.lock().iter().all(|(_, data)| *data == json!({ "y": 2 })));
    }

    #[test]
    fn test_unsupported_event_leaves_registry_untouched() {
        let channel = silent_channel();
        let log = Arc::new(Mutex::new(Vec::new()));
        let listener = recording(&log, "a");
        channel.subscribe("message", listener.clone()).unwrap();

        let err = channel.subscribe("click", listener.clone()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedEventKind { ref event } if event == "click"));
        assert_eq!(channel.listener_count(), 1);

        let err = channel.unsubscribe("click", &listener).unwrap_err();
        assert!(matches!(err, Error::UnsupportedEventKind { .. }));
        assert!(channel.is_subscribed(&listener));
    }

    #[test]
    fn test_duplicate_subscription_and_removal() {
        let channel = silent_channel();
        let log = Arc::new(Mutex::new(Vec::new()));
        let listener = recording(&log, "dup");
        let other = recording(&log, "other");

        channel.subscribe("message", listener.clone()).unwrap();
        channel.subscribe("message", other.clone()).unwrap();
        channel.subscribe("message", listener.clone()).unwrap();
        channel.dispatch(json!(1)).unwrap();
        assert_eq!(log.lock().iter().filter(|(tag, _)| *tag == "dup").count(), 2);

        channel.unsubscribe("message", &listener).unwrap();
        assert_eq!(channel.listener_count(), 1);
        assert!(!channel.is_subscribed(&listener));

        log.lock().clear();
        channel.dispatch(json!(2)).unwrap();
        assert_eq!(*log.lock(), vec![("other", json!(2))]);
    }

    #[test]
    fn test_unsubscribe_unknown_is_noop() {
        let channel = silent_channel();
        let stranger = Listener::new(|_| Ok(()));
        channel.unsubscribe("message", &stranger).unwrap();
        assert_eq!(channel.listener_count(), 0);
    }

    #[test]
    fn test_failing_listener_does_not_stop_dispatch() {
        let channel = silent_channel();
        let log = Arc::new(Mutex::new(Vec::new()));

        channel
            .subscribe("message", Listener::new(|_| Err(Error::missing_handler("slot"))))
            .unwrap();
        channel.subscribe("message", recording(&log, "after")).unwrap();

        let err = channel.dispatch(json!("x")).unwrap_err();
        assert!(matches!(err, Error::MissingHandler { .. }));
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_subscribe_during_dispatch_applies_next_time() {
        let channel = silent_channel();
        let log = Arc::new(Mutex::new(Vec::new()));
        let late = recording(&log, "late");

        let handle = channel.clone();
        let late_clone = late.clone();
        let adder = Listener::new(move |_| {
            if !handle.is_subscribed(&late_clone) {
                handle.subscribe("message", late_clone.clone())?;
            }
            Ok(())
        });
        channel.subscribe("message", adder).unwrap();

        channel.dispatch(json!(1)).unwrap();
        assert!(log.lock().is_empty());

        channel.dispatch(json!(2)).unwrap();
        assert_eq!(*log.lock(), vec![("late", json!(2))]);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_applies_next_time() {
        let channel = silent_channel();
        let log = Arc::new(Mutex::new(Vec::new()));
        let victim = recording(&log, "victim");

        let handle = channel.clone();
        let victim_clone = victim.clone();
        channel
            .subscribe(
                "message",
                Listener::new(move |_| handle.unsubscribe("message", &victim_clone)),
            )
            .unwrap();
        channel.subscribe("message", victim).unwrap();

        channel.dispatch(json!(1)).unwrap();
        channel.dispatch(json!(2)).unwrap();
        assert_eq!(*log.lock(), vec![("victim", json!(1))]);
    }

    proptest! {
        #[test]
        fn prop_every_listener_sees_every_delivery(
            listener_count in 1usize..6,
            payloads in proptest::collection::vec(any::<i64>(), 0..20),
        ) {
            let channel = silent_channel();
            let logs: Vec<_> = (0..listener_count)
                .map(|_| Arc::new(Mutex::new(Vec::new())))
                .collect();

            for log in &logs {
                let log = Arc::clone(log);
                channel
                    .subscribe("message", Listener::new(move |event| {
                        log.lock().push(event.data.clone());
                        Ok(())
                    }))
                    .unwrap();
            }

            for payload in &payloads {
                channel.dispatch(json!(payload)).unwrap();
            }

            let expected: Vec<Value> = payloads.iter().map(|p| json!(p)).collect();
            for log in &logs {
                prop_assert_eq!(&*log.lock(), &expected);
            }
        }
    }
}
