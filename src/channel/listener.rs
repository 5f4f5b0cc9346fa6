//! Listener handles.
//!
//! A [`Listener`] is a shared callback. Two handles are the same listener
//! only if they point at the same allocation, mirroring reference equality
//! of functions in the guest.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::error::Result;

use super::event::MessageEvent;

// ============================================================================
// Types
// ============================================================================

/// Listener callback signature.
///
/// Returning an error does not stop dispatch to later listeners; the first
/// error is reported to whoever triggered the dispatch.
pub type ListenerFn = dyn Fn(&MessageEvent) -> Result<()> + Send + Sync;

// ============================================================================
// Listener
// ============================================================================

/// Reference-counted handle to a message listener.
///
/// Clone the handle to subscribe and later unsubscribe the same listener.
///
/// # Example
///
/// ```ignore
/// let listener = Listener::new(|event| {
///     println!("got {}", event.data);
///     Ok(())
/// });
/// channel.subscribe("message", listener.clone())?;
/// channel.unsubscribe("message", &listener)?;
/// ```
#[derive(Clone)]
pub struct Listener(Arc<ListenerFn>);

impl Listener {
    /// Wraps a callback into a new listener identity.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&MessageEvent) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    /// Invokes the listener with an event.
    #[inline]
    pub fn call(&self, event: &MessageEvent) -> Result<()> {
        (self.0)(event)
    }

    /// Returns `true` if both handles refer to the same listener.
    #[inline]
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_identity_is_by_reference() {
        let a = Listener::new(|_| Ok(()));
        let b = Listener::new(|_| Ok(()));
        let a2 = a.clone();

        assert_eq!(a, a2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_call_forwards_event() {
        let listener = Listener::new(|event| {
            assert_eq!(event.data, json!("ping"));
            Ok(())
        });
        listener.call(&MessageEvent::new(json!("ping"))).unwrap();
    }
}
