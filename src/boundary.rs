//! Boundary registry.
//!
//! The native host cannot call arbitrary guest-scoped functions; it needs a
//! fixed, discoverable name. [`GlobalScope`] is that set of names. It is
//! populated once by bootstrap and read by everyone else.
//!
//! # Installed Globals
//!
//! | Name (default) | Entry | Called by |
//! |----------------|-------|-----------|
//! | `__postMessage` | [`InboundEntryPoint`] | host |
//! | `__onMessage` | [`OutboundFunction`] | channel |
//! | `ipc` | [`Channel`] | guest |
//! | `qt.webChannelTransport` | [`QtTransport`] | legacy guest |
//! | `chrome.webview` | [`ChromeWebview`] | legacy guest |
//!
//! A bridge can additionally be installed process-wide with [`install`], after
//! which [`deliver_inbound`] reaches it without a handle.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::adapters::{CHROME_WEBVIEW_GLOBAL, ChromeWebview, QT_TRANSPORT_GLOBAL, QtTransport};
use crate::bridge::Bridge;
use crate::channel::Channel;
use crate::error::{Error, Result};
use crate::transport::Outbound;

// ============================================================================
// InboundEntryPoint
// ============================================================================

/// Host-facing function that pushes a payload into the channel.
#[derive(Debug, Clone)]
pub struct InboundEntryPoint {
    channel: Channel,
}

impl InboundEntryPoint {
    /// Creates an entry point dispatching into `channel`.
    #[inline]
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// Delivers `payload` to every listener, returning after all have run.
    pub fn call(&self, payload: Value) -> Result<()> {
        trace!("Inbound delivery");
        self.channel.dispatch(payload)
    }
}

// ============================================================================
// OutboundFunction
// ============================================================================

/// The outbound delivery function as it appears in the global scope.
#[derive(Clone)]
pub struct OutboundFunction(Arc<dyn Outbound>);

impl OutboundFunction {
    /// Wraps an outbound collaborator.
    #[inline]
    #[must_use]
    pub fn new(outbound: Arc<dyn Outbound>) -> Self {
        Self(outbound)
    }

    /// Calls the collaborator directly.
    pub fn call(&self, payload: Value) -> Result<()> {
        self.0.deliver(payload)
    }
}

impl fmt::Debug for OutboundFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OutboundFunction")
    }
}

// ============================================================================
// Global
// ============================================================================

/// One named entry of the global scope.
#[derive(Debug, Clone)]
pub enum Global {
    /// Host-to-guest delivery function.
    InboundEntryPoint(InboundEntryPoint),
    /// Guest-to-host delivery function.
    OutboundFunction(OutboundFunction),
    /// The channel surface.
    Channel(Channel),
    /// `qt.webChannelTransport`.
    QtTransport(QtTransport),
    /// `chrome.webview`.
    ChromeWebview(ChromeWebview),
}

impl Global {
    /// Short label for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InboundEntryPoint(_) => "inbound",
            Self::OutboundFunction(_) => "outbound",
            Self::Channel(_) => "channel",
            Self::QtTransport(_) => "qt",
            Self::ChromeWebview(_) => "chrome",
        }
    }
}

// ============================================================================
// GlobalScope
// ============================================================================

/// Named globals visible to guest content and the host.
///
/// Only bootstrap populates a scope; callers get one from
/// [`Bridge::globals`](crate::Bridge::globals).
///
/// ```compile_fail
/// let scope = webview_bridge::GlobalScope::new();
/// ```
#[derive(Debug, Clone)]
pub struct GlobalScope {
    entries: FxHashMap<String, Global>,
}

impl GlobalScope {
    /// Creates an empty scope.
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Installs `global` under `name`, replacing any previous entry.
    pub(crate) fn install(&mut self, name: impl Into<String>, global: Global) {
        let name = name.into();
        debug!(name = %name, kind = global.kind(), "Global installed");
        self.entries.insert(name, global);
    }

    /// Looks up a global by name.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Global> {
        self.entries.get(name)
    }

    /// Returns `true` if `name` is installed.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns installed names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of installed globals.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is installed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the inbound entry point installed under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GlobalNotFound`] if `name` is missing or holds
    /// something else.
    pub fn inbound_entry_point(&self, name: &str) -> Result<&InboundEntryPoint> {
        match self.get(name) {
            Some(Global::InboundEntryPoint(entry)) => Ok(entry),
            _ => Err(Error::global_not_found(name)),
        }
    }

    /// Returns the outbound function installed under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GlobalNotFound`] if `name` is missing or holds
    /// something else.
    pub fn outbound_function(&self, name: &str) -> Result<&OutboundFunction> {
        match self.get(name) {
            Some(Global::OutboundFunction(function)) => Ok(function),
            _ => Err(Error::global_not_found(name)),
        }
    }

    /// Returns the channel installed under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GlobalNotFound`] if `name` is missing or holds
    /// something else.
    pub fn channel(&self, name: &str) -> Result<&Channel> {
        match self.get(name) {
            Some(Global::Channel(channel)) => Ok(channel),
            _ => Err(Error::global_not_found(name)),
        }
    }

    /// Returns `qt.webChannelTransport`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GlobalNotFound`] if it is not installed.
    pub fn qt_transport(&self) -> Result<&QtTransport> {
        match self.get(QT_TRANSPORT_GLOBAL) {
            Some(Global::QtTransport(qt)) => Ok(qt),
            _ => Err(Error::global_not_found(QT_TRANSPORT_GLOBAL)),
        }
    }

    /// Returns `chrome.webview`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GlobalNotFound`] if it is not installed.
    pub fn chrome_webview(&self) -> Result<&ChromeWebview> {
        match self.get(CHROME_WEBVIEW_GLOBAL) {
            Some(Global::ChromeWebview(webview)) => Ok(webview),
            _ => Err(Error::global_not_found(CHROME_WEBVIEW_GLOBAL)),
        }
    }
}

// ============================================================================
// Process-wide Install
// ============================================================================

/// The bridge installed for this process, if any.
static INSTALLED: OnceLock<Bridge> = OnceLock::new();

/// Installs `bridge` as the process-wide bridge.
///
/// # Errors
///
/// Returns [`Error::AlreadyInstalled`] if a bridge was installed before; the
/// rejected bridge is dropped.
pub fn install(bridge: Bridge) -> Result<&'static Bridge> {
    let mut installed_now = false;
    let installed = INSTALLED.get_or_init(|| {
        installed_now = true;
        bridge
    });

    if installed_now {
        debug!("Bridge installed process-wide");
        Ok(installed)
    } else {
        Err(Error::AlreadyInstalled)
    }
}

/// Returns the process-wide bridge.
#[inline]
#[must_use]
pub fn installed() -> Option<&'static Bridge> {
    INSTALLED.get()
}

/// Delivers `payload` through the process-wide bridge's inbound entry point.
///
/// # Errors
///
/// - [`Error::GlobalNotFound`] if no bridge is installed
/// - Anything [`Bridge::deliver_inbound`] returns
pub fn deliver_inbound(payload: Value) -> Result<()> {
    match installed() {
        Some(bridge) => bridge.deliver_inbound(payload),
        None => Err(Error::global_not_found(crate::bridge::DEFAULT_INBOUND_GLOBAL)),
    }
}

// ============================================================================
// Tests
// ============================================================================
