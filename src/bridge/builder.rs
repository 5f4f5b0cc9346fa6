//! Builder pattern for bridge bootstrap.
//!
//! Provides a fluent API for configuring and bootstrapping a [`Bridge`].
//!
//! # Example
//!
//! ```ignore
//! use webview_bridge::{Bridge, MissingHandlerPolicy, host_link};
//!
//! let (sender, receiver) = host_link();
//! let bridge = Bridge::builder()
//!     .outbound(sender)
//!     .missing_handler(MissingHandlerPolicy::Drop)
//!     .build()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::transport::Outbound;

use super::config::{BridgeConfig, MissingHandlerPolicy};
use super::core::Bridge;

// ============================================================================
// BridgeBuilder
// ============================================================================

/// Builder for configuring a [`Bridge`].
///
/// Use [`Bridge::builder()`] to create a new builder.
#[derive(Default, Clone)]
pub struct BridgeBuilder {
    /// Settings passed to bootstrap.
    config: BridgeConfig,
    /// Outbound delivery collaborator.
    outbound: Option<Arc<dyn Outbound>>,
}

impl fmt::Debug for BridgeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeBuilder")
            .field("config", &self.config)
            .field("outbound", &self.outbound.is_some())
            .finish()
    }
}

// ============================================================================
// BridgeBuilder Implementation
// ============================================================================

impl BridgeBuilder {
    /// Creates a builder with default configuration and no outbound.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    #[inline]
    #[must_use]
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the outbound delivery collaborator.
    #[inline]
    #[must_use]
    pub fn outbound(mut self, outbound: impl Outbound + 'static) -> Self {
        self.outbound = Some(Arc::new(outbound));
        self
    }

    /// Sets an already shared outbound delivery collaborator.
    #[inline]
    #[must_use]
    pub fn outbound_shared(mut self, outbound: Arc<dyn Outbound>) -> Self {
        self.outbound = Some(outbound);
        self
    }

    /// Sets the name of the host-facing inbound entry point.
    #[inline]
    #[must_use]
    pub fn inbound_global(mut self, name: impl Into<String>) -> Self {
        self.config.inbound_global = name.into();
        self
    }

    /// Sets the name of the outbound delivery function.
    #[inline]
    #[must_use]
    pub fn outbound_global(mut self, name: impl Into<String>) -> Self {
        self.config.outbound_global = name.into();
        self
    }

    /// Sets the name the channel surface is installed under.
    #[inline]
    #[must_use]
    pub fn channel_global(mut self, name: impl Into<String>) -> Self {
        self.config.channel_global = name.into();
        self
    }

    /// Sets the policy for an unset `qt.webChannelTransport.onmessage`.
    #[inline]
    #[must_use]
    pub fn missing_handler(mut self, policy: MissingHandlerPolicy) -> Self {
        self.config.missing_handler = policy;
        self
    }

    /// Enables or disables the READY signal.
    #[inline]
    #[must_use]
    pub fn signal_ready(mut self, enabled: bool) -> Self {
        self.config.signal_ready = enabled;
        self
    }

    /// Validates the configuration and runs bootstrap.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no outbound is set or a global name is invalid
    /// - Whatever the outbound collaborator's `ready` returns
    pub fn build(self) -> Result<Bridge> {
        let outbound = self.outbound.ok_or_else(|| {
            Error::config(
                "Outbound delivery is required. Use .outbound() to set it.\n\
                 Example: Bridge::builder().outbound(host_link().0)",
            )
        })?;
        self.config.validate()?;

        Bridge::bootstrap(self.config, outbound)
    }
}

// ============================================================================
// Tests
// ============================================================================
