//! Bridge configuration.
//!
//! # Example
//!
//! ```ignore
//! use webview_bridge::{BridgeConfig, MissingHandlerPolicy};
//!
//! let config = BridgeConfig::from_json(r#"{ "missingHandler": "drop" }"#)?;
//! assert_eq!(config.missing_handler, MissingHandlerPolicy::Drop);
//! assert_eq!(config.inbound_global, "__postMessage");
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::adapters::{CHROME_WEBVIEW_GLOBAL, QT_TRANSPORT_GLOBAL};
use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default global the host calls to deliver a message to the guest.
pub const DEFAULT_INBOUND_GLOBAL: &str = "__postMessage";

/// Default global the guest calls to deliver a message to the host.
pub const DEFAULT_OUTBOUND_GLOBAL: &str = "__onMessage";

/// Default global exposing the channel itself.
pub const DEFAULT_CHANNEL_GLOBAL: &str = "ipc";

// ============================================================================
// MissingHandlerPolicy
// ============================================================================

/// What to do when a message reaches an unset `onmessage` slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingHandlerPolicy {
    /// Report [`Error::MissingHandler`] to the dispatch caller.
    #[default]
    Error,
    /// Drop the message silently.
    Drop,
}

// ============================================================================
// BridgeConfig
// ============================================================================

/// Bridge settings.
///
/// Legacy adapter names are fixed; only the bridge's own globals can move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Name of the host-facing inbound entry point.
    pub inbound_global: String,

    /// Name of the outbound delivery function.
    pub outbound_global: String,

    /// Name under which the channel surface is installed.
    pub channel_global: String,

    /// Policy for an unset `qt.webChannelTransport.onmessage`.
    pub missing_handler: MissingHandlerPolicy,

    /// Signal READY on the outbound collaborator after bootstrap.
    pub signal_ready: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            inbound_global: DEFAULT_INBOUND_GLOBAL.to_string(),
            outbound_global: DEFAULT_OUTBOUND_GLOBAL.to_string(),
            channel_global: DEFAULT_CHANNEL_GLOBAL.to_string(),
            missing_handler: MissingHandlerPolicy::default(),
            signal_ready: true,
        }
    }
}

impl BridgeConfig {
    /// Creates the default configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the document is malformed
    /// - [`Error::Config`] if the result fails [`validate`](Self::validate)
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates global names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a name is empty, contains whitespace,
    /// collides with another bridge global or with a legacy adapter name.
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("inboundGlobal", &self.inbound_global),
            ("outboundGlobal", &self.outbound_global),
            ("channelGlobal", &self.channel_global),
        ];

        for (field, name) in names {
            if name.is_empty() {
                return Err(Error::config(format!("{field} must not be empty")));
            }

            if name.chars().any(char::is_whitespace) {
                return Err(Error::config(format!(
                    "{field} must not contain whitespace: {name:?}"
                )));
            }

            if name == QT_TRANSPORT_GLOBAL || name == CHROME_WEBVIEW_GLOBAL {
                return Err(Error::config(format!(
                    "{field} collides with legacy global {name:?}"
                )));
            }
        }

        for (i, (field, name)) in names.iter().enumerate() {
            if let Some((other, _)) = names[i + 1..].iter().find(|(_, n)| n == name) {
                return Err(Error::config(format!(
                    "{field} and {other} share the name {name:?}"
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
