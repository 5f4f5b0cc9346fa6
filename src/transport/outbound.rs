//! Outbound delivery collaborator.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::error::Result;

// ============================================================================
// Outbound
// ============================================================================

/// Delivers guest payloads across the process boundary to the host.
///
/// Implementations are fire-and-forget from the bridge's point of view. Any
/// error they return reaches the caller of the outbound path as is.
///
/// Plain closures work too:
///
/// ```ignore
/// let outbound = |payload: serde_json::Value| -> webview_bridge::Result<()> {
///     println!("to host: {payload}");
///     Ok(())
/// };
/// let bridge = Bridge::builder().outbound(outbound).build()?;
/// ```
pub trait Outbound: Send + Sync {
    /// Delivers one payload to the host.
    fn deliver(&self, payload: Value) -> Result<()>;

    /// Tells the host the guest side is ready for inbound delivery.
    ///
    /// Called once by bootstrap after every global is installed.
    fn ready(&self) -> Result<()> {
        Ok(())
    }
}

impl<F> Outbound for F
where
    F: Fn(Value) -> Result<()> + Send + Sync,
{
    fn deliver(&self, payload: Value) -> Result<()> {
        self(payload)
    }
}

// ============================================================================
// Tests
// ============================================================================
