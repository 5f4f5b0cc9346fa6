//! Message channel.
//!
//! The [`Channel`] is the single source of truth for inbound fan-out and
//! outbound forwarding. Every guest-facing surface is a thin shape over it.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use webview_bridge::{Channel, Listener};
//!
//! let channel = Channel::new(Arc::new(|payload| -> webview_bridge::Result<()> {
//!     println!("to host: {payload}");
//!     Ok(())
//! }));
//!
//! channel.subscribe("message", Listener::new(|event| {
//!     println!("from host: {}", event.data);
//!     Ok(())
//! }))?;
//!
//! channel.dispatch(serde_json::json!({ "y": 2 }))?;
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | [`Channel`] and its registry |
//! | `event` | [`MessageEvent`] envelope and [`EventKind`] |
//! | `listener` | [`Listener`] handles |

// ============================================================================
// Submodules
// ============================================================================

/// Channel implementation.
pub mod core;

/// Message event envelope.
pub mod event;

/// Listener handles.
pub mod listener;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::Channel;
pub use event::{EventKind, MESSAGE_EVENT, MessageEvent};
pub use listener::{Listener, ListenerFn};
