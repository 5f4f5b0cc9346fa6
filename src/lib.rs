//! Webview Bridge - one messaging API for guest content in embedded browsers.
//!
//! Guest content running inside an embedded browser surface talks to its
//! host through a single [`Channel`], whatever native technology actually
//! hosts the surface. Two legacy-shaped facades let code written for older
//! hosts keep working unmodified.
//!
//! # Architecture
//!
//! ```text
//!   guest code                                            host
//!  ┌──────────────────────────┐
//!  │ ipc                      │── send_outbound ─► Outbound ─► (process boundary)
//!  │ chrome.webview           │──┘
//!  │ qt.webChannelTransport   │──┘
//!  │                          │
//!  │ listeners ◄── dispatch ◄─┼── __postMessage(payload) ◄──── (process boundary)
//!  │ qt onmessage ◄───────────┤   (forwarding listener)
//!  └──────────────────────────┘
//! ```
//!
//! Key design principles:
//!
//! - Dispatch is synchronous, in registration order, over a snapshot
//! - Payloads are opaque [`serde_json::Value`]s, never inspected
//! - Globals live in one [`GlobalScope`] populated by bootstrap
//! - Outbound failures reach the caller unchanged; nothing retries
//!
//! # Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use serde_json::json;
//! use webview_bridge::{Bridge, HostMessage, Listener, Result, host_link};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let (sender, mut host) = host_link();
//!     let bridge = Bridge::builder().outbound(sender).build()?;
//!     host.wait_ready(Duration::from_secs(5)).await?;
//!
//!     bridge.qt_transport().set_onmessage(Listener::new(|event| {
//!         println!("qt: {}", event.data);
//!         Ok(())
//!     }));
//!
//!     bridge.chrome_webview().post_message(json!({ "x": 1 }))?;
//!     assert_eq!(host.recv().await, Some(HostMessage::Ipc(json!({ "x": 1 }))));
//!
//!     bridge.deliver_inbound(json!({ "y": 2 }))?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`channel`] | [`Channel`], [`Listener`], [`MessageEvent`] |
//! | [`adapters`] | [`QtTransport`], [`ChromeWebview`] and capability traits |
//! | [`bridge`] | Bootstrap, builder and configuration |
//! | [`boundary`] | Named global scope and process-wide install |
//! | [`transport`] | [`Outbound`] collaborator and host link |
//! | [`error`] | Error types and [`Result`] alias |

// ============================================================================
// Modules
// ============================================================================

/// Legacy-shaped messaging surfaces.
pub mod adapters;

/// Named globals and the process-wide install slot.
pub mod boundary;

/// Bridge bootstrap and configuration.
///
/// Use [`Bridge::builder()`] to bootstrap a guest environment.
pub mod bridge;

/// Listener registry and fan-out.
pub mod channel;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Guest-to-host transport.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Adapter types
pub use adapters::{ChromeWebview, MessageSender, MessageSubscriber, QtTransport};

// Boundary types
pub use boundary::{Global, GlobalScope, InboundEntryPoint, OutboundFunction};

// Bridge types
pub use bridge::{Bridge, BridgeBuilder, BridgeConfig, MissingHandlerPolicy};

// Channel types
pub use channel::{Channel, EventKind, Listener, MessageEvent};

// Error types
pub use error::{Error, Result};

// Transport types
pub use transport::{HostMessage, HostReceiver, HostSender, Outbound, host_link};
