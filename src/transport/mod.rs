//! Guest-to-host transport layer.
//!
//! The bridge never touches the native process boundary itself. Instead the
//! outbound path ends in an [`Outbound`] collaborator supplied at bootstrap.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Guest (bridge) │        HostMessage           │  Host           │
//! │                 │ ───────── READY ───────────► │                 │
//! │  Channel        │ ───────── IPC(payload) ────► │  HostReceiver   │
//! │  → Outbound     │                              │                 │
//! │                 │ ◄──── __postMessage(data) ── │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `outbound` | The [`Outbound`] collaborator trait |
//! | `link` | In-process host link over a tokio channel |

// ============================================================================
// Submodules
// ============================================================================

/// Outbound delivery collaborator.
pub mod outbound;

/// In-process host link.
pub mod link;

// ============================================================================
// Re-exports
// ============================================================================

pub use link::{HostMessage, HostReceiver, HostSender, host_link};
pub use outbound::Outbound;
