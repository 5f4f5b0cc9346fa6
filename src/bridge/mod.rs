//! Bridge bootstrap.
//!
//! This module wires a [`Channel`](crate::Channel), both legacy adapters
//! and the global scope together.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Bridge`] | Bootstrapped guest environment |
//! | [`BridgeBuilder`] | Fluent configuration builder |
//! | [`BridgeConfig`] | Global names and policies |
//! | [`MissingHandlerPolicy`] | Behaviour for an unset `onmessage` slot |

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder.
pub mod builder;

/// Bridge configuration.
pub mod config;

/// Bootstrap and bridge handle.
pub mod core;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::BridgeBuilder;
pub use config::{
    BridgeConfig, DEFAULT_CHANNEL_GLOBAL, DEFAULT_INBOUND_GLOBAL, DEFAULT_OUTBOUND_GLOBAL,
    MissingHandlerPolicy,
};
pub use self::core::Bridge;
