//! In-process host link.
//!
//! Carries guest-to-host process messages over an unbounded tokio channel so
//! the guest side never blocks. The host drains it asynchronously.
//!
//! # Process Messages
//!
//! | Message | Name | Meaning |
//! |---------|------|---------|
//! | [`HostMessage::Ready`] | `READY` | Globals are installed, inbound delivery may start |
//! | [`HostMessage::Ipc`] | `IPC` | One guest payload |

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

use super::outbound::Outbound;

// ============================================================================
// Constants
// ============================================================================

/// Process message name for guest payloads.
pub const IPC_MESSAGE: &str = "IPC";

/// Process message name for the bootstrap handshake.
pub const READY_MESSAGE: &str = "READY";

/// Default time the host waits for READY.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// HostMessage
// ============================================================================

/// A process message travelling from guest to host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    /// Bootstrap finished.
    Ready,
    /// Guest payload.
    Ipc(Value),
}

impl HostMessage {
    /// Returns the process message name.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ready => READY_MESSAGE,
            Self::Ipc(_) => IPC_MESSAGE,
        }
    }
}

// ============================================================================
// host_link
// ============================================================================

/// Creates a connected sender/receiver pair.
///
/// # Example
///
/// ```ignore
/// let (sender, mut receiver) = host_link();
/// let bridge = Bridge::builder().outbound(sender).build()?;
///
/// receiver.wait_ready(Duration::from_secs(5)).await?;
/// bridge.chrome_webview().post_message(json!({ "x": 1 }))?;
/// assert_eq!(receiver.recv().await, Some(HostMessage::Ipc(json!({ "x": 1 }))));
/// ```
#[must_use]
pub fn host_link() -> (HostSender, HostReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        HostSender { tx },
        HostReceiver {
            rx,
            pending: VecDeque::new(),
        },
    )
}

// ============================================================================
// HostSender
// ============================================================================

/// Guest end of the host link.
#[derive(Debug, Clone)]
pub struct HostSender {
    tx: mpsc::UnboundedSender<HostMessage>,
}

impl HostSender {
    fn send(&self, message: HostMessage) -> Result<()> {
        let name = message.name();
        self.tx.send(message).map_err(|_| {
            warn!(message = name, "Host link closed");
            Error::TransportClosed
        })?;

        trace!(message = name, "Process message sent");
        Ok(())
    }

    /// Returns `true` if the host end has been dropped.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Outbound for HostSender {
    fn deliver(&self, payload: Value) -> Result<()> {
        self.send(HostMessage::Ipc(payload))
    }

    fn ready(&self) -> Result<()> {
        self.send(HostMessage::Ready)
    }
}

// ============================================================================
// HostReceiver
// ============================================================================

/// Host end of the link.
#[derive(Debug)]
pub struct HostReceiver {
    rx: mpsc::UnboundedReceiver<HostMessage>,
    /// IPC messages read by `wait_ready` before READY arrived.
    pending: VecDeque<HostMessage>,
}

impl HostReceiver {
    /// Receives the next process message.
    ///
    /// Returns `None` once every sender is dropped and the queue is empty.
    pub async fn recv(&mut self) -> Option<HostMessage> {
        if let Some(message) = self.pending.pop_front() {
            return Some(message);
        }
        self.rx.recv().await
    }

    /// Receives a message if one is queued.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransportClosed`] if all senders are gone.
    pub fn try_recv(&mut self) -> Result<Option<HostMessage>> {
        if let Some(message) = self.pending.pop_front() {
            return Ok(Some(message));
        }
        match self.rx.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Error::TransportClosed),
        }
    }

    /// Waits until the guest signals READY.
    ///
    /// IPC messages arriving before READY are kept and returned by later
    /// [`recv`](Self::recv) or [`try_recv`](Self::try_recv) calls, in order.
    /// This holds even when the wait fails.
    ///
    /// # Errors
    ///
    /// - [`Error::ReadyTimeout`] if READY is not received in time
    /// - [`Error::TransportClosed`] if the guest side goes away first
    pub async fn wait_ready(&mut self, ready_timeout: Duration) -> Result<()> {
        let Self { rx, pending } = self;
        let wait = async {
            loop {
                match rx.recv().await {
                    Some(HostMessage::Ready) => return Ok(()),
                    Some(message) => {
                        trace!(message = message.name(), "Queued before READY");
                        pending.push_back(message);
                    }
                    None => return Err(Error::TransportClosed),
                }
            }
        };

        timeout(ready_timeout, wait)
            .await
            .map_err(|_| Error::ready_timeout(ready_timeout.as_millis() as u64))??;

        debug!("READY handshake completed");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
