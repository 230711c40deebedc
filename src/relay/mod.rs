//! Error relay: sandbox faults flowing back to the host.
//!
//! ```text
//! sandbox shim --postMessage--> host page --ws relay--> RelaySender
//!                                                          |
//!                                   bounded, single reader v
//!                                                     RelayReceiver --> coordinator
//! ```
//!
//! Delivery is best-effort. Each message carries the sandbox's whole
//! cumulative batch, so a dropped message is healed by the next one.

mod display;

pub use display::ErrorDisplay;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::debug;

/// Relay channel capacity.
pub const RELAY_CAPACITY: usize = 16;

/// Ordered fault messages from one sandbox lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBatch(Vec<String>);

impl ErrorBatch {
    pub fn new(messages: Vec<String>) -> Self {
        Self(messages)
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `data` of an error post: one message or the cumulative list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorData {
    One(String),
    Many(Vec<String>),
}

impl ErrorData {
    pub fn into_batch(self) -> ErrorBatch {
        match self {
            Self::One(message) => ErrorBatch(vec![message]),
            Self::Many(messages) => ErrorBatch(messages),
        }
    }
}

/// Messages a sandbox may post to its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SandboxMessage {
    /// Cumulative fault batch
    Error { data: ErrorData },
}

impl SandboxMessage {
    /// Decode a posted value. Unknown types yield `None`.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        match serde_json::from_value(value) {
            Ok(message) => Some(message),
            Err(e) => {
                debug!("relay"; "ignoring sandbox message: {}", e);
                None
            }
        }
    }
}

/// A sandbox message together with the locator of the frame that posted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relayed {
    /// `None` when the forwarding host did not say
    pub sandbox: Option<String>,
    pub message: SandboxMessage,
}

impl Relayed {
    /// Decode a post forwarded by a host page.
    ///
    /// The preview shim tags each post with its own path. That tag wins over
    /// `forwarded`, because the host's frame `src` already names the next
    /// document while the outgoing one is still running.
    pub fn decode(forwarded: Option<String>, value: serde_json::Value) -> Option<Self> {
        let own = value
            .get("sandbox")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        let message = SandboxMessage::from_value(value)?;
        Some(Self {
            sandbox: own.or(forwarded),
            message,
        })
    }
}

/// Producer half. Cloned into every host connection reader.
#[derive(Debug, Clone)]
pub struct RelaySender {
    tx: mpsc::Sender<Relayed>,
}

impl RelaySender {
    /// Fire-and-forget post. Returns false if the message was dropped.
    pub fn post(&self, relayed: Relayed) -> bool {
        match self.tx.try_send(relayed) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("relay"; "channel full, dropping batch");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }
}

/// Consumer half. Owned by the coordinator.
#[derive(Debug)]
pub struct RelayReceiver {
    rx: mpsc::Receiver<Relayed>,
}

impl RelayReceiver {
    pub async fn recv(&mut self) -> Option<Relayed> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Relayed> {
        self.rx.try_recv().ok()
    }
}

/// Create a relay with room for `capacity` in-flight messages.
pub fn channel(capacity: usize) -> (RelaySender, RelayReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (RelaySender { tx }, RelayReceiver { rx })
}
