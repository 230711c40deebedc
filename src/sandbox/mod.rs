//! Sandbox renderer.
//!
//! Materializes a composed document behind an ephemeral locator and points
//! every host page's preview frame at it. Exactly one sandbox is live: the
//! previous locator is revoked as soon as the new one has been handed out.

mod store;

pub use store::{DocumentStore, Locator, PREVIEW_PREFIX};

use tokio::sync::mpsc;

use crate::actor::messages::WsMsg;
use crate::compose::ComposedDocument;
use crate::debug;

/// Reference to the currently rendered sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxHandle {
    pub locator: Locator,
    pub generation: u64,
}

/// Owns the live sandbox and its backing locator.
pub struct SandboxRenderer {
    store: DocumentStore,
    host_tx: mpsc::Sender<WsMsg>,
    live: Option<SandboxHandle>,
    generation: u64,
}

impl SandboxRenderer {
    pub fn new(store: DocumentStore, host_tx: mpsc::Sender<WsMsg>) -> Self {
        Self {
            store,
            host_tx,
            live: None,
            generation: 0,
        }
    }

    /// Serve `doc` from a fresh locator and make it the live sandbox.
    pub async fn render(&mut self, doc: &ComposedDocument) -> SandboxHandle {
        self.generation += 1;
        let handle = SandboxHandle {
            locator: self.store.allocate(self.generation, doc),
            generation: self.generation,
        };

        let src = handle.locator.to_string();
        if self.host_tx.send(WsMsg::Render { src }).await.is_err() {
            debug!("sandbox"; "host link closed, render not announced");
        }

        if let Some(previous) = self.live.replace(handle.clone()) {
            self.store.revoke(&previous.locator);
            debug!("sandbox"; "revoked {}", previous.locator);
        }

        handle
    }

    pub fn live(&self) -> Option<&SandboxHandle> {
        self.live.as_ref()
    }

    /// Whether `src` names the live sandbox.
    pub fn is_live(&self, src: &str) -> bool {
        self.live
            .as_ref()
            .is_some_and(|handle| handle.locator.as_str() == src)
    }

    /// Release the live locator.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.live.take() {
            self.store.revoke(&handle.locator);
        }
    }
}
