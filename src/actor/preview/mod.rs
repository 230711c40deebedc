//! Preview Coordinator - the change pipeline's single owner.
//!
//! Owns every piece of mutable preview state (active revision, dependency
//! map, live sandbox, error display, debounce timer) and is driven by one
//! task, so none of it needs a lock.
//!
//! ```text
//!             Edit                 deadline
//!   Idle ---------------> Pending ----------> flush --> Idle
//!     ^                    |  ^ Edit (re-arm)
//!     |  SelectVersion     +--+
//!     +--- (cancel, render now)
//! ```
//!
//! A flush always reads the source afresh, so a burst of edits yields one
//! render of the final text.

mod debounce;


pub use debounce::Debounce;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use super::editor::SourceEditor;
use super::messages::{PreviewMsg, WsMsg};
use crate::compose::{Chrome, compose};
use crate::deps::{DependencyMap, DependencyResolver, Revision, VersionSelector};
use crate::relay::{ErrorDisplay, RelayReceiver, Relayed, SandboxMessage};
use crate::sandbox::{SandboxHandle, SandboxRenderer};
use crate::utils::plural::plural_count;
use crate::debug;

pub struct PreviewCoordinator {
    editor: Box<dyn SourceEditor>,
    resolver: DependencyResolver,
    revision: Revision,
    deps: DependencyMap,
    chrome: Chrome,
    renderer: SandboxRenderer,
    display: ErrorDisplay,
    debounce: Debounce,
    host_tx: mpsc::Sender<WsMsg>,
    /// Sketch name shown in status lines
    label: String,
}

impl PreviewCoordinator {
    pub fn new(
        editor: Box<dyn SourceEditor>,
        resolver: DependencyResolver,
        selector: VersionSelector,
        chrome: Chrome,
        renderer: SandboxRenderer,
        delay: Duration,
        host_tx: mpsc::Sender<WsMsg>,
    ) -> Self {
        let revision = resolver.revision(selector);
        let deps = resolver.resolve(VersionSelector::Exact(revision));
        Self {
            editor,
            resolver,
            revision,
            deps,
            chrome,
            renderer,
            display: ErrorDisplay::new(),
            debounce: Debounce::new(delay),
            host_tx,
            label: String::from("sketch"),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Announce the catalog and perform the first render.
    pub async fn initialize(&mut self) -> SandboxHandle {
        let versions = self.resolver.catalog().revisions().to_vec();
        debug!("preview"; "{} available, starting on {}", plural_count(versions.len(), "revision"), self.revision);
        self.send(WsMsg::Catalog {
            versions,
            selected: self.revision,
        })
        .await;
        self.flush().await
    }

    /// Restart the quiet window.
    pub fn on_edit(&mut self) {
        self.debounce.cancel();
        self.debounce.arm(Instant::now());
    }

    /// Regenerate from the current source and dependency map.
    pub async fn flush(&mut self) -> SandboxHandle {
        self.debounce.cancel();
        self.clear_errors().await;

        let source = self.editor.current();
        let doc = compose(&source, &self.deps, &self.chrome);
        let handle = self.renderer.render(&doc).await;

        crate::logger::status_success(&format!("rendered {} ({})", self.revision, self.label));
        handle
    }

    /// Switch revision and re-render without waiting for the debounce.
    pub async fn on_version_change(&mut self, revision: Revision) -> SandboxHandle {
        if !self.resolver.catalog().contains(revision) {
            debug!("preview"; "{} is not in the catalog", revision);
        }

        self.revision = revision;
        self.deps = self.resolver.resolve(VersionSelector::Exact(revision));

        let handle = self.flush().await;
        self.send(WsMsg::Select { revision }).await;
        handle
    }

    /// Apply a relayed sandbox message. Returns false if it was dropped.
    pub async fn on_relay(&mut self, relayed: Relayed) -> bool {
        if let Some(src) = relayed.sandbox.as_deref()
            && !self.renderer.is_live(src)
        {
            debug!("relay"; "dropping batch from superseded sandbox {}", src);
            return false;
        }

        match relayed.message {
            SandboxMessage::Error { data } => {
                let batch = data.into_batch();
                self.display.show(&batch);
                crate::logger::status_error(
                    &format!("{} in {}", plural_count(batch.len(), "error"), self.label),
                    batch.messages(),
                );
                self.send(WsMsg::Errors(batch)).await;
            }
        }
        true
    }

    /// Cancel the timer and release the live sandbox.
    pub fn teardown(&mut self) {
        self.debounce.cancel();
        self.renderer.teardown();
        self.display.clear();
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn deps(&self) -> &DependencyMap {
        &self.deps
    }

    pub fn display(&self) -> &ErrorDisplay {
        &self.display
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.is_armed()
    }

    pub fn live(&self) -> Option<&SandboxHandle> {
        self.renderer.live()
    }

    /// Run the coordinator event loop.
    ///
    /// Performs the first render, then serves control messages, relayed
    /// sandbox messages and debounce deadlines until shutdown.
    pub async fn run(
        mut self,
        mut control_rx: mpsc::Receiver<PreviewMsg>,
        mut relay_rx: RelayReceiver,
    ) {
        self.initialize().await;

        loop {
            let deadline = self.debounce.deadline();
            tokio::select! {
                msg = control_rx.recv() => match msg {
                    Some(PreviewMsg::Edit) => self.on_edit(),
                    Some(PreviewMsg::SelectVersion(revision)) => {
                        self.on_version_change(revision).await;
                    }
                    Some(PreviewMsg::Shutdown) | None => break,
                },
                Some(relayed) = relay_rx.recv() => {
                    self.on_relay(relayed).await;
                }
                () = sleep_until(deadline) => {
                    if self.debounce.fire_if_due(Instant::now()) {
                        self.flush().await;
                    }
                }
            }
        }

        debug!("preview"; "shutting down");
        self.teardown();
    }

    async fn clear_errors(&mut self) {
        self.display.clear();
        self.send(WsMsg::ClearErrors).await;
    }

    async fn send(&self, msg: WsMsg) {
        if self.host_tx.send(msg).await.is_err() {
            debug!("preview"; "host link closed");
        }
    }
}

/// Sleep until `deadline`, or forever when no timer is armed.
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
