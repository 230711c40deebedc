//! Actor System - wires up the preview pipeline
//!
//! A thin orchestrator that:
//! - Creates communication channels
//! - Starts accepting on the host link listener
//! - Wires up actors
//! - Runs them concurrently

mod runtime;

use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::editor::{EditorActor, FileEditor};
use super::messages::{PreviewMsg, WsMsg};
use super::preview::PreviewCoordinator;
use super::ws::WsActor;
use crate::compose::Chrome;
use crate::config::PlaygroundConfig;
use crate::deps::{DependencyResolver, Revision, VersionCatalog, VersionSelector};
use crate::relay::{self, RELAY_CAPACITY};
use crate::reload::server::WsListener;
use crate::sandbox::{DocumentStore, SandboxRenderer};

const CHANNEL_BUFFER: usize = 32;

/// Wires up and runs the actor system.
pub struct ActorSystem {
    config: Arc<PlaygroundConfig>,
    catalog: VersionCatalog,
    store: DocumentStore,
    listener: Option<WsListener>,
    shutdown_rx: Option<Receiver<()>>,
}

impl ActorSystem {
    pub fn new(config: Arc<PlaygroundConfig>, catalog: VersionCatalog, store: DocumentStore) -> Self {
        Self {
            config,
            catalog,
            store,
            listener: None,
            shutdown_rx: None,
        }
    }

    /// Set the already-bound host link listener.
    pub fn with_listener(mut self, listener: Option<WsListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Revision the first render uses.
    fn initial_selector(&self) -> VersionSelector {
        match self.config.pinned_revision {
            Some(n) => VersionSelector::Exact(Revision(n)),
            None => VersionSelector::Latest,
        }
    }

    /// Run the actor system until shutdown.
    pub async fn run(mut self) -> Result<()> {
        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);
        let (control_tx, control_rx) = mpsc::channel::<PreviewMsg>(CHANNEL_BUFFER);
        let (relay_tx, relay_rx) = relay::channel(RELAY_CAPACITY);

        match self.listener.take() {
            Some(listener) => listener.spawn(ws_tx.clone()),
            None => crate::debug!("ws"; "no host link listener, previews will not update"),
        }

        let entry = self.config.entry_path();
        let editor = EditorActor::new(&entry, control_tx.clone())?;

        let selector = self.initial_selector();
        let renderer = SandboxRenderer::new(self.store.clone(), ws_tx.clone());
        let coordinator = PreviewCoordinator::new(
            Box::new(FileEditor::new(&entry)),
            DependencyResolver::new(&self.config.revision.cdn, self.catalog.clone()),
            selector,
            Chrome::from_config(&self.config.preview),
            renderer,
            self.config.debounce(),
            ws_tx.clone(),
        )
        .with_label(self.config.entry_name());

        let ws_actor = WsActor::new(ws_rx, control_tx.clone(), relay_tx);

        crate::debug!("actor"; "start");
        let shutdown_rx = self.shutdown_rx.take();
        runtime::run_actors(
            runtime::Actors {
                editor,
                coordinator,
                ws: ws_actor,
            },
            runtime::Channels {
                control_tx,
                control_rx,
                relay_rx,
                ws_tx,
            },
            shutdown_rx,
        )
        .await;

        crate::debug!("actor"; "stopped");
        Ok(())
    }
}
