use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::editor::EditorActor;
use crate::actor::messages::{PreviewMsg, WsMsg};
use crate::actor::preview::PreviewCoordinator;
use crate::actor::ws::WsActor;
use crate::relay::RelayReceiver;

pub(super) struct Actors {
    pub editor: EditorActor,
    pub coordinator: PreviewCoordinator,
    pub ws: WsActor,
}

pub(super) struct Channels {
    pub control_tx: mpsc::Sender<PreviewMsg>,
    pub control_rx: mpsc::Receiver<PreviewMsg>,
    pub relay_rx: RelayReceiver,
    pub ws_tx: mpsc::Sender<WsMsg>,
}

/// Run all actors concurrently.
pub(super) async fn run_actors(actors: Actors, channels: Channels, shutdown_rx: Option<Receiver<()>>) {
    let Actors {
        editor,
        coordinator,
        ws,
    } = actors;
    let Channels {
        control_tx,
        control_rx,
        relay_rx,
        ws_tx,
    } = channels;

    let ws_handle = tokio::spawn(ws.run());
    let mut coordinator_handle = tokio::spawn(coordinator.run(control_rx, relay_rx));
    let mut editor_handle = tokio::spawn(editor.run());

    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    } else {
        tokio::select! {
            _ = &mut editor_handle => {}
            _ = &mut coordinator_handle => {}
        }
    }

    // Coordinator first: its teardown revokes the live sandbox
    crate::debug!("actor"; "sending shutdown to coordinator");
    let _ = control_tx.send(PreviewMsg::Shutdown).await;
    let _ = tokio::time::timeout(Duration::from_millis(500), coordinator_handle).await;

    let _ = ws_tx.send(WsMsg::Shutdown).await;
    let _ = tokio::time::timeout(Duration::from_millis(500), ws_handle).await;
    editor_handle.abort();
}
