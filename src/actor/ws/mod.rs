//! WebSocket Actor - Bidirectional Host Link
//!
//! This actor is responsible for:
//! - Managing WebSocket connections from host pages
//! - Broadcasting preview updates to all of them
//! - Replaying the catalog and live sandbox to newly connected pages
//! - Reading revision picks and relayed sandbox messages back
//!
//! # Architecture
//!
//! ```text
//! PreviewCoordinator --[Render/Errors]--> WsActor --[broadcast]--> Host pages
//!        ^     ^                                                       |
//!        |     +--------------[relay: sandbox faults]------------------+
//!        +--------------------[select: revision]-----------------------+
//! ```

mod client_io;
mod delivery;

use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;

use super::messages::{PreviewMsg, WsMsg};
use crate::relay::RelaySender;
use crate::reload::message::HostMessage;

/// State replayed to pages that connect after it was broadcast
#[derive(Debug, Default)]
struct Snapshot {
    catalog: Option<HostMessage>,
    render: Option<HostMessage>,
}

impl Snapshot {
    fn messages(&self) -> impl Iterator<Item = &HostMessage> {
        self.catalog.iter().chain(self.render.iter())
    }

    /// Keep the cached picker selection in sync.
    fn select(&mut self, revision: u32) {
        if let Some(HostMessage::Catalog { selected, .. }) = &mut self.catalog {
            *selected = revision;
        }
    }
}

/// WebSocket Actor - manages host connections and broadcasts
pub struct WsActor {
    /// Channel to receive messages
    rx: mpsc::Receiver<WsMsg>,
    /// Connected host pages (shared for broadcast + read threads)
    clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
    /// Replayed to new clients
    snapshot: Snapshot,
    /// Revision picks go to the coordinator
    control_tx: mpsc::Sender<PreviewMsg>,
    /// Relayed sandbox messages go to the coordinator
    relay: RelaySender,
}

impl WsActor {
    /// Create a new WsActor
    pub fn new(
        rx: mpsc::Receiver<WsMsg>,
        control_tx: mpsc::Sender<PreviewMsg>,
        relay: RelaySender,
    ) -> Self {
        Self {
            rx,
            clients: Arc::new(Mutex::new(Vec::new())),
            snapshot: Snapshot::default(),
            control_tx,
            relay,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        // Spawn a background thread to poll client messages
        let clients_for_reader = Arc::clone(&self.clients);
        let control_tx = self.control_tx.clone();
        let relay = self.relay.clone();
        std::thread::spawn(move || {
            Self::client_reader_loop(clients_for_reader, control_tx, relay);
        });

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Catalog { versions, selected } => {
                    let hr_msg = HostMessage::Catalog {
                        versions: versions.iter().map(|r| r.0).collect(),
                        selected: selected.0,
                    };
                    self.broadcast(&hr_msg);
                    self.snapshot.catalog = Some(hr_msg);
                }

                WsMsg::Select { revision } => {
                    self.snapshot.select(revision.0);
                    self.broadcast(&HostMessage::Select {
                        revision: revision.0,
                    });
                }

                WsMsg::Render { src } => {
                    crate::debug!("ws"; "render {}", src);
                    let hr_msg = HostMessage::Render { src };
                    self.broadcast(&hr_msg);
                    self.snapshot.render = Some(hr_msg);
                }

                WsMsg::Errors(batch) => {
                    self.broadcast(&HostMessage::Errors {
                        messages: batch.messages().to_vec(),
                    });
                }

                WsMsg::ClearErrors => {
                    self.broadcast(&HostMessage::ClearErrors);
                }

                WsMsg::AddClient(stream) => {
                    self.add_client(stream);
                }

                WsMsg::Shutdown => {
                    crate::debug!("ws"; "shutting down");
                    let mut clients = self.clients.lock();
                    for mut ws in clients.drain(..) {
                        let _ = ws.close(None);
                    }
                    break;
                }
            }
        }
    }
}
