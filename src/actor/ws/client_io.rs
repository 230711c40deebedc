use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use crate::actor::messages::PreviewMsg;
use crate::deps::Revision;
use crate::relay::{RelaySender, Relayed};
use crate::reload::message::{ClientMessage, HostMessage};

use super::WsActor;

impl WsActor {
    /// Add a new host connection
    pub(super) fn add_client(&self, stream: TcpStream) {
        // Keep blocking mode during handshake, switch to non-blocking after
        match tungstenite::accept(stream) {
            Ok(mut ws) => {
                // Now set non-blocking for polling reads
                let _ = ws.get_ref().set_nonblocking(true);

                let connected = HostMessage::connected();
                for msg in std::iter::once(&connected).chain(self.snapshot.messages()) {
                    if let Err(e) = ws.send(Message::Text(msg.to_json().into())) {
                        crate::log!("ws"; "failed to send initial state: {}", e);
                        return;
                    }
                }

                let mut clients = self.clients.lock();
                clients.push(ws);
                crate::debug!("ws"; "client connected (total: {})", clients.len());
            }
            Err(e) => {
                crate::log!("ws"; "handshake failed: {}", e);
            }
        }
    }

    /// Background thread to read host messages (non-blocking poll)
    pub(super) fn client_reader_loop(
        clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
        control_tx: mpsc::Sender<PreviewMsg>,
        relay: RelaySender,
    ) {
        loop {
            std::thread::sleep(std::time::Duration::from_millis(50));

            if control_tx.is_closed() {
                break;
            }

            let mut clients_guard = clients.lock();
            let mut disconnected = Vec::new();

            for (i, ws) in clients_guard.iter_mut().enumerate() {
                // Drain everything that arrived since the last poll
                loop {
                    match ws.read() {
                        Ok(Message::Text(text)) => {
                            Self::dispatch(&text, &control_tx, &relay);
                        }
                        Ok(Message::Close(_)) => {
                            disconnected.push(i);
                            break;
                        }
                        Ok(_) => {}
                        Err(tungstenite::Error::Io(ref e))
                            if e.kind() == std::io::ErrorKind::WouldBlock =>
                        {
                            break;
                        }
                        Err(_) => {
                            disconnected.push(i);
                            break;
                        }
                    }
                }
            }

            for i in disconnected.into_iter().rev() {
                clients_guard.remove(i);
            }
        }
    }

    /// Route one host message to the coordinator.
    fn dispatch(text: &str, control_tx: &mpsc::Sender<PreviewMsg>, relay: &RelaySender) {
        match ClientMessage::from_json(text) {
            Some(ClientMessage::Select { revision: 0 }) => {
                crate::debug!("ws"; "ignoring select of revision 0");
            }
            Some(ClientMessage::Select { revision }) => {
                // Never block here: the client lock is held
                if let Err(e) = control_tx.try_send(PreviewMsg::SelectVersion(Revision(revision))) {
                    crate::debug!("ws"; "select r{} dropped: {}", revision, e);
                }
            }
            Some(ClientMessage::Relay { sandbox, message }) => {
                if let Some(relayed) = Relayed::decode(sandbox, message) {
                    relay.post(relayed);
                }
            }
            None => {
                crate::debug!("ws"; "unrecognized host message: {}", text);
            }
        }
    }
}
