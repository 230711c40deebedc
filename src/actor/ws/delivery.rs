use tungstenite::protocol::Message;

use crate::reload::message::HostMessage;

use super::WsActor;

impl WsActor {
    /// Broadcast a message to all connected host pages
    pub(super) fn broadcast(&self, msg: &HostMessage) {
        let mut clients = self.clients.lock();
        let count = clients.len();

        if count == 0 {
            crate::debug!("ws"; "no clients connected");
            return;
        }

        let frame = Message::Text(msg.to_json().into());
        clients.retain_mut(|ws| match ws.send(frame.clone()) {
            Ok(_) => true,
            Err(e) => {
                crate::debug!("ws"; "client disconnected: {}", e);
                false
            }
        });
        crate::debug!("ws"; "broadcast to {} clients", count);
    }
}
