//! WebSocket listener for the host link.
//!
//! Accepted sockets are sent to the WsActor, which performs the handshake.

use std::net::{IpAddr, SocketAddr, TcpListener};

use anyhow::Result;

use crate::actor::messages::WsMsg;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Host link listener, bound but not yet accepting.
///
/// Binding happens before the catalog fetch so the host page can be served
/// with the real port. Clients that connect in between wait in the backlog
/// until [`WsListener::spawn`].
pub struct WsListener {
    listener: TcpListener,
    port: u16,
}

impl WsListener {
    /// Bind on `interface`, trying successive ports from `base_port`.
    pub fn bind(interface: IpAddr, base_port: u16) -> Result<Self> {
        let (listener, port) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
        listener.set_nonblocking(true)?;
        Ok(Self { listener, port })
    }

    /// Port actually bound.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Start accepting, handing each socket to the WsActor.
    pub fn spawn(self, ws_tx: tokio::sync::mpsc::Sender<WsMsg>) {
        let listener = self.listener;
        std::thread::spawn(move || {
            loop {
                match listener.accept() {
                    Ok((stream, addr)) => {
                        crate::debug!("reload"; "client connected: {}", addr);

                        // Set blocking for WebSocket operations
                        let _ = stream.set_nonblocking(false);

                        // Send raw TcpStream to WsActor for handshake
                        if ws_tx.blocking_send(WsMsg::AddClient(stream)).is_err() {
                            crate::log!("reload"; "failed to send client to actor");
                            break;
                        }
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        std::thread::sleep(std::time::Duration::from_millis(100));
                        continue;
                    }
                    Err(e) => {
                        crate::log!("reload"; "accept error: {}", e);
                        std::thread::sleep(std::time::Duration::from_millis(100));
                    }
                }
                if crate::core::is_shutdown() {
                    break;
                }
            }
        });
    }
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(SocketAddr::new(interface, port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind WebSocket server after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, TcpStream};

    #[test]
    fn test_bind_skips_taken_port() {
        let localhost = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let (held, port) = try_bind_port(localhost, 0, 1).unwrap();
        assert_ne!(port, 0);

        let (_next, next_port) = try_bind_port(localhost, port, 10).unwrap();
        assert_ne!(next_port, port);
        drop(held);
    }

    #[test]
    fn test_client_waits_in_backlog_until_spawn() {
        let listener = WsListener::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).unwrap();
        let port = listener.port();
        assert_ne!(port, 0);

        // Host page connects while the actors are still starting
        let _client = TcpStream::connect((Ipv4Addr::LOCALHOST, port)).unwrap();

        let (tx, mut rx) = tokio::sync::mpsc::channel(1);
        listener.spawn(tx);
        assert!(matches!(rx.blocking_recv(), Some(WsMsg::AddClient(_))));
    }
}
