//! Server lifecycle management.

use crate::{
    actor::ActorSystem,
    config::PlaygroundConfig,
    core::register_server,
    deps::{Revision, catalog},
    log,
    reload::server::WsListener,
    sandbox::DocumentStore,
};
use anyhow::Result;
use crossbeam::channel::{Receiver, Sender};
use std::{
    net::SocketAddr,
    sync::Arc,
    thread::{self, JoinHandle},
};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(
    interface: std::net::IpAddr,
    base_port: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Bind the host link listener before anything slow runs.
///
/// A failure is logged and the server keeps running without live updates.
pub fn bind_ws_listener(interface: std::net::IpAddr, base_port: u16) -> Option<WsListener> {
    match WsListener::bind(interface, base_port) {
        Ok(listener) => {
            if listener.port() != base_port {
                log!("serve"; "ws port {} in use, using {} instead", base_port, listener.port());
            }
            Some(listener)
        }
        Err(e) => {
            log!("serve"; "websocket server failed: {}", e);
            None
        }
    }
}

/// Register server for graceful shutdown.
///
/// When Ctrl+C is pressed, the handler set up in main() unblocks the server
/// and notifies the actors.
pub fn register_server_for_shutdown(server: Arc<Server>, shutdown_tx: Sender<()>) {
    register_server(server, shutdown_tx);
}

/// Spawn the actor system on its own thread.
pub fn spawn_actors(
    config: Arc<PlaygroundConfig>,
    store: DocumentStore,
    listener: Option<WsListener>,
    shutdown_rx: Receiver<()>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        if let Err(e) = run_actor_system(config, store, listener, shutdown_rx) {
            log!("actor"; "error: {:#}", e);
        }
    })
}

fn run_actor_system(
    config: Arc<PlaygroundConfig>,
    store: DocumentStore,
    listener: Option<WsListener>,
    shutdown_rx: Receiver<()>,
) -> Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    rt.block_on(async {
        let catalog = catalog::load_or_fallback(&config.revision).await;
        if let Some(pinned) = config.pinned_revision.map(Revision)
            && !catalog.contains(pinned)
        {
            log!("preview"; "{} is not a published release, rendering it anyway", pinned);
        }

        ActorSystem::new(config, catalog, store)
            .with_listener(listener)
            .with_shutdown_signal(shutdown_rx)
            .run()
            .await
    })
}

/// Wait for actor system to shutdown gracefully (max 2 seconds).
pub fn wait_for_shutdown(handle: JoinHandle<()>) {
    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(std::time::Duration::from_millis(50));
    }
}
