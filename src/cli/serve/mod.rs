//! Development server for the live preview.
//!
//! Routes:
//! - `/` - host page (revision picker, sandboxed frame, error surface)
//! - `/preview/<generation>-<hash>.html` - live sandbox document
//!
//! The actor system runs on its own thread with a tokio runtime; this
//! module only serves what the coordinator has put in the [`DocumentStore`].

mod lifecycle;
mod response;

use crate::{
    config::{PlaygroundConfig, cfg},
    debug,
    embed::STARTER_JS,
    log,
    reload::server::WsListener,
    sandbox::{DocumentStore, PREVIEW_PREFIX},
};
use anyhow::{Context, Result};
use crossbeam::channel;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use tiny_http::{Request, Server};

/// Actual WebSocket port (may differ from the configured one if it was in use)
/// Set by `bind_server` before the first request is served
static ACTUAL_WS_PORT: AtomicU16 = AtomicU16::new(0);

/// Update the actual WebSocket port
pub fn set_actual_ws_port(port: u16) {
    ACTUAL_WS_PORT.store(port, Ordering::Relaxed);
}

/// Get the actual WebSocket port, or the configured one if binding failed
fn get_actual_ws_port(config: &PlaygroundConfig) -> u16 {
    match ACTUAL_WS_PORT.load(Ordering::Relaxed) {
        0 => config.serve.ws_port,
        port => port,
    }
}

/// Start the playground: create the sketch if needed, bind, serve until Ctrl+C.
pub fn serve(config: &PlaygroundConfig) -> Result<()> {
    ensure_entry(config)?;
    bind_server()?.run()
}

/// Write the starter scene if the sketch does not exist yet.
fn ensure_entry(config: &PlaygroundConfig) -> Result<()> {
    let entry = config.entry_path();
    if entry.exists() {
        return Ok(());
    }

    if let Some(parent) = entry.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&entry, STARTER_JS)
        .with_context(|| format!("Failed to write starter sketch to {}", entry.display()))?;
    log!("serve"; "created {}", entry.display());
    Ok(())
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    store: DocumentStore,
    listener: Option<WsListener>,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server and the host link listener without starting either loop
///
/// The host page is served as soon as this returns, while the catalog is
/// still being fetched; it picks up the catalog and first render over the
/// WebSocket once they exist. Both ports are final by then.
pub fn bind_server() -> Result<BoundServer> {
    let config = cfg();
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;

    let listener = lifecycle::bind_ws_listener(config.serve.interface, config.serve.ws_port);
    if let Some(listener) = &listener {
        set_actual_ws_port(listener.port());
        debug!("ws"; "ws://{}:{}", config.serve.interface, listener.port());
    }
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        store: DocumentStore::new(),
        listener,
        shutdown_rx,
    })
}

impl BoundServer {
    /// Start the request loop (blocking).
    pub fn run(self) -> Result<()> {
        let config = cfg();
        let actor_handle = lifecycle::spawn_actors(
            Arc::clone(&config),
            self.store.clone(),
            self.listener,
            self.shutdown_rx,
        );
        run_request_loop(&self.server, &self.store)?;
        lifecycle::wait_for_shutdown(actor_handle);
        Ok(())
    }
}

fn run_request_loop(server: &Server, store: &DocumentStore) -> Result<()> {
    // Use thread pool to handle requests concurrently
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .context("failed to create thread pool")?;

    for request in server.incoming_requests() {
        let config = cfg();
        let store = store.clone();
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config, &store) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &PlaygroundConfig, store: &DocumentStore) -> Result<()> {
    // Early exit if shutdown requested
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let url = request.url().to_string();
    let path = url.split(['?', '#']).next().unwrap_or("/");
    debug!("serve"; "{} {}", request.method(), path);

    match route(path) {
        Route::Host => response::respond_host(request, config, get_actual_ws_port(config)),
        Route::Preview => match store.resolve(path) {
            Some(html) => response::respond_preview(request, &html),
            None => response::respond_not_found(request),
        },
        Route::NotFound => response::respond_not_found(request),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Host,
    Preview,
    NotFound,
}

fn route(path: &str) -> Route {
    match path {
        "/" | "/index.html" => Route::Host,
        _ if path.starts_with(PREVIEW_PREFIX) => Route::Preview,
        _ => Route::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_route() {
        assert_eq!(route("/"), Route::Host);
        assert_eq!(route("/index.html"), Route::Host);
        assert_eq!(route("/preview/1-abc.html"), Route::Preview);
        assert_eq!(route("/main.js"), Route::NotFound);
        assert_eq!(route("/previewx"), Route::NotFound);
    }

    #[test]
    fn test_ensure_entry_writes_starter_once() {
        let dir = TempDir::new().unwrap();
        let config = PlaygroundConfig {
            root: dir.path().to_path_buf(),
            ..PlaygroundConfig::default()
        };

        ensure_entry(&config).unwrap();
        let entry = config.entry_path();
        assert_eq!(std::fs::read_to_string(&entry).unwrap(), STARTER_JS);

        std::fs::write(&entry, "// mine").unwrap();
        ensure_entry(&config).unwrap();
        assert_eq!(std::fs::read_to_string(&entry).unwrap(), "// mine");
    }

    #[test]
    fn test_ensure_entry_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let mut config = PlaygroundConfig {
            root: dir.path().to_path_buf(),
            ..PlaygroundConfig::default()
        };
        config.preview.entry = "sketches/cube.js".into();

        ensure_entry(&config).unwrap();
        assert!(dir.path().join("sketches/cube.js").is_file());
    }
}
