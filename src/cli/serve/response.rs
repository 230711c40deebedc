//! HTTP response handlers.

use crate::config::PlaygroundConfig;
use crate::embed::{HOST_HTML, HostVars};
use crate::utils::mime::types::{HTML, PLAIN};
use anyhow::Result;
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Preview documents run in an opaque origin even when opened directly.
const PREVIEW_CSP: &str = "sandbox allow-scripts";

/// Respond with the host page.
pub fn respond_host(request: Request, config: &PlaygroundConfig, ws_port: u16) -> Result<()> {
    let entry = config.entry_name();
    let body = HOST_HTML.render(&HostVars {
        title: &config.preview.title,
        entry: &entry,
        ws_port,
    });
    send_body(request, 200, HTML, body.into_bytes(), &[])
}

/// Respond with a live sandbox document.
pub fn respond_preview(request: Request, html: &str) -> Result<()> {
    let headers = [
        ("Content-Security-Policy", PREVIEW_CSP),
        ("Cache-Control", "no-store"),
    ];
    send_body(request, 200, HTML, html.as_bytes().to_vec(), &headers)
}

/// Respond with 404 (unknown path or revoked locator).
pub fn respond_not_found(request: Request) -> Result<()> {
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec(), &[])
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec(), &[])
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    extra: &[(&'static str, &'static str)],
) -> Result<()> {
    let body = if is_head_request(&request) { Vec::new() } else { body };
    let mut response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?);
    for &(key, value) in extra {
        response.add_header(make_header(key, value)?);
    }
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow::anyhow!("invalid header {key}: {value}"))
}
