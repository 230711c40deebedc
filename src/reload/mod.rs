//! Host link: WebSocket protocol and listener.
//!
//! - `message` - JSON messages exchanged with host pages
//! - `server` - listener handing accepted sockets to the WsActor

pub mod message;
pub mod server;
