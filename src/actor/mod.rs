//! Actor System for the live preview
//!
//! Message-passing concurrency for serve mode:
//!
//! ```text
//! EditorActor --> PreviewCoordinator --> WsActor <--> host pages
//!  (notify)      (debounce, compose,   (broadcast,
//!                 render, relay)        read back)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `editor` - Sketch file watcher and source access
//! - `preview` - Change coordinator owning all preview state
//! - `ws` - WebSocket host link
//! - `system` - Wires up and runs actors

pub mod editor;
pub mod messages;
pub mod preview;
pub mod system;
pub mod ws;

pub use system::ActorSystem;
