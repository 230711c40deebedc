//! Actor Message Definitions
//!
//! Message types for inter-actor communication.
//!
//! ```text
//! EditorActor --Edit--> PreviewCoordinator --Render/Errors--> WsActor
//!                              ^                                 |
//!                              +-----------SelectVersion---------+
//! ```

use std::net::TcpStream;

use crate::deps::Revision;
use crate::relay::ErrorBatch;

// =============================================================================
// PreviewCoordinator Messages
// =============================================================================

/// Control messages to the PreviewCoordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewMsg {
    /// Sketch content changed
    Edit,
    /// User picked a revision in a host page
    SelectVersion(Revision),
    /// Shutdown
    Shutdown,
}

// =============================================================================
// WsActor Messages
// =============================================================================

/// Messages to WebSocket Actor
#[derive(Debug)]
pub enum WsMsg {
    /// Revision picker contents (cached for new clients)
    Catalog {
        versions: Vec<Revision>,
        selected: Revision,
    },
    /// Active revision changed
    Select { revision: Revision },
    /// Point preview frames at a new locator (cached for new clients)
    Render { src: String },
    /// Replace the error surface
    Errors(ErrorBatch),
    /// Empty and hide the error surface
    ClearErrors,
    /// Add client
    AddClient(TcpStream),
    /// Shutdown
    Shutdown,
}
