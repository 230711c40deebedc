//! Host Link Message Protocol
//!
//! JSON messages exchanged over the WebSocket between the playground and
//! its host pages. Both directions carry a `type` discriminator.
//!
//! # Server → host
//!
//! - `connected`: handshake done
//! - `catalog`: revision picker contents and selection
//! - `select`: selection changed (keeps every open page in sync)
//! - `render`: point the preview frame at a new locator
//! - `errors`: replace the error surface with these blocks
//! - `clear_errors`: empty and hide the error surface
//!
//! # Host → server
//!
//! - `select`: user picked a revision
//! - `relay`: a message the preview frame posted, with the frame's locator

use serde::{Deserialize, Serialize};

/// Message sent to host pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    /// Connection established
    Connected {
        /// Server version for compatibility check
        version: String,
    },

    /// Available revisions, most recent first
    Catalog { versions: Vec<u32>, selected: u32 },

    /// Active revision changed
    Select { revision: u32 },

    /// New sandbox document
    Render { src: String },

    /// Fault batch of the live sandbox
    Errors { messages: Vec<String> },

    /// New render started, hide the error surface
    ClearErrors,
}

impl HostMessage {
    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"clear_errors"}"#.to_string())
    }
}

/// Message received from host pages
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// User picked a revision
    Select { revision: u32 },

    /// Forwarded sandbox post, decoded later by the relay
    Relay {
        #[serde(default)]
        sandbox: Option<String>,
        message: serde_json::Value,
    },
}

impl ClientMessage {
    /// Parse from JSON string
    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_message() {
        let json = HostMessage::Render {
            src: "/preview/1-abc.html".into(),
        }
        .to_json();
        assert_eq!(json, r#"{"type":"render","src":"/preview/1-abc.html"}"#);
    }

    #[test]
    fn test_catalog_message() {
        let msg = HostMessage::Catalog {
            versions: vec![150, 149],
            selected: 150,
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "catalog", "versions": [150, 149], "selected": 150})
        );
    }

    #[test]
    fn test_clear_errors_message() {
        assert_eq!(HostMessage::ClearErrors.to_json(), r#"{"type":"clear_errors"}"#);
    }

    #[test]
    fn test_connected_message() {
        let json = HostMessage::connected().to_json();
        assert!(json.contains(r#""type":"connected""#));
        assert!(json.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(
            ClientMessage::from_json(r#"{"type":"select","revision":148}"#),
            Some(ClientMessage::Select { revision: 148 })
        );
    }

    #[test]
    fn test_parse_relay() {
        let parsed = ClientMessage::from_json(
            r#"{"type":"relay","sandbox":"/preview/2-ff.html","message":{"type":"error","data":["X is not defined"]}}"#,
        );
        match parsed {
            Some(ClientMessage::Relay { sandbox, message }) => {
                assert_eq!(sandbox.as_deref(), Some("/preview/2-ff.html"));
                assert_eq!(message["data"][0], "X is not defined");
            }
            other => panic!("expected relay, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_relay_without_sandbox() {
        let parsed = ClientMessage::from_json(r#"{"type":"relay","message":{"type":"error","data":"x"}}"#);
        assert!(matches!(parsed, Some(ClientMessage::Relay { sandbox: None, .. })));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(ClientMessage::from_json(r#"{"type":"page","path":"/"}"#), None);
        assert_eq!(ClientMessage::from_json("garbage"), None);
    }
}
