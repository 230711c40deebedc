//! `[preview]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [preview]
//! entry = "main.js"           # Sketch file the playground watches
//! debounce_ms = 500           # Quiet period before an edit re-renders
//! title = "playground preview"
//! polyfill = "https://unpkg.com/es-module-shims@latest/dist/es-module-shims.js"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Import-map polyfill for browsers without native support.
pub const DEFAULT_POLYFILL: &str =
    "https://unpkg.com/es-module-shims@latest/dist/es-module-shims.js";

/// Preview pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Sketch file, relative to the project root.
    pub entry: PathBuf,

    /// Trailing-edge debounce window for edits, in milliseconds.
    pub debounce_ms: u64,

    /// `<title>` of the composed document.
    pub title: String,

    /// Import-map polyfill script URL.
    pub polyfill: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            entry: PathBuf::from("main.js"),
            debounce_ms: 500,
            title: "playground preview".into(),
            polyfill: DEFAULT_POLYFILL.into(),
        }
    }
}
