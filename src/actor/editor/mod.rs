//! Editor Actor
//!
//! Watches the sketch file and tells the PreviewCoordinator when its
//! content changed. Timing is left to the coordinator's debounce.
//!
//! ```text
//! notify (sync thread) → async channel → filter → PreviewMsg::Edit
//! ```

mod filter;
mod source;

pub use source::{FileEditor, SourceEditor};

use std::ffi::OsString;
use std::path::Path;

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::messages::PreviewMsg;

/// Editor Actor - watches the sketch file
pub struct EditorActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// File name of the sketch inside the watched directory
    entry: OsString,
    /// Channel to send messages to the PreviewCoordinator
    preview_tx: mpsc::Sender<PreviewMsg>,
}

impl EditorActor {
    /// Start watching immediately, buffering events until `run`.
    ///
    /// The entry's directory is watched rather than the file, so editors
    /// that save by renaming a temp file over it are still seen.
    pub fn new(entry: &Path, preview_tx: mpsc::Sender<PreviewMsg>) -> Result<Self> {
        let name = entry
            .file_name()
            .with_context(|| format!("{} is not a file path", entry.display()))?
            .to_os_string();
        let dir = match entry.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let (notify_tx, notify_rx) = std::sync::mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;

        crate::debug!("watch"; "watching {}", entry.display());

        Ok(Self {
            notify_rx,
            watcher,
            entry: name,
            preview_tx,
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let preview_tx = self.preview_tx;
        let entry = self.entry;
        // Dropping the watcher would stop events
        let _watcher = self.watcher;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // Spawn a thread to poll notify events and send to async channel
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        while let Some(event) = async_rx.recv().await {
            if !filter::is_entry_edit(&event, &entry) {
                continue;
            }
            crate::debug!("watch"; "{:?} {:?}", event.kind, event.paths);
            if preview_tx.send(PreviewMsg::Edit).await.is_err() {
                break; // Coordinator shut down
            }
        }
    }
}
