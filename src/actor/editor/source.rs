//! Read access to the sketch being edited.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::{debug, log};

/// Something that can hand out the current sketch source.
///
/// Called once per regeneration, so the text is always the latest.
pub trait SourceEditor: Send + Sync {
    fn current(&mut self) -> String;
}

/// Editor backed by a file on disk.
///
/// Editors often truncate before writing, so a failed or racing read falls
/// back to the last content that was read successfully. Bytes that are not
/// UTF-8 are replaced rather than rejected, so every save reaches the sandbox.
#[derive(Debug)]
pub struct FileEditor {
    path: PathBuf,
    last: String,
}

impl FileEditor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last: String::new(),
        }
    }
}

impl SourceEditor for FileEditor {
    fn current(&mut self) -> String {
        match fs::read(&self.path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes).into_owned();
                self.last.clone_from(&content);
                content
            }
            // Mid-save rename or delete: the next event brings the new file.
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("watch"; "{} not found, keeping last content", self.path.display());
                self.last.clone()
            }
            Err(e) => {
                log!("error"; "failed to read {}: {}, keeping last content", self.path.display(), e);
                self.last.clone()
            }
        }
    }
}
