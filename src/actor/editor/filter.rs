//! Decide which notify events count as an edit of the sketch.

use std::ffi::OsStr;
use std::path::Path;

use notify::EventKind;
use notify::event::ModifyKind;

/// Whether `event` changed the content of the file named `entry`.
///
/// Only the entry's directory is watched, so a matching file name is enough.
/// Metadata-only changes (mtime/atime/chmod) and removals are ignored: a
/// removed sketch keeps rendering its last content.
pub(super) fn is_entry_edit(event: &notify::Event, entry: &OsStr) -> bool {
    let relevant = match event.kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    };

    relevant
        && event
            .paths
            .iter()
            .any(|path| !is_temp_file(path) && path.file_name() == Some(entry))
}

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with(".#")
}
