//! Filesystem helpers

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Move a file, copying when a plain rename cannot cross filesystems
///
/// An existing destination is overwritten. The destination path only ever
/// holds a complete file: a cross-filesystem copy goes to a sibling
/// `.part` file first and is renamed into place.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            copy_into_place(from, to)?;
            fs::remove_file(from)
        }
    }
}

/// Sibling path a copy is staged under before it is renamed into place
pub fn part_path(to: &Path) -> PathBuf {
    let mut name: OsString = to.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    to.with_file_name(name)
}

fn copy_into_place(from: &Path, to: &Path) -> io::Result<()> {
    let part = part_path(to);
    let copied = fs::copy(from, &part).and_then(|_| fs::rename(&part, to));

    if copied.is_err() && part.exists() {
        if let Err(e) = fs::remove_file(&part) {
            warn!("Failed to remove incomplete copy {}: {}", part.display(), e);
        }
    }
    copied
}
