//! Run-scoped scratch directory
//!
//! Every run mints its own uniquely named directory. Teardown happens on
//! drop, so it runs on every exit path including unwinding; with `retain`
//! the directory is left on disk instead.

use crate::error::{ExtractError, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Prefix of every workspace directory name
pub const WORKSPACE_PREFIX: &str = "karaoke_extract_";

const STEMS_DIR: &str = "separated";
const ENCODED_DIR: &str = "encoded";

/// Scratch directory owned by exactly one run
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
    root: PathBuf,
    retain: bool,
}

impl Workspace {
    /// Create a fresh workspace under `parent`
    pub fn stage(parent: &Path, retain: bool) -> Result<Self> {
        std::fs::create_dir_all(parent).map_err(|e| ExtractError::output_error(parent, e))?;

        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| ExtractError::output_error(parent, e))?;
        let root = dir.path().to_path_buf();

        std::fs::create_dir_all(root.join(ENCODED_DIR))
            .map_err(|e| ExtractError::output_error(root.join(ENCODED_DIR), e))?;

        info!("Temp workspace: {}", root.display());

        Ok(Self {
            dir: Some(dir),
            root,
            retain,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical waveform location for a normalized base name
    pub fn waveform_path(&self, base: &str) -> PathBuf {
        self.root.join(format!("{}.wav", base))
    }

    /// Directory receiving the separated stems
    pub fn stems_dir(&self) -> PathBuf {
        self.root.join(STEMS_DIR)
    }

    /// Staging location for an encoded file before it is published
    pub fn encoded_path(&self, file_name: &str) -> PathBuf {
        self.root.join(ENCODED_DIR).join(file_name)
    }

    /// Tear the workspace down now
    ///
    /// Returns the directory path when it was retained.
    pub fn teardown(mut self) -> Option<PathBuf> {
        self.release()
    }

    fn release(&mut self) -> Option<PathBuf> {
        let dir = self.dir.take()?;

        if self.retain {
            let path = dir.keep();
            info!("Kept temp directory: {}", path.display());
            return Some(path);
        }

        match dir.close() {
            Ok(()) => debug!("Removed workspace {}", self.root.display()),
            Err(e) => warn!("Failed to remove workspace {}: {}", self.root.display(), e),
        }
        None
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let parent = TempDir::new().unwrap();
        let ws = Workspace::stage(parent.path(), false).unwrap();

        assert!(ws.root().starts_with(parent.path()));
        let name = ws.root().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(WORKSPACE_PREFIX));
        assert_eq!(ws.waveform_path("song"), ws.root().join("song.wav"));
        assert_eq!(ws.stems_dir(), ws.root().join("separated"));
        assert!(ws.encoded_path("vocals.mp3").parent().unwrap().is_dir());
    }

    #[test]
    fn test_teardown_removes_directory() {
        let parent = TempDir::new().unwrap();
        let ws = Workspace::stage(parent.path(), false).unwrap();
        let root = ws.root().to_path_buf();
        std::fs::write(root.join("scratch.wav"), b"data").unwrap();

        assert_eq!(ws.teardown(), None);
        assert!(!root.exists());
    }

    #[test]
    fn test_drop_removes_directory() {
        let parent = TempDir::new().unwrap();
        let root = {
            let ws = Workspace::stage(parent.path(), false).unwrap();
            ws.root().to_path_buf()
        };
        assert!(!root.exists());
    }

    #[test]
    fn test_retained_workspace_survives() {
        let parent = TempDir::new().unwrap();
        let ws = Workspace::stage(parent.path(), true).unwrap();
        let root = ws.root().to_path_buf();

        assert_eq!(ws.teardown(), Some(root.clone()));
        assert!(root.is_dir());
    }

    #[test]
    fn test_workspaces_are_unique() {
        let parent = TempDir::new().unwrap();
        let a = Workspace::stage(parent.path(), false).unwrap();
        let b = Workspace::stage(parent.path(), false).unwrap();
        assert_ne!(a.root(), b.root());
    }
}
