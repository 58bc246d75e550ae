//! Source file validation

use crate::error::{ExtractError, Result};
use crate::types::InputRef;
use std::path::Path;
use tracing::debug;

/// Smallest file accepted as plausible media
///
/// Size heuristic only: it catches empty and truncated uploads, not corrupt
/// files above the threshold.
pub const MIN_INPUT_BYTES: u64 = 1024;

/// Validate the source path and resolve it to an absolute [`InputRef`]
pub fn validate_input(path: &Path) -> Result<InputRef> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ExtractError::InputNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ExtractError::InputUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    if metadata.is_dir() {
        return Err(ExtractError::InputNotAFile(path.to_path_buf()));
    }

    let size_bytes = metadata.len();
    if size_bytes < MIN_INPUT_BYTES {
        return Err(ExtractError::InputTooSmall {
            path: path.to_path_buf(),
            size: size_bytes,
            minimum: MIN_INPUT_BYTES,
        });
    }

    let absolute = path
        .canonicalize()
        .map_err(|e| ExtractError::InputUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    debug!("Validated input {} ({} bytes)", absolute.display(), size_bytes);

    Ok(InputRef {
        path: absolute,
        size_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_bytes(dir: &TempDir, name: &str, len: usize) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, vec![0u8; len]).unwrap();
        path
    }

    #[test]
    fn test_small_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_bytes(&dir, "tiny.mp3", 500);
        match validate_input(&path) {
            Err(ExtractError::InputTooSmall { size, minimum, .. }) => {
                assert_eq!(size, 500);
                assert_eq!(minimum, MIN_INPUT_BYTES);
            }
            other => panic!("expected InputTooSmall, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_bytes(&dir, "empty.wav", 0);
        assert!(matches!(
            validate_input(&path),
            Err(ExtractError::InputTooSmall { size: 0, .. })
        ));
    }

    #[test]
    fn test_directory_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            validate_input(dir.path()),
            Err(ExtractError::InputNotAFile(_))
        ));
    }

    #[test]
    fn test_missing_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.mp3");
        assert!(matches!(
            validate_input(&path),
            Err(ExtractError::InputNotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_plausible_file_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write_bytes(&dir, "song.mp3", 2000);
        let input = validate_input(&path).expect("2000-byte file should pass");
        assert_eq!(input.size_bytes, 2000);
        assert!(input.path.is_absolute());
        assert_eq!(input.file_stem(), "song");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let dir = TempDir::new().unwrap();
        let path = write_bytes(&dir, "edge.mp3", MIN_INPUT_BYTES as usize);
        assert!(validate_input(&path).is_ok());
    }
}
