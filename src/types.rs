//! Core data types for karaoke-extract
//!
//! These types represent the artifacts that flow through the pipeline.

use crate::error::{ExtractError, Result};
use std::path::{Path, PathBuf};

// =============================================================================
// Input
// =============================================================================

/// A validated, user-supplied source media file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRef {
    /// Absolute path to the source file
    pub path: PathBuf,
    /// Size in bytes at validation time
    pub size_bytes: u64,
}

impl InputRef {
    /// Raw filename stem used for naming outputs
    pub fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

// =============================================================================
// Stems
// =============================================================================

/// Role of a separated stem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StemRole {
    Vocals,
    /// Everything that is not vocals; published as the instrumental
    Other,
}

impl StemRole {
    /// Name of the source as declared by separation models
    pub fn source_name(self) -> &'static str {
        match self {
            StemRole::Vocals => "vocals",
            StemRole::Other => "other",
        }
    }

    /// Suffix used in the published filename
    pub fn output_suffix(self) -> &'static str {
        match self {
            StemRole::Vocals => "vocals",
            StemRole::Other => "instrumental",
        }
    }

    /// Waveform filename inside the separation directory
    pub fn waveform_name(self) -> String {
        format!("{}.wav", self.source_name())
    }
}

/// Both stems required from separation
pub const REQUIRED_STEMS: [StemRole; 2] = [StemRole::Vocals, StemRole::Other];

/// Paths to the two separated stem waveforms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StemSet {
    pub vocals: PathBuf,
    pub other: PathBuf,
}

impl StemSet {
    /// Expected stem locations inside a separation output directory
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            vocals: dir.join(StemRole::Vocals.waveform_name()),
            other: dir.join(StemRole::Other.waveform_name()),
        }
    }

    pub fn path(&self, role: StemRole) -> &Path {
        match role {
            StemRole::Vocals => &self.vocals,
            StemRole::Other => &self.other,
        }
    }

    /// Check that both stem files exist on disk
    ///
    /// A separator reporting success is not enough; file presence is what counts.
    pub fn verify(&self) -> Result<()> {
        let missing: Vec<PathBuf> = REQUIRED_STEMS
            .iter()
            .map(|role| self.path(*role))
            .filter(|path| !path.is_file())
            .map(Path::to_path_buf)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ExtractError::OutputMissing { missing })
        }
    }
}

// =============================================================================
// Outputs
// =============================================================================

/// Final artifact locations for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTargets {
    pub vocals: PathBuf,
    pub instrumental: PathBuf,
}

impl OutputTargets {
    /// Build `{outdir}/{base}_{stamp}_{vocals|instrumental}.mp3`
    pub fn new(outdir: &Path, base: &str, stamp: &str) -> Self {
        let make = |role: StemRole| outdir.join(format!("{}_{}_{}.mp3", base, stamp, role.output_suffix()));
        Self {
            vocals: make(StemRole::Vocals),
            instrumental: make(StemRole::Other),
        }
    }

    pub fn path(&self, role: StemRole) -> &Path {
        match role {
            StemRole::Vocals => &self.vocals,
            StemRole::Other => &self.instrumental,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_output_targets_naming() {
        let targets = OutputTargets::new(Path::new("outputs"), "song", "20240601");
        assert_eq!(targets.vocals, PathBuf::from("outputs/song_20240601_vocals.mp3"));
        assert_eq!(
            targets.instrumental,
            PathBuf::from("outputs/song_20240601_instrumental.mp3")
        );
    }

    #[test]
    fn test_stem_set_verify_reports_missing_files() {
        let dir = TempDir::new().unwrap();
        let stems = StemSet::in_dir(dir.path());
        fs::write(&stems.vocals, b"RIFF").unwrap();

        match stems.verify() {
            Err(ExtractError::OutputMissing { missing }) => {
                assert_eq!(missing, vec![dir.path().join("other.wav")]);
            }
            other => panic!("expected OutputMissing, got {:?}", other),
        }

        fs::write(&stems.other, b"RIFF").unwrap();
        assert!(stems.verify().is_ok());
    }

    #[test]
    fn test_other_stem_publishes_as_instrumental() {
        assert_eq!(StemRole::Other.source_name(), "other");
        assert_eq!(StemRole::Other.output_suffix(), "instrumental");
        assert_eq!(StemRole::Vocals.waveform_name(), "vocals.wav");
    }
}
