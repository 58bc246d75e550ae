//! Demucs separator
//!
//! Runs the Demucs command line in a Python interpreter. The model's declared
//! sources are checked before separation starts, and the files Demucs leaves
//! behind are moved to fixed `vocals.wav` / `other.wav` names.

use super::model::{ensure_required_sources, known_sources};
use super::StemSeparator;
use crate::device::Device;
use crate::error::{ExtractError, Result};
use crate::files::move_file;
use crate::process::{render_command, run_command, CommandFailure};
use crate::types::{StemRole, StemSet, REQUIRED_STEMS};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Prints the model's declared sources as a JSON object on the last stdout line
const LIST_SOURCES_SCRIPT: &str = "\
import json, sys
from demucs.pretrained import get_model
model = get_model(sys.argv[1])
print(json.dumps({\"sources\": list(model.sources)}))
";

/// Directory under the output dir that Demucs writes into
const RAW_DIR: &str = "raw";

/// Filenames Demucs may use for the non-vocal half of a two-stem split
const NON_VOCAL_CANDIDATES: [&str; 2] = ["other.wav", "no_vocals.wav"];

#[derive(Debug, Deserialize)]
struct ModelInfo {
    sources: Vec<String>,
}

/// Separator backed by the `demucs` Python package
#[derive(Debug, Clone)]
pub struct DemucsSeparator {
    python: Option<PathBuf>,
}

impl DemucsSeparator {
    /// Create a separator using the given interpreter
    ///
    /// `None` means no interpreter was found; every separation then fails
    /// with [`ExtractError::SeparationUnavailable`].
    pub fn new(python: Option<PathBuf>) -> Self {
        Self { python }
    }

    fn interpreter(&self) -> Result<&Path> {
        self.python
            .as_deref()
            .ok_or_else(|| ExtractError::SeparationUnavailable {
                reason: "no Python interpreter found (looked for python3, python)".to_string(),
            })
    }

    /// Ask the installed Demucs which sources the model produces
    pub fn declared_sources(&self, model: &str) -> Result<Vec<String>> {
        let python = self.interpreter()?;

        let output = Command::new(python)
            .args(["-c", LIST_SOURCES_SCRIPT, model])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ExtractError::SeparationUnavailable {
                reason: format!("failed to run {}: {}", python.display(), e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last_line = stderr.lines().rev().find(|l| !l.trim().is_empty());
            return Err(ExtractError::SeparationUnavailable {
                reason: format!(
                    "could not load model '{}': {}",
                    model,
                    last_line.unwrap_or("unknown error")
                ),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_sources(&stdout).ok_or_else(|| ExtractError::SeparationUnavailable {
            reason: format!(
                "unexpected model description: {}",
                stdout.chars().take(200).collect::<String>()
            ),
        })
    }

    fn separate_command(
        python: &Path,
        waveform: &Path,
        model: &str,
        device: Device,
        raw_root: &Path,
    ) -> Command {
        let mut cmd = Command::new(python);
        cmd.args(["-m", "demucs", "-n", model, "--two-stems", "vocals", "--device"])
            .arg(device.as_str())
            .arg("-o")
            .arg(raw_root)
            .arg(waveform);
        cmd
    }
}

/// Parse the last non-empty stdout line as `{"sources": [...]}`
fn parse_sources(stdout: &str) -> Option<Vec<String>> {
    let line = stdout.lines().rev().find(|l| !l.trim().is_empty())?;
    serde_json::from_str::<ModelInfo>(line.trim())
        .ok()
        .map(|info| info.sources)
}

/// Locate the files Demucs produced for one track
fn locate_raw_stems(track_dir: &Path) -> StemSet {
    let other = NON_VOCAL_CANDIDATES
        .iter()
        .map(|name| track_dir.join(name))
        .find(|p| p.is_file())
        .unwrap_or_else(|| track_dir.join(StemRole::Other.waveform_name()));

    StemSet {
        vocals: track_dir.join(StemRole::Vocals.waveform_name()),
        other,
    }
}

impl StemSeparator for DemucsSeparator {
    fn separate(
        &self,
        waveform: &Path,
        model: &str,
        device: Device,
        output_dir: &Path,
    ) -> Result<StemSet> {
        let python = self.interpreter()?;

        if let Some(expected) = known_sources(model) {
            debug!("Model {} normally provides: {}", model, expected.join(", "));
        }

        let sources = self.declared_sources(model)?;
        ensure_required_sources(model, &sources)?;
        info!("Model {} provides: {}", model, sources.join(", "));

        std::fs::create_dir_all(output_dir)
            .map_err(|e| ExtractError::output_error(output_dir, e))?;

        let raw_root = output_dir.join(RAW_DIR);
        let mut cmd = Self::separate_command(python, waveform, model, device, &raw_root);

        run_command(&mut cmd).map_err(|failure| match failure {
            CommandFailure::Spawn(e) => ExtractError::SeparationUnavailable {
                reason: format!("failed to run {}: {}", python.display(), e),
            },
            CommandFailure::Exit { code } => ExtractError::SeparationFailed {
                exit_code: code,
                command: render_command(&cmd),
            },
        })?;

        let track = waveform
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let produced = locate_raw_stems(&raw_root.join(model).join(track));
        produced.verify()?;

        let stems = StemSet::in_dir(output_dir);
        for role in REQUIRED_STEMS {
            let dest = stems.path(role);
            move_file(produced.path(role), dest)
                .map_err(|e| ExtractError::output_error(dest, e))?;
        }

        stems.verify()?;
        Ok(stems)
    }

    fn name(&self) -> &'static str {
        "demucs"
    }
}
