//! External collaborators used by the pipeline

use crate::audio::{FfmpegTranscoder, Transcoder, FFMPEG};
use crate::config::settings::{FFMPEG_ENV, PYTHON_ENV};
use crate::device::{AcceleratorProbe, TorchProbe};
use crate::error::{ExtractError, Result};
use crate::process::{find_executable, resolve_binary};
use crate::separation::{DemucsSeparator, StemSeparator};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Interpreter names tried, in order, when no override is set
const PYTHON_CANDIDATES: [&str; 2] = ["python3", "python"];

/// The transcoder, separator and device probe used for one run
pub struct Backends {
    pub transcoder: Box<dyn Transcoder>,
    pub separator: Box<dyn StemSeparator>,
    pub probe: Box<dyn AcceleratorProbe>,
}

impl Backends {
    /// Resolve the real ffmpeg / Demucs backends from the environment
    ///
    /// Fails fast when ffmpeg cannot be found. A missing Python interpreter
    /// is not fatal here; separation reports it when it runs.
    pub fn detect() -> Result<Self> {
        let ffmpeg = resolve_ffmpeg()?;
        debug!("Using transcoder {}", ffmpeg.display());

        let python = resolve_python();
        match &python {
            Some(p) => debug!("Using Python interpreter {}", p.display()),
            None => warn!("No Python interpreter found; separation will be unavailable"),
        }

        Ok(Self {
            transcoder: Box::new(FfmpegTranscoder::new(ffmpeg)),
            separator: Box::new(DemucsSeparator::new(python.clone())),
            probe: Box::new(TorchProbe::new(python)),
        })
    }
}

fn resolve_ffmpeg() -> Result<PathBuf> {
    let explicit = std::env::var_os(FFMPEG_ENV).map(PathBuf::from);
    resolve_binary(explicit.as_deref(), FFMPEG).ok_or_else(|| ExtractError::MissingDependency {
        binary: explicit
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| FFMPEG.to_string()),
    })
}

fn resolve_python() -> Option<PathBuf> {
    match std::env::var_os(PYTHON_ENV).map(PathBuf::from) {
        Some(explicit) => resolve_binary(Some(&explicit), PYTHON_CANDIDATES[0]),
        None => PYTHON_CANDIDATES.iter().find_map(|name| find_executable(name)),
    }
}
