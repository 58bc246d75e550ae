//! Stem separation
//!
//! Separation is a black box behind the [`StemSeparator`] trait. Whatever
//! the backend, it must leave `vocals.wav` and `other.wav` in the requested
//! output directory.

pub mod demucs;
pub mod model;

pub use demucs::DemucsSeparator;
pub use model::{ensure_required_sources, known_sources};

use crate::device::Device;
use crate::error::Result;
use crate::types::StemSet;
use std::path::Path;

/// Stem separation backend
pub trait StemSeparator: Send + Sync {
    /// Separate a canonical waveform into vocals and everything else
    ///
    /// # Arguments
    /// * `waveform` - Canonical stereo 44.1 kHz WAV
    /// * `model` - Pretrained model name
    /// * `device` - Device passed through to the model
    /// * `output_dir` - Directory that receives `vocals.wav` and `other.wav`
    fn separate(
        &self,
        waveform: &Path,
        model: &str,
        device: Device,
        output_dir: &Path,
    ) -> Result<StemSet>;

    /// Get the name of this separator (for logging)
    fn name(&self) -> &'static str;
}
