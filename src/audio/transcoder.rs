//! ffmpeg based transcoding adapter

use crate::error::{ExtractError, Result};
use crate::process::{render_command, run_command, CommandFailure};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Transcoder binary name looked up on PATH
pub const FFMPEG: &str = "ffmpeg";

/// Channel count of the canonical waveform
pub const CANONICAL_CHANNELS: u16 = 2;

/// Sample rate of the canonical waveform in Hz
pub const CANONICAL_SAMPLE_RATE: u32 = 44100;

/// Lossy codec for the published files
pub const MP3_CODEC: &str = "libmp3lame";

/// Transcoding backend
pub trait Transcoder: Send + Sync {
    /// Convert arbitrary media into the canonical stereo 44.1 kHz waveform
    fn normalize(&self, input: &Path, output_wav: &Path) -> Result<()>;

    /// Encode a waveform to MP3 at the given bitrate
    fn encode(&self, input_wav: &Path, output_mp3: &Path, bitrate: &str) -> Result<()>;

    /// Get the name of this transcoder (for logging)
    fn name(&self) -> &'static str;
}

/// Transcoder that shells out to ffmpeg
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments for the canonical waveform conversion
    pub fn normalize_args(input: &Path, output_wav: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-vn".into(),
            "-i".into(),
            input.into(),
            "-ac".into(),
            CANONICAL_CHANNELS.to_string().into(),
            "-ar".into(),
            CANONICAL_SAMPLE_RATE.to_string().into(),
            output_wav.into(),
        ]
    }

    /// Arguments for the final MP3 encode
    pub fn encode_args(input_wav: &Path, output_mp3: &Path, bitrate: &str) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            input_wav.into(),
            "-vn".into(),
            "-codec:a".into(),
            MP3_CODEC.into(),
            "-b:a".into(),
            bitrate.into(),
            output_mp3.into(),
        ]
    }

    fn run(&self, args: Vec<OsString>) -> Result<()> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);

        run_command(&mut cmd).map_err(|failure| match failure {
            CommandFailure::Spawn(e) if e.kind() == std::io::ErrorKind::NotFound => {
                ExtractError::MissingDependency {
                    binary: self.binary.display().to_string(),
                }
            }
            CommandFailure::Spawn(e) => ExtractError::Io(e),
            CommandFailure::Exit { code } => ExtractError::TranscodeFailed {
                exit_code: code,
                command: render_command(&cmd),
            },
        })
    }
}

impl Transcoder for FfmpegTranscoder {
    fn normalize(&self, input: &Path, output_wav: &Path) -> Result<()> {
        self.run(Self::normalize_args(input, output_wav))
    }

    fn encode(&self, input_wav: &Path, output_mp3: &Path, bitrate: &str) -> Result<()> {
        self.run(Self::encode_args(input_wav, output_mp3, bitrate))
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}
