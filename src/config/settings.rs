//! Runtime configuration settings

use super::cli::{DEFAULT_BITRATE, DEFAULT_MODEL, DEFAULT_OUTDIR};
use crate::device::DeviceRequest;
use crate::error::{ExtractError, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

/// Environment variable naming an explicit transcoder binary
pub const FFMPEG_ENV: &str = "KARAOKE_EXTRACT_FFMPEG";

/// Environment variable naming the interpreter that hosts Demucs
pub const PYTHON_ENV: &str = "KARAOKE_EXTRACT_PYTHON";

/// Runtime settings for one extraction run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Source media file
    pub input: PathBuf,
    /// Directory receiving the final MP3 files
    pub outdir: PathBuf,
    /// Separation model name
    pub model: String,
    /// Requested compute device
    pub device: DeviceRequest,
    /// Encoder bitrate, passed through verbatim
    pub bitrate: String,
    /// Keep the scratch workspace after the run
    pub keep_temp: bool,
    /// Parent of the scratch workspace (defaults to the OS temp dir)
    pub scratch_root: Option<PathBuf>,
    /// Date used in output names (defaults to today's local date)
    pub run_date: Option<NaiveDate>,
    /// Show the stage spinner
    pub show_progress: bool,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &super::cli::Cli) -> Self {
        Self {
            input: cli.input.clone(),
            outdir: cli.outdir.clone(),
            model: cli.model.clone(),
            device: cli.device,
            bitrate: cli.bitrate.clone(),
            keep_temp: cli.keep_temp,
            scratch_root: None,
            run_date: None,
            show_progress: !cli.quiet,
        }
    }

    /// Reject values that could never reach the external tools intact
    ///
    /// The model name and bitrate are forwarded verbatim as single
    /// arguments, so they must be non-empty and the bitrate a single token.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ExtractError::ConfigError(
                "--model must name a separation model".to_string(),
            ));
        }
        if self.bitrate.is_empty() || self.bitrate.chars().any(char::is_whitespace) {
            return Err(ExtractError::ConfigError(format!(
                "--bitrate must be a single value such as {} (got '{}')",
                DEFAULT_BITRATE, self.bitrate
            )));
        }
        Ok(())
    }

    /// Directory the workspace is created in
    pub fn scratch_root(&self) -> PathBuf {
        self.scratch_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            outdir: PathBuf::from(DEFAULT_OUTDIR),
            model: DEFAULT_MODEL.to_string(),
            device: DeviceRequest::Auto,
            bitrate: DEFAULT_BITRATE.to_string(),
            keep_temp: false,
            scratch_root: None,
            run_date: None,
            show_progress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExitStatus;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_blank_model_is_rejected() {
        let settings = Settings {
            model: "  ".to_string(),
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ExtractError::ConfigError(_)));
        assert_eq!(err.exit_code(), ExitStatus::APP_ERROR);
    }

    #[test]
    fn test_bitrate_must_be_one_token() {
        for bad in ["", "192 k", " 192k"] {
            let settings = Settings {
                bitrate: bad.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(settings.validate(), Err(ExtractError::ConfigError(_))),
                "accepted bitrate {:?}",
                bad
            );
        }

        let settings = Settings {
            bitrate: "320k".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_scratch_root_falls_back_to_temp_dir() {
        assert_eq!(Settings::default().scratch_root(), std::env::temp_dir());
        let settings = Settings {
            scratch_root: Some(PathBuf::from("/scratch")),
            ..Default::default()
        };
        assert_eq!(settings.scratch_root(), PathBuf::from("/scratch"));
    }
}
