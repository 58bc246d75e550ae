//! Unified error types for karaoke-extract
//!
//! Error strategy:
//! - Every failure is fatal to the run; nothing is retried and no partial
//!   output is published.
//! - Each recognized failure maps to a stable process exit code (see
//!   [`ExitStatus`]). Anything unrecognized maps to [`ExitStatus::UNEXPECTED`].
//!
//! All errors include actionable suggestions where possible.

use std::path::PathBuf;
use thiserror::Error;

/// Stable process exit codes
pub struct ExitStatus;

impl ExitStatus {
    pub const SUCCESS: u8 = 0;
    pub const APP_ERROR: u8 = 2;
    pub const MISSING_DEPENDENCY: u8 = 3;
    pub const INVALID_INPUT: u8 = 4;
    pub const COMMAND_FAILED: u8 = 10;
    pub const OUTPUT_MISSING: u8 = 11;
    pub const SEPARATION_UNAVAILABLE: u8 = 20;
    pub const MISSING_SOURCES: u8 = 21;
    pub const UNEXPECTED: u8 = 99;
}

/// Top-level error type for karaoke-extract operations
#[derive(Debug, Error)]
pub enum ExtractError {
    // =========================================================================
    // Environment
    // =========================================================================
    #[error("Missing dependency: '{binary}'\n  Tip: Install it and ensure it is on your PATH")]
    MissingDependency { binary: String },

    #[error("Separation runtime unavailable: {reason}\n  Tip: Install Demucs into the interpreter used for separation:\n    python3 -m pip install demucs\n  or point KARAOKE_EXTRACT_PYTHON at an interpreter that has it")]
    SeparationUnavailable { reason: String },

    // =========================================================================
    // Input
    // =========================================================================
    #[error("Input file not found: '{0}'\n  Tip: Check the path is correct and accessible")]
    InputNotFound(PathBuf),

    #[error("Input path is a directory, expected a media file: '{0}'")]
    InputNotAFile(PathBuf),

    #[error("Input file looks too small to be a valid media file: '{path}' ({size} bytes, minimum {minimum})")]
    InputTooSmall {
        path: PathBuf,
        size: u64,
        minimum: u64,
    },

    #[error("Unable to read input file '{path}': {reason}")]
    InputUnreadable { path: PathBuf, reason: String },

    // =========================================================================
    // External processes
    // =========================================================================
    #[error("Transcoder command failed ({}): {command}", describe_exit(.exit_code))]
    TranscodeFailed {
        exit_code: Option<i32>,
        command: String,
    },

    #[error("Separation command failed ({}): {command}", describe_exit(.exit_code))]
    SeparationFailed {
        exit_code: Option<i32>,
        command: String,
    },

    // =========================================================================
    // Contract violations
    // =========================================================================
    #[error("Separation completed but expected stem files were not found: {}\n  Tip: Re-run with --keep-temp to inspect the workspace", display_paths(.missing))]
    OutputMissing { missing: Vec<PathBuf> },

    #[error("Model '{model}' does not provide both 'vocals' and 'other' stems (available: {})\n  Tip: Choose a model such as htdemucs that separates vocals", .available.join(", "))]
    MissingSources {
        model: String,
        available: Vec<String>,
    },

    // =========================================================================
    // Generic application errors
    // =========================================================================
    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the output directory")]
    OutputError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for karaoke-extract operations
pub type Result<T> = std::result::Result<T, ExtractError>;

impl ExtractError {
    /// Process exit code for this failure kind
    pub fn exit_code(&self) -> u8 {
        match self {
            ExtractError::MissingDependency { .. } => ExitStatus::MISSING_DEPENDENCY,
            ExtractError::InputNotFound(_)
            | ExtractError::InputNotAFile(_)
            | ExtractError::InputTooSmall { .. }
            | ExtractError::InputUnreadable { .. } => ExitStatus::INVALID_INPUT,
            ExtractError::TranscodeFailed { .. } | ExtractError::SeparationFailed { .. } => {
                ExitStatus::COMMAND_FAILED
            }
            ExtractError::OutputMissing { .. } => ExitStatus::OUTPUT_MISSING,
            ExtractError::SeparationUnavailable { .. } => ExitStatus::SEPARATION_UNAVAILABLE,
            ExtractError::MissingSources { .. } => ExitStatus::MISSING_SOURCES,
            ExtractError::OutputError { .. } | ExtractError::ConfigError(_) => {
                ExitStatus::APP_ERROR
            }
            ExtractError::Io(_) => ExitStatus::UNEXPECTED,
        }
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check that you have write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => {
                format!("Directory does not exist: {}", path.parent().map(|p| p.display().to_string()).unwrap_or_default())
            }
            _ => err.to_string(),
        };
        ExtractError::OutputError { path, reason }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
