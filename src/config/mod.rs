//! Command-line surface and runtime settings

pub mod cli;
pub mod settings;

pub use cli::{Cli, DEFAULT_BITRATE, DEFAULT_MODEL, DEFAULT_OUTDIR};
pub use settings::{Settings, FFMPEG_ENV, PYTHON_ENV};
