//! karaoke-extract - Vocal / instrumental extraction from any media file
//!
//! A single-shot command-line pipeline: the input is normalized with ffmpeg,
//! split into vocals and accompaniment by a pretrained Demucs model, and
//! both halves are encoded to MP3.
//!
//! # Architecture
//!
//! - `config`: CLI argument parsing and runtime settings
//! - `input`: Input validation and output naming
//! - `device`: Compute device selection
//! - `audio`: Transcoding through ffmpeg
//! - `separation`: Stem separation backends
//! - `pipeline`: Sequential orchestration over a scratch workspace
//!
//! # Example
//!
//! ```no_run
//! use karaoke_extract::{config::Settings, pipeline};
//!
//! let settings = Settings {
//!     input: "song.mp3".into(),
//!     ..Settings::default()
//! };
//! let outcome = pipeline::run(&settings).expect("Extraction failed");
//! println!("Vocals: {}", outcome.vocals.display());
//! ```

pub mod audio;
pub mod config;
pub mod device;
pub mod error;
pub mod files;
pub mod input;
pub mod pipeline;
pub mod process;
pub mod separation;
pub mod types;

// Re-export key types at crate root
pub use error::{ExitStatus, ExtractError, Result};
pub use types::{InputRef, OutputTargets, StemRole, StemSet};
