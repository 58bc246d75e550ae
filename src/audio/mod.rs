//! Audio transcoding
//!
//! All codec work is delegated to an external ffmpeg binary behind the
//! [`Transcoder`] trait.

pub mod transcoder;

pub use transcoder::{
    FfmpegTranscoder, Transcoder, CANONICAL_CHANNELS, CANONICAL_SAMPLE_RATE, FFMPEG, MP3_CODEC,
};
