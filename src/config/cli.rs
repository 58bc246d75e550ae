//! CLI argument parsing and configuration

use crate::device::DeviceRequest;
use clap::Parser;
use std::path::PathBuf;

/// Default separation model
pub const DEFAULT_MODEL: &str = "htdemucs";

/// Default MP3 bitrate
pub const DEFAULT_BITRATE: &str = "192k";

/// Default output directory
pub const DEFAULT_OUTDIR: &str = "outputs";

/// karaoke-extract - Split any media file into vocals and instrumental
///
/// Converts the input with ffmpeg, separates it with a pretrained Demucs
/// model and writes two MP3 files named after the input and today's date.
#[derive(Parser, Debug)]
#[command(name = "karaoke-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input audio/video file (any format supported by ffmpeg)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory (created if missing)
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTDIR)]
    pub outdir: PathBuf,

    /// Demucs model name
    #[arg(long, value_name = "NAME", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Compute device for separation ('auto' uses CUDA if available, else CPU)
    #[arg(long, value_enum, default_value_t = DeviceRequest::Auto)]
    pub device: DeviceRequest,

    /// MP3 bitrate passed to the encoder (e.g. 128k, 192k, 256k, 320k)
    #[arg(long, value_name = "RATE", default_value = DEFAULT_BITRATE)]
    pub bitrate: String,

    /// Keep the temporary working directory
    #[arg(long, default_value = "false")]
    pub keep_temp: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only, no progress spinner)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Get the log filter directive based on verbosity flags
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["karaoke-extract", "song.mp3"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("song.mp3"));
        assert_eq!(cli.outdir, PathBuf::from("outputs"));
        assert_eq!(cli.model, "htdemucs");
        assert_eq!(cli.device, DeviceRequest::Auto);
        assert_eq!(cli.bitrate, "192k");
        assert!(!cli.keep_temp);
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "karaoke-extract",
            "clip.mkv",
            "--outdir",
            "out",
            "--model",
            "mdx_extra",
            "--device",
            "cuda",
            "--bitrate",
            "320k",
            "--keep-temp",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.outdir, PathBuf::from("out"));
        assert_eq!(cli.model, "mdx_extra");
        assert_eq!(cli.device, DeviceRequest::Cuda);
        assert_eq!(cli.bitrate, "320k");
        assert!(cli.keep_temp);
        assert_eq!(cli.log_filter(), "debug");
    }

    #[test]
    fn test_rejects_unknown_device() {
        assert!(Cli::try_parse_from(["karaoke-extract", "a.mp3", "--device", "tpu"]).is_err());
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        let cli = Cli::try_parse_from(["karaoke-extract", "a.mp3", "-vvv", "-q"]).unwrap();
        assert_eq!(cli.log_filter(), "error");
    }
}
