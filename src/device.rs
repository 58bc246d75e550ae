//! Compute device selection
//!
//! Resolves the `--device` request into the identifier handed to the
//! separation model. Only `auto` triggers a hardware probe.

use clap::ValueEnum;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Device requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceRequest {
    Auto,
    Cpu,
    Cuda,
    Mps,
}

/// Concrete device identifier understood by the separation model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda,
    Mps,
}

impl Device {
    pub fn as_str(self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Cuda => "cuda",
            Device::Mps => "mps",
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hardware acceleration probe
///
/// Implementations must not fail: anything that goes wrong while probing
/// reads as "not available".
pub trait AcceleratorProbe: Send + Sync {
    fn cuda_available(&self) -> bool;

    /// Get the name of this probe (for logging)
    fn name(&self) -> &'static str;
}

/// Probe that never finds an accelerator
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAccelerator;

impl AcceleratorProbe for NoAccelerator {
    fn cuda_available(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Asks the separation interpreter whether torch sees a CUDA device
#[derive(Debug, Clone)]
pub struct TorchProbe {
    python: Option<PathBuf>,
}

const TORCH_CUDA_CHECK: &str =
    "import sys, torch; sys.exit(0 if torch.cuda.is_available() else 1)";

impl TorchProbe {
    pub fn new(python: Option<PathBuf>) -> Self {
        Self { python }
    }
}

impl AcceleratorProbe for TorchProbe {
    fn cuda_available(&self) -> bool {
        let Some(python) = &self.python else {
            debug!("No interpreter for device probe, assuming no CUDA");
            return false;
        };

        match Command::new(python)
            .args(["-c", TORCH_CUDA_CHECK])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) => status.success(),
            Err(e) => {
                debug!("Device probe could not run {}: {}", python.display(), e);
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "torch"
    }
}

/// Resolve a device request, probing only for `auto`
pub fn select_device(request: DeviceRequest, probe: &dyn AcceleratorProbe) -> Device {
    let device = match request {
        DeviceRequest::Cpu => Device::Cpu,
        DeviceRequest::Cuda => Device::Cuda,
        DeviceRequest::Mps => Device::Mps,
        DeviceRequest::Auto => {
            if probe.cuda_available() {
                Device::Cuda
            } else {
                Device::Cpu
            }
        }
    };

    info!("Using device for separation: {}", device);
    device
}
