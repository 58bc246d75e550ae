//! Pipeline orchestration

pub mod backends;
pub mod orchestrator;
pub mod progress;
pub mod workspace;

pub use backends::Backends;
pub use orchestrator::{run, run_recorded, run_with, PipelineOutcome, RunRecord, Stage};
pub use workspace::{Workspace, WORKSPACE_PREFIX};
