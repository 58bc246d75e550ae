//! Pipeline orchestration
//!
//! One strictly sequential run per invocation:
//! validate, resolve device, stage workspace, convert, separate,
//! encode both stems, publish, tear down. Each stage is attempted once and
//! any failure ends the run in `Failed(code)` followed by `TornDown`.

use super::backends::Backends;
use super::progress::StageProgress;
use super::workspace::Workspace;
use crate::config::Settings;
use crate::device::{select_device, Device};
use crate::error::{ExtractError, Result};
use crate::files::move_file;
use crate::input::{date_stamp, normalize_stem, today_stamp, validate_input};
use crate::types::{InputRef, OutputTargets, StemRole, StemSet, REQUIRED_STEMS};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Pipeline states, in the order a successful run passes through them
///
/// A failed run records `Failed` with the exit code of its error, then
/// `TornDown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Validated,
    DeviceResolved,
    WorkspaceStaged,
    Converted,
    Separated,
    Encoded,
    Published,
    Failed(u8),
    TornDown,
}

impl Stage {
    /// Spinner message for the work that follows this state
    fn next_activity(self) -> &'static str {
        match self {
            Stage::Init => "Validating input",
            Stage::Validated => "Resolving device",
            Stage::DeviceResolved => "Staging workspace",
            Stage::WorkspaceStaged => "Converting input to WAV",
            Stage::Converted => "Separating vocals from accompaniment",
            Stage::Separated => "Encoding stems to MP3",
            Stage::Encoded => "Publishing outputs",
            Stage::Published | Stage::Failed(_) => "Cleaning up",
            Stage::TornDown => "Done",
        }
    }
}

/// Successful run summary
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Published vocals MP3
    pub vocals: PathBuf,
    /// Published instrumental MP3
    pub instrumental: PathBuf,
    /// Device the separation ran on
    pub device: Device,
    /// Workspace left on disk when `keep_temp` was set
    pub kept_workspace: Option<PathBuf>,
    /// Stages passed through, ending in `TornDown`
    pub stages: Vec<Stage>,
}

/// Records stage transitions and mirrors them on the spinner
struct StageTracker {
    history: Vec<Stage>,
    progress: StageProgress,
}

impl StageTracker {
    fn new(show_progress: bool) -> Self {
        let progress = StageProgress::new(show_progress);
        progress.set_stage(Stage::Init.next_activity());
        Self {
            history: vec![Stage::Init],
            progress,
        }
    }

    fn advance(&mut self, next: Stage) {
        debug!("Stage: {:?} -> {:?}", self.current(), next);
        self.history.push(next);
        self.progress.set_stage(next.next_activity());
    }

    fn current(&self) -> Stage {
        self.history.last().copied().unwrap_or(Stage::Init)
    }
}

/// Result of one run together with the stages it passed through
#[derive(Debug)]
pub struct RunRecord {
    pub result: Result<PipelineOutcome>,
    /// Full stage history; always ends in `TornDown`
    pub stages: Vec<Stage>,
}

/// Run the full pipeline against the real ffmpeg / Demucs backends
pub fn run(settings: &Settings) -> Result<PipelineOutcome> {
    let backends = Backends::detect()?;
    run_with(settings, &backends)
}

/// Run the full pipeline with the given backends
pub fn run_with(settings: &Settings, backends: &Backends) -> Result<PipelineOutcome> {
    run_recorded(settings, backends).result
}

/// Run the full pipeline with the given backends, keeping the stage history
/// on failure as well as on success
pub fn run_recorded(settings: &Settings, backends: &Backends) -> RunRecord {
    let started = Instant::now();
    let mut tracker = StageTracker::new(settings.show_progress);

    let result = execute(settings, backends, &mut tracker);

    match &result {
        Ok(outcome) => {
            info!(
                "Finished in {:.2}s on {}",
                started.elapsed().as_secs_f64(),
                outcome.device
            );
        }
        Err(e) => {
            error!("Run failed after {:?} stage: {}", last_completed(&tracker), e);
            // execute records the teardown itself once a workspace was staged
            if tracker.current() != Stage::TornDown {
                tracker.advance(Stage::Failed(e.exit_code()));
                tracker.advance(Stage::TornDown);
            }
        }
    }
    tracker.progress.finish();

    RunRecord {
        result,
        stages: tracker.history,
    }
}

fn last_completed(tracker: &StageTracker) -> Stage {
    tracker
        .history
        .iter()
        .rev()
        .copied()
        .find(|s| !matches!(s, Stage::TornDown | Stage::Failed(_)))
        .unwrap_or(Stage::Init)
}

fn execute(
    settings: &Settings,
    backends: &Backends,
    tracker: &mut StageTracker,
) -> Result<PipelineOutcome> {
    settings.validate()?;
    let input = validate_input(&settings.input)?;
    tracker.advance(Stage::Validated);

    std::fs::create_dir_all(&settings.outdir)
        .map_err(|e| ExtractError::output_error(&settings.outdir, e))?;

    let base = normalize_stem(&input.file_stem());
    let stamp = settings.run_date.map(date_stamp).unwrap_or_else(today_stamp);
    let targets = OutputTargets::new(&settings.outdir, &base, &stamp);
    debug!(
        "Output targets: {}, {}",
        targets.vocals.display(),
        targets.instrumental.display()
    );

    info!("Using {} probe for device selection", backends.probe.name());
    let device = select_device(settings.device, backends.probe.as_ref());
    tracker.advance(Stage::DeviceResolved);

    let workspace = Workspace::stage(&settings.scratch_root(), settings.keep_temp)?;
    tracker.advance(Stage::WorkspaceStaged);

    let processed = process(settings, backends, tracker, &workspace, &input, &base, device, &targets);
    if let Err(ref e) = processed {
        tracker.advance(Stage::Failed(e.exit_code()));
    }

    let kept_workspace = workspace.teardown();
    tracker.advance(Stage::TornDown);

    if let Some(ref kept) = kept_workspace {
        tracker
            .progress
            .println(format!("Kept temp directory: {}", kept.display()));
    }

    processed.map(|()| PipelineOutcome {
        vocals: targets.vocals,
        instrumental: targets.instrumental,
        device,
        kept_workspace,
        stages: tracker.history.clone(),
    })
}

#[allow(clippy::too_many_arguments)]
fn process(
    settings: &Settings,
    backends: &Backends,
    tracker: &mut StageTracker,
    workspace: &Workspace,
    input: &InputRef,
    base: &str,
    device: Device,
    targets: &OutputTargets,
) -> Result<()> {
    let waveform = workspace.waveform_path(base);
    info!(
        "Converting {} -> WAV via {}",
        input.path.display(),
        backends.transcoder.name()
    );
    backends.transcoder.normalize(&input.path, &waveform)?;
    tracker.advance(Stage::Converted);

    info!(
        "Running {} separation with model {} (vocals vs other)",
        backends.separator.name(),
        settings.model
    );
    let stems: StemSet = backends
        .separator
        .separate(&waveform, &settings.model, device, &workspace.stems_dir())?;
    stems.verify()?;
    tracker.advance(Stage::Separated);

    info!("Encoding stems to MP3 at {}", settings.bitrate);
    let mut encoded = Vec::with_capacity(REQUIRED_STEMS.len());
    for role in REQUIRED_STEMS {
        let staged = workspace.encoded_path(&format!("{}.mp3", role.output_suffix()));
        backends
            .transcoder
            .encode(stems.path(role), &staged, &settings.bitrate)?;
        encoded.push((role, staged));
    }
    tracker.advance(Stage::Encoded);

    publish(&encoded, targets)?;
    tracker.advance(Stage::Published);

    Ok(())
}

/// Move staged encodes to their final names
///
/// Runs only after every encode succeeded. If a later move fails, files
/// already published by this call are removed again.
fn publish(encoded: &[(StemRole, PathBuf)], targets: &OutputTargets) -> Result<()> {
    let mut published: Vec<&std::path::Path> = Vec::with_capacity(encoded.len());

    for (role, staged) in encoded {
        let dest = targets.path(*role);
        if let Err(e) = move_file(staged, dest) {
            for done in &published {
                if let Err(cleanup) = std::fs::remove_file(done) {
                    warn!("Failed to remove partial output {}: {}", done.display(), cleanup);
                }
            }
            return Err(ExtractError::output_error(dest, e));
        }
        info!("Published {}", dest.display());
        published.push(dest);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_publish_moves_all_files() {
        let dir = TempDir::new().unwrap();
        let staged_v = dir.path().join("v.mp3");
        let staged_i = dir.path().join("i.mp3");
        fs::write(&staged_v, b"v").unwrap();
        fs::write(&staged_i, b"i").unwrap();

        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        let targets = OutputTargets::new(&out, "song", "20240601");

        publish(
            &[(StemRole::Vocals, staged_v), (StemRole::Other, staged_i)],
            &targets,
        )
        .unwrap();

        assert_eq!(fs::read(&targets.vocals).unwrap(), b"v");
        assert_eq!(fs::read(&targets.instrumental).unwrap(), b"i");
    }

    #[test]
    fn test_publish_rolls_back_on_failure() {
        let dir = TempDir::new().unwrap();
        let staged_v = dir.path().join("v.mp3");
        fs::write(&staged_v, b"v").unwrap();
        let missing = dir.path().join("missing.mp3");

        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        let targets = OutputTargets::new(&out, "song", "20240601");

        let err = publish(
            &[(StemRole::Vocals, staged_v), (StemRole::Other, missing)],
            &targets,
        )
        .unwrap_err();

        assert!(matches!(err, ExtractError::OutputError { .. }));
        assert!(!targets.vocals.exists());
        assert!(!targets.instrumental.exists());
    }

    #[test]
    fn test_publish_leaves_no_partial_file_when_copy_fails() {
        let dir = TempDir::new().unwrap();
        let staged_v = dir.path().join("v.mp3");
        fs::write(&staged_v, b"v").unwrap();
        // A directory in place of the staged encode makes both the rename
        // and the copy fallback fail
        let staged_i = dir.path().join("i.mp3");
        fs::create_dir(&staged_i).unwrap();

        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        let targets = OutputTargets::new(&out, "song", "20240601");
        fs::write(&targets.instrumental, b"earlier run").unwrap();

        let err = publish(
            &[(StemRole::Vocals, staged_v), (StemRole::Other, staged_i)],
            &targets,
        )
        .unwrap_err();

        assert!(matches!(err, ExtractError::OutputError { .. }));
        assert!(!targets.vocals.exists());
        assert_eq!(fs::read(&targets.instrumental).unwrap(), b"earlier run");
        let names: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("song_20240601_instrumental.mp3")]);
    }

    #[test]
    fn test_tracker_history() {
        let mut tracker = StageTracker::new(false);
        tracker.advance(Stage::Validated);
        tracker.advance(Stage::Failed(4));
        tracker.advance(Stage::TornDown);
        assert_eq!(tracker.current(), Stage::TornDown);
        assert_eq!(last_completed(&tracker), Stage::Validated);
    }

    #[test]
    fn test_activity_names_the_following_work() {
        assert_eq!(Stage::WorkspaceStaged.next_activity(), "Converting input to WAV");
        assert_eq!(Stage::Converted.next_activity(), "Separating vocals from accompaniment");
        assert_eq!(Stage::Failed(10).next_activity(), "Cleaning up");
        assert_eq!(Stage::TornDown.next_activity(), "Done");
    }
}
