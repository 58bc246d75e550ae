//! Stage spinner

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner showing the current stage; a no-op when progress is disabled
pub struct StageProgress {
    bar: Option<ProgressBar>,
}

impl StageProgress {
    pub fn new(enabled: bool) -> Self {
        let bar = enabled.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        });
        Self { bar }
    }

    pub fn set_stage(&self, message: &'static str) {
        if let Some(ref pb) = self.bar {
            pb.set_message(message);
        }
    }

    /// Print a line without the spinner tearing it
    pub fn println(&self, line: impl AsRef<str>) {
        match self.bar {
            Some(ref pb) => pb.suspend(|| println!("{}", line.as_ref())),
            None => println!("{}", line.as_ref()),
        }
    }

    pub fn finish(&self) {
        if let Some(ref pb) = self.bar {
            pb.finish_and_clear();
        }
    }
}

impl Drop for StageProgress {
    fn drop(&mut self) {
        self.finish();
    }
}
