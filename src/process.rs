//! Blocking subprocess execution shared by the external-tool adapters

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Why an external command did not succeed
#[derive(Debug)]
pub enum CommandFailure {
    /// The program could not be started
    Spawn(std::io::Error),
    /// The program ran and exited unsuccessfully (`None` when killed by a signal)
    Exit { code: Option<i32> },
}

/// Render a command line for logs and error messages
pub fn render_command(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a command to completion, capturing its output
///
/// Captured stderr is only logged; callers see the exit code.
pub fn run_command(cmd: &mut Command) -> Result<(), CommandFailure> {
    info!(">> {}", render_command(cmd));

    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(CommandFailure::Spawn)?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let tail: Vec<&str> = stderr.lines().rev().take(20).collect();
    for line in tail.into_iter().rev() {
        debug!("  | {}", line);
    }

    Err(CommandFailure::Exit {
        code: output.status.code(),
    })
}

/// Locate an executable on PATH
pub fn find_executable(name: impl AsRef<OsStr>) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Use an explicit binary path if it names a file, otherwise look it up on PATH
pub fn resolve_binary(explicit: Option<&Path>, name: &str) -> Option<PathBuf> {
    match explicit {
        Some(path) if path.is_file() => Some(path.to_path_buf()),
        Some(path) => find_executable(path.as_os_str()),
        None => find_executable(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_command() {
        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-y", "-i", "in put.mp3"]);
        assert_eq!(render_command(&cmd), "ffmpeg -y -i in put.mp3");
    }

    #[test]
    fn test_spawn_failure() {
        let mut cmd = Command::new("/nonexistent/definitely-not-a-binary");
        assert!(matches!(run_command(&mut cmd), Err(CommandFailure::Spawn(_))));
    }

    #[test]
    fn test_missing_binary_not_resolved() {
        assert!(find_executable("definitely-not-a-binary-karaoke").is_none());
        assert!(resolve_binary(Some(Path::new("/nonexistent/ffmpeg")), "ffmpeg").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_propagates() {
        let mut ok = Command::new("sh");
        ok.args(["-c", "exit 0"]);
        assert!(run_command(&mut ok).is_ok());

        let mut fail = Command::new("sh");
        fail.args(["-c", "echo oops >&2; exit 3"]);
        assert!(matches!(
            run_command(&mut fail),
            Err(CommandFailure::Exit { code: Some(3) })
        ));
    }
}
