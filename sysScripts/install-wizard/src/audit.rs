//! Append-only install log.
//!
//! Every prompt answer, shell-command transcript and caught error from an
//! installer run lands in one plain-text file, so a broken install can be
//! reconstructed after the fact. The path is injected at construction time
//! rather than read from a global, which keeps the log (and everything that
//! writes to it) testable against a temp file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, anyhow};

pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AuditLog { path: path.into() }
    }

    /// The conventional location: `log.txt` next to where the installer runs.
    pub fn at_default_location() -> Self {
        AuditLog::new("log.txt")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncates the log at the start of a fresh run.
    pub fn clear(&self) -> Result<()> {
        fs::write(&self.path, "")
            .with_context(|| format!("failed to truncate log at {}", self.path.display()))
    }

    /// Appends one line. The file is opened per call so concurrent tools
    /// never hold it hostage.
    pub fn append(&self, msg: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open log at {}", self.path.display()))?;
        writeln!(file, "{msg}")
            .with_context(|| format!("failed to append to log at {}", self.path.display()))
    }

    /// Logs and echoes to the terminal in one go.
    pub fn print(&self, msg: &str) -> Result<()> {
        self.append(msg)?;
        println!("{msg}");
        Ok(())
    }

    /// Records a caught error with its full context chain and moves on.
    pub fn error(&self, err: &anyhow::Error) {
        let _ = self.append(&format!("error: {err:#}"));
    }

    /// Runs a shell command from the user's home directory, logging its
    /// stdout on success and the failure on error. Never propagates: a
    /// single broken step must not abort the whole install.
    pub fn run(&self, command: &str) {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        self.run_in(command, home);
    }

    /// Same as [`run`](Self::run) with an explicit working directory.
    pub fn run_in(&self, command: &str, cwd: impl AsRef<Path>) {
        let result = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(cwd.as_ref())
            .output()
            .map_err(|e| anyhow!("failed to spawn `{command}`: {e}"))
            .and_then(|output| {
                if output.status.success() {
                    Ok(output)
                } else {
                    Err(anyhow!(
                        "`{command}` exited with {}: {}",
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    ))
                }
            });

        match result {
            Ok(output) => {
                let _ = self.append(&String::from_utf8_lossy(&output.stdout));
            }
            Err(err) => self.error(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn append_adds_one_line_per_call() {
        let dir = tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("log.txt"));
        log.append("first").unwrap();
        log.append("second").unwrap();
        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn clear_truncates_existing_content() {
        let dir = tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("log.txt"));
        log.append("stale").unwrap();
        log.clear().unwrap();
        assert_eq!(fs::read_to_string(log.path()).unwrap(), "");
    }

    #[test]
    fn failed_command_is_logged_not_raised() {
        let dir = tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("log.txt"));
        log.run_in("exit 3", dir.path());
        let content = fs::read_to_string(log.path()).unwrap();
        assert!(content.starts_with("error: "));
        assert!(content.contains("exit 3"));
    }

    #[test]
    fn command_stdout_is_captured() {
        let dir = tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("log.txt"));
        log.run_in("printf hello", dir.path());
        assert!(fs::read_to_string(log.path()).unwrap().contains("hello"));
    }
}
