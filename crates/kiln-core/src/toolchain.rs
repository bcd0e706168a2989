//! Gateway to the external compiler toolchain.
//!
//! The core only observes an exit status (and, for dependency scans,
//! captured stdout) from each invocation. Keeping this behind a trait
//! lets the staleness evaluator and orchestrator run against a scripted
//! fake in tests.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::{BuildConfig, BuildMode};
use crate::error::{Error, Result};

/// Result of one dependency-scan invocation.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    /// Whether the scan exited zero.
    pub success: bool,

    /// Captured stdout (makefile-rule text when successful).
    pub stdout: String,
}

/// Operations the build core needs from a compiler toolchain.
///
/// All calls are synchronous and blocking. `Err` means the process could
/// not be spawned; a non-zero exit is a normal in-band result (`false`
/// or [`ScanOutput::success`]).
pub trait Toolchain {
    /// List the transitive header dependencies of `source` without
    /// compiling it.
    fn scan(&self, source: &Path, mode: BuildMode) -> io::Result<ScanOutput>;

    /// Compile `source` into `object`.
    fn compile(&self, source: &Path, object: &Path, mode: BuildMode) -> io::Result<bool>;

    /// Link `objects` into `executable`.
    fn link(&self, executable: &Path, objects: &[PathBuf], mode: BuildMode) -> io::Result<bool>;
}

/// Production adapter invoking `g++`.
pub struct GccToolchain {
    gcc_path: PathBuf,
    include_root: PathBuf,
}

impl GccToolchain {
    /// Locate `g++` on the PATH and bind it to the project's include root.
    ///
    /// # Errors
    /// Returns [`Error::Toolchain`] if no `g++` can be found.
    pub fn new(config: &BuildConfig) -> Result<Self> {
        let gcc_path = which::which("g++")
            .map_err(|_| Error::Toolchain("g++ not found in PATH".to_string()))?;

        Ok(Self {
            gcc_path,
            include_root: config.include_root.clone(),
        })
    }

    /// Path of the compiler binary in use.
    pub fn gcc_path(&self) -> &Path {
        &self.gcc_path
    }

    fn base_command(&self, mode: BuildMode) -> Command {
        let mut cmd = Command::new(&self.gcc_path);
        if mode.debug_info() {
            cmd.arg("-g");
        }
        cmd.arg("-I").arg(&self.include_root);
        cmd
    }
}

impl Toolchain for GccToolchain {
    fn scan(&self, source: &Path, mode: BuildMode) -> io::Result<ScanOutput> {
        // stderr stays on the terminal so the user sees what broke the scan.
        let output = self
            .base_command(mode)
            .arg("-MM")
            .arg(source)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()?;

        Ok(ScanOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }

    fn compile(&self, source: &Path, object: &Path, mode: BuildMode) -> io::Result<bool> {
        let status = self
            .base_command(mode)
            .arg("-c")
            .arg(source)
            .arg("-o")
            .arg(object)
            .status()?;

        Ok(status.success())
    }

    fn link(&self, executable: &Path, objects: &[PathBuf], mode: BuildMode) -> io::Result<bool> {
        let mut cmd = Command::new(&self.gcc_path);
        if mode.debug_info() {
            cmd.arg("-g");
        }
        cmd.arg("-o").arg(executable);
        cmd.args(objects);

        Ok(cmd.status()?.success())
    }
}
