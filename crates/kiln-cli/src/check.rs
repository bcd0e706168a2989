//! Test and leak-check commands.
//!
//! Both build in debug mode first and only run the produced executable
//! when that build fully succeeded.

use std::process::Command;

use kiln_core::{BuildMode, Platform, paths};

use crate::build;

/// Build in debug mode and run the executable's self-test suite.
pub fn run_tests() -> anyhow::Result<()> {
    let (config, report) = build::run(BuildMode::Debug)?;
    if !report.success() {
        anyhow::bail!("build failed");
    }

    let executable = paths::executable_path(&config, BuildMode::Debug);
    let status = Command::new(&executable).arg("--test").status()?;
    if !status.success() {
        anyhow::bail!("tests failed");
    }

    Ok(())
}

/// Build in debug mode and run the self-test suite under valgrind.
///
/// Valgrind does not exist on Windows; there the command explains
/// itself and does nothing.
pub fn run_leak_check() -> anyhow::Result<()> {
    if Platform::detect()? == Platform::Windows {
        println!("valgrind is not available on windows");
        return Ok(());
    }

    let (config, report) = build::run(BuildMode::Debug)?;
    if !report.success() {
        anyhow::bail!("build failed");
    }

    let valgrind =
        which::which("valgrind").map_err(|_| anyhow::anyhow!("valgrind not found in PATH"))?;
    let executable = paths::executable_path(&config, BuildMode::Debug);
    let status = Command::new(valgrind)
        .arg("--leak-check=full")
        .arg(&executable)
        .arg("--test")
        .status()?;
    if !status.success() {
        anyhow::bail!("leak check failed");
    }

    Ok(())
}
