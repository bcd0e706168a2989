//! Build command implementation.

use kiln_core::{BuildConfig, BuildMode, BuildReport, Builder, GccToolchain};

/// Build the project rooted in the current directory.
pub fn execute(mode: BuildMode) -> anyhow::Result<()> {
    let (_config, report) = run(mode)?;
    if !report.success() {
        anyhow::bail!("build failed");
    }
    Ok(())
}

/// Run a build and hand back the configuration for follow-up commands.
pub fn run(mode: BuildMode) -> anyhow::Result<(BuildConfig, BuildReport)> {
    let root = std::env::current_dir()?;
    let config = BuildConfig::from_project_root(&root)?;
    let toolchain = GccToolchain::new(&config)?;
    let report = Builder::new(&config, &toolchain).build(mode)?;
    Ok((config, report))
}
