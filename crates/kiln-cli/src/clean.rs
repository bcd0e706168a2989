//! Clean command implementation.

use std::fs;

use kiln_core::BuildConfig;

/// Remove the entire build output tree. An absent tree is fine.
pub fn execute() -> anyhow::Result<()> {
    let root = std::env::current_dir()?;
    let config = BuildConfig::from_project_root(&root)?;

    if config.build_root.exists() {
        fs::remove_dir_all(&config.build_root)?;
    }

    Ok(())
}
