//! Source-to-object path mapping.
//!
//! Object files live under `build/<mode>-<platform>/`, mirroring the
//! source tree's relative structure. The mapping is a pure function of
//! the source path, the build mode, and the configuration, so two
//! distinct sources under the source root never collide.

use std::path::{Path, PathBuf};

use crate::config::{BuildConfig, BuildMode};

/// Build directory for the given mode, e.g. `build/debug-unix`.
pub fn build_dir(config: &BuildConfig, mode: BuildMode) -> PathBuf {
    config
        .build_root
        .join(format!("{}-{}", mode.name(), config.platform.name()))
}

/// Path of the executable produced for the given mode.
pub fn executable_path(config: &BuildConfig, mode: BuildMode) -> PathBuf {
    build_dir(config, mode).join(format!(
        "{}{}",
        config.project_name,
        config.platform.executable_extension()
    ))
}

/// Object file corresponding to a source file in the given mode.
///
/// The source's path relative to the source root is preserved, with the
/// extension replaced by `.o`. Pure and total: a source outside the
/// source root (which enumeration never produces) maps as-is.
pub fn object_path(config: &BuildConfig, source: &Path, mode: BuildMode) -> PathBuf {
    let relative = source.strip_prefix(&config.source_root).unwrap_or(source);
    build_dir(config, mode).join(relative.with_extension("o"))
}
