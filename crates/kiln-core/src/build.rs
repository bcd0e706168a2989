//! Build orchestration: plan, evaluate, compile, link.
//!
//! Sources are processed one at a time in sorted traversal order. A
//! scan or compile failure for one file never stops the others from
//! being attempted, but any failure suppresses the link step.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{BuildConfig, BuildMode};
use crate::error::Result;
use crate::paths;
use crate::stale::{self, Staleness};
use crate::toolchain::Toolchain;

/// A failure recorded while building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildFailure {
    /// Dependency scan exited non-zero for this source.
    Scan { source: PathBuf },

    /// Compilation exited non-zero for this source.
    Compile { source: PathBuf },

    /// The final link exited non-zero.
    Link,
}

/// Outcome of one build invocation.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Sources that were recompiled, in plan order.
    pub compiled: Vec<PathBuf>,

    /// Scan, compile, and link failures, in the order they occurred.
    pub failures: Vec<BuildFailure>,

    /// Whether the executable was relinked.
    pub linked: bool,
}

impl BuildReport {
    /// True iff no scan, compile, or link step failed.
    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sequential build orchestrator.
pub struct Builder<'a> {
    config: &'a BuildConfig,
    toolchain: &'a dyn Toolchain,
}

impl<'a> Builder<'a> {
    pub fn new(config: &'a BuildConfig, toolchain: &'a dyn Toolchain) -> Self {
        Self { config, toolchain }
    }

    /// Enumerate the translation units under the source root and map
    /// each to its object file. The result is the fixed plan for one
    /// build invocation.
    ///
    /// # Errors
    /// Returns an error if the source tree cannot be traversed.
    pub fn plan(&self, mode: BuildMode) -> Result<Vec<(PathBuf, PathBuf)>> {
        let mut sources = Vec::new();
        if self.config.source_root.exists() {
            collect_sources(&self.config.source_root, &self.config.source_extension, &mut sources)?;
        }

        Ok(sources
            .into_iter()
            .map(|source| {
                let object = paths::object_path(self.config, &source, mode);
                (source, object)
            })
            .collect())
    }

    /// Build the executable for the given mode.
    ///
    /// Evaluates every planned pair, recompiles the changed ones, and
    /// relinks only if every compile succeeded and some object (or the
    /// executable's absence) requires it. A tree with no sources is a
    /// no-op success.
    ///
    /// # Errors
    /// Returns an error only for infrastructure failures (traversal,
    /// spawning the toolchain). Scan/compile/link failures are recorded
    /// in the returned [`BuildReport`].
    pub fn build(&self, mode: BuildMode) -> Result<BuildReport> {
        let plan = self.plan(mode)?;
        let mut report = BuildReport::default();

        if plan.is_empty() {
            tracing::info!("no sources found, nothing to build");
            return Ok(report);
        }

        for (source, object) in &plan {
            match stale::evaluate(self.toolchain, source, object, mode)? {
                Staleness::Unchanged => {}
                Staleness::ScanFailed => {
                    tracing::error!("error in {}", source.display());
                    report.failures.push(BuildFailure::Scan {
                        source: source.clone(),
                    });
                }
                Staleness::Changed => {
                    if let Some(parent) = object.parent() {
                        fs::create_dir_all(parent)?;
                    }

                    tracing::info!("compiling {}", source.display());
                    if self.toolchain.compile(source, object, mode)? {
                        report.compiled.push(source.clone());
                    } else {
                        tracing::error!("failed to compile {}", source.display());
                        report.failures.push(BuildFailure::Compile {
                            source: source.clone(),
                        });
                    }
                }
            }
        }

        // Linking is strictly gated on every scan and compile succeeding.
        if report.failures.is_empty() {
            let objects: Vec<PathBuf> = plan.iter().map(|(_, object)| object.clone()).collect();
            let executable = paths::executable_path(self.config, mode);

            if stale::any_newer_than(objects.iter(), &executable)? {
                tracing::info!("linking {}", executable.display());
                if self.toolchain.link(&executable, &objects, mode)? {
                    report.linked = true;
                } else {
                    tracing::error!("link failure");
                    report.failures.push(BuildFailure::Link);
                }
            }
        }

        Ok(report)
    }
}

/// Recursively collect files with the given extension, sorted by name
/// at each level so the plan order is deterministic.
fn collect_sources(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_sources(&path, extension, out)?;
        } else if path.extension().is_some_and(|ext| ext == extension) {
            out.push(path);
        }
    }

    Ok(())
}
