//! Staleness evaluation for (source, object) pairs.
//!
//! Checks run cheapest-first: the two timestamp comparisons are free,
//! while the dependency scan costs a compiler invocation and is only
//! paid when they are inconclusive. Timestamps are compared with
//! strictly-greater-than only; equal mtimes count as unchanged.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::BuildMode;
use crate::depscan::{self, ScanError};
use crate::error::Result;
use crate::toolchain::Toolchain;

/// Verdict for one (source, object) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// The object must be recompiled.
    Changed,

    /// The object is up to date.
    Unchanged,

    /// The dependency scan itself failed; the pair cannot be compiled
    /// as-is and the build must report failure.
    ScanFailed,
}

/// Modification time of a file, or `None` if it does not exist.
pub(crate) fn mtime(path: &Path) -> io::Result<Option<SystemTime>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.modified()?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// True iff any of `paths` is strictly newer than `target`, or `target`
/// is absent. A path that has vanished since it was listed also counts
/// as newer, forcing a rebuild of the target.
pub(crate) fn any_newer_than<'a>(
    paths: impl IntoIterator<Item = &'a PathBuf>,
    target: &Path,
) -> io::Result<bool> {
    let Some(target_mtime) = mtime(target)? else {
        return Ok(true);
    };

    for path in paths {
        match mtime(path)? {
            Some(t) if t > target_mtime => return Ok(true),
            None => return Ok(true),
            _ => {}
        }
    }

    Ok(false)
}

/// Decide whether `object` is stale relative to `source` and its
/// transitive headers.
///
/// Order of checks:
/// 1. object missing: `Changed`, no scan;
/// 2. source strictly newer than object: `Changed`, no scan;
/// 3. dependency scan fails: `ScanFailed`;
/// 4. any scanned prerequisite strictly newer than object: `Changed`;
/// 5. otherwise `Unchanged`.
pub fn evaluate(
    toolchain: &dyn Toolchain,
    source: &Path,
    object: &Path,
    mode: BuildMode,
) -> Result<Staleness> {
    let Some(object_mtime) = mtime(object)? else {
        return Ok(Staleness::Changed);
    };

    let source_mtime = fs::metadata(source)?.modified()?;
    if source_mtime > object_mtime {
        return Ok(Staleness::Changed);
    }

    match depscan::scan_dependencies(toolchain, source, mode) {
        Ok(deps) => {
            if any_newer_than(deps.iter(), object)? {
                Ok(Staleness::Changed)
            } else {
                Ok(Staleness::Unchanged)
            }
        }
        Err(ScanError::Rejected { .. }) => Ok(Staleness::ScanFailed),
        Err(ScanError::Spawn(e)) => Err(e.into()),
    }
}
