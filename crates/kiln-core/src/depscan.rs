//! Header dependency discovery.
//!
//! Runs the toolchain's scan mode (`g++ -MM`) for one source file and
//! parses the makefile-rule text it prints:
//!
//! ```text
//! main.o: src/main.c include/parse.h \
//!   include/tokens.h
//! ```
//!
//! Dependencies are rescanned on every build invocation; nothing is
//! cached between runs.

use std::path::{Path, PathBuf};

use crate::config::BuildMode;
use crate::toolchain::Toolchain;

/// Failure to obtain a dependency list for a source file.
///
/// Implemented by hand rather than with `thiserror` because the
/// `Rejected` variant's field is named `source` without being an error
/// source, which the derive cannot express.
#[derive(Debug)]
pub enum ScanError {
    /// The compiler exited non-zero while scanning (unresolved include,
    /// malformed source). Reported upward, never retried.
    Rejected { source: PathBuf },

    /// The compiler process could not be spawned at all.
    Spawn(std::io::Error),
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::Rejected { source } => {
                write!(f, "dependency scan failed for {}", source.display())
            }
            ScanError::Spawn(err) => write!(f, "failed to run dependency scan: {err}"),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Rejected { .. } => None,
            ScanError::Spawn(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::Spawn(err)
    }
}

/// List the transitive prerequisites of `source` for the given mode.
///
/// The returned list preserves the compiler's order and includes the
/// source file itself, exactly as the scan reports it.
pub fn scan_dependencies(
    toolchain: &dyn Toolchain,
    source: &Path,
    mode: BuildMode,
) -> Result<Vec<PathBuf>, ScanError> {
    let output = toolchain.scan(source, mode)?;

    if !output.success {
        return Err(ScanError::Rejected {
            source: source.to_path_buf(),
        });
    }

    Ok(parse_make_rule(&output.stdout))
}

/// Parse a single-target makefile rule into its prerequisite paths.
///
/// The first `:` separates the target from the prerequisites; `\`
/// continuations are accepted under both newline conventions; tokens
/// are whitespace-separated and empty tokens are dropped.
pub fn parse_make_rule(rule: &str) -> Vec<PathBuf> {
    let prerequisites = match rule.split_once(':') {
        Some((_target, rest)) => rest,
        None => rule,
    };

    let joined = prerequisites
        .replace("\\\r\n", " ")
        .replace("\\\n", " ")
        .replace("\\\r", " ");

    joined.split_whitespace().map(PathBuf::from).collect()
}
