//! Error types for kiln-core.

use thiserror::Error;

/// Result type for kiln-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in kiln-core.
///
/// These cover infrastructure failures only. A compiler that runs but
/// exits non-zero is reported in-band through staleness verdicts and the
/// [`crate::build::BuildReport`], not through this enum.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Toolchain error (compiler or checker binary missing or unrunnable).
    #[error("toolchain error: {0}")]
    Toolchain(String),

    /// Host platform family is not supported.
    #[error("unsupported platform '{0}': only unix and windows hosts are supported")]
    UnsupportedPlatform(String),
}
