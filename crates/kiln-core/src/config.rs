//! Build configuration and platform detection.
//!
//! Every component takes the configuration (or values derived from it) as
//! an explicit argument. Nothing reads the working directory or other
//! ambient process state after the configuration is constructed.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Build mode: affects compiler flags and output location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildMode {
    Release,
    Debug,
}

impl BuildMode {
    /// Directory-name component for this mode.
    pub fn name(self) -> &'static str {
        match self {
            BuildMode::Release => "release",
            BuildMode::Debug => "debug",
        }
    }

    /// Whether the compiler should emit debug info (`-g`).
    pub fn debug_info(self) -> bool {
        matches!(self, BuildMode::Debug)
    }
}

/// Host platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    /// Detect the host platform family.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedPlatform`] on any family other than
    /// unix or windows.
    pub fn detect() -> Result<Self> {
        if cfg!(windows) {
            Ok(Platform::Windows)
        } else if cfg!(unix) {
            Ok(Platform::Unix)
        } else {
            Err(Error::UnsupportedPlatform(std::env::consts::OS.to_string()))
        }
    }

    /// Directory-name component for this platform.
    pub fn name(self) -> &'static str {
        match self {
            Platform::Unix => "unix",
            Platform::Windows => "windows",
        }
    }

    /// File-name suffix for executables on this platform.
    pub fn executable_extension(self) -> &'static str {
        match self {
            Platform::Unix => "",
            Platform::Windows => ".exe",
        }
    }
}

/// Project layout and host settings for one build invocation.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Name of the produced executable (without platform suffix).
    pub project_name: String,

    /// Root of the translation units to build.
    pub source_root: PathBuf,

    /// Root passed to the compiler as the include path.
    pub include_root: PathBuf,

    /// Directory that holds all mode-specific build trees.
    pub build_root: PathBuf,

    /// File extension (without dot) identifying translation units.
    pub source_extension: String,

    /// Detected host platform.
    pub platform: Platform,
}

impl BuildConfig {
    /// Create a configuration for the conventional project layout:
    /// `src/` for translation units, `include/` for headers, `build/`
    /// for outputs, executable named after the project directory.
    ///
    /// # Errors
    /// Returns an error if the host platform family is unsupported.
    pub fn from_project_root(root: &Path) -> Result<Self> {
        let platform = Platform::detect()?;
        let project_name = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app".to_string());

        Ok(Self {
            project_name,
            source_root: root.join("src"),
            include_root: root.join("include"),
            build_root: root.join("build"),
            source_extension: "c".to_string(),
            platform,
        })
    }
}
