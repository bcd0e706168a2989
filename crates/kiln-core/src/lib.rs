//! Core incremental build engine for kiln.
//!
//! This crate provides:
//! - Source-to-object path mapping under mode-specific build directories
//! - Header dependency discovery via the compiler's scan mode
//! - Timestamp-based staleness evaluation
//! - Sequential build orchestration with per-file failure isolation
//! - A toolchain gateway trait with a `g++` production adapter

pub mod build;
pub mod config;
pub mod depscan;
pub mod error;
pub mod paths;
pub mod stale;
pub mod toolchain;

pub use build::{BuildFailure, BuildReport, Builder};
pub use config::{BuildConfig, BuildMode, Platform};
pub use depscan::ScanError;
pub use error::{Error, Result};
pub use stale::Staleness;
pub use toolchain::{GccToolchain, ScanOutput, Toolchain};
