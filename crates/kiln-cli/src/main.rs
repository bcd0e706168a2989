//! kiln CLI - incremental builds for small native C/C++ projects.

mod build;
mod check;
mod clean;

use clap::{Parser, Subcommand};
use kiln_core::BuildMode;

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Minimal incremental build tool for native projects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the executable in release mode (the default)
    Build,

    /// Build the executable with debug info
    BuildDebug,

    /// Delete the build output directory
    Clean,

    /// Build in debug mode, then run the executable's test suite
    Test,

    /// Build in debug mode, then run the test suite under valgrind
    CheckLeaks,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; build progress is reported at info level.
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command.unwrap_or(Commands::Build) {
        Commands::Build => build::execute(BuildMode::Release)?,
        Commands::BuildDebug => build::execute(BuildMode::Debug)?,
        Commands::Clean => clean::execute()?,
        Commands::Test => check::run_tests()?,
        Commands::CheckLeaks => check::run_leak_check()?,
    }

    Ok(())
}
