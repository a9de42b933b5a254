//! Xcode Run Script build phase entry point.
//!
//! Add `repackage-dylibs` as a Run Script phase after linking; the paths are read from the
//! build settings Xcode exports unless given as flags.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dylib_repackage::logging::XcodeFormat;
use dylib_repackage::{
    package_bundle, BundleConfig, SystemTools, EXECUTABLE_PATH, FRAMEWORKS_FOLDER_PATH,
    TARGET_BUILD_DIR,
};

#[derive(Parser)]
#[command(name = "repackage-dylibs")]
#[command(about = "Copy external dylibs into a bundle and rewrite their install names")]
#[command(version)]
struct Cli {
    /// Build products directory
    #[arg(long, env = "TARGET_BUILD_DIR")]
    build_dir: Option<String>,

    /// Executable path, relative to the build products directory
    #[arg(long, env = "EXECUTABLE_PATH")]
    executable_path: Option<String>,

    /// Frameworks directory, relative to the build products directory
    #[arg(long, env = "FRAMEWORKS_FOLDER_PATH")]
    frameworks_path: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_ansi(false)
        .event_format(XcodeFormat)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = BundleConfig::from_lookup(|name| match name {
        TARGET_BUILD_DIR => cli.build_dir.clone(),
        EXECUTABLE_PATH => cli.executable_path.clone(),
        FRAMEWORKS_FOLDER_PATH => cli.frameworks_path.clone(),
        _ => None,
    })?;

    let report = package_bundle(&config, &SystemTools).with_context(|| {
        format!(
            "Failed to package dependencies of {}",
            config.executable_path().display()
        )
    })?;

    if report.is_unchanged() {
        info!("No external dylibs to package");
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
