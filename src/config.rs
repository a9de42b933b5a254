//! Bundle paths provided by the build system.

use std::path::{Path, PathBuf};

use crate::error::Error;

/// Build output directory (`$(TARGET_BUILD_DIR)`).
pub const TARGET_BUILD_DIR: &str = "TARGET_BUILD_DIR";
/// Executable path relative to the build output directory.
pub const EXECUTABLE_PATH: &str = "EXECUTABLE_PATH";
/// Frameworks directory relative to the build output directory.
pub const FRAMEWORKS_FOLDER_PATH: &str = "FRAMEWORKS_FOLDER_PATH";

/// Absolute locations every stage of the repackaging works against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    executable_path: PathBuf,
    frameworks_dir: PathBuf,
}

impl BundleConfig {
    /// Build a configuration from the build directory and the two paths relative to it.
    pub fn new(
        build_dir: impl AsRef<Path>,
        executable_path: impl AsRef<Path>,
        frameworks_folder_path: impl AsRef<Path>,
    ) -> Self {
        let build_dir = build_dir.as_ref();
        Self {
            executable_path: build_dir.join(executable_path),
            frameworks_dir: build_dir.join(frameworks_folder_path),
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfiguration`] naming the first variable that is unset or empty.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |variable: &'static str| {
            lookup(variable)
                .filter(|value| !value.is_empty())
                .ok_or(Error::MissingConfiguration { variable })
        };

        let build_dir = require(TARGET_BUILD_DIR)?;
        let executable_path = require(EXECUTABLE_PATH)?;
        let frameworks_folder_path = require(FRAMEWORKS_FOLDER_PATH)?;

        Ok(Self::new(build_dir, executable_path, frameworks_folder_path))
    }

    /// The top-level executable whose dependencies seed the walk.
    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    /// The bundle directory packaged libraries are copied into.
    pub fn frameworks_dir(&self) -> &Path {
        &self.frameworks_dir
    }
}
