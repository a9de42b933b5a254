//! Mach-O dependency analysis using otool.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::paths::{base_name, extension, is_relocatable, resolve_install_name};
use crate::tools::LinkTools;

const COMPAT_MARKER: &str = " (compatibility version ";
const CURRENT_MARKER: &str = ", current version ";

/// One entry of a binary's `otool -L` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    /// The name the binary uses to reference this library.
    pub install_name: String,
    pub compat_version: String,
    pub current_version: String,
    /// Extension of the install name, without the dot.
    pub extension: Option<String>,
    /// File name of the install name.
    pub base_name: String,
    /// Where the library file is read from when it gets copied.
    pub resolved_path: PathBuf,
    /// This is the inspected binary's own install name, not a dependency.
    pub is_self: bool,
    /// The reference is already relative to the bundle.
    pub is_packaged: bool,
    /// The binary whose listing this record came from.
    pub owning_binary: PathBuf,
}

impl DependencyRecord {
    /// The record after its reference was rewritten to `token` and the file copied to `copy`.
    #[must_use]
    pub fn packaged(self, token: String, copy: PathBuf) -> Self {
        Self {
            install_name: token,
            resolved_path: copy,
            is_packaged: true,
            ..self
        }
    }

    /// Whether the install name has a `.dylib` extension.
    pub fn is_dylib(&self) -> bool {
        self.extension.as_deref() == Some(crate::paths::DYLIB_EXTENSION)
    }
}

/// List the install name and dependencies of a Mach-O binary.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist
/// - `otool` is not installed or fails on the file
/// - Any line of the listing is not a dependency entry
#[must_use = "library dependencies should be processed"]
pub fn get_dependencies(
    tools: &impl LinkTools,
    binary_path: &Path,
    frameworks_dir: &Path,
) -> Result<Vec<DependencyRecord>, Error> {
    // Check file exists first for a clear error message
    if !binary_path.exists() {
        return Err(Error::MissingBinary {
            path: binary_path.to_path_buf(),
        });
    }

    let listing = tools.list_dependencies(binary_path)?;
    parse_otool_output(&listing, binary_path, frameworks_dir)
}

/// Parse `otool -L` output into dependency records.
///
/// Example otool output for a framework:
/// ```text
/// /build/Foo.framework/Versions/A/Foo:
///     @rpath/Foo.framework/Versions/A/Foo (compatibility version 1.0.0, current version 1.0.0)
///     /opt/homebrew/lib/libssh2.1.dylib (compatibility version 2.0.0, current version 2.1.0)
///     /usr/lib/libSystem.B.dylib (compatibility version 1.0.0, current version 1319.0.0)
/// ```
///
/// Header lines (ending in `:`) are skipped, as are install names repeated across the
/// slices of a universal binary. Every other line must be a dependency entry.
pub fn parse_otool_output(
    output: &str,
    binary_path: &Path,
    frameworks_dir: &Path,
) -> Result<Vec<DependencyRecord>, Error> {
    let binary_name = binary_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    let mut found_self = false;

    for line in output.lines().map(str::trim) {
        if line.is_empty() || line.ends_with(':') {
            continue;
        }

        let (install_name, compat_version, current_version) =
            parse_dependency_line(line).ok_or_else(|| Error::Parse {
                binary: binary_path.to_path_buf(),
                line: line.to_string(),
            })?;

        if !seen.insert(install_name.to_string()) {
            continue;
        }

        let base_name = base_name(install_name).to_string();
        let is_self = !found_self && base_name == binary_name;
        found_self |= is_self;

        records.push(DependencyRecord {
            install_name: install_name.to_string(),
            compat_version: compat_version.to_string(),
            current_version: current_version.to_string(),
            extension: extension(install_name).map(ToString::to_string),
            resolved_path: resolve_install_name(install_name, frameworks_dir),
            is_packaged: is_relocatable(install_name),
            is_self,
            base_name,
            owning_binary: binary_path.to_path_buf(),
        });
    }

    Ok(records)
}

/// Split `<path> (compatibility version <v1>, current version <v2>)`.
fn parse_dependency_line(line: &str) -> Option<(&str, &str, &str)> {
    let rest = line.strip_suffix(')')?;
    let (install_name, versions) = rest.rsplit_once(COMPAT_MARKER)?;
    let (compat, current) = versions.split_once(CURRENT_MARKER)?;
    if install_name.is_empty() || compat.is_empty() || current.is_empty() {
        return None;
    }
    Some((install_name, compat, current))
}
