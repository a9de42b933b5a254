//! The platform tools that read and rewrite Mach-O load commands.

use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, trace};

use crate::error::Error;

/// A change to one of a binary's install names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Point a dependency reference (`LC_LOAD_DYLIB`) at a new install name.
    Dependency { old: String, new: String },
    /// Replace the binary's own install name (`LC_ID_DYLIB`).
    Identity { new: String },
}

/// Access to the link metadata of binaries on disk.
///
/// The walk only ever needs these two operations, so tests can substitute a fake.
pub trait LinkTools {
    /// Raw `otool -L` style listing of `binary`'s install name and dependencies.
    fn list_dependencies(&self, binary: &Path) -> Result<String, Error>;

    /// Apply `rewrite` to `binary` in place.
    fn rewrite(&self, binary: &Path, rewrite: &Rewrite) -> Result<(), Error>;
}

/// [`LinkTools`] backed by `otool` and `install_name_tool`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTools;

impl SystemTools {
    fn run(tool: &'static str, command: &mut Command, path: &Path) -> Result<Output, Error> {
        trace!("Running {command:?}");

        let output = command
            .output()
            .map_err(|err| Error::ToolNotFound { tool, err })?;

        if output.status.success() {
            return Ok(output);
        }

        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        captured.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(Error::ToolFailed {
            tool,
            path: path.to_path_buf(),
            status: output.status.to_string(),
            output: captured.trim().to_string(),
        })
    }
}

impl LinkTools for SystemTools {
    fn list_dependencies(&self, binary: &Path) -> Result<String, Error> {
        let output = Self::run("otool", Command::new("otool").arg("-L").arg(binary), binary)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn rewrite(&self, binary: &Path, rewrite: &Rewrite) -> Result<(), Error> {
        let mut command = Command::new("install_name_tool");
        match rewrite {
            Rewrite::Dependency { old, new } => {
                debug!("Changing {old} to {new} in {}", binary.display());
                command.args(["-change", old, new]);
            }
            Rewrite::Identity { new } => {
                debug!("Changing install name of {} to {new}", binary.display());
                command.args(["-id", new]);
            }
        }
        command.arg(binary);

        Self::run("install_name_tool", &mut command, binary)?;
        Ok(())
    }
}
