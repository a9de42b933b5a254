//! Copying libraries into the bundle.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use fs_err as fs;
use tracing::{info, warn};

use crate::error::Error;

/// Add owner write permission to a file (`chmod u+w`).
///
/// Libraries installed by package managers are often read-only, which would make the
/// following install name rewrite fail.
pub fn make_owner_writable(path: &Path) -> Result<(), Error> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o200);
    fs::set_permissions(path, perms)?;
    Ok(())
}

/// Copy the library at `src` into `frameworks_dir` as `name`.
///
/// The frameworks directory is created if needed. A file already present under the same
/// name is left over from an earlier build and gets replaced, since it may be a different
/// version than the one being linked now.
///
/// Returns the path of the copy.
pub fn copy_into_frameworks(
    src: &Path,
    frameworks_dir: &Path,
    name: &str,
) -> Result<PathBuf, Error> {
    fs::create_dir_all(frameworks_dir)?;

    let dest_path = frameworks_dir.join(name);
    if dest_path.exists() || dest_path.is_symlink() {
        warn!("{} already in Frameworks directory, removing", src.display());
        fs::remove_file(&dest_path)?;
    }

    info!("Copying {} to {}", src.display(), frameworks_dir.display());
    fs::copy(src, &dest_path)?;
    make_owner_writable(&dest_path)?;

    Ok(dest_path)
}
