//! Packaging a single dependency into the bundle.

use tracing::{debug, info, warn};

use crate::analyze::DependencyRecord;
use crate::config::BundleConfig;
use crate::copy::{copy_into_frameworks, make_owner_writable};
use crate::error::Error;
use crate::paths::{is_system_path, relocatable_token};
use crate::tools::{LinkTools, Rewrite};

/// What happened to a dependency record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The binary's own install name; never copied.
    SelfIdentity,
    /// Already referenced relative to the bundle.
    AlreadyPackaged,
    /// Provided by the OS.
    System,
    /// Not a dylib; left as is.
    Unsupported,
    /// Copied into the bundle and the consumer rewritten.
    Packaged,
}

impl Disposition {
    /// Whether the record should be handed back unchanged without touching the disk.
    pub(crate) fn of(record: &DependencyRecord) -> Option<Self> {
        if record.is_self {
            Some(Self::SelfIdentity)
        } else if record.is_packaged {
            Some(Self::AlreadyPackaged)
        } else if is_system_path(&record.resolved_path) {
            Some(Self::System)
        } else if !record.is_dylib() {
            Some(Self::Unsupported)
        } else {
            None
        }
    }
}

/// Copy an external dependency into the frameworks directory and point its consumer at it.
///
/// Records that are the binary's own identity, already packaged, or system libraries are
/// returned unchanged. Dependencies that are not dylibs are logged and returned unchanged.
///
/// # Errors
///
/// Fails if the library cannot be copied or the rewrite tool fails. The copy always happens
/// before the rewrite.
pub fn repackage_dependency(
    record: DependencyRecord,
    config: &BundleConfig,
    tools: &impl LinkTools,
) -> Result<(DependencyRecord, Disposition), Error> {
    if let Some(disposition) = Disposition::of(&record) {
        if disposition == Disposition::Unsupported {
            warn!(
                "Unhandled type {} for {}, ignoring",
                record
                    .extension
                    .as_deref()
                    .map_or_else(|| "(none)".to_string(), |ext| format!(".{ext}")),
                record.resolved_path.display()
            );
        }
        return Ok((record, disposition));
    }

    info!("Packaging {}…", record.base_name);

    let frameworks_dir = config.frameworks_dir();
    let copy = frameworks_dir.join(&record.base_name);
    // An absolute reference into the bundle only needs the rewrite.
    let copy = if record.resolved_path == copy {
        debug!("{} is already in the Frameworks directory", copy.display());
        make_owner_writable(&copy)?;
        copy
    } else {
        copy_into_frameworks(&record.resolved_path, frameworks_dir, &record.base_name)?
    };

    let token = relocatable_token(&record.base_name);
    tools.rewrite(
        &record.owning_binary,
        &Rewrite::Dependency {
            old: record.install_name.clone(),
            new: token.clone(),
        },
    )?;

    Ok((record.packaged(token, copy), Disposition::Packaged))
}

/// Point a consumer at a library that was already copied into the bundle.
///
/// Used when a second binary references a base name packaged earlier in the same run:
/// nothing is copied, only the consumer's reference changes.
pub fn relink_dependency(
    record: DependencyRecord,
    config: &BundleConfig,
    tools: &impl LinkTools,
) -> Result<DependencyRecord, Error> {
    let token = relocatable_token(&record.base_name);
    debug!(
        "{} already packaged, pointing {} at {token}",
        record.base_name,
        record.owning_binary.display()
    );

    tools.rewrite(
        &record.owning_binary,
        &Rewrite::Dependency {
            old: record.install_name.clone(),
            new: token.clone(),
        },
    )?;

    let copy = config.frameworks_dir().join(&record.base_name);
    Ok(record.packaged(token, copy))
}

/// Rewrite a copied library's own install name to its bundle-relative token.
///
/// Returns `None` if `record` is not an identity entry or is already relocatable.
pub fn correct_identity(
    record: &DependencyRecord,
    tools: &impl LinkTools,
) -> Result<Option<String>, Error> {
    if !record.is_self || record.is_packaged {
        return Ok(None);
    }

    let token = relocatable_token(&record.base_name);
    info!("Setting install name of {} to {token}", record.base_name);
    tools.rewrite(&record.owning_binary, &Rewrite::Identity { new: token.clone() })?;

    Ok(Some(token))
}
