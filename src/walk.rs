//! Transitive packaging of a bundle's dependencies.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::analyze::{get_dependencies, DependencyRecord};
use crate::config::BundleConfig;
use crate::error::Error;
use crate::repackage::{correct_identity, relink_dependency, repackage_dependency, Disposition};
use crate::tools::LinkTools;

/// Summary of a packaging run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BundleReport {
    /// Base names copied into the frameworks directory, in order.
    pub packaged: Vec<String>,
    /// Copied libraries whose own install name was rewritten.
    pub identities: Vec<String>,
    /// Consumers pointed at a library packaged earlier in the run, with its base name.
    pub relinked: Vec<(PathBuf, String)>,
    /// Install names left alone because the OS provides them.
    pub system: Vec<String>,
    /// Install names that were already bundle-relative.
    pub already_packaged: Vec<String>,
    /// Install names of dependency types that are not bundled.
    pub unsupported: Vec<String>,
}

impl BundleReport {
    /// Whether the run changed anything on disk.
    pub fn is_unchanged(&self) -> bool {
        self.packaged.is_empty() && self.identities.is_empty() && self.relinked.is_empty()
    }
}

/// Package every external dylib the bundle's executable needs, transitively.
///
/// The executable's dependencies seed a queue. Each dependency copied into the bundle is
/// inspected in turn and its own dependencies are appended, so libraries pulled in only by
/// other bundled libraries are found too. A base name is copied at most once per run, which
/// also bounds the walk when libraries depend on each other.
///
/// # Errors
///
/// Stops at the first listing, parse, copy, or rewrite failure.
pub fn package_bundle(
    config: &BundleConfig,
    tools: &impl LinkTools,
) -> Result<BundleReport, Error> {
    let executable = config.executable_path();
    debug!("Inspecting {}", executable.display());

    let mut queue: VecDeque<DependencyRecord> =
        get_dependencies(tools, executable, config.frameworks_dir())?.into();
    let mut packaged: HashSet<String> = HashSet::new();
    let mut report = BundleReport::default();

    while let Some(record) = queue.pop_front() {
        if record.is_self {
            // The top-level executable is never copied, so its identity stays as linked.
            if record.owning_binary.as_path() != executable
                && correct_identity(&record, tools)?.is_some()
            {
                report.identities.push(record.base_name);
            }
            continue;
        }

        // System libraries keep their reference even when a bundled copy shares the name.
        if Disposition::of(&record).is_none() && packaged.contains(&record.base_name) {
            let record = relink_dependency(record, config, tools)?;
            report
                .relinked
                .push((record.owning_binary, record.base_name));
            continue;
        }

        let (record, disposition) = repackage_dependency(record, config, tools)?;
        match disposition {
            Disposition::Packaged => {
                packaged.insert(record.base_name.clone());
                report.packaged.push(record.base_name.clone());

                let dependencies =
                    get_dependencies(tools, &record.resolved_path, config.frameworks_dir())?;
                debug!(
                    "{} has {} entries to inspect",
                    record.base_name,
                    dependencies.len()
                );
                queue.extend(dependencies);
            }
            Disposition::System => report.system.push(record.install_name),
            Disposition::AlreadyPackaged => report.already_packaged.push(record.install_name),
            Disposition::Unsupported => report.unsupported.push(record.install_name),
            Disposition::SelfIdentity => {}
        }
    }

    info!("Packaging done");
    Ok(report)
}
