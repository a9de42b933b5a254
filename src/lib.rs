//! Mach-O dylib bundling for application and framework bundles.
//!
//! Uses `otool -L` to list a binary's dependencies and `install_name_tool` to point them
//! at copies inside the bundle's Frameworks directory (`@rpath/<name>`). Libraries copied
//! in are inspected the same way, so transitive dependencies end up in the bundle too.

mod analyze;
mod config;
mod copy;
mod error;
pub mod logging;
mod paths;
mod repackage;
mod tools;
mod walk;

pub use analyze::{get_dependencies, parse_otool_output, DependencyRecord};
pub use config::{BundleConfig, EXECUTABLE_PATH, FRAMEWORKS_FOLDER_PATH, TARGET_BUILD_DIR};
pub use copy::{copy_into_frameworks, make_owner_writable};
pub use error::Error;
pub use paths::{is_relocatable, is_system_path, relocatable_token, SYSTEM_PREFIXES};
pub use repackage::{correct_identity, relink_dependency, repackage_dependency, Disposition};
pub use tools::{LinkTools, Rewrite, SystemTools};
pub use walk::{package_bundle, BundleReport};
