//! Install name classification.

use std::path::{Path, PathBuf};

/// Prefixes of libraries provided by the OS. These are never bundled.
pub const SYSTEM_PREFIXES: &[&str] = &["/usr/lib", "/System/Library"];

/// Prefixes of install names that resolve relative to the bundle.
pub const RELOCATABLE_PREFIXES: &[&str] = &["@rpath/", "@executable_path/", "@loader_path/"];

/// The only dependency type that gets packaged.
pub const DYLIB_EXTENSION: &str = "dylib";

/// Whether `path` lives under one of the [`SYSTEM_PREFIXES`].
pub fn is_system_path(path: &Path) -> bool {
    SYSTEM_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Whether `install_name` is already expressed relative to the bundle.
pub fn is_relocatable(install_name: &str) -> bool {
    RELOCATABLE_PREFIXES
        .iter()
        .any(|prefix| install_name.starts_with(prefix))
}

/// The canonical bundle-relative install name for a library file name.
#[must_use]
pub fn relocatable_token(base_name: &str) -> String {
    format!("@rpath/{base_name}")
}

/// Last path component of an install name.
pub fn base_name(install_name: &str) -> &str {
    install_name
        .rsplit('/')
        .next()
        .unwrap_or(install_name)
}

/// Extension of an install name's last component, without the dot.
pub fn extension(install_name: &str) -> Option<&str> {
    Path::new(base_name(install_name))
        .extension()
        .and_then(|ext| ext.to_str())
}

/// Where the file behind `install_name` can be read from.
///
/// Relocatable names point into the frameworks directory; anything else is used as is.
#[must_use = "resolved path should be used"]
pub fn resolve_install_name(install_name: &str, frameworks_dir: &Path) -> PathBuf {
    if is_relocatable(install_name) {
        frameworks_dir.join(base_name(install_name))
    } else {
        PathBuf::from(install_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_paths() {
        assert!(is_system_path(Path::new("/usr/lib/libSystem.B.dylib")));
        assert!(is_system_path(Path::new(
            "/System/Library/Frameworks/Foundation.framework/Versions/C/Foundation"
        )));
        assert!(!is_system_path(Path::new("/usr/local/lib/libgit2.dylib")));
        // Component-wise, not string prefix.
        assert!(!is_system_path(Path::new("/usr/library/libfoo.dylib")));
    }

    #[test]
    fn test_relocatable() {
        assert!(is_relocatable("@rpath/libfoo.dylib"));
        assert!(is_relocatable("@loader_path/../Frameworks/libfoo.dylib"));
        assert!(!is_relocatable("/opt/homebrew/lib/libfoo.dylib"));
        assert!(!is_relocatable("libfoo.dylib"));
    }

    #[test]
    fn test_names() {
        assert_eq!(base_name("/opt/homebrew/lib/libssh2.1.dylib"), "libssh2.1.dylib");
        assert_eq!(base_name("libz.dylib"), "libz.dylib");
        assert_eq!(extension("/opt/homebrew/lib/libssh2.1.dylib"), Some("dylib"));
        assert_eq!(extension("/Library/Frameworks/Foo.framework/Foo"), None);
        assert_eq!(relocatable_token("libssh2.1.dylib"), "@rpath/libssh2.1.dylib");
    }

    #[test]
    fn test_resolve_install_name() {
        let frameworks = Path::new("/build/App.app/Contents/Frameworks");
        assert_eq!(
            resolve_install_name("@rpath/libfoo.dylib", frameworks),
            frameworks.join("libfoo.dylib")
        );
        assert_eq!(
            resolve_install_name("/custom/libfoo.dylib", frameworks),
            PathBuf::from("/custom/libfoo.dylib")
        );
    }
}
