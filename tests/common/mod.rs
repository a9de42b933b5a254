//! A fake bundle whose "binaries" are text manifests understood by [`FakeTools`].
//!
//! Manifest lines:
//! - `id <install name>`: the binary's own install name
//! - `dep <install name>`: a dependency
//! - `raw <text>`: emitted verbatim in the listing

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use dylib_repackage::{BundleConfig, Error, LinkTools, Rewrite};
use fs_err as fs;
use tempfile::TempDir;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub id: Option<String>,
    pub deps: Vec<String>,
    pub raw: Vec<String>,
}

impl Manifest {
    pub fn read(path: &Path) -> Self {
        let mut manifest = Self::default();
        for line in fs::read_to_string(path).unwrap().lines() {
            let (kind, value) = line.split_once(' ').unwrap();
            match kind {
                "id" => manifest.id = Some(value.to_string()),
                "dep" => manifest.deps.push(value.to_string()),
                "raw" => manifest.raw.push(value.to_string()),
                other => panic!("unknown manifest line kind {other}"),
            }
        }
        manifest
    }

    pub fn write(&self, path: &Path) {
        let mut contents = String::new();
        if let Some(id) = &self.id {
            contents.push_str(&format!("id {id}\n"));
        }
        for dep in &self.deps {
            contents.push_str(&format!("dep {dep}\n"));
        }
        for raw in &self.raw {
            contents.push_str(&format!("raw {raw}\n"));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}

/// [`LinkTools`] over manifest files, recording every rewrite.
#[derive(Debug, Default)]
pub struct FakeTools {
    pub fail_rewrites: bool,
    pub listed: RefCell<Vec<PathBuf>>,
    pub rewrites: RefCell<Vec<(PathBuf, Rewrite)>>,
}

impl FakeTools {
    pub fn failing() -> Self {
        Self {
            fail_rewrites: true,
            ..Self::default()
        }
    }

    pub fn rewrite_count(&self) -> usize {
        self.rewrites.borrow().len()
    }
}

impl LinkTools for FakeTools {
    fn list_dependencies(&self, binary: &Path) -> Result<String, Error> {
        self.listed.borrow_mut().push(binary.to_path_buf());

        let manifest = Manifest::read(binary);
        let mut output = format!("{}:\n", binary.display());
        for name in manifest.id.iter().chain(&manifest.deps) {
            output.push_str(&format!(
                "\t{name} (compatibility version 1.0.0, current version 1.0.0)\n"
            ));
        }
        for raw in &manifest.raw {
            output.push_str(&format!("\t{raw}\n"));
        }
        Ok(output)
    }

    fn rewrite(&self, binary: &Path, rewrite: &Rewrite) -> Result<(), Error> {
        if self.fail_rewrites {
            return Err(Error::ToolFailed {
                tool: "install_name_tool",
                path: binary.to_path_buf(),
                status: "exit status: 1".to_string(),
                output: "error: fake failure".to_string(),
            });
        }

        let mut manifest = Manifest::read(binary);
        match rewrite {
            Rewrite::Dependency { old, new } => {
                for dep in &mut manifest.deps {
                    if dep == old {
                        dep.clone_from(new);
                    }
                }
            }
            Rewrite::Identity { new } => manifest.id = Some(new.clone()),
        }
        manifest.write(binary);

        self.rewrites
            .borrow_mut()
            .push((binary.to_path_buf(), rewrite.clone()));
        Ok(())
    }
}

pub const SYSTEM_LIB: &str = "/usr/lib/libSystem.B.dylib";

/// A build directory with an app bundle and a directory of external libraries.
pub struct Bundle {
    pub temp: TempDir,
    pub config: BundleConfig,
}

impl Bundle {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = BundleConfig::new(
            temp.path().join("build"),
            "App.app/Contents/MacOS/App",
            "App.app/Contents/Frameworks",
        );
        Self { temp, config }
    }

    /// Install name of an external library outside the bundle.
    pub fn external(&self, name: &str) -> String {
        self.temp
            .path()
            .join("custom")
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    /// Write an external library with its own install name and dependencies.
    pub fn add_library(&self, name: &str, deps: &[&str]) -> String {
        let install_name = self.external(name);
        Manifest {
            id: Some(install_name.clone()),
            deps: deps.iter().map(ToString::to_string).collect(),
            raw: Vec::new(),
        }
        .write(Path::new(&install_name));
        install_name
    }

    /// Write the top-level executable.
    pub fn add_executable(&self, deps: &[&str]) {
        Manifest {
            id: None,
            deps: deps.iter().map(ToString::to_string).collect(),
            raw: Vec::new(),
        }
        .write(self.config.executable_path());
    }

    pub fn executable(&self) -> Manifest {
        Manifest::read(self.config.executable_path())
    }

    pub fn bundled(&self, name: &str) -> Manifest {
        Manifest::read(&self.bundled_path(name))
    }

    pub fn bundled_path(&self, name: &str) -> PathBuf {
        self.config.frameworks_dir().join(name)
    }

    pub fn bundled_names(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.config.frameworks_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
