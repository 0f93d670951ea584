//! Symlink overlay registry
//!
//! The ledger is an ordered list of packages, oldest first. Each package
//! records the symlinks it placed under the install root together with the
//! real files in its store they point to. When several packages bind the
//! same virtual path the most recent one owns the on-disk link; removing a
//! package hands each of its paths back to the nearest older binder.

pub mod link;
mod serialization;


use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::common::fs::{ensure_parent_dir, remove_entry, replace_symlink};
use crate::common::paths;
use crate::error::Result;
use crate::error::fs::io_failure;
use crate::error::overlay::{ledger_corrupt, package_not_found};

/// One symlink owned by a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Absolute path of the file in the package's store
    pub real_file: PathBuf,
    /// `/`-separated path of the link, relative to the install root
    pub virtual_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginEntry {
    pub name: String,
    pub bindings: Vec<Binding>,
}

/// A package's claim on a virtual path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub package: String,
    pub real_file: PathBuf,
}

/// A virtual path bound by more than one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub virtual_path: String,
    pub owner: Claim,
    /// Older claims, nearest first
    pub shadowed: Vec<Claim>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingRealFile {
        package: String,
        real_file: PathBuf,
    },
    MissingLink {
        package: String,
        virtual_path: String,
    },
    /// Something other than the owner's link sits at the path; `actual` is
    /// `None` when it is not a symlink at all
    WrongTarget {
        package: String,
        virtual_path: String,
        expected: PathBuf,
        actual: Option<PathBuf>,
    },
}

/// What a removal did to the install root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub package: String,
    /// Paths handed back to an older package
    pub restored: Vec<String>,
    /// Paths whose link was deleted
    pub unlinked: Vec<String>,
    /// Paths left alone because a newer package owns them
    pub kept: Vec<String>,
    pub deleted_files: usize,
}

/// The persisted overlay ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<PluginEntry>,
}

impl Ledger {
    /// Load the ledger at `path`; a missing file is an empty ledger
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(ledger = %path.display(), "No ledger yet, starting empty");
                return Ok(Self::default());
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(ledger_corrupt(path, e));
            }
            Err(e) => return Err(io_failure(path, e)),
        };

        let entries = serialization::from_xml(&text).map_err(|e| ledger_corrupt(path, e))?;
        debug!(ledger = %path.display(), packages = entries.len(), "Loaded ledger");
        Ok(Self { entries })
    }

    /// Write the ledger to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let xml = serialization::to_xml(&self.entries).map_err(|e| io_failure(path, e))?;
        ensure_parent_dir(path)?;
        fs::write(path, xml).map_err(|e| io_failure(path, e))?;
        debug!(ledger = %path.display(), packages = self.entries.len(), "Saved ledger");
        Ok(())
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[PluginEntry] {
        &self.entries
    }

    /// Package names, oldest first
    pub fn list_packages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Bindings of the most recent package called `name`
    pub fn bindings_of(&self, name: &str) -> &[Binding] {
        self.entries
            .iter()
            .rev()
            .find(|e| e.name == name)
            .map_or(&[], |e| e.bindings.as_slice())
    }

    pub fn has_package(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Append a package whose links were just created
    pub fn record_install(&mut self, name: impl Into<String>, bindings: Vec<Binding>) {
        let name = name.into();
        info!(package = %name, bindings = bindings.len(), "Recording install");
        self.entries.push(PluginEntry { name, bindings });
    }

    /// Every virtual path bound by more than one package, newest owner first
    pub fn list_conflicts(&self) -> Vec<Conflict> {
        let mut seen = HashSet::new();
        let mut conflicts = Vec::new();

        for (index, entry) in self.entries.iter().enumerate().rev() {
            for binding in &entry.bindings {
                if !seen.insert(binding.virtual_path.as_str()) {
                    continue;
                }
                let shadowed: Vec<Claim> = self.entries[..index]
                    .iter()
                    .rev()
                    .flat_map(|older| {
                        older
                            .bindings
                            .iter()
                            .filter(|b| b.virtual_path == binding.virtual_path)
                            .map(|b| Claim {
                                package: older.name.clone(),
                                real_file: b.real_file.clone(),
                            })
                    })
                    .collect();
                if !shadowed.is_empty() {
                    conflicts.push(Conflict {
                        virtual_path: binding.virtual_path.clone(),
                        owner: Claim {
                            package: entry.name.clone(),
                            real_file: binding.real_file.clone(),
                        },
                        shadowed,
                    });
                }
            }
        }
        conflicts
    }

    /// Check real files and owner links under `install_root`
    ///
    /// Nothing is repaired.
    pub fn verify(&self, install_root: &Path) -> Vec<Violation> {
        let mut seen = HashSet::new();
        let mut violations = Vec::new();

        for entry in self.entries.iter().rev() {
            for binding in &entry.bindings {
                if fs::metadata(&binding.real_file).is_err() {
                    violations.push(Violation::MissingRealFile {
                        package: entry.name.clone(),
                        real_file: binding.real_file.clone(),
                    });
                }
                if !seen.insert(binding.virtual_path.as_str()) {
                    continue;
                }
                if let Some(violation) = check_link(&entry.name, binding, install_root) {
                    violations.push(violation);
                }
            }
        }
        violations
    }

    /// Remove the most recent package called `name`
    ///
    /// Paths it owns fall back to the nearest older binding or are unlinked;
    /// paths owned by a newer package are left alone. The package's real
    /// files are deleted either way.
    pub fn remove_package(&mut self, name: &str, install_root: &Path) -> Result<RemovalReport> {
        let index = self
            .entries
            .iter()
            .rposition(|e| e.name == name)
            .ok_or_else(|| package_not_found(name))?;

        let mut report = RemovalReport {
            package: name.to_string(),
            ..RemovalReport::default()
        };

        for binding in &self.entries[index].bindings {
            let vpath = binding.virtual_path.as_str();
            match paths::safe_relative(vpath) {
                None => warn!(path = %vpath, "Ledger path escapes the install root, link left alone"),
                Some(_) if self.owned_by_newer(index, vpath) => {
                    debug!(path = %vpath, "Path owned by a newer package");
                    report.kept.push(vpath.to_string());
                }
                Some(relative) => {
                    let link = install_root.join(relative);
                    if let Some(fallback) = self.nearest_older(index, vpath) {
                        replace_symlink(&fallback.real_file, &link)?;
                        debug!(path = %vpath, real_file = %fallback.real_file.display(), "Restored older binding");
                        report.restored.push(vpath.to_string());
                    } else {
                        remove_entry(&link)?;
                        debug!(path = %vpath, "Removed link");
                        report.unlinked.push(vpath.to_string());
                    }
                }
            }

            match fs::remove_file(&binding.real_file) {
                Ok(()) => report.deleted_files += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!(file = %binding.real_file.display(), "Real file already missing");
                }
                Err(e) => return Err(io_failure(&binding.real_file, e)),
            }
        }

        self.entries.remove(index);
        info!(
            package = %name,
            restored = report.restored.len(),
            unlinked = report.unlinked.len(),
            kept = report.kept.len(),
            "Removed package"
        );
        Ok(report)
    }

    fn owned_by_newer(&self, index: usize, virtual_path: &str) -> bool {
        self.entries[index + 1..]
            .iter()
            .any(|e| e.bindings.iter().any(|b| b.virtual_path == virtual_path))
    }

    fn nearest_older(&self, index: usize, virtual_path: &str) -> Option<&Binding> {
        self.entries[..index]
            .iter()
            .rev()
            .find_map(|e| e.bindings.iter().find(|b| b.virtual_path == virtual_path))
    }
}

fn check_link(package: &str, binding: &Binding, install_root: &Path) -> Option<Violation> {
    let missing = || Violation::MissingLink {
        package: package.to_string(),
        virtual_path: binding.virtual_path.clone(),
    };
    let Some(relative) = paths::safe_relative(&binding.virtual_path) else {
        return Some(missing());
    };
    let link = install_root.join(relative);

    let actual = match fs::read_link(&link) {
        Ok(target) if target == binding.real_file => return None,
        Ok(target) => Some(target),
        Err(_) if fs::symlink_metadata(&link).is_ok() => None,
        Err(_) => return Some(missing()),
    };
    Some(Violation::WrongTarget {
        package: package.to_string(),
        virtual_path: binding.virtual_path.clone(),
        expected: binding.real_file.clone(),
        actual,
    })
}
