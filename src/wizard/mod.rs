//! Install wizard interpreter
//!
//! A package's `fomod/ModuleConfig.xml` is parsed once into a typed
//! [`ModuleDescriptor`](descriptor::ModuleDescriptor) and then executed
//! against a [`PackageFiles`] source and a
//! [`Prompter`](crate::prompt::Prompter):
//!
//! 1. required files, after a yes/no confirmation
//! 2. visible steps in document order, one question per group
//! 3. conditional patterns against the final flag snapshot
//!
//! Flags live in a [`FlagStore`] that is created fresh for every execution
//! and threaded through each evaluation.

pub mod descriptor;
pub mod flags;
pub mod interpreter;
pub mod parser;


use std::path::{Path, PathBuf};

use crate::error::Result;

pub use flags::FlagStore;
pub use interpreter::execute;
pub use parser::{decode_document, describe_tree, parse_bytes};

/// Archive path of the wizard document
pub const DESCRIPTOR_PATH: &str = "fomod/moduleconfig.xml";

/// Where wizard copy operations read from
pub trait PackageFiles {
    /// Copy the entry named `source` to the file `target`
    ///
    /// Returns the written path, or `None` when no entry matches.
    fn copy_file(&mut self, source: &str, target: &Path) -> Result<Option<PathBuf>>;

    /// Copy every entry beneath `source` into the directory `target`,
    /// keeping the lower-cased sub-path
    fn copy_folder(&mut self, source: &str, target: &Path) -> Result<Vec<PathBuf>>;
}

/// Outcome of one wizard execution
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub module: String,
    /// Files written beneath the install root
    pub written: Vec<PathBuf>,
    /// Copy sources that matched nothing in the archive
    pub unmatched: Vec<String>,
    pub steps_shown: usize,
    pub flags: FlagStore,
}
