//! Typed install wizard tree
//!
//! Produced by a single validating parse pass (see [`super::parser`]); the
//! interpreter pattern-matches on these types and never looks at tag names.

use std::path::{Path, PathBuf};

use crate::common::paths;
use crate::prompt::Cardinality;
use crate::wizard::flags::FlagExpression;

/// Parsed wizard document for one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub name: String,
    pub required_files: Vec<CopyOp>,
    /// Document order is execution order
    pub steps: Vec<InstallStep>,
    pub conditional_installs: Vec<Pattern>,
}

/// One page of the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallStep {
    pub name: String,
    /// `None` means always shown
    pub visibility: Option<FlagExpression>,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub mode: SelectionMode,
    /// Index is presentation order and the selection token
    pub options: Vec<PluginOption>,
}

/// How many options of a group may be picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    ExactlyOne,
    AtMostOne,
    Any,
    AtLeastOne,
    /// Every option is installed without asking
    All,
}

impl SelectionMode {
    /// Parse the `type` attribute of a group
    pub fn from_type(value: &str) -> Option<Self> {
        match value {
            "SelectExactlyOne" => Some(Self::ExactlyOne),
            "SelectAtMostOne" => Some(Self::AtMostOne),
            "SelectAny" => Some(Self::Any),
            "SelectAtLeastOne" => Some(Self::AtLeastOne),
            "SelectAll" => Some(Self::All),
            _ => None,
        }
    }

    /// Question shape for the prompt protocol, `None` when nothing is asked
    pub fn cardinality(self) -> Option<Cardinality> {
        match self {
            Self::ExactlyOne => Some(Cardinality::ExactlyOne),
            Self::AtMostOne => Some(Cardinality::AtMostOne),
            Self::Any => Some(Cardinality::Any),
            Self::AtLeastOne => Some(Cardinality::AtLeastOne),
            Self::All => None,
        }
    }
}

/// A selectable entry of a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginOption {
    pub name: String,
    pub files: Vec<CopyOp>,
    /// Applied in document order when the option is selected
    pub flags_on_select: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyKind {
    File,
    Folder,
}

/// A copy request against the package archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOp {
    pub kind: CopyKind,
    /// Archive-relative, `/`-separated
    pub source: String,
    /// Install-root-relative, `/`-separated, possibly empty
    pub destination: String,
}

impl CopyOp {
    pub fn file(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            kind: CopyKind::File,
            source: paths::to_unix(&source.into()),
            destination: paths::to_unix(&destination.into()),
        }
    }

    pub fn folder(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            kind: CopyKind::Folder,
            source: paths::to_unix(&source.into()),
            destination: paths::to_unix(&destination.into()),
        }
    }

    /// Where this op writes beneath `root`
    ///
    /// For a file this is the target file; a destination ending in `/` names
    /// a directory that receives the source file name, and an empty
    /// destination mirrors the source path. For a folder this is the
    /// directory receiving the sub-tree. Returns `None` when the path would
    /// escape `root`.
    pub fn target(&self, root: &Path) -> Option<PathBuf> {
        match self.kind {
            CopyKind::File => {
                let relative = if self.destination.is_empty() {
                    paths::safe_relative(&self.source)?
                } else if self.destination.ends_with('/') {
                    let file_name = self.source.rsplit('/').find(|s| !s.is_empty())?;
                    paths::safe_relative(&format!("{}{file_name}", self.destination))?
                } else {
                    paths::safe_relative(&self.destination)?
                };
                Some(root.join(relative))
            }
            CopyKind::Folder => {
                if self.destination.trim_matches('/').is_empty() {
                    Some(root.to_path_buf())
                } else {
                    Some(root.join(paths::safe_relative(&self.destination)?))
                }
            }
        }
    }
}

/// A conditional install rule evaluated after all steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub condition: FlagExpression,
    pub files: Vec<CopyOp>,
}
