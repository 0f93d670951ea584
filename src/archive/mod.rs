//! Package archive access
//!
//! Archive streams are forward-only. Every operation here begins a fresh
//! pass through [`EntrySource::scan`], which reopens the underlying file;
//! [`Archive::scan_count`] exposes how many passes have been made.
//!
//! Formats live in [`formats`], the streamed copy in [`extract`] and the
//! loose-file classifier used by `install --data-ext` in [`heuristic`].

pub mod extract;
pub mod formats;
pub mod heuristic;

#[cfg(test)]
pub mod memory;

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::common::paths;
use crate::error::Result;
use crate::error::archive::corrupt;
use crate::wizard::PackageFiles;

/// Whether a scan should go on after the current entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFlow {
    Continue,
    Stop,
}

/// One entry handed to a scan visitor
///
/// `reader` yields the entry's content and is only valid during the visit.
pub struct ArchiveEntry<'a> {
    /// `/`-separated path inside the archive
    pub name: String,
    pub is_dir: bool,
    pub reader: &'a mut dyn Read,
}

/// Visitor invoked for every entry of a scan, in archive order
pub type Visitor<'v> = dyn FnMut(&mut ArchiveEntry<'_>) -> Result<ScanFlow> + 'v;

/// A forward-only entry stream that can be restarted
pub trait EntrySource {
    /// Begin a new pass from the first entry and feed entries to `visit`
    /// until the archive ends or the visitor stops
    fn scan(&mut self, visit: &mut Visitor<'_>) -> Result<()>;
}

/// A package archive opened for wizard and fallback installs
pub struct Archive {
    label: String,
    source: Box<dyn EntrySource>,
    scans: usize,
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("label", &self.label)
            .field("scans", &self.scans)
            .finish_non_exhaustive()
    }
}

impl Archive {
    /// Open `path`, choosing the format by file name and then by content
    pub fn open(path: &Path) -> Result<Self> {
        let source = formats::open_source(path)?;
        Ok(Self {
            label: path.display().to_string(),
            source,
            scans: 0,
        })
    }

    #[cfg(test)]
    pub fn from_source(label: impl Into<String>, source: impl EntrySource + 'static) -> Self {
        Self {
            label: label.into(),
            source: Box::new(source),
            scans: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of passes begun so far
    pub fn scan_count(&self) -> usize {
        self.scans
    }

    fn scan(&mut self, visit: &mut Visitor<'_>) -> Result<()> {
        self.scans += 1;
        debug!(archive = %self.label, scan = self.scans, "Beginning archive scan");
        self.source.scan(visit)
    }

    /// Names of all file entries, in archive order
    pub fn list_entries(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        self.scan(&mut |entry: &mut ArchiveEntry<'_>| {
            if !entry.is_dir {
                names.push(entry.name.clone());
            }
            Ok(ScanFlow::Continue)
        })?;
        Ok(names)
    }

    /// Read the first file entry whose path ends with `query`, ignoring ASCII case
    ///
    /// Returns the matched path with the entry's bytes.
    pub fn read_matching(&mut self, query: &str) -> Result<Option<(String, Vec<u8>)>> {
        let query = query.to_ascii_lowercase();
        let mut found = None;
        self.scan(&mut |entry: &mut ArchiveEntry<'_>| {
            if entry.is_dir || !entry.name.to_ascii_lowercase().ends_with(&query) {
                return Ok(ScanFlow::Continue);
            }
            let mut bytes = Vec::new();
            entry
                .reader
                .read_to_end(&mut bytes)
                .map_err(|e| corrupt(entry.name.clone(), e))?;
            found = Some((entry.name.clone(), bytes));
            Ok(ScanFlow::Stop)
        })?;
        Ok(found)
    }

    /// Stream the first entry named `name` (exactly, or as a `/`-suffix) to `target`
    pub fn extract_named(&mut self, name: &str, target: &Path) -> Result<Option<PathBuf>> {
        let name = paths::to_unix(name);
        let mut written = None;
        self.scan(&mut |entry: &mut ArchiveEntry<'_>| {
            if entry.is_dir || !paths::matches_name(&entry.name, &name) {
                return Ok(ScanFlow::Continue);
            }
            extract::stream_to_file(&mut *entry.reader, &entry.name, target)?;
            written = Some(target.to_path_buf());
            Ok(ScanFlow::Stop)
        })?;
        Ok(written)
    }

    /// Stream every file entry beneath the directory `prefix` into `dest_root`
    ///
    /// The sub-path after `prefix` is lower-cased. Entries whose sub-path
    /// would escape `dest_root` are skipped.
    pub fn extract_tree(&mut self, prefix: &str, dest_root: &Path) -> Result<Vec<PathBuf>> {
        let prefix = paths::to_unix(prefix);
        let mut written = Vec::new();
        self.scan(&mut |entry: &mut ArchiveEntry<'_>| {
            if entry.is_dir {
                return Ok(ScanFlow::Continue);
            }
            let Some(rest) = paths::remainder_after(&entry.name, &prefix) else {
                return Ok(ScanFlow::Continue);
            };
            let rest = rest.to_ascii_lowercase();
            if rest.is_empty() || rest.ends_with('/') {
                return Ok(ScanFlow::Continue);
            }
            let Some(relative) = paths::safe_relative(&rest) else {
                warn!(entry = %entry.name, "Skipping archive entry with unsafe path");
                return Ok(ScanFlow::Continue);
            };
            let target = dest_root.join(relative);
            extract::stream_to_file(&mut *entry.reader, &entry.name, &target)?;
            written.push(target);
            Ok(ScanFlow::Continue)
        })?;
        Ok(written)
    }
}

impl PackageFiles for Archive {
    fn copy_file(&mut self, source: &str, target: &Path) -> Result<Option<PathBuf>> {
        self.extract_named(source, target)
    }

    fn copy_folder(&mut self, source: &str, target: &Path) -> Result<Vec<PathBuf>> {
        self.extract_tree(source, target)
    }
}
