//! Loose-file extraction for archives without a wizard
//!
//! Entries under a well-known game directory keep their layout from that
//! directory down; plugin, archive and ini files elsewhere are copied flat
//! to the root; everything else is left alone and reported.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::archive::{Archive, ArchiveEntry, ScanFlow, extract};
use crate::common::paths;
use crate::error::Result;

/// Directory names that mark game content; `data` itself is stripped
const CONTENT_DIRS: &[&str] = &["data", "meshes", "textures", "sound", "interface"];

/// File extensions copied flat to the root
const FLAT_EXTENSIONS: &[&str] = &["esp", "esm", "esl", "bsa", "ini"];

/// Where an entry lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Root-relative path, lower-cased
    Tree(String),
    /// File name at the root
    Flat(String),
    Unrecognized,
}

/// Classify an archive entry by path segment, then by extension
pub fn classify(entry: &str) -> Placement {
    let segments: Vec<&str> = entry.split('/').filter(|s| !s.is_empty()).collect();
    let Some((file_name, dirs)) = segments.split_last() else {
        return Placement::Unrecognized;
    };

    if let Some(pos) = dirs
        .iter()
        .position(|s| CONTENT_DIRS.iter().any(|d| s.eq_ignore_ascii_case(d)))
    {
        let start = if dirs[pos].eq_ignore_ascii_case("data") {
            pos + 1
        } else {
            pos
        };
        let relative = segments[start..].join("/").to_ascii_lowercase();
        return Placement::Tree(relative);
    }

    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match extension {
        Some(ext) if FLAT_EXTENSIONS.contains(&ext.as_str()) => {
            Placement::Flat((*file_name).to_string())
        }
        _ => Placement::Unrecognized,
    }
}

/// Result of a loose-file extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeuristicReport {
    pub files: Vec<PathBuf>,
    pub unrecognized: Vec<String>,
}

impl Archive {
    /// Extract every recognizable entry beneath `dest_root`
    pub fn extract_heuristic(&mut self, dest_root: &Path) -> Result<HeuristicReport> {
        let mut report = HeuristicReport::default();
        self.scan(&mut |entry: &mut ArchiveEntry<'_>| {
            if entry.is_dir {
                return Ok(ScanFlow::Continue);
            }
            let relative = match classify(&entry.name) {
                Placement::Tree(path) | Placement::Flat(path) => path,
                Placement::Unrecognized => {
                    debug!(entry = %entry.name, "Unrecognized archive entry");
                    report.unrecognized.push(entry.name.clone());
                    return Ok(ScanFlow::Continue);
                }
            };
            let Some(relative) = paths::safe_relative(&relative) else {
                warn!(entry = %entry.name, "Skipping archive entry with unsafe path");
                return Ok(ScanFlow::Continue);
            };
            let target = dest_root.join(relative);
            extract::stream_to_file(&mut *entry.reader, &entry.name, &target)?;
            report.files.push(target);
            Ok(ScanFlow::Continue)
        })?;
        Ok(report)
    }
}
