//! Resolved run configuration
//!
//! Built once from the global CLI options and handed down to operations.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::fs::io_failure;
use crate::error::{ModlayerError, Result};

/// Default ledger file name inside the data directory
pub const LEDGER_FILE: &str = "modlayer-overlay.xml";

const GAME_DATA: &str = "steamapps/common/Skyrim Special Edition/Data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Install root (the game's Data directory)
    pub data_dir: PathBuf,
    /// Real-file stores live here when overlay mode is on
    pub overlay_dir: Option<PathBuf>,
    pub ledger_path: PathBuf,
}

impl Settings {
    /// Resolve paths to absolute form, probing for the data directory when
    /// none was given
    pub fn resolve(
        data_dir: Option<&Path>,
        overlay_dir: Option<&Path>,
        ledger_path: Option<&Path>,
    ) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => absolute(dir)?,
            None => probe_data_dir().ok_or(ModlayerError::DataDirNotFound)?,
        };
        let overlay_dir = overlay_dir.map(absolute).transpose()?;
        let ledger_path = match ledger_path {
            Some(path) => absolute(path)?,
            None => data_dir.join(LEDGER_FILE),
        };

        let settings = Self {
            data_dir,
            overlay_dir,
            ledger_path,
        };
        debug!(?settings, "Resolved settings");
        Ok(settings)
    }

    pub fn overlay_mode(&self) -> bool {
        self.overlay_dir.is_some()
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| io_failure(path, e))
}

/// Well-known Steam library locations of the game data directory
pub fn data_dir_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(home) = dirs::home_dir() {
        for steam in [".steam/steam", ".local/share/Steam"] {
            candidates.push(home.join(steam).join(GAME_DATA));
        }
    }
    if cfg!(windows) {
        candidates.push(PathBuf::from(r"C:\Program Files (x86)\Steam").join(GAME_DATA));
    }
    candidates
}

fn probe_data_dir() -> Option<PathBuf> {
    let found = data_dir_candidates().into_iter().find(|p| p.is_dir());
    debug!(found = ?found, "Probed for game data directory");
    found
}
