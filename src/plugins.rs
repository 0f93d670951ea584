//! Game plugin load list (`Plugins.txt`)
//!
//! One plugin file name per line; a leading `*` marks it enabled. Lines
//! starting with `#` are comments.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::common::fs::ensure_parent_dir;
use crate::error::Result;
use crate::error::fs::io_failure;

const PLUGIN_EXTENSIONS: &[&str] = &["esp", "esm", "esl"];

/// Steam app id of Skyrim Special Edition
const STEAM_APP_ID: &str = "489830";

const LOAD_LIST: &str = "Skyrim Special Edition/Plugins.txt";

/// Whether `file_name` is a game plugin
pub fn is_plugin(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .is_some_and(|ext| PLUGIN_EXTENSIONS.iter().any(|p| ext.eq_ignore_ascii_case(p)))
}

/// Plugin files directly beneath `root` among `written`
pub fn top_level_plugins(root: &Path, written: &[PathBuf]) -> Vec<String> {
    written
        .iter()
        .filter(|path| path.parent() == Some(root))
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| is_plugin(name))
        .collect()
}

/// Where the load list is looked for with `--auto-plugins`
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(home) = dirs::home_dir() {
        for steam in [".steam/steam", ".local/share/Steam"] {
            candidates.push(
                home.join(steam)
                    .join("steamapps/compatdata")
                    .join(STEAM_APP_ID)
                    .join("pfx/drive_c/users/steamuser/AppData/Local")
                    .join(LOAD_LIST),
            );
        }
    }
    if let Some(local) = dirs::data_local_dir() {
        candidates.push(local.join(LOAD_LIST));
    }
    candidates
}

/// First existing load list among [`candidate_paths`]
pub fn discover() -> Option<PathBuf> {
    let found = candidate_paths().into_iter().find(|p| p.is_file());
    debug!(found = ?found, "Plugin list discovery");
    found
}

/// An editable load list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginList {
    lines: Vec<String>,
}

impl PluginList {
    /// Read the list at `path`; a missing file is an empty list
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(io_failure(path, e)),
        }
    }

    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    #[cfg(test)]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Enable `plugin`, appending it when absent
    ///
    /// Returns `true` when the list changed.
    pub fn enable(&mut self, plugin: &str) -> bool {
        let existing = self.lines.iter_mut().find(|line| {
            let line = line.trim();
            !line.starts_with('#') && line.trim_start_matches('*').eq_ignore_ascii_case(plugin)
        });
        match existing {
            Some(line) if line.trim_start().starts_with('*') => false,
            Some(line) => {
                *line = format!("*{}", line.trim());
                true
            }
            None => {
                self.lines.push(format!("*{plugin}"));
                true
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let mut text = self.lines.join("\n");
        text.push('\n');
        fs::write(path, text).map_err(|e| io_failure(path, e))?;
        info!(path = %path.display(), plugins = self.lines.len(), "Updated plugin list");
        Ok(())
    }
}
