//! Remove operation module
//!
//! Names are removed in order and the ledger is saved after each one, so an
//! interrupted run never leaves the ledger behind the disk.

use std::fs;
use std::path::Path;

use console::Style;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Settings;
use crate::error::{ModlayerError, Result};
use crate::overlay::{Ledger, RemovalReport};
use crate::ui::display;

pub struct RemoveOperation<'a> {
    settings: &'a Settings,
}

impl<'a> RemoveOperation<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Remove each named package
    ///
    /// Unknown names are reported and skipped; the call then fails with
    /// `BatchFailed` once the others are done.
    pub fn execute(&self, names: &[String]) -> Result<Vec<RemovalReport>> {
        let mut ledger = Ledger::load(&self.settings.ledger_path)?;
        let mut reports = Vec::new();
        let mut failed = 0;

        for name in names {
            match ledger.remove_package(name, &self.settings.data_dir) {
                Ok(report) => {
                    ledger.save(&self.settings.ledger_path)?;
                    if let Some(overlay) = &self.settings.overlay_dir {
                        prune_empty_dirs(&overlay.join(name));
                    }
                    display::display_removal(&report);
                    reports.push(report);
                }
                Err(e @ ModlayerError::PackageNotFound { .. }) => {
                    eprintln!("{} {e}", Style::new().red().bold().apply_to("Error:"));
                    failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if failed > 0 {
            return Err(ModlayerError::BatchFailed {
                failed,
                total: names.len(),
            });
        }
        Ok(reports)
    }
}

/// Delete the empty directories left in a package store, the store included
fn prune_empty_dirs(store: &Path) {
    if !store.is_dir() {
        return;
    }
    for entry in WalkDir::new(store).contents_first(true).into_iter().flatten() {
        if entry.file_type().is_dir() && fs::remove_dir(entry.path()).is_ok() {
            debug!(dir = %entry.path().display(), "Removed empty directory");
        }
    }
    if store.exists() {
        warn!(store = %store.display(), "Package store not empty after removal");
    }
}
