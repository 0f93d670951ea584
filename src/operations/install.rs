//! Install operation
//!
//! Archives are processed one after another. For each one:
//! 1. Open the archive and pick the install root (data dir, or a fresh
//!    staging store under the overlay dir)
//! 2. Run the wizard, or the loose-file fallback with `--data-ext`
//! 3. In overlay mode link the store into the data dir and record the
//!    resulting bindings
//!
//! A failing archive is reported and the batch goes on. The ledger is saved
//! once at the end, and the plugin list is updated last.

use std::fs;
use std::path::{Path, PathBuf};

use console::Style;
use tracing::{Level, debug, error, info, warn};

use crate::archive::Archive;
use crate::cli::InstallArgs;
use crate::config::Settings;
use crate::error::fs::io_failure;
use crate::error::{ModlayerError, Result};
use crate::overlay::{Ledger, link};
use crate::plugins::{self, PluginList};
use crate::prompt::Prompter;
use crate::ui::ProgressReporter;
use crate::ui::display;
use crate::wizard::{self, DESCRIPTOR_PATH};

const ARCHIVE_SUFFIXES: &[&str] = &[".tar.gz", ".tgz", ".tar", ".zip", ".7z"];

/// Configuration options for installation
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub archives: Vec<PathBuf>,
    pub data_ext: bool,
    pub plugins: Option<PathBuf>,
    pub auto_plugins: bool,
    pub xml_debug: bool,
}

impl From<&InstallArgs> for InstallOptions {
    fn from(args: &InstallArgs) -> Self {
        Self {
            archives: args.archives.clone(),
            data_ext: args.data_ext,
            plugins: args.plugins.clone(),
            auto_plugins: args.auto_plugins,
            xml_debug: args.xml_debug,
        }
    }
}

/// Package name for an archive: its file name without the archive suffix
pub fn package_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let folded = file_name.to_ascii_lowercase();
    ARCHIVE_SUFFIXES
        .iter()
        .find(|suffix| folded.ends_with(*suffix) && folded.len() > suffix.len())
        .map_or(file_name.clone(), |suffix| {
            file_name[..file_name.len() - suffix.len()].to_string()
        })
}

/// Result of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSummary {
    pub installed: Vec<String>,
    pub failed: Vec<String>,
    /// Plugin files written at the top of each install root
    pub plugins: Vec<String>,
}

/// High-level install operation
pub struct InstallOperation<'a> {
    settings: &'a Settings,
    options: InstallOptions,
    prompter: &'a mut dyn Prompter,
    progress: &'a mut dyn ProgressReporter,
}

impl<'a> InstallOperation<'a> {
    pub fn new(
        settings: &'a Settings,
        options: InstallOptions,
        prompter: &'a mut dyn Prompter,
        progress: &'a mut dyn ProgressReporter,
    ) -> Self {
        Self {
            settings,
            options,
            prompter,
            progress,
        }
    }

    /// Install every archive; fails with `BatchFailed` if any did
    pub fn execute(&mut self) -> Result<InstallSummary> {
        let mut ledger = if self.settings.overlay_mode() {
            Some(Ledger::load(&self.settings.ledger_path)?)
        } else {
            None
        };

        let mut summary = InstallSummary::default();
        let archives = self.options.archives.clone();
        for archive in &archives {
            let name = package_name(archive);
            match self.install_one(archive, &name, ledger.as_mut()) {
                Ok(found_plugins) => {
                    summary.plugins.extend(found_plugins);
                    summary.installed.push(name);
                }
                Err(e) => {
                    self.progress.abandon();
                    error!(archive = %archive.display(), "Install failed: {e}");
                    eprintln!("{} {name}: {e}", Style::new().red().bold().apply_to("Failed"));
                    summary.failed.push(name);
                }
            }
        }

        if let Some(ledger) = &ledger {
            ledger.save(&self.settings.ledger_path)?;
        }
        self.update_plugin_list(&summary.plugins)?;

        if summary.failed.is_empty() {
            Ok(summary)
        } else {
            Err(ModlayerError::BatchFailed {
                failed: summary.failed.len(),
                total: archives.len(),
            })
        }
    }

    fn install_one(
        &mut self,
        path: &Path,
        name: &str,
        ledger: Option<&mut Ledger>,
    ) -> Result<Vec<String>> {
        info!(archive = %path.display(), package = %name, "Installing");
        let mut archive = Archive::open(path)?;

        let root = match (&self.settings.overlay_dir, &ledger) {
            (Some(overlay), Some(ledger)) => prepare_store(overlay, name, ledger)?,
            _ => self.settings.data_dir.clone(),
        };
        fs::create_dir_all(&root).map_err(|e| io_failure(&root, e))?;

        let written = self.populate(&mut archive, name, &root)?;
        debug!(package = %name, scans = archive.scan_count(), "Archive done");
        let found_plugins = plugins::top_level_plugins(&root, &written);

        if let Some(ledger) = ledger {
            let data_dir = &self.settings.data_dir;
            let progress = &mut *self.progress;
            progress.start(name, "Linking");
            link::materialize(&root, data_dir, &mut |l| {
                progress.item(&l.to_string_lossy());
            })?;
            progress.finish();

            let bindings = link::scan_bindings(data_dir, &root)?;
            ledger.record_install(name, bindings);
        }
        Ok(found_plugins)
    }

    /// Write the package's files beneath `root`
    fn populate(&mut self, archive: &mut Archive, name: &str, root: &Path) -> Result<Vec<PathBuf>> {
        if let Some((entry, bytes)) = archive.read_matching(DESCRIPTOR_PATH)? {
            debug!(entry = %entry, "Found install wizard");
            if self.options.xml_debug {
                eprint!("{}", wizard::describe_tree(&wizard::decode_document(&bytes))?);
            }
            let module = wizard::parse_bytes(&bytes)?;
            let report = wizard::execute(&module, archive, &mut *self.prompter, root)?;
            display::display_install(name, &report);
            return Ok(report.written);
        }

        if !self.options.data_ext {
            if tracing::enabled!(Level::DEBUG) {
                debug!(entries = ?archive.list_entries()?, "Archive has no wizard");
            }
            return Err(ModlayerError::DescriptorNotFound {
                archive: archive.label().to_string(),
            });
        }

        self.progress.start(name, "Extracting");
        let report = match archive.extract_heuristic(root) {
            Ok(report) => report,
            Err(e) => {
                self.progress.abandon();
                return Err(e);
            }
        };
        self.progress.finish();

        for entry in &report.unrecognized {
            debug!(entry = %entry, "Left unextracted");
        }
        println!(
            "{} {} {}",
            Style::new().green().bold().apply_to("Extracted"),
            Style::new().bold().apply_to(name),
            Style::new().dim().apply_to(format!(
                "({} files, {} unrecognized)",
                report.files.len(),
                report.unrecognized.len()
            ))
        );
        Ok(report.files)
    }

    fn update_plugin_list(&self, found: &[String]) -> Result<()> {
        if found.is_empty() {
            return Ok(());
        }
        let path = match (&self.options.plugins, self.options.auto_plugins) {
            (Some(path), _) => path.clone(),
            (None, true) => match plugins::discover() {
                Some(path) => path,
                None => {
                    warn!("Plugins.txt not found, load list left unchanged");
                    return Ok(());
                }
            },
            (None, false) => return Ok(()),
        };

        let mut list = PluginList::load(&path)?;
        let mut changed = false;
        for plugin in found {
            changed |= list.enable(plugin);
        }
        if changed {
            list.save(&path)?;
        }
        Ok(())
    }
}

/// Fresh staging store for `name`; a leftover from a failed install is removed
fn prepare_store(overlay: &Path, name: &str, ledger: &Ledger) -> Result<PathBuf> {
    if ledger.has_package(name) {
        return Err(ModlayerError::PackageAlreadyInstalled {
            name: name.to_string(),
        });
    }
    let store = overlay.join(name);
    if store.exists() {
        warn!(store = %store.display(), "Removing stale staging directory");
        fs::remove_dir_all(&store).map_err(|e| io_failure(&store, e))?;
    }
    Ok(store)
}
