//! Wizard execution

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ModlayerError, Result};
use crate::prompt::{Notice, Prompter};
use crate::wizard::descriptor::{CopyKind, CopyOp, Group, ModuleDescriptor, Pattern};
use crate::wizard::flags::FlagStore;
use crate::wizard::{InstallReport, PackageFiles};

const REQUIRED_QUESTION: &str = "Required files - Install?";

/// Run `module` against `files`, asking `prompter`, writing beneath `install_root`
pub fn execute<F, P>(
    module: &ModuleDescriptor,
    files: &mut F,
    prompter: &mut P,
    install_root: &Path,
) -> Result<InstallReport>
where
    F: PackageFiles + ?Sized,
    P: Prompter + ?Sized,
{
    let mut copier = Copier {
        files,
        root: install_root,
        report: InstallReport {
            module: module.name.clone(),
            ..InstallReport::default()
        },
    };

    prompter.notice(Notice::Module { name: &module.name })?;

    if !module.required_files.is_empty() {
        if !prompter.confirm(REQUIRED_QUESTION)? {
            return Err(ModlayerError::InstallDeclined {
                module: module.name.clone(),
            });
        }
        copier.apply_all(&module.required_files)?;
    }

    let mut flags = FlagStore::new();
    for step in &module.steps {
        if let Some(visibility) = &step.visibility {
            if !visibility.evaluate(&flags) {
                debug!(step = %step.name, "Skipping hidden step");
                continue;
            }
        }

        copier.report.steps_shown += 1;
        prompter.notice(Notice::Step {
            number: copier.report.steps_shown,
            name: &step.name,
        })?;

        for group in &step.groups {
            for index in select(group, prompter)? {
                let Some(option) = group.options.get(index) else {
                    continue;
                };
                debug!(group = %group.name, option = %option.name, "Option selected");
                copier.apply_all(&option.files)?;
                for (name, value) in &option.flags_on_select {
                    debug!(flag = %name, value = %value, "Setting flag");
                    flags.set(name.clone(), value.clone());
                }
            }
        }
    }

    for pattern in matching_patterns(module, &flags) {
        copier.apply_all(&pattern.files)?;
    }

    let mut report = copier.report;
    info!(
        module = %report.module,
        written = report.written.len(),
        unmatched = report.unmatched.len(),
        "Wizard finished"
    );
    report.flags = flags;
    Ok(report)
}

/// Conditional patterns whose condition holds against `flags`
///
/// Pure: every pattern sees the same snapshot.
pub fn matching_patterns<'m>(module: &'m ModuleDescriptor, flags: &FlagStore) -> Vec<&'m Pattern> {
    module
        .conditional_installs
        .iter()
        .filter(|p| p.condition.evaluate(flags))
        .collect()
}

fn select<P: Prompter + ?Sized>(group: &Group, prompter: &mut P) -> Result<Vec<usize>> {
    if group.options.is_empty() {
        warn!(group = %group.name, "Skipping group without options");
        return Ok(Vec::new());
    }
    let Some(cardinality) = group.mode.cardinality() else {
        debug!(group = %group.name, "Selecting every option");
        return Ok((0..group.options.len()).collect());
    };
    let names: Vec<&str> = group.options.iter().map(|o| o.name.as_str()).collect();
    prompter.choose(&group.name, &names, cardinality)
}

struct Copier<'a, F: ?Sized> {
    files: &'a mut F,
    root: &'a Path,
    report: InstallReport,
}

impl<F: PackageFiles + ?Sized> Copier<'_, F> {
    fn apply_all(&mut self, ops: &[CopyOp]) -> Result<()> {
        ops.iter().try_for_each(|op| self.apply(op))
    }

    fn apply(&mut self, op: &CopyOp) -> Result<()> {
        let Some(target) = op.target(self.root) else {
            warn!(
                source = %op.source,
                destination = %op.destination,
                "Skipping copy that would leave the install root"
            );
            self.report.unmatched.push(op.source.clone());
            return Ok(());
        };

        let written: Vec<PathBuf> = match op.kind {
            CopyKind::File => self.files.copy_file(&op.source, &target)?.into_iter().collect(),
            CopyKind::Folder => self.files.copy_folder(&op.source, &target)?,
        };

        if written.is_empty() {
            warn!(source = %op.source, "No archive entry matches copy source");
            self.report.unmatched.push(op.source.clone());
        } else {
            debug!(source = %op.source, path = %target.display(), count = written.len(), "Copied");
            self.report.written.extend(written);
        }
        Ok(())
    }
}
