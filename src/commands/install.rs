//! Install command implementation

use crate::cli::{InstallArgs, PathArgs};
use crate::commands::helpers::{resolve_settings, select_prompter};
use crate::error::Result;
use crate::operations::{InstallOperation, InstallOptions};
use crate::ui;

/// Run install command
pub fn run(paths: &PathArgs, args: InstallArgs) -> Result<()> {
    let settings = resolve_settings(paths)?;
    let mut prompter = select_prompter(args.plain);
    let mut progress = ui::reporter_for_stderr();

    InstallOperation::new(
        &settings,
        InstallOptions::from(&args),
        prompter.as_mut(),
        progress.as_mut(),
    )
    .execute()?;
    Ok(())
}
