//! Command helper utilities

use std::io::{self, IsTerminal};

use crate::cli::PathArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::prompt::Prompter;
use crate::prompt::interactive::InquirePrompter;
use crate::prompt::line::LinePrompter;

/// Resolve the global directory options
pub fn resolve_settings(paths: &PathArgs) -> Result<Settings> {
    Settings::resolve(
        paths.data.as_deref(),
        paths.overlay.as_deref(),
        paths.ledger.as_deref(),
    )
}

/// Menus on a terminal, line prompts on stdin/stdout otherwise
pub fn select_prompter(plain: bool) -> Box<dyn Prompter> {
    if !plain && io::stdin().is_terminal() && io::stdout().is_terminal() {
        Box::new(InquirePrompter::new())
    } else {
        Box::new(LinePrompter::new(io::stdin().lock(), io::stdout()))
    }
}
