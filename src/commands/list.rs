//! List command implementation

use crate::cli::{ListArgs, PathArgs};
use crate::commands::helpers::resolve_settings;
use crate::error::Result;
use crate::operations::ListOperation;

/// Run list command
pub fn run(paths: &PathArgs, args: ListArgs) -> Result<()> {
    let settings = resolve_settings(paths)?;
    ListOperation::new(&settings).execute(args.mode)
}
