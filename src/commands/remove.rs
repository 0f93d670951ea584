//! Remove command implementation

use crate::cli::{PathArgs, RemoveArgs};
use crate::commands::helpers::resolve_settings;
use crate::error::Result;
use crate::operations::RemoveOperation;

/// Run remove command
pub fn run(paths: &PathArgs, args: RemoveArgs) -> Result<()> {
    let settings = resolve_settings(paths)?;
    RemoveOperation::new(&settings).execute(&args.names)?;
    Ok(())
}
