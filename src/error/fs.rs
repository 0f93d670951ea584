//! File system errors

use std::path::Path;

use super::ModlayerError;

/// Creates an I/O failure carrying the offending path
pub fn io_failure(path: &Path, err: impl ToString) -> ModlayerError {
    ModlayerError::IoFailure {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
