//! Archive access errors

use std::path::Path;

use super::ModlayerError;

/// Creates an archive open error
pub fn open_failed(path: &Path, reason: impl ToString) -> ModlayerError {
    ModlayerError::ArchiveOpenFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a corrupt stream error for an archive entry
pub fn corrupt(entry: impl Into<String>, reason: impl ToString) -> ModlayerError {
    ModlayerError::CorruptArchive {
        entry: entry.into(),
        reason: reason.to_string(),
    }
}
