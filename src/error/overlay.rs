//! Overlay ledger errors

use std::path::Path;

use super::ModlayerError;

/// Creates a ledger parse error
pub fn ledger_corrupt(path: &Path, reason: impl ToString) -> ModlayerError {
    ModlayerError::LedgerCorrupt {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a package not found error
pub fn package_not_found(name: impl Into<String>) -> ModlayerError {
    ModlayerError::PackageNotFound { name: name.into() }
}
