//! Error types and handling for modlayer
//!
//! Uses `thiserror` for error definitions and `miette` for diagnostic codes.
//!
//! Constructor helpers are grouped by error domain:
//! - [`wizard`]: install-wizard document errors
//! - [`archive`]: archive access errors
//! - [`overlay`]: ledger and overlay errors
//! - [`fs`]: file system errors

pub mod archive;
pub mod fs;
pub mod overlay;
pub mod wizard;


use miette::Diagnostic;
use thiserror::Error;

/// Main error type for modlayer operations
#[derive(Error, Diagnostic, Debug)]
pub enum ModlayerError {
    // Wizard document errors
    #[error("Malformed install wizard: {message}")]
    #[diagnostic(code(modlayer::wizard::malformed))]
    MalformedDescriptor { message: String },

    #[error("Install wizard element '{element}' is missing its '{attribute}' attribute")]
    #[diagnostic(code(modlayer::wizard::missing_attribute))]
    MissingAttribute { element: String, attribute: String },

    #[error("No install wizard (fomod/ModuleConfig.xml) found in '{archive}'")]
    #[diagnostic(
        code(modlayer::wizard::not_found),
        help("Pass --data-ext to extract recognizable game files without a wizard")
    )]
    DescriptorNotFound { archive: String },

    #[error("Installation of '{module}' declined at the required files prompt")]
    #[diagnostic(code(modlayer::wizard::declined))]
    InstallDeclined { module: String },

    #[error("Prompt failed: {message}")]
    #[diagnostic(code(modlayer::prompt::failed))]
    PromptFailed { message: String },

    // Archive errors
    #[error("Failed to open archive '{path}': {reason}")]
    #[diagnostic(code(modlayer::archive::open_failed))]
    ArchiveOpenFailed { path: String, reason: String },

    #[error("Unsupported archive format: {path}")]
    #[diagnostic(
        code(modlayer::archive::unsupported),
        help("Supported formats: .zip, .7z, .tar, .tar.gz, .tgz")
    )]
    UnsupportedArchive { path: String },

    #[error("Corrupt archive stream while reading '{entry}': {reason}")]
    #[diagnostic(code(modlayer::archive::corrupt))]
    CorruptArchive { entry: String, reason: String },

    // Overlay errors
    #[error("Overlay ledger '{path}' cannot be parsed: {reason}")]
    #[diagnostic(
        code(modlayer::overlay::ledger_corrupt),
        help("Fix or move the ledger file away; it is never rewritten while unreadable")
    )]
    LedgerCorrupt { path: String, reason: String },

    #[error("Package '{name}' not found in the overlay ledger")]
    #[diagnostic(
        code(modlayer::overlay::package_not_found),
        help("Run 'modlayer list' to see installed packages")
    )]
    PackageNotFound { name: String },

    #[error("Package '{name}' is already installed in the overlay")]
    #[diagnostic(
        code(modlayer::overlay::already_installed),
        help("Remove it first with 'modlayer remove <name>'")
    )]
    PackageAlreadyInstalled { name: String },

    #[error("{count} overlay violation(s) found")]
    #[diagnostic(code(modlayer::overlay::verify_failed))]
    VerifyFailed { count: usize },

    // Configuration errors
    #[error("Game data directory not found")]
    #[diagnostic(
        code(modlayer::config::data_dir_not_found),
        help("Pass --data <DIR> or set MODLAYER_DATA")
    )]
    DataDirNotFound,

    // File system errors
    #[error("I/O failure on '{path}': {reason}")]
    #[diagnostic(code(modlayer::fs::io_failure))]
    IoFailure { path: String, reason: String },

    // Batch errors
    #[error("{failed} of {total} package(s) failed")]
    #[diagnostic(code(modlayer::batch::failed))]
    BatchFailed { failed: usize, total: usize },
}

impl From<inquire::InquireError> for ModlayerError {
    fn from(err: inquire::InquireError) -> Self {
        ModlayerError::PromptFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ModlayerError>;
