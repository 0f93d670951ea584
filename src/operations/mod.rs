//! Operations module for installing, listing and removing packages
//!
//! Each operation takes the resolved [`Settings`](crate::config::Settings)
//! and coordinates the archive, wizard and overlay modules:
//! - InstallOperation: batch install, optionally through the overlay
//! - ListOperation: packages, conflicts, or verification
//! - RemoveOperation: overlay removal with fallback restoration

pub mod install;
pub mod list;
pub mod remove;

pub use install::{InstallOperation, InstallOptions};
pub use list::ListOperation;
pub use remove::RemoveOperation;
