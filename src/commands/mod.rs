//! Command implementations for the modlayer CLI

pub mod completions;
pub mod helpers;
pub mod install;
pub mod list;
pub mod remove;
pub mod version;
