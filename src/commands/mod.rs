//! # CLI Command Implementations
//!
//! One module per `project-synth` subcommand. Each module has an `Args`
//! struct derived with `clap` and an `execute` function that calls into the
//! `project_synth` library.

pub mod completions;
pub mod generate;
pub mod resolve;
pub mod validate;

use anyhow::Result;
use std::path::{Path, PathBuf};

use project_synth::defaults::default_descriptor_path;
use project_synth::suggestions;

/// Resolve the descriptor path and make sure it exists.
pub(crate) fn descriptor_path(config: Option<PathBuf>) -> Result<PathBuf> {
    let path = config.unwrap_or_else(default_descriptor_path);
    if !path.exists() {
        return Err(suggestions::descriptor_not_found(&path));
    }
    Ok(path)
}

/// Show `path` relative to `root` when possible.
pub(crate) fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
