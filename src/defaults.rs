//! Default values shared by the commands.

use std::path::PathBuf;

/// Descriptor file looked up in the current directory
pub const DESCRIPTOR_FILE: &str = ".project-synth.yaml";

/// Returns the default descriptor path.
///
/// This can be overridden by the `-c/--config` CLI flag or the
/// `PROJECT_SYNTH_CONFIG` environment variable.
pub fn default_descriptor_path() -> PathBuf {
    PathBuf::from(DESCRIPTOR_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_descriptor_path() {
        let path = default_descriptor_path();
        assert_eq!(path, PathBuf::from(".project-synth.yaml"));
        assert!(path.is_relative());
    }
}
