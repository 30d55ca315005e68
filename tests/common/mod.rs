//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_descriptor(descriptors::PMSITE);
//!     fixture.command().arg("generate").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::descriptors;
    pub use super::TestFixture;
}

/// Descriptor YAML snippets for testing.
#[allow(dead_code)]
pub mod descriptors {
    /// Registry dependency plus an explicit coordinate.
    pub const PMSITE: &str = r#"
repository: pmsite
name: PMSite
description: Simplistic application framework
inception_year: 2017
group: com.machinezoo.pmsite
dependencies:
  - guava
  - explicit:org.acme:foo:1.2
javadoc_links:
  - https://docs.oracle.com/en/java/javase/17/docs/api/
"#;

    /// Same project with one more documentation link.
    pub const PMSITE_MORE_LINKS: &str = r#"
repository: pmsite
name: PMSite
description: Simplistic application framework
inception_year: 2017
group: com.machinezoo.pmsite
dependencies:
  - guava
  - explicit:org.acme:foo:1.2
javadoc_links:
  - https://docs.oracle.com/en/java/javase/17/docs/api/
  - https://guava.dev/releases/31.1-jre/api/docs/
"#;

    /// One library requested twice with different scopes.
    pub const CONFLICTING_SCOPE: &str = r#"
repository: conflict
name: Conflict
inception_year: 2020
dependencies:
  - org.acme:foo:1.2
  - coordinate: org.acme:foo:1.2
    scope: test
"#;

    /// `replace` instead of `replaces` on an explicit entry.
    pub const MISTYPED_REPLACES: &str = r#"
repository: typo
name: Typo
inception_year: 2020
dependencies:
  - junit
  - coordinate: junit:junit:4.13.2
    replace: junit
"#;

    /// Explicit coordinate replacing the registry's guava.
    pub const PINNED_GUAVA: &str = r#"
repository: pinned
name: Pinned
inception_year: 2020
dependencies:
  - guava
  - coordinate: com.google.guava:guava:30.0-jre
    replaces: guava
    note: held back until the API migration lands
"#;

    /// A symbolic name missing from the built-in catalog.
    pub const UNRESOLVED: &str = r#"
repository: broken
name: Broken
inception_year: 2020
dependencies:
  - guava
  - left-pad
"#;

    /// Gradle target with a test-scoped dependency.
    pub const GRADLE: &str = r#"
repository: gradle-demo
name: Gradle Demo
inception_year: 2021
target: gradle
dependencies:
  - slf4j
  - junit
"#;

    /// Inception year far in the future.
    pub const FUTURE_YEAR: &str = r#"
repository: future
name: Future
inception_year: 9999
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "repository: [unclosed";
}

/// A temporary project directory with an optional descriptor.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.project-synth.yaml` descriptor with the given content.
    pub fn with_descriptor(self, content: &str) -> Self {
        self.write_descriptor(content);
        self
    }

    /// Replace the descriptor in place.
    #[allow(dead_code)]
    pub fn write_descriptor(&self, content: &str) {
        self.temp_dir
            .child(".project-synth.yaml")
            .write_str(content)
            .expect("Failed to write descriptor");
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    #[allow(dead_code)]
    pub fn descriptor_path(&self) -> PathBuf {
        self.temp_dir.path().join(".project-synth.yaml")
    }

    /// Read a file from the project directory.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.temp_dir.path().join(path))
            .unwrap_or_else(|e| panic!("Failed to read {path}: {e}"))
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    #[allow(dead_code)]
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("project-synth");
        cmd.current_dir(self.path())
            .env_remove("PROJECT_SYNTH_CONFIG")
            .env_remove("PROJECT_SYNTH_CATALOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_descriptor() {
        let fixture = TestFixture::new().with_descriptor(descriptors::PMSITE);
        assert!(fixture.descriptor_path().exists());
    }

    #[test]
    fn test_descriptors_are_valid_yaml() {
        let snippets = [
            descriptors::PMSITE,
            descriptors::PMSITE_MORE_LINKS,
            descriptors::PINNED_GUAVA,
            descriptors::UNRESOLVED,
            descriptors::GRADLE,
            descriptors::FUTURE_YEAR,
        ];
        for snippet in snippets {
            serde_yaml::from_str::<serde_yaml::Value>(snippet).expect("Snippet should be valid YAML");
        }
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        assert!(serde_yaml::from_str::<serde_yaml::Value>(descriptors::INVALID_YAML).is_err());
    }
}
