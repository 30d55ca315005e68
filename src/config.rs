//! # Descriptor File Schema and Parsing
//!
//! This module defines the `.project-synth.yaml` descriptor file and the logic
//! for parsing it into a [`DescriptorFile`], which implements
//! [`ProjectSource`] so it can be turned into a validated
//! [`crate::descriptor::Descriptor`].
//!
//! ## Example
//!
//! ```yaml
//! repository: pmsite
//! name: PMSite
//! description: Simplistic application framework built on top of PushMode.
//! inception_year: 2017
//! stage: stable
//! jdk_version: 17
//! has_javadoc: false
//! stagean_annotations: true
//! dependencies:
//!   - hookless
//!   - use: slf4j
//!     note: Insist on older SLF4J. Otherwise jetty would pull in 2.0 version.
//!   - org.eclipse.jetty.websocket:websocket-servlet:11.0.7
//!   - coordinate: org.junit.jupiter:junit-jupiter:5.9.0
//!     replaces: junit
//!     scope: test
//! doc_links:
//!   - https://noexception.machinezoo.com/javadoc/
//! overrides:
//!   - name: slf4j
//!     group: org.slf4j
//!     artifact: slf4j-api
//!     version: 1.7.36
//! ```
//!
//! ## Dependency Forms
//!
//! Each dependency entry takes one of three shapes:
//!
//! 1.  **String shorthand**: a symbolic name (`guava`), or an explicit
//!     coordinate when it contains `:` (`org.acme:foo:1.2`). The `explicit:`
//!     prefix is accepted as well.
//! 2.  **Symbolic map**: `{ use: name, note: ... }`.
//! 3.  **Explicit map**: `{ coordinate: g:a:v, replaces, scope, exclusions, note }`.
//!
//! Parsing converts every entry into a [`DependencyRequest`] up front, so a
//! malformed coordinate is reported with its position in the list.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::coordinate::{Exclusion, Scope};
use crate::descriptor::{DependencyRequest, Identity, Lifecycle, ProjectSource, Toggles};
use crate::error::{Error, Result};
use crate::registry::RegistryEntry;
use crate::target::{ArtifactKind, TargetKind};

/// `{ use: guava, note: ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymbolicSpec {
    #[serde(rename = "use")]
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// `{ coordinate: org.acme:foo:1.2, replaces: foo, ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplicitSpec {
    pub coordinate: String,
    #[serde(default)]
    pub replaces: Option<String>,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub exclusions: Vec<Exclusion>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A dependency entry as written in the descriptor file
///
/// Map forms reject unknown keys, so a typo such as `replace:` fails to parse
/// instead of being dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    /// `guava` or `org.acme:foo:1.2`
    Short(String),
    Symbolic(SymbolicSpec),
    Explicit(ExplicitSpec),
}

impl DependencySpec {
    /// Convert into a request, parsing explicit coordinates.
    pub fn to_request(&self) -> Result<DependencyRequest> {
        match self {
            DependencySpec::Short(text) => DependencyRequest::parse(text),
            DependencySpec::Symbolic(spec) => Ok(DependencyRequest::Symbolic {
                name: spec.name.clone(),
                note: spec.note.clone(),
            }),
            DependencySpec::Explicit(spec) => {
                let coordinate = spec
                    .coordinate
                    .strip_prefix("explicit:")
                    .unwrap_or(&spec.coordinate)
                    .parse()?;
                Ok(DependencyRequest::Explicit {
                    coordinate,
                    scope: spec.scope,
                    exclusions: spec.exclusions.clone(),
                    replaces: spec.replaces.clone(),
                    note: spec.note.clone(),
                })
            }
        }
    }
}

fn default_jdk_version() -> u32 {
    Toggles::default().jdk_version
}

fn default_true() -> bool {
    true
}

/// The `.project-synth.yaml` descriptor file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorFile {
    /// Repository name, used as artifact id and in file names
    pub repository: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub inception_year: i32,
    #[serde(default)]
    pub stage: Lifecycle,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    /// Build ecosystem to generate for
    #[serde(default)]
    pub target: TargetKind,
    #[serde(default = "default_jdk_version")]
    pub jdk_version: u32,
    #[serde(default = "default_true")]
    pub has_javadoc: bool,
    #[serde(default)]
    pub stagean_annotations: bool,
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
    #[serde(default, alias = "javadoc_links")]
    pub doc_links: Vec<String>,
    /// Registry entries layered over the catalog, last write wins
    #[serde(default)]
    pub overrides: Vec<RegistryEntry>,
    /// Output path per artifact kind, relative to the project root
    #[serde(default)]
    pub outputs: BTreeMap<ArtifactKind, PathBuf>,

    #[serde(skip)]
    requests: Vec<DependencyRequest>,
}

impl DescriptorFile {
    /// Parsed dependency requests in file order
    pub fn requests(&self) -> &[DependencyRequest] {
        &self.requests
    }
}

impl ProjectSource for DescriptorFile {
    fn identity(&self) -> Identity {
        Identity {
            repository: self.repository.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            inception_year: self.inception_year,
            group: self.group.clone(),
            homepage: self.homepage.clone(),
        }
    }

    fn lifecycle(&self) -> Lifecycle {
        self.stage
    }

    fn toggles(&self) -> Toggles {
        Toggles {
            jdk_version: self.jdk_version,
            has_javadoc: self.has_javadoc,
            stagean_annotations: self.stagean_annotations,
        }
    }

    fn dependencies(&self) -> Vec<DependencyRequest> {
        self.requests.clone()
    }

    fn doc_links(&self) -> Vec<String> {
        self.doc_links.clone()
    }

    fn overrides(&self) -> Vec<RegistryEntry> {
        self.overrides.clone()
    }
}

/// Parse a descriptor from YAML.
pub fn parse(yaml_content: &str) -> Result<DescriptorFile> {
    let mut file: DescriptorFile = serde_yaml::from_str(yaml_content)?;

    file.requests = file
        .dependencies
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            spec.to_request()
                .map_err(|e| Error::descriptor(format!("dependencies[{index}]"), e.to_string()))
        })
        .collect::<Result<_>>()?;

    for (kind, path) in &file.outputs {
        if path.is_absolute() || path.components().any(|c| c.as_os_str() == "..") {
            return Err(Error::descriptor(
                format!("outputs.{}", kind.as_str()),
                format!("'{}' must be a relative path inside the project", path.display()),
            ));
        }
    }

    Ok(file)
}

/// Parse a descriptor from a YAML file path
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<DescriptorFile> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}
