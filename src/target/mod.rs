//! Build ecosystem targets
//!
//! A [`Target`] knows how one build ecosystem spells the generated artifacts:
//! the text of each block, the comment syntax used for markers, which file
//! each block lives in, and what a brand-new file looks like.
//!
//! ## Supported Targets
//!
//! - Maven (maven.rs) - `pom.xml`, doc links as `maven-javadoc-plugin` links
//! - Gradle (gradle.rs) - `build.gradle.kts` (Kotlin DSL)
//!
//! Renderers receive already-resolved, sorted dependencies and de-duplicated
//! links. They must be pure: the same input always yields the same text.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, Exclusion, Scope};
use crate::descriptor::Descriptor;

pub mod gradle;
pub mod maven;

pub use gradle::Gradle;
pub use maven::Maven;

/// The independently generated regions of the output files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// Name, description, inception year and build properties
    Identity,
    /// The resolved dependency list
    Dependencies,
    /// Documentation cross-reference links
    DocLinks,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Identity,
        ArtifactKind::Dependencies,
        ArtifactKind::DocLinks,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Identity => "identity",
            ArtifactKind::Dependencies => "dependencies",
            ArtifactKind::DocLinks => "doc-links",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a registry or explicit coordinate came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Looked up in the registry under this symbolic name
    Registry(String),
    /// Given verbatim in the descriptor
    Explicit,
}

/// A dependency ready to be written into a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub coordinate: Coordinate,
    pub scope: Scope,
    /// Sorted and free of duplicates
    pub exclusions: Vec<Exclusion>,
    pub resolution: Resolution,
}

/// Comment delimiters used to build marker lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentStyle {
    pub open: &'static str,
    /// Empty for line comments
    pub close: &'static str,
}

impl CommentStyle {
    pub const XML: CommentStyle = CommentStyle {
        open: "<!--",
        close: "-->",
    };
    pub const LINE: CommentStyle = CommentStyle {
        open: "//",
        close: "",
    };

    /// Wrap `text` in a single-line comment.
    pub fn wrap(&self, text: &str) -> String {
        if self.close.is_empty() {
            format!("{} {}", self.open, text)
        } else {
            format!("{} {} {}", self.open, text, self.close)
        }
    }
}

/// Where a block goes when its file has no marker pair for it yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Output path relative to the project root
    pub path: PathBuf,
    /// New blocks go before the last line equal to this, else at end of file
    pub anchor: Option<&'static str>,
    /// Indentation of a newly inserted block
    pub indent: &'static str,
}

/// A build ecosystem the renderer can emit configuration for
pub trait Target {
    fn name(&self) -> &'static str;

    fn comment_style(&self) -> CommentStyle;

    fn placement(&self, kind: ArtifactKind) -> Placement;

    /// Content of a newly created file that will receive `kind`
    fn skeleton(&self, kind: ArtifactKind, descriptor: &Descriptor) -> String;

    fn render_identity(&self, descriptor: &Descriptor) -> String;

    fn render_dependencies(&self, dependencies: &[ResolvedDependency]) -> String;

    fn render_doc_links(&self, links: &[&str]) -> String;
}

/// Target selector used in descriptor files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    #[default]
    Maven,
    Gradle,
}

impl TargetKind {
    pub fn target(self) -> Box<dyn Target> {
        match self {
            TargetKind::Maven => Box::new(Maven),
            TargetKind::Gradle => Box::new(Gradle),
        }
    }
}

/// Escape text for XML element content and attribute values.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
