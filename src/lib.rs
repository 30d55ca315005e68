//! # Project Synthesizer Library
//!
//! This library regenerates the repetitive parts of a project's build
//! configuration from one declarative descriptor: identity metadata, the
//! dependency list and documentation cross-reference links. Generated text is
//! confined to marker-delimited blocks, so everything a human writes outside
//! those blocks survives regeneration untouched. It backs the `project-synth`
//! command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use project_synth::config;
//! use project_synth::descriptor::Descriptor;
//! use project_synth::registry::Registry;
//! use project_synth::render;
//! use project_synth::target::{ArtifactKind, Maven};
//!
//! let file = config::parse(r#"
//! repository: pmsite
//! name: PMSite
//! inception_year: 2017
//! dependencies:
//!   - guava
//!   - org.acme:foo:1.2
//! "#).unwrap();
//! let descriptor = Descriptor::new(&file).unwrap();
//! let registry = Registry::builtin().unwrap();
//!
//! let rendered = render::render(&descriptor, &registry, &Maven).unwrap();
//! let dependencies = &rendered[&ArtifactKind::Dependencies];
//! assert!(dependencies.find("com.google.guava") < dependencies.find("org.acme"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Coordinates (`coordinate`)**: `group:artifact:version` triples, scopes
//!   and exclusions.
//! - **Registry (`registry`)**: the catalog mapping symbolic names like
//!   `guava` to pinned coordinates.
//! - **Descriptor (`descriptor`, `config`)**: the validated, immutable project
//!   description, built from a `.project-synth.yaml` file or from closures.
//! - **Targets (`target`)**: how Maven and Gradle spell each artifact kind.
//! - **Renderer (`render`)**: resolves, de-duplicates and sorts dependencies
//!   and produces deterministic text.
//! - **Writer (`writer`)**: merges rendered blocks between markers and only
//!   writes files whose content really changed.
//!
//! ## Execution Flow
//!
//! [`orchestrator::generate`] loads the descriptor and catalog, then
//! [`orchestrator::run`] renders every artifact kind and hands each output
//! file to the writer once. Resolution errors abort the run before any file is
//! touched.

pub mod config;
pub mod coordinate;
pub mod defaults;
pub mod descriptor;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod registry;
pub mod render;
pub mod suggestions;
pub mod target;
pub mod writer;

#[cfg(test)]
mod render_proptest;
#[cfg(test)]
mod writer_proptest;
