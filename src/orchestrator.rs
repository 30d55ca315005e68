//! Orchestrator for a complete generation run
//!
//! A run takes one validated descriptor through the whole pipeline:
//!
//! 1. Layer the descriptor's overrides over the registry
//! 2. Render every artifact kind (fails before any file is touched)
//! 3. Group the rendered blocks by output file
//! 4. Merge and write each file once
//!
//! Every file is written atomically on its own. A failure on a later file
//! leaves earlier files already written.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config;
use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::registry::Registry;
use crate::render;
use crate::target::{ArtifactKind, Target};
use crate::writer::{Block, Markers, WriteOutcome, Writer, GENERATOR};

/// Outcome for one managed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Path as written, joined onto the project root
    pub path: PathBuf,
    /// Artifact kinds that live in this file, in kind order
    pub kinds: Vec<ArtifactKind>,
    pub outcome: WriteOutcome,
}

/// Summary of a run, one entry per output file in path order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub files: Vec<FileReport>,
}

impl RunReport {
    /// True if any file was (or in dry-run mode would be) created or updated
    pub fn has_changes(&self) -> bool {
        self.files.iter().any(|file| file.outcome.is_change())
    }

    pub fn changed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|file| file.outcome.is_change())
    }
}

/// Generate every artifact into its default location under `root`.
pub fn run(
    descriptor: &Descriptor,
    registry: &Registry,
    target: &dyn Target,
    writer: &Writer,
    root: &Path,
) -> Result<RunReport> {
    run_with_outputs(descriptor, registry, target, writer, root, &BTreeMap::new())
}

/// Like [`run`], with per-kind output paths replacing the target's defaults.
pub fn run_with_outputs(
    descriptor: &Descriptor,
    registry: &Registry,
    target: &dyn Target,
    writer: &Writer,
    root: &Path,
    outputs: &BTreeMap<ArtifactKind, PathBuf>,
) -> Result<RunReport> {
    let mut registry = registry.clone();
    if !descriptor.overrides().is_empty() {
        debug!(
            "Applying {} registry overrides",
            descriptor.overrides().len()
        );
        registry.extend(descriptor.overrides().iter().cloned());
    }

    let rendered = render::render(descriptor, &registry, target)?;

    // BTreeMap keeps the file order stable between runs
    let mut files: BTreeMap<PathBuf, Vec<Block>> = BTreeMap::new();
    for (kind, text) in rendered {
        let placement = target.placement(kind);
        let relative = outputs
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| placement.path.clone());
        files
            .entry(relative)
            .or_default()
            .push(Block::placed(kind, text, &placement));
    }

    let mut report = RunReport::default();
    for (relative, blocks) in files {
        let path = root.join(&relative);
        let skeleton = match blocks.first() {
            Some(block) => target.skeleton(block.kind, descriptor),
            None => continue,
        };
        let outcome = writer.write_blocks(&path, &skeleton, &blocks)?;
        report.files.push(FileReport {
            path,
            kinds: blocks.iter().map(|block| block.kind).collect(),
            outcome,
        });
    }

    info!(
        "{} of {} files changed",
        report.changed().count(),
        report.files.len()
    );
    Ok(report)
}

/// Inputs for [`generate`]
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub descriptor_path: PathBuf,
    /// Project root that output paths are relative to
    pub root: PathBuf,
    /// Replaces the built-in catalog when set
    pub catalog: Option<PathBuf>,
    pub dry_run: bool,
}

/// Load the catalog named by `path`, or the built-in one.
pub fn load_registry(path: Option<&Path>) -> Result<Registry> {
    match path {
        Some(path) => {
            debug!("Loading catalog from {}", path.display());
            Registry::from_file(path)
        }
        None => Registry::builtin(),
    }
}

/// Load a descriptor file and catalog, then run.
pub fn generate(options: &GenerateOptions) -> Result<RunReport> {
    let file = config::from_file(&options.descriptor_path)?;
    let descriptor = Descriptor::new(&file)?;
    let registry = load_registry(options.catalog.as_deref())?;
    let target = file.target.target();
    let writer = Writer::new(Markers::new(GENERATOR, target.comment_style()))
        .dry_run(options.dry_run);

    info!(
        "Generating {} configuration for {}",
        target.name(),
        descriptor.identity().repository
    );
    run_with_outputs(
        &descriptor,
        &registry,
        target.as_ref(),
        &writer,
        &options.root,
        &file.outputs,
    )
}
