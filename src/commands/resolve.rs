//! Resolve command implementation
//!
//! Prints the dependency set exactly as the renderer sees it: resolved,
//! de-duplicated and sorted by group then artifact, with exclusions.

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use project_synth::config;
use project_synth::descriptor::Descriptor;
use project_synth::orchestrator::load_registry;
use project_synth::render;
use project_synth::suggestions;
use project_synth::target::{Resolution, ResolvedDependency};

use super::descriptor_path;

/// Output format for the resolved set
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ResolveFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Path to the descriptor file
    #[arg(short, long, value_name = "PATH", env = "PROJECT_SYNTH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Coordinate catalog replacing the built-in one
    #[arg(long, value_name = "PATH", env = "PROJECT_SYNTH_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ResolveFormat::Text)]
    pub format: ResolveFormat,
}

/// Execute the resolve command
pub fn execute(args: ResolveArgs) -> Result<()> {
    let path = descriptor_path(args.config)?;
    let file = config::from_file(&path)?;
    let descriptor = Descriptor::new(&file)?;
    let mut registry = load_registry(args.catalog.as_deref())?;
    registry.extend(descriptor.overrides().iter().cloned());

    let resolved = render::resolve_dependencies(&descriptor, &registry)
        .map_err(|e| suggestions::explain(e, Some(&registry)))?;

    match args.format {
        ResolveFormat::Text => print!("{}", format_text(&resolved)),
        ResolveFormat::Json => println!("{}", serde_json::to_string_pretty(&to_json(&resolved))?),
    }
    Ok(())
}

fn source(dependency: &ResolvedDependency) -> String {
    match &dependency.resolution {
        Resolution::Registry(name) => format!("registry:{name}"),
        Resolution::Explicit => "explicit".to_string(),
    }
}

fn format_text(resolved: &[ResolvedDependency]) -> String {
    let mut out = String::new();
    for dependency in resolved {
        out.push_str(&format!(
            "{} [{}] ({})\n",
            dependency.coordinate,
            dependency.scope.as_str(),
            source(dependency)
        ));
        for exclusion in &dependency.exclusions {
            out.push_str(&format!("    excludes {exclusion}\n"));
        }
    }
    out
}

fn to_json(resolved: &[ResolvedDependency]) -> serde_json::Value {
    resolved
        .iter()
        .map(|dependency| {
            serde_json::json!({
                "group": dependency.coordinate.group,
                "artifact": dependency.coordinate.artifact,
                "version": dependency.coordinate.version,
                "scope": dependency.scope.as_str(),
                "exclusions": dependency
                    .exclusions
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>(),
                "source": source(dependency),
            })
        })
        .collect()
}
