//! # Validate Command Implementation
//!
//! Loads the descriptor and catalog, applies descriptor overrides and
//! resolves every dependency, reporting the first problem found. This is a
//! read-only operation that never touches output files.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use project_synth::config;
use project_synth::descriptor::Descriptor;
use project_synth::orchestrator::load_registry;
use project_synth::output::{emoji, OutputConfig};
use project_synth::render;
use project_synth::suggestions;

use super::descriptor_path;

/// Validate a .project-synth.yaml descriptor
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the descriptor file
    #[arg(short, long, value_name = "FILE", env = "PROJECT_SYNTH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Coordinate catalog replacing the built-in one
    #[arg(long, value_name = "PATH", env = "PROJECT_SYNTH_CATALOG")]
    pub catalog: Option<PathBuf>,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let path = descriptor_path(args.config)?;
    println!(
        "{} Validating descriptor: {}",
        emoji(&out, "🔍", "[SCAN]"),
        path.display()
    );

    let file = config::from_file(&path).map_err(|e| fail(&out, "Descriptor parsing failed", e))?;
    let descriptor = Descriptor::new(&file).map_err(|e| fail(&out, "Descriptor is invalid", e))?;
    println!("{} Descriptor is valid", emoji(&out, "✅", "[OK]"));

    let mut registry = load_registry(args.catalog.as_deref())
        .map_err(|e| fail(&out, "Catalog could not be loaded", e))?;
    registry.extend(descriptor.overrides().iter().cloned());
    println!(
        "{} Catalog loaded ({} entries)",
        emoji(&out, "✅", "[OK]"),
        registry.len()
    );

    let resolved = match render::resolve_dependencies(&descriptor, &registry) {
        Ok(resolved) => resolved,
        Err(e) => {
            println!(
                "{} Dependency resolution failed",
                emoji(&out, "❌", "[ERR]")
            );
            return Err(suggestions::explain(e, Some(&registry)));
        }
    };

    println!("\n{} Descriptor Summary:", emoji(&out, "📊", "[INFO]"));
    println!("   Repository: {}", descriptor.identity().repository);
    println!("   Target: {}", file.target.target().name());
    println!("   Lifecycle: {}", descriptor.lifecycle().as_str());
    println!("   Dependencies: {}", resolved.len());
    println!("   Doc links: {}", render::doc_links(&descriptor).len());

    println!("\n{} Validation passed", emoji(&out, "✅", "[OK]"));
    Ok(())
}

fn fail(out: &OutputConfig, context: &str, error: project_synth::error::Error) -> anyhow::Error {
    println!("{} {}", emoji(out, "❌", "[ERR]"), context);
    anyhow::Error::from(error).context(context.to_string())
}
