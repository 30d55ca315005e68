//! Generate command implementation
//!
//! Runs the full pipeline: load the descriptor and catalog, render every
//! artifact kind, then merge each block into its output file. Only files
//! whose content actually changes are written.
//!
//! `--check` turns the command into a CI gate: nothing is written and the
//! exit code is 1 when any file is out of date.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;

use project_synth::orchestrator::{self, GenerateOptions};
use project_synth::output::{emoji, outcome_label, OutputConfig};
use project_synth::suggestions;

use super::{descriptor_path, display_path};

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the descriptor file
    #[arg(short, long, value_name = "PATH", env = "PROJECT_SYNTH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Project root for output files (defaults to current directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Coordinate catalog replacing the built-in one
    #[arg(long, value_name = "PATH", env = "PROJECT_SYNTH_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Exit with an error if any file is out of date; writes nothing
    #[arg(long)]
    pub check: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the generate command
pub fn execute(args: GenerateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let start_time = Instant::now();

    let descriptor_path = descriptor_path(args.config)?;
    let root = match args.output {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let dry_run = args.dry_run || args.check;

    if !args.quiet && args.dry_run {
        println!(
            "{} DRY RUN MODE - No changes will be made",
            emoji(&out, "🔎", "[DRY]")
        );
        println!();
    }

    let options = GenerateOptions {
        descriptor_path,
        root,
        catalog: args.catalog,
        dry_run,
    };
    let report = orchestrator::generate(&options).map_err(|e| {
        let registry = orchestrator::load_registry(options.catalog.as_deref()).ok();
        suggestions::explain(e, registry.as_ref())
    })?;

    if args.check {
        if report.has_changes() {
            let stale: Vec<String> = report
                .changed()
                .map(|file| display_path(&file.path, &options.root))
                .collect();
            anyhow::bail!(
                "{} file(s) out of date: {}\n\n\
                 hint: Run 'project-synth generate' to update them",
                stale.len(),
                stale.join(", ")
            );
        }
        if !args.quiet {
            println!("{} All files up to date", emoji(&out, "✅", "[OK]"));
        }
        return Ok(());
    }

    if !args.quiet {
        for file in &report.files {
            println!(
                "   {:<12} {}",
                outcome_label(&out, file.outcome, dry_run),
                display_path(&file.path, &options.root)
            );
        }
        let changed = report.changed().count();
        println!();
        if changed == 0 {
            println!("{} Everything up to date", emoji(&out, "✅", "[OK]"));
        } else {
            println!(
                "{} {} of {} files {} in {:.2}s",
                emoji(&out, "✅", "[OK]"),
                changed,
                report.files.len(),
                if dry_run { "would change" } else { "changed" },
                start_time.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}
