//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;

/// Project Synthesizer - Regenerate build configuration from one descriptor
#[derive(Parser, Debug)]
#[command(name = "project-synth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Regenerate the managed blocks of the project's build files
    Generate(commands::generate::GenerateArgs),

    /// Check the descriptor and catalog without writing anything
    Validate(commands::validate::ValidateArgs),

    /// Print the resolved dependency set
    Resolve(commands::resolve::ResolveArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(self.log_level);

        match self.command {
            Commands::Generate(args) => commands::generate::execute(args, &self.color),
            Commands::Validate(args) => commands::validate::execute(args, &self.color),
            Commands::Resolve(args) => commands::resolve::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Logs go to stderr so they never mix with command output.
fn init_logging(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // Already initialised is fine
    let _ = builder.try_init();
}
