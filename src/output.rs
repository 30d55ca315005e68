//! # Output Configuration
//!
//! Controls CLI output appearance based on terminal capabilities and user
//! preferences.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use project_synth::output::{OutputConfig, emoji};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{} Generating...", emoji(&config, "🔧", "[GEN]"));
//! ```

use std::env;

use console::style;

use crate::writer::WriteOutcome;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: "always", "never" or "auto".
    /// In auto mode, colors are disabled by `NO_COLOR`, `CLICOLOR=0`,
    /// `TERM=dumb`, or a non-TTY stdout (unless `CLICOLOR_FORCE=1`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables, even if empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, else the plain alternative.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Label for a write outcome, styled when colors are enabled.
///
/// `dry_run` switches to conditional wording ("would create").
pub fn outcome_label(config: &OutputConfig, outcome: WriteOutcome, dry_run: bool) -> String {
    let text = match (outcome, dry_run) {
        (WriteOutcome::Created, false) => "created",
        (WriteOutcome::Updated, false) => "updated",
        (WriteOutcome::Created, true) => "would create",
        (WriteOutcome::Updated, true) => "would update",
        (WriteOutcome::Unchanged, _) => "unchanged",
    };

    if !config.use_color {
        return text.to_string();
    }
    let styled = match outcome {
        WriteOutcome::Created => style(text).green(),
        WriteOutcome::Updated => style(text).yellow(),
        WriteOutcome::Unchanged => style(text).dim(),
    };
    styled.force_styling(true).to_string()
}
