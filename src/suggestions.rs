//! # Error Suggestions
//!
//! Helpers that turn library errors into CLI errors carrying `hint:` lines,
//! so every failure says what went wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use project_synth::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Descriptor file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::descriptor_not_found(path));
//! ```

use std::path::Path;

use crate::error::Error;
use crate::registry::Registry;

/// Generate an error for when the descriptor file is not found.
pub fn descriptor_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Descriptor file not found: {path}\n\n\
         hint: Create a .project-synth.yaml file in your project root\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set PROJECT_SYNTH_CONFIG environment variable",
        path = path.display()
    )
}

/// Generate an error for a symbolic name missing from the registry.
///
/// Suggests a close registry name when there is one.
pub fn unresolved_dependency(name: &str, registry: &Registry) -> anyhow::Error {
    let names: Vec<&str> = registry.entries().map(|entry| entry.name.as_str()).collect();
    let did_you_mean = find_similar(name, &names)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unresolved dependency '{name}': not found in the coordinate registry{did_you_mean}\n\n\
         hint: Add an 'overrides' entry named '{name}' to the descriptor\n\
         hint: Give the coordinate directly, e.g. 'group:artifact:version'\n\
         hint: Run 'project-synth resolve' to see what resolves today"
    )
}

/// Generate an error for corrupted generator markers in an output file.
pub fn marker_corruption(path: &Path, kind: &str, message: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Marker corruption in {path} ({kind} block): {message}\n\n\
         hint: Restore both BEGIN and END project-synth:{kind} lines, or delete both\n\
         hint: The file was left untouched",
        path = path.display()
    )
}

/// Attach hints to a library error where a known fix exists.
pub fn explain(error: Error, registry: Option<&Registry>) -> anyhow::Error {
    match (&error, registry) {
        (Error::UnresolvedDependency { name }, Some(registry)) => {
            unresolved_dependency(name, registry)
        }
        (Error::MarkerCorruption { path, kind, message }, _) => {
            marker_corruption(path, kind, message)
        }
        _ => error.into(),
    }
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (a_len, b_len) = (a_chars.len(), b_chars.len());

    if a_len == 0 || b_len == 0 {
        return a_len.max(b_len);
    }

    let mut previous: Vec<usize> = (0..=b_len).collect();
    for i in 1..=a_len {
        let mut current = vec![i; b_len + 1];
        for j in 1..=b_len {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            current[j] = (previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(previous[j - 1] + cost);
        }
        previous = current;
    }

    previous[b_len]
}
