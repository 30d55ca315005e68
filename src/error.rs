//! # Error Handling
//!
//! This module defines the centralized error type for the `project-synth`
//! engine. It uses the `thiserror` library to describe every failure mode of a
//! generation run with enough context for the user to fix the input.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failures the engine can report.
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Generation is deterministic, so none of these errors are retried: running
//! again without fixing the cause reproduces the same error. The variants fall
//! into the following groups:
//!
//! - Descriptor validation (bad identity, year, or conflicting requests).
//! - Dependency resolution (a symbolic name missing from the registry).
//! - Marker corruption in an existing output file.
//! - Catalog loading (malformed registry data).
//! - Coordinate parsing.
//! - Filesystem, I/O and YAML errors.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for project-synth operations
#[derive(Error, Debug)]
pub enum Error {
    /// The project descriptor failed validation.
    ///
    /// `field` names the first failing descriptor field so the message can
    /// point straight at it.
    #[error("Descriptor validation error: {field}: {message}")]
    DescriptorValidation { field: String, message: String },

    /// A symbolic dependency is neither in the registry nor replaced by an
    /// explicit coordinate.
    #[error("Unresolved dependency '{name}': not found in the coordinate registry and no explicit coordinate replaces it")]
    UnresolvedDependency { name: String },

    /// An output file contains a begin marker without its end marker, or
    /// the other way round. The file is left untouched.
    #[error("Marker corruption in {} ({kind} block): {message}", path.display())]
    MarkerCorruption {
        path: PathBuf,
        kind: String,
        message: String,
    },

    /// The coordinate catalog backing the registry is malformed.
    #[error("Catalog load error: {message}")]
    CatalogLoad { message: String },

    /// A `group:artifact:version` string could not be parsed.
    #[error("Invalid coordinate '{input}': {message}")]
    CoordinateParse { input: String, message: String },

    /// An error occurred while reading or writing an output file.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Shorthand for a [`Error::DescriptorValidation`].
    pub fn descriptor(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::DescriptorValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::CatalogLoad`].
    pub fn catalog(message: impl Into<String>) -> Self {
        Error::CatalogLoad {
            message: message.into(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
