//! Dependency coordinates
//!
//! A coordinate is the fully-qualified `group:artifact:version` identifier of a
//! library in the target ecosystem. Exclusions name a transitive member by
//! `group:artifact` only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A pinned `group:artifact:version` coordinate
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// The logical library this coordinate pins, ignoring the version.
    pub fn library(&self) -> LibraryKey {
        LibraryKey {
            group: self.group.clone(),
            artifact: self.artifact.clone(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let parts = split_parts(input, 3, "group:artifact:version")?;
        Ok(Coordinate::new(parts[0], parts[1], parts[2]))
    }
}

/// `group:artifact` identity of a library, used for de-duplication and
/// ordering. Derived ordering compares group first, then artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LibraryKey {
    pub group: String,
    pub artifact: String,
}

impl fmt::Display for LibraryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

/// A transitive member to strip from a dependency
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Exclusion {
    pub group: String,
    pub artifact: String,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

impl FromStr for Exclusion {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let parts = split_parts(input, 2, "group:artifact")?;
        Ok(Exclusion {
            group: parts[0].to_string(),
            artifact: parts[1].to_string(),
        })
    }
}

impl TryFrom<String> for Exclusion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Exclusion> for String {
    fn from(value: Exclusion) -> Self {
        value.to_string()
    }
}

/// Dependency scope as understood by the manifest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Provided,
    Runtime,
    Test,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Scope::Compile
    }
}

fn split_parts<'a>(input: &'a str, expected: usize, shape: &str) -> Result<Vec<&'a str>> {
    let parts: Vec<&str> = input.trim().split(':').map(str::trim).collect();
    if parts.len() != expected {
        return Err(Error::CoordinateParse {
            input: input.to_string(),
            message: format!("expected {shape}"),
        });
    }
    if let Some(position) = parts.iter().position(|part| part.is_empty()) {
        let component = shape.split(':').nth(position).unwrap_or("component");
        return Err(Error::CoordinateParse {
            input: input.to_string(),
            message: format!("{component} is empty"),
        });
    }
    if let Some(part) = parts.iter().find(|part| part.contains(char::is_whitespace)) {
        return Err(Error::CoordinateParse {
            input: input.to_string(),
            message: format!("'{part}' contains whitespace"),
        });
    }
    Ok(parts)
}
