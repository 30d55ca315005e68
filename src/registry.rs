//! # Coordinate Registry
//!
//! The registry maps symbolic dependency names (e.g. `guava`) to pinned
//! coordinates plus any exclusions known to avoid transitive version
//! conflicts.
//!
//! ## Catalog Format
//!
//! The backing catalog is a YAML list of entries:
//!
//! ```yaml
//! - name: guava
//!   group: com.google.guava
//!   artifact: guava
//!   version: 31.1-jre
//!   exclusions:
//!     - com.google.code.findbugs:jsr305
//! - name: junit
//!   group: org.junit.jupiter
//!   artifact: junit-jupiter
//!   version: 5.8.2
//!   scope: test
//! ```
//!
//! A catalog is loaded all-or-nothing. Any malformed entry aborts the load with
//! [`Error::CatalogLoad`], because a half-loaded catalog would silently emit
//! wrong versions.
//!
//! ## Resolution
//!
//! Lookups are exact-match on the symbolic name. There is no network access,
//! no fuzzy matching and no version-range solving. Entries added after loading
//! (project overrides) replace the prior entry of the same name.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, Exclusion, Scope};
use crate::error::{Error, Result};

/// Catalog shipped with the binary
pub const BUILTIN_CATALOG: &str = include_str!("../catalog/default.yaml");

/// One symbolic name and the coordinate it resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryEntry {
    /// Symbolic name used in descriptors
    pub name: String,
    pub group: String,
    pub artifact: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Scope::is_default")]
    pub scope: Scope,
    /// Transitive members to exclude, as `group:artifact`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<Exclusion>,
    /// Free text explaining the pin. Never machine-read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RegistryEntry {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            group: coordinate.group,
            artifact: coordinate.artifact,
            version: coordinate.version,
            scope: Scope::default(),
            exclusions: Vec::new(),
            note: None,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group, &self.artifact, &self.version)
    }

    /// Check that every field is present and usable in a manifest.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let fields = [
            ("name", &self.name),
            ("group", &self.group),
            ("artifact", &self.artifact),
            ("version", &self.version),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(format!("{field} is empty"));
            }
            if value.contains(':') || value.contains(char::is_whitespace) {
                return Err(format!("{field} '{value}' contains ':' or whitespace"));
            }
        }
        Ok(())
    }
}

/// Catalog of symbolic names to pinned coordinates
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the catalog embedded in the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_catalog_str(BUILTIN_CATALOG)
    }

    /// Load a catalog from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::catalog(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_catalog_str(&content)
    }

    /// Parse a catalog, rejecting malformed or duplicate entries.
    pub fn from_catalog_str(content: &str) -> Result<Self> {
        let mut registry = Self::new();
        let blank = content
            .lines()
            .all(|line| line.trim().is_empty() || line.trim_start().starts_with('#'));
        if blank {
            return Ok(registry);
        }

        let raw: Vec<RegistryEntry> =
            serde_yaml::from_str(content).map_err(|e| Error::catalog(e.to_string()))?;

        for (index, entry) in raw.into_iter().enumerate() {
            entry
                .validate()
                .map_err(|message| Error::catalog(format!("entry #{}: {}", index + 1, message)))?;
            if registry.entries.contains_key(&entry.name) {
                return Err(Error::catalog(format!(
                    "duplicate entry '{}' (entry #{})",
                    entry.name,
                    index + 1
                )));
            }
            registry.entries.insert(entry.name.clone(), entry);
        }

        debug!("Loaded coordinate catalog with {} entries", registry.len());
        Ok(registry)
    }

    /// Add or replace an entry. Last write wins; the replaced entry is returned.
    pub fn insert(&mut self, entry: RegistryEntry) -> Option<RegistryEntry> {
        let previous = self.entries.insert(entry.name.clone(), entry);
        if let Some(previous) = &previous {
            debug!(
                "Registry override for '{}' replaces {}",
                previous.name,
                previous.coordinate()
            );
        }
        previous
    }

    /// Apply a batch of overrides in order.
    pub fn extend<I: IntoIterator<Item = RegistryEntry>>(&mut self, entries: I) {
        for entry in entries {
            self.insert(entry);
        }
    }

    /// Resolve a symbolic name. Exact match only.
    pub fn resolve(&self, name: &str) -> Result<&RegistryEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| Error::UnresolvedDependency {
                name: name.to_string(),
            })
    }

    /// Look up a symbolic name without producing an error.
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    /// Iterate over entries in name order
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
