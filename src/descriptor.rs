//! # Descriptor Model
//!
//! A [`Descriptor`] is the validated, immutable record of one project: its
//! identity, lifecycle stage, dependency requests, documentation links and
//! ecosystem toggles.
//!
//! ## Sources
//!
//! Descriptors are built from a [`ProjectSource`], a small strategy trait with
//! one method per customizable aspect. Two encodings implement it:
//!
//! - [`crate::config::DescriptorFile`], the YAML descriptor read from disk.
//! - [`ClosureSource`], where dependencies and documentation links are
//!   produced by closures. This suits descriptors assembled in code.
//!
//! Sources may be expensive or side-effecting to query, so
//! [`Descriptor::from_source`] calls each generator exactly once and keeps the
//! produced sequences, in order, for the rest of the run.
//!
//! ## Validation
//!
//! Construction rejects:
//! - an empty display name, or a repository name that is not a filesystem-
//!   and manifest-safe token,
//! - an inception year later than the current year,
//! - explicit coordinates that disagree about the same library, either by
//!   `group:artifact` or by the symbolic name they replace,
//! - documentation links that are not absolute http(s) URLs.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use chrono::Datelike;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, Exclusion, LibraryKey, Scope};
use crate::error::{Error, Result};
use crate::registry::RegistryEntry;

static REPOSITORY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid regex"));

/// Symbolic name of the annotation library added by `stagean_annotations`
pub const STAGEAN: &str = "stagean";

/// Project lifecycle stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Experimental,
    #[default]
    Stable,
    Deprecated,
}

impl Lifecycle {
    pub fn as_str(self) -> &'static str {
        match self {
            Lifecycle::Experimental => "experimental",
            Lifecycle::Stable => "stable",
            Lifecycle::Deprecated => "deprecated",
        }
    }
}

/// Who the project is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Repository name, also used as the artifact id
    pub repository: String,
    /// Human-readable name
    pub name: String,
    pub description: String,
    pub inception_year: i32,
    /// Group id for a freshly created manifest. Defaults to the repository name.
    pub group: Option<String>,
    pub homepage: Option<String>,
}

impl Identity {
    pub fn new(
        repository: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        inception_year: i32,
    ) -> Self {
        Self {
            repository: repository.into(),
            name: name.into(),
            description: description.into(),
            inception_year,
            group: None,
            homepage: None,
        }
    }

    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or(&self.repository)
    }
}

/// Ecosystem-specific switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggles {
    /// Java language level
    pub jdk_version: u32,
    /// Whether generated API documentation is published
    pub has_javadoc: bool,
    /// Prepend the stagean annotation library to the dependencies
    pub stagean_annotations: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            jdk_version: 17,
            has_javadoc: true,
            stagean_annotations: false,
        }
    }
}

/// One requested dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyRequest {
    /// Resolved through the coordinate registry
    Symbolic { name: String, note: Option<String> },
    /// Used verbatim. `replaces` names the symbolic library it stands in for.
    Explicit {
        coordinate: Coordinate,
        scope: Scope,
        exclusions: Vec<Exclusion>,
        replaces: Option<String>,
        note: Option<String>,
    },
}

impl DependencyRequest {
    pub fn symbolic(name: impl Into<String>) -> Self {
        DependencyRequest::Symbolic {
            name: name.into(),
            note: None,
        }
    }

    pub fn explicit(coordinate: Coordinate) -> Self {
        DependencyRequest::Explicit {
            coordinate,
            scope: Scope::default(),
            exclusions: Vec::new(),
            replaces: None,
            note: None,
        }
    }

    /// Parse the string shorthand.
    ///
    /// `explicit:g:a:v` and anything containing `:` is an explicit coordinate;
    /// everything else is a symbolic name.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if let Some(rest) = input.strip_prefix("explicit:") {
            return Ok(Self::explicit(rest.parse()?));
        }
        if input.contains(':') {
            return Ok(Self::explicit(input.parse()?));
        }
        Ok(Self::symbolic(input))
    }

    /// Mark an explicit request as standing in for a symbolic name.
    pub fn replacing(mut self, name: impl Into<String>) -> Self {
        if let DependencyRequest::Explicit { replaces, .. } = &mut self {
            *replaces = Some(name.into());
        }
        self
    }

    /// Attach a free-text note explaining the request.
    pub fn with_note(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            DependencyRequest::Symbolic { note, .. } | DependencyRequest::Explicit { note, .. } => {
                *note = Some(text.into())
            }
        }
        self
    }

    pub fn with_scope(mut self, value: Scope) -> Self {
        if let DependencyRequest::Explicit { scope, .. } = &mut self {
            *scope = value;
        }
        self
    }

    pub fn note(&self) -> Option<&str> {
        match self {
            DependencyRequest::Symbolic { note, .. } | DependencyRequest::Explicit { note, .. } => {
                note.as_deref()
            }
        }
    }

    fn is_symbolic(&self, symbol: &str) -> bool {
        matches!(self, DependencyRequest::Symbolic { name, .. } if name == symbol)
    }
}

/// Strategy interface supplying each aspect of a descriptor.
///
/// `dependencies` and `doc_links` are queried exactly once per descriptor.
pub trait ProjectSource {
    fn identity(&self) -> Identity;

    fn lifecycle(&self) -> Lifecycle {
        Lifecycle::default()
    }

    fn toggles(&self) -> Toggles {
        Toggles::default()
    }

    fn dependencies(&self) -> Vec<DependencyRequest>;

    fn doc_links(&self) -> Vec<String> {
        Vec::new()
    }

    /// Project-specific registry entries layered over the catalog
    fn overrides(&self) -> Vec<RegistryEntry> {
        Vec::new()
    }
}

type Generator<T> = Box<dyn Fn() -> Vec<T>>;

/// A [`ProjectSource`] whose sequences come from closures
pub struct ClosureSource {
    identity: Identity,
    lifecycle: Lifecycle,
    toggles: Toggles,
    dependencies: Generator<DependencyRequest>,
    doc_links: Generator<String>,
    overrides: Vec<RegistryEntry>,
}

impl ClosureSource {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            lifecycle: Lifecycle::default(),
            toggles: Toggles::default(),
            dependencies: Box::new(Vec::new),
            doc_links: Box::new(Vec::new),
            overrides: Vec::new(),
        }
    }

    pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn toggles(mut self, toggles: Toggles) -> Self {
        self.toggles = toggles;
        self
    }

    pub fn dependencies<F>(mut self, generator: F) -> Self
    where
        F: Fn() -> Vec<DependencyRequest> + 'static,
    {
        self.dependencies = Box::new(generator);
        self
    }

    pub fn doc_links<F>(mut self, generator: F) -> Self
    where
        F: Fn() -> Vec<String> + 'static,
    {
        self.doc_links = Box::new(generator);
        self
    }

    pub fn override_entry(mut self, entry: RegistryEntry) -> Self {
        self.overrides.push(entry);
        self
    }
}

impl ProjectSource for ClosureSource {
    fn identity(&self) -> Identity {
        self.identity.clone()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn toggles(&self) -> Toggles {
        self.toggles
    }

    fn dependencies(&self) -> Vec<DependencyRequest> {
        (self.dependencies)()
    }

    fn doc_links(&self) -> Vec<String> {
        (self.doc_links)()
    }

    fn overrides(&self) -> Vec<RegistryEntry> {
        self.overrides.clone()
    }
}

/// Validated, immutable project descriptor
#[derive(Debug, Clone)]
pub struct Descriptor {
    identity: Identity,
    lifecycle: Lifecycle,
    toggles: Toggles,
    dependencies: Vec<DependencyRequest>,
    doc_links: Vec<String>,
    overrides: Vec<RegistryEntry>,
}

impl Descriptor {
    /// Build a descriptor, validating against the current calendar year.
    pub fn new<S: ProjectSource + ?Sized>(source: &S) -> Result<Self> {
        Self::from_source(source, chrono::Local::now().year())
    }

    /// Build a descriptor, validating against `current_year`.
    pub fn from_source<S: ProjectSource + ?Sized>(source: &S, current_year: i32) -> Result<Self> {
        let identity = source.identity();
        validate_identity(&identity, current_year)?;

        let toggles = source.toggles();
        let mut dependencies = source.dependencies();
        if toggles.stagean_annotations && !dependencies.iter().any(|d| d.is_symbolic(STAGEAN)) {
            dependencies.insert(0, DependencyRequest::symbolic(STAGEAN));
        }
        validate_dependencies(&dependencies)?;

        let doc_links = source.doc_links();
        validate_doc_links(&doc_links)?;

        let overrides = source.overrides();
        for (index, entry) in overrides.iter().enumerate() {
            entry.validate().map_err(|message| {
                Error::descriptor(format!("overrides[{index}]"), message)
            })?;
        }

        debug!(
            "Descriptor '{}': {} dependency requests, {} doc links, {} overrides",
            identity.repository,
            dependencies.len(),
            doc_links.len(),
            overrides.len()
        );

        Ok(Self {
            identity,
            lifecycle: source.lifecycle(),
            toggles,
            dependencies,
            doc_links,
            overrides,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn toggles(&self) -> &Toggles {
        &self.toggles
    }

    /// Dependency requests in declaration order
    pub fn dependencies(&self) -> &[DependencyRequest] {
        &self.dependencies
    }

    /// Documentation links in declaration order
    pub fn doc_links(&self) -> &[String] {
        &self.doc_links
    }

    pub fn overrides(&self) -> &[RegistryEntry] {
        &self.overrides
    }
}

fn validate_identity(identity: &Identity, current_year: i32) -> Result<()> {
    if identity.repository.trim().is_empty() {
        return Err(Error::descriptor("repository", "must not be empty"));
    }
    if !REPOSITORY_NAME.is_match(&identity.repository) {
        return Err(Error::descriptor(
            "repository",
            format!(
                "'{}' must start with a letter or digit and contain only letters, digits, '.', '_' or '-'",
                identity.repository
            ),
        ));
    }
    if identity.name.trim().is_empty() {
        return Err(Error::descriptor("name", "must not be empty"));
    }
    if identity.inception_year > current_year {
        return Err(Error::descriptor(
            "inception_year",
            format!(
                "{} is later than the current year {}",
                identity.inception_year, current_year
            ),
        ));
    }
    if let Some(group) = &identity.group {
        if group.trim().is_empty() || group.contains(':') || group.contains(char::is_whitespace) {
            return Err(Error::descriptor(
                "group",
                format!("'{group}' is not a valid group id"),
            ));
        }
    }
    Ok(())
}

/// What an explicit request puts into the manifest. Two requests for one
/// library must agree on all of it.
#[derive(PartialEq)]
struct ExplicitShape<'a> {
    coordinate: &'a Coordinate,
    scope: Scope,
    exclusions: BTreeSet<&'a Exclusion>,
}

impl fmt::Display for ExplicitShape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} scope", self.coordinate, self.scope.as_str())?;
        if !self.exclusions.is_empty() {
            let excluded: Vec<String> = self.exclusions.iter().map(|e| e.to_string()).collect();
            write!(f, ", excluding {}", excluded.join(", "))?;
        }
        write!(f, ")")
    }
}

fn validate_dependencies(requests: &[DependencyRequest]) -> Result<()> {
    let mut by_library: BTreeMap<LibraryKey, ExplicitShape<'_>> = BTreeMap::new();
    let mut by_symbol: BTreeMap<&str, &Coordinate> = BTreeMap::new();

    for (index, request) in requests.iter().enumerate() {
        match request {
            DependencyRequest::Symbolic { name, .. } => {
                if name.trim().is_empty() || name.contains(char::is_whitespace) {
                    return Err(Error::descriptor(
                        format!("dependencies[{index}]"),
                        format!("'{name}' is not a valid symbolic name"),
                    ));
                }
            }
            DependencyRequest::Explicit {
                coordinate,
                scope,
                exclusions,
                replaces,
                ..
            } => {
                let shape = ExplicitShape {
                    coordinate,
                    scope: *scope,
                    exclusions: exclusions.iter().collect(),
                };
                let library = coordinate.library();
                match by_library.get(&library) {
                    Some(previous) if *previous != shape => {
                        return Err(Error::descriptor(
                            format!("dependencies[{index}]"),
                            format!(
                                "conflicting explicit requests for {library}: {previous} and {shape}"
                            ),
                        ));
                    }
                    Some(_) => {}
                    None => {
                        by_library.insert(library, shape);
                    }
                }
                if let Some(symbol) = replaces {
                    if let Some(previous) = by_symbol.insert(symbol.as_str(), coordinate) {
                        if previous != coordinate {
                            return Err(Error::descriptor(
                                format!("dependencies[{index}]"),
                                format!(
                                    "conflicting explicit coordinates replacing '{symbol}': {previous} and {coordinate}"
                                ),
                            ));
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn validate_doc_links(links: &[String]) -> Result<()> {
    for (index, link) in links.iter().enumerate() {
        let field = format!("doc_links[{index}]");
        let parsed = url::Url::parse(link)
            .map_err(|e| Error::descriptor(field.clone(), format!("'{link}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::descriptor(
                field,
                format!("'{link}' must be an http or https URL"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn identity() -> Identity {
        Identity::new(
            "pmsite",
            "PMSite",
            "Simplistic application framework built on top of PushMode HTML streaming library.",
            2017,
        )
    }

    fn source() -> ClosureSource {
        ClosureSource::new(identity())
    }

    #[test]
    fn test_builds_valid_descriptor() {
        let source = source()
            .dependencies(|| {
                vec![
                    DependencyRequest::symbolic("guava"),
                    DependencyRequest::parse("explicit:org.acme:foo:1.2").unwrap(),
                ]
            })
            .doc_links(|| vec!["https://noexception.machinezoo.com/javadoc/".to_string()]);
        let descriptor = Descriptor::from_source(&source, 2024).unwrap();
        assert_eq!(descriptor.identity().repository, "pmsite");
        assert_eq!(descriptor.identity().group(), "pmsite");
        assert_eq!(descriptor.dependencies().len(), 2);
        assert_eq!(descriptor.doc_links().len(), 1);
        assert_eq!(descriptor.lifecycle(), Lifecycle::Stable);
    }

    #[test]
    fn test_generators_invoked_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let source = source().dependencies(move || {
            counter.set(counter.get() + 1);
            vec![DependencyRequest::symbolic("guava")]
        });
        let descriptor = Descriptor::from_source(&source, 2024).unwrap();
        for _ in 0..3 {
            assert_eq!(descriptor.dependencies().len(), 1);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_preserves_declaration_order() {
        let source = source().dependencies(|| {
            vec![
                DependencyRequest::symbolic("streamex"),
                DependencyRequest::symbolic("guava"),
                DependencyRequest::symbolic("commons-lang"),
            ]
        });
        let descriptor = Descriptor::from_source(&source, 2024).unwrap();
        let names: Vec<_> = descriptor
            .dependencies()
            .iter()
            .map(|d| match d {
                DependencyRequest::Symbolic { name, .. } => name.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(names, vec!["streamex", "guava", "commons-lang"]);
    }

    #[test]
    fn test_rejects_empty_repository() {
        let mut id = identity();
        id.repository = "".to_string();
        let err = Descriptor::from_source(&ClosureSource::new(id), 2024).unwrap_err();
        assert!(matches!(err, Error::DescriptorValidation { ref field, .. } if field == "repository"));
    }

    #[test]
    fn test_rejects_unsafe_repository() {
        for bad in ["pm site", "../pmsite", "pm/site", "-pmsite", "pm<site>"] {
            let mut id = identity();
            id.repository = bad.to_string();
            let err = Descriptor::from_source(&ClosureSource::new(id), 2024).unwrap_err();
            assert!(
                err.to_string().contains("repository"),
                "expected repository error for {bad:?}, got {err}"
            );
        }
    }

    #[test]
    fn test_rejects_future_inception_year() {
        let mut id = identity();
        id.inception_year = 2025;
        let err = Descriptor::from_source(&ClosureSource::new(id), 2024).unwrap_err();
        assert!(err.to_string().contains("inception_year"));
        assert!(err.to_string().contains("2025"));
    }

    #[test]
    fn test_accepts_current_inception_year() {
        let mut id = identity();
        id.inception_year = 2024;
        assert!(Descriptor::from_source(&ClosureSource::new(id), 2024).is_ok());
    }

    #[test]
    fn test_rejects_conflicting_explicit_coordinates() {
        let source = source().dependencies(|| {
            vec![
                DependencyRequest::parse("org.acme:foo:1.2").unwrap(),
                DependencyRequest::parse("org.acme:foo:1.3").unwrap(),
            ]
        });
        let err = Descriptor::from_source(&source, 2024).unwrap_err();
        assert!(err.to_string().contains("dependencies[1]"));
        assert!(err.to_string().contains("org.acme:foo:1.2"));
        assert!(err.to_string().contains("org.acme:foo:1.3"));
    }

    #[test]
    fn test_rejects_same_coordinate_with_different_scope() {
        let source = source().dependencies(|| {
            vec![
                DependencyRequest::parse("org.acme:foo:1.2").unwrap(),
                DependencyRequest::parse("org.acme:foo:1.2")
                    .unwrap()
                    .with_scope(Scope::Test),
            ]
        });
        let err = Descriptor::from_source(&source, 2024).unwrap_err();
        assert!(err.to_string().contains("dependencies[1]"));
        assert!(err.to_string().contains("compile scope"));
        assert!(err.to_string().contains("test scope"));

        // Reversed order fails the same way instead of picking a winner.
        let reversed = self::source().dependencies(|| {
            vec![
                DependencyRequest::parse("org.acme:foo:1.2")
                    .unwrap()
                    .with_scope(Scope::Test),
                DependencyRequest::parse("org.acme:foo:1.2").unwrap(),
            ]
        });
        assert!(Descriptor::from_source(&reversed, 2024).is_err());
    }

    #[test]
    fn test_rejects_same_coordinate_with_different_exclusions() {
        let coordinate = Coordinate::new("org.acme", "foo", "1.2");
        let source = source().dependencies(move || {
            vec![
                DependencyRequest::explicit(coordinate.clone()),
                DependencyRequest::Explicit {
                    coordinate: coordinate.clone(),
                    scope: Scope::Compile,
                    exclusions: vec!["org.slf4j:slf4j-api".parse().unwrap()],
                    replaces: None,
                    note: None,
                },
            ]
        });
        let err = Descriptor::from_source(&source, 2024).unwrap_err();
        assert!(err.to_string().contains("excluding org.slf4j:slf4j-api"));
    }

    #[test]
    fn test_identical_explicit_requests_are_accepted() {
        let exclusions = || -> Vec<Exclusion> {
            vec!["b:y".parse().unwrap(), "a:x".parse().unwrap()]
        };
        let source = source().dependencies(move || {
            let request = |exclusions: Vec<Exclusion>| DependencyRequest::Explicit {
                coordinate: Coordinate::new("org.acme", "foo", "1.2"),
                scope: Scope::Test,
                exclusions,
                replaces: None,
                note: None,
            };
            let mut reordered = exclusions();
            reordered.reverse();
            vec![request(exclusions()), request(reordered)]
        });
        assert!(Descriptor::from_source(&source, 2024).is_ok());
    }

    #[test]
    fn test_rejects_conflicting_replacements() {
        let source = source().dependencies(|| {
            vec![
                DependencyRequest::parse("org.slf4j:slf4j-api:1.7.36")
                    .unwrap()
                    .replacing("slf4j"),
                DependencyRequest::parse("org.slf4j:slf4j-simple:1.7.36")
                    .unwrap()
                    .replacing("slf4j"),
            ]
        });
        let err = Descriptor::from_source(&source, 2024).unwrap_err();
        assert!(err.to_string().contains("replacing 'slf4j'"));
    }

    #[test]
    fn test_allows_identical_duplicates() {
        let source = source().dependencies(|| {
            vec![
                DependencyRequest::symbolic("guava"),
                DependencyRequest::symbolic("guava"),
                DependencyRequest::parse("org.acme:foo:1.2").unwrap(),
                DependencyRequest::parse("org.acme:foo:1.2").unwrap(),
            ]
        });
        assert!(Descriptor::from_source(&source, 2024).is_ok());
    }

    #[test]
    fn test_stagean_prepended_once() {
        let toggles = Toggles {
            stagean_annotations: true,
            ..Toggles::default()
        };
        let source = source()
            .toggles(toggles)
            .dependencies(|| vec![DependencyRequest::symbolic("guava")]);
        let descriptor = Descriptor::from_source(&source, 2024).unwrap();
        assert_eq!(descriptor.dependencies()[0], DependencyRequest::symbolic(STAGEAN));
        assert_eq!(descriptor.dependencies().len(), 2);

        let source = ClosureSource::new(identity())
            .toggles(toggles)
            .dependencies(|| vec![DependencyRequest::symbolic(STAGEAN)]);
        let descriptor = Descriptor::from_source(&source, 2024).unwrap();
        assert_eq!(descriptor.dependencies().len(), 1);
    }

    #[test]
    fn test_rejects_bad_doc_link() {
        let source = source().doc_links(|| {
            vec![
                "https://pushmode.machinezoo.com/javadoc/".to_string(),
                "not a url".to_string(),
            ]
        });
        let err = Descriptor::from_source(&source, 2024).unwrap_err();
        assert!(err.to_string().contains("doc_links[1]"));

        let source = ClosureSource::new(identity())
            .doc_links(|| vec!["ftp://example.com/docs".to_string()]);
        assert!(Descriptor::from_source(&source, 2024).is_err());
    }

    #[test]
    fn test_parse_request_shorthand() {
        assert_eq!(
            DependencyRequest::parse("guava").unwrap(),
            DependencyRequest::symbolic("guava")
        );
        assert_eq!(
            DependencyRequest::parse("explicit:org.acme:foo:1.2").unwrap(),
            DependencyRequest::explicit(Coordinate::new("org.acme", "foo", "1.2"))
        );
        assert_eq!(
            DependencyRequest::parse("net.mikehardy:google-analytics-java:2.0.11").unwrap(),
            DependencyRequest::explicit(Coordinate::new(
                "net.mikehardy",
                "google-analytics-java",
                "2.0.11"
            ))
        );
        assert!(DependencyRequest::parse("explicit:org.acme").is_err());
    }

    #[test]
    fn test_notes_are_carried_but_not_interpreted() {
        let request = DependencyRequest::symbolic("slf4j")
            .with_note("Insist on older SLF4J. Otherwise jetty would pull in 2.0 version.");
        assert!(request.note().unwrap().contains("older SLF4J"));
    }
}
