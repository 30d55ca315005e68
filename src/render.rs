//! # Artifact Renderer
//!
//! Turns a [`Descriptor`] plus [`Registry`] into the text of every artifact
//! kind for a [`Target`].
//!
//! ## Resolution Rules
//!
//! 1.  Explicit coordinates are taken verbatim and always win over registry
//!     defaults for the same library (`group:artifact`).
//! 2.  A symbolic request named by an explicit request's `replaces` is not
//!     looked up at all.
//! 3.  Every other symbolic request must resolve in the registry. The first
//!     one that does not aborts rendering with
//!     [`Error::UnresolvedDependency`].
//! 4.  The result is de-duplicated by library and sorted by group, then
//!     artifact.
//!
//! Documentation links keep descriptor order, since javadoc gives earlier
//! links priority when resolving cross references. Repeated links are dropped.
//!
//! Rendering is pure. The same descriptor and registry always produce
//! byte-identical text, which is what makes the writer's change detection
//! meaningful.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::{debug, warn};

use crate::coordinate::LibraryKey;
use crate::descriptor::{DependencyRequest, Descriptor};
use crate::error::Result;
use crate::registry::Registry;
use crate::target::{ArtifactKind, Resolution, ResolvedDependency, Target};

/// Rendered text per artifact kind
pub type Rendered = BTreeMap<ArtifactKind, String>;

/// Resolve every dependency request to a concrete, sorted dependency set.
pub fn resolve_dependencies(
    descriptor: &Descriptor,
    registry: &Registry,
) -> Result<Vec<ResolvedDependency>> {
    let mut resolved: BTreeMap<LibraryKey, ResolvedDependency> = BTreeMap::new();
    let mut replaced: BTreeSet<&str> = BTreeSet::new();

    for request in descriptor.dependencies() {
        if let DependencyRequest::Explicit {
            coordinate,
            scope,
            exclusions,
            replaces,
            ..
        } = request
        {
            if let Some(symbol) = replaces {
                replaced.insert(symbol.as_str());
            }
            resolved.insert(
                coordinate.library(),
                ResolvedDependency {
                    coordinate: coordinate.clone(),
                    scope: *scope,
                    exclusions: normalize(exclusions.iter().cloned()),
                    resolution: Resolution::Explicit,
                },
            );
        }
    }

    for request in descriptor.dependencies() {
        let DependencyRequest::Symbolic { name, .. } = request else {
            continue;
        };
        if replaced.contains(name.as_str()) {
            debug!("'{}' is replaced by an explicit coordinate", name);
            continue;
        }

        let entry = registry.resolve(name)?;
        let coordinate = entry.coordinate();
        let key = coordinate.library();

        match resolved.get(&key) {
            Some(existing) if existing.resolution == Resolution::Explicit => {
                if existing.coordinate != coordinate {
                    debug!(
                        "Explicit {} takes precedence over registry {} for '{}'",
                        existing.coordinate, coordinate, name
                    );
                }
            }
            Some(existing) => {
                if existing.coordinate != coordinate {
                    warn!(
                        "'{}' resolves to {} but {} is already selected for {}",
                        name, coordinate, existing.coordinate, key
                    );
                }
            }
            None => {
                resolved.insert(
                    key,
                    ResolvedDependency {
                        coordinate,
                        scope: entry.scope,
                        exclusions: normalize(entry.exclusions.iter().cloned()),
                        resolution: Resolution::Registry(name.clone()),
                    },
                );
            }
        }
    }

    Ok(resolved.into_values().collect())
}

fn normalize<T: Ord>(items: impl Iterator<Item = T>) -> Vec<T> {
    items.collect::<BTreeSet<_>>().into_iter().collect()
}

/// Documentation links in descriptor order, without repeats.
pub fn doc_links(descriptor: &Descriptor) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for link in descriptor.doc_links() {
        if seen.insert(link.as_str()) {
            links.push(link.as_str());
        } else {
            warn!("Dropping repeated documentation link {}", link);
        }
    }
    links
}

/// Render every artifact kind.
///
/// Fails before producing any text if a dependency cannot be resolved, so
/// callers never see a partial manifest.
pub fn render(descriptor: &Descriptor, registry: &Registry, target: &dyn Target) -> Result<Rendered> {
    let dependencies = resolve_dependencies(descriptor, registry)?;
    let links = doc_links(descriptor);

    let mut rendered = Rendered::new();
    for kind in ArtifactKind::ALL {
        let text = match kind {
            ArtifactKind::Identity => target.render_identity(descriptor),
            ArtifactKind::Dependencies => target.render_dependencies(&dependencies),
            ArtifactKind::DocLinks => target.render_doc_links(&links),
        };
        rendered.insert(kind, text);
    }

    debug!(
        "Rendered {} dependencies and {} doc links for {}",
        dependencies.len(),
        links.len(),
        target.name()
    );
    Ok(rendered)
}
