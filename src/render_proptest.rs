//! Property-based tests for dependency resolution and rendering.
//!
//! Rendering must not depend on the order requests are declared in, as long
//! as no two requests disagree about the same library.

#[cfg(test)]
mod proptest_tests {
    use crate::coordinate::Coordinate;
    use crate::descriptor::{ClosureSource, DependencyRequest, Descriptor, Identity};
    use crate::registry::{Registry, RegistryEntry};
    use crate::render::{render, resolve_dependencies};
    use crate::target::{Gradle, Maven};
    use proptest::prelude::*;

    const NAMES: [&str; 8] = [
        "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel",
    ];

    fn registry() -> Registry {
        let mut registry = Registry::new();
        for (index, name) in NAMES.iter().enumerate() {
            // Spread entries over two groups so sorting crosses groups
            let group = if index % 2 == 0 { "org.even" } else { "com.odd" };
            registry.insert(RegistryEntry::new(
                *name,
                Coordinate::new(group, *name, format!("1.{index}")),
            ));
        }
        registry
    }

    fn descriptor(requests: Vec<DependencyRequest>) -> Descriptor {
        let source = ClosureSource::new(Identity::new("demo", "Demo", "", 2020))
            .dependencies(move || requests.clone());
        Descriptor::from_source(&source, 2024).unwrap()
    }

    /// Distinct symbolic names plus explicit coordinates, in random order
    fn requests() -> impl Strategy<Value = Vec<DependencyRequest>> {
        (
            proptest::sample::subsequence(NAMES.to_vec(), 0..=NAMES.len()),
            proptest::collection::btree_set("[a-z]{1,6}", 0..4),
        )
            .prop_map(|(names, artifacts)| {
                let mut requests: Vec<DependencyRequest> =
                    names.into_iter().map(DependencyRequest::symbolic).collect();
                requests.extend(artifacts.into_iter().map(|artifact| {
                    DependencyRequest::explicit(Coordinate::new("net.explicit", artifact, "9.9"))
                }));
                requests
            })
            .prop_flat_map(|requests| Just(requests).prop_shuffle())
    }

    proptest! {
        /// Property: resolution order does not depend on declaration order
        #[test]
        fn resolution_ignores_request_order(requests in requests()) {
            let registry = registry();
            let mut reversed = requests.clone();
            reversed.reverse();

            let forward = resolve_dependencies(&descriptor(requests), &registry).unwrap();
            let backward = resolve_dependencies(&descriptor(reversed), &registry).unwrap();
            prop_assert_eq!(forward, backward);
        }

        /// Property: resolved dependencies are sorted by group then artifact
        #[test]
        fn resolution_is_sorted(requests in requests()) {
            let resolved = resolve_dependencies(&descriptor(requests), &registry()).unwrap();
            let keys: Vec<_> = resolved.iter().map(|d| d.coordinate.library()).collect();
            let mut sorted = keys.clone();
            sorted.sort();
            prop_assert_eq!(keys, sorted);
        }

        /// Property: rendering twice yields byte-identical text
        #[test]
        fn render_is_deterministic(requests in requests()) {
            let registry = registry();
            let descriptor = descriptor(requests);
            prop_assert_eq!(
                render(&descriptor, &registry, &Maven).unwrap(),
                render(&descriptor, &registry, &Maven).unwrap()
            );
            prop_assert_eq!(
                render(&descriptor, &registry, &Gradle).unwrap(),
                render(&descriptor, &registry, &Gradle).unwrap()
            );
        }
    }
}
