// SPDX-License-Identifier: MPL-2.0

use proptest::collection::vec;
use proptest::prelude::*;

use pepgrub::error::ResolveError;
use pepgrub::range::Range;
use pepgrub::solver::{resolve, Dependencies, DependencyProvider, OfflineDependencyProvider};

/// This generates a random registry index.
/// Packages are numbers and each version of each package can only depend on
/// strictly larger numbers, so the index is acyclic and free of
/// self dependencies by construction. Dependency targets may still point at
/// packages with no version at all, exercising the no-versions path.
fn registry_strategy(
) -> impl Strategy<Value = OfflineDependencyProvider<u16, Range<u32>>> {
    let raw_dependency = (1..6u16, 0..4u32, 0..4u32);
    let raw_entry = ((0..6u16, 0..4u32), vec(raw_dependency, 0..3));
    vec(raw_entry, 1..30).prop_map(|entries| {
        let mut dependency_provider = OfflineDependencyProvider::new();
        for ((package, version), dependencies) in entries {
            dependency_provider.add_dependencies(
                package,
                version,
                dependencies.into_iter().map(|(offset, low, width)| {
                    (package + offset, Range::between(low, low + width + 1))
                }),
            );
        }
        dependency_provider
    })
}

proptest! {

    /// If a solution is found, every dependency range of every decided
    /// package at its decided version contains the decided version of
    /// its target package.
    #[test]
    fn solution_satisfies_every_dependency_range(
        dependency_provider in registry_strategy(),
    ) {
        let root = *dependency_provider.packages().min().unwrap();
        let root_version = *dependency_provider
            .versions(&root)
            .unwrap()
            .next()
            .unwrap();
        match resolve(&dependency_provider, root, root_version) {
            Ok(solution) => {
                prop_assert_eq!(solution.get(&root), Some(&root_version));
                for (package, version) in &solution {
                    let dependencies =
                        match dependency_provider.get_dependencies(package, version).unwrap() {
                            Dependencies::Unknown => {
                                return Err(TestCaseError::fail(format!(
                                    "decided {} {} without known dependencies",
                                    package, version
                                )))
                            }
                            Dependencies::Known(dependencies) => dependencies,
                        };
                    for (dep_package, range) in &dependencies {
                        let dep_version = solution.get(dep_package);
                        prop_assert!(
                            dep_version.map_or(false, |v| range.contains(v)),
                            "{} {} requires {} in {} but the solution has {:?}",
                            package, version, dep_package, range, dep_version
                        );
                    }
                }
            }
            Err(ResolveError::NoSolution(_)) => {}
            Err(err) => return Err(TestCaseError::fail(err.to_string())),
        }
    }

}
