// SPDX-License-Identifier: MPL-2.0

use pepgrub::range::Range;
use pepgrub::solver::{resolve, OfflineDependencyProvider};
use pepgrub::specifier::Specifiers;
use pepgrub::type_aliases::SelectedDependencies;
use pepgrub::version::Version;

type SemVS = Range<Version>;

/// helper to create versions.
fn v(version: &str) -> Version {
    version.parse().unwrap()
}

/// helper to create ranges from specifier lists.
fn range(specifiers: &str) -> SemVS {
    specifiers.parse::<Specifiers>().unwrap().to_range()
}

#[test]
/// https://github.com/dart-lang/pub/blob/master/doc/solver.md#no-conflicts
fn no_conflict() {
    let mut dependency_provider = OfflineDependencyProvider::<&str, SemVS>::new();
    #[rustfmt::skip]
    dependency_provider.add_dependencies(
        "root", v("1.0.0"),
        vec![("foo", range(">=1.0.0, <2.0.0"))],
    );
    #[rustfmt::skip]
    dependency_provider.add_dependencies(
        "foo", v("1.0.0"),
        vec![("bar", range(">=1.0.0, <2.0.0"))],
    );
    dependency_provider.add_dependencies("bar", v("1.0.0"), vec![]);
    dependency_provider.add_dependencies("bar", v("2.0.0"), vec![]);

    // Run the algorithm.
    let computed_solution = resolve(&dependency_provider, "root", v("1.0.0")).unwrap();

    // Solution.
    let mut expected_solution = SelectedDependencies::default();
    expected_solution.insert("root", v("1.0.0"));
    expected_solution.insert("foo", v("1.0.0"));
    expected_solution.insert("bar", v("1.0.0"));

    // Comparing the true solution with the one computed by the algorithm.
    assert_eq!(expected_solution, computed_solution);
}

#[test]
/// https://github.com/dart-lang/pub/blob/master/doc/solver.md#avoiding-conflict-during-decision-making
fn avoiding_conflict_during_decision_making() {
    let mut dependency_provider = OfflineDependencyProvider::<&str, SemVS>::new();
    #[rustfmt::skip]
    dependency_provider.add_dependencies(
        "root", v("1.0.0"),
        vec![
            ("foo", range(">=1.0.0, <2.0.0")),
            ("bar", range(">=1.0.0, <2.0.0")),
        ],
    );
    #[rustfmt::skip]
    dependency_provider.add_dependencies(
        "foo", v("1.1.0"),
        vec![("bar", range(">=2.0.0, <3.0.0"))],
    );
    dependency_provider.add_dependencies("foo", v("1.0.0"), vec![]);
    dependency_provider.add_dependencies("bar", v("1.0.0"), vec![]);
    dependency_provider.add_dependencies("bar", v("1.1.0"), vec![]);
    dependency_provider.add_dependencies("bar", v("2.0.0"), vec![]);

    // Run the algorithm.
    let computed_solution = resolve(&dependency_provider, "root", v("1.0.0")).unwrap();

    // Solution.
    let mut expected_solution = SelectedDependencies::default();
    expected_solution.insert("root", v("1.0.0"));
    expected_solution.insert("foo", v("1.0.0"));
    expected_solution.insert("bar", v("1.1.0"));

    // Comparing the true solution with the one computed by the algorithm.
    assert_eq!(expected_solution, computed_solution);
}

#[test]
/// https://github.com/dart-lang/pub/blob/master/doc/solver.md#performing-conflict-resolution
fn conflict_resolution() {
    let mut dependency_provider = OfflineDependencyProvider::<&str, SemVS>::new();
    #[rustfmt::skip]
    dependency_provider.add_dependencies(
        "root", v("1.0.0"),
        vec![("foo", range(">=1.0.0"))],
    );
    #[rustfmt::skip]
    dependency_provider.add_dependencies(
        "foo", v("2.0.0"),
        vec![("bar", range(">=1.0.0, <2.0.0"))],
    );
    dependency_provider.add_dependencies("foo", v("1.0.0"), vec![]);
    #[rustfmt::skip]
    dependency_provider.add_dependencies(
        "bar", v("1.0.0"),
        vec![("foo", range(">=1.0.0, <2.0.0"))],
    );

    // Run the algorithm.
    let computed_solution = resolve(&dependency_provider, "root", v("1.0.0")).unwrap();

    // Solution.
    let mut expected_solution = SelectedDependencies::default();
    expected_solution.insert("root", v("1.0.0"));
    expected_solution.insert("foo", v("1.0.0"));

    // Comparing the true solution with the one computed by the algorithm.
    assert_eq!(expected_solution, computed_solution);
}

#[test]
/// https://github.com/dart-lang/pub/blob/master/doc/solver.md#conflict-resolution-with-a-partial-satisfier
fn conflict_with_partial_satisfier() {
    let mut dependency_provider = OfflineDependencyProvider::<&str, SemVS>::new();
    #[rustfmt::skip]
    // root 1.0.0 depends on foo ^1.0.0 and target ^2.0.0
    dependency_provider.add_dependencies(
        "root", v("1.0.0"),
        vec![
            ("foo", range(">=1.0.0, <2.0.0")),
            ("target", range(">=2.0.0, <3.0.0")),
        ],
    );
    #[rustfmt::skip]
    // foo 1.1.0 depends on left ^1.0.0 and right ^1.0.0
    dependency_provider.add_dependencies(
        "foo", v("1.1.0"),
        vec![
            ("left", range(">=1.0.0, <2.0.0")),
            ("right", range(">=1.0.0, <2.0.0")),
        ],
    );
    dependency_provider.add_dependencies("foo", v("1.0.0"), vec![]);
    #[rustfmt::skip]
    // left 1.0.0 depends on shared >=1.0.0
    dependency_provider.add_dependencies(
        "left", v("1.0.0"),
        vec![("shared", range(">=1.0.0"))],
    );
    #[rustfmt::skip]
    // right 1.0.0 depends on shared <2.0.0
    dependency_provider.add_dependencies(
        "right", v("1.0.0"),
        vec![("shared", range("<2.0.0"))],
    );
    dependency_provider.add_dependencies("shared", v("2.0.0"), vec![]);
    #[rustfmt::skip]
    // shared 1.0.0 depends on target ^1.0.0
    dependency_provider.add_dependencies(
        "shared", v("1.0.0"),
        vec![("target", range(">=1.0.0, <2.0.0"))],
    );
    dependency_provider.add_dependencies("target", v("2.0.0"), vec![]);
    dependency_provider.add_dependencies("target", v("1.0.0"), vec![]);

    // Run the algorithm.
    let computed_solution = resolve(&dependency_provider, "root", v("1.0.0")).unwrap();

    // Solution.
    let mut expected_solution = SelectedDependencies::default();
    expected_solution.insert("root", v("1.0.0"));
    expected_solution.insert("foo", v("1.0.0"));
    expected_solution.insert("target", v("2.0.0"));

    // Comparing the true solution with the one computed by the algorithm.
    assert_eq!(expected_solution, computed_solution);
}

#[test]
/// Pre-release and post-release versions follow PEP 440 ordering
/// during decision making: a newest-first provider prefers
/// 1.1.0.post1 over 1.1.0, which itself wins over 1.1.0rc1.
fn postreleases_in_decision_making() {
    let mut dependency_provider = OfflineDependencyProvider::<&str, SemVS>::new();
    #[rustfmt::skip]
    dependency_provider.add_dependencies(
        "root", v("1.0.0"),
        vec![("foo", range(">=1.0.0, <2.0.0"))],
    );
    dependency_provider.add_dependencies("foo", v("1.1.0rc1"), vec![]);
    dependency_provider.add_dependencies("foo", v("1.1.0"), vec![]);
    dependency_provider.add_dependencies("foo", v("1.1.0.post1"), vec![]);
    dependency_provider.add_dependencies("foo", v("2.0.0"), vec![]);

    let computed_solution = resolve(&dependency_provider, "root", v("1.0.0")).unwrap();

    let mut expected_solution = SelectedDependencies::default();
    expected_solution.insert("root", v("1.0.0"));
    expected_solution.insert("foo", v("1.1.0.post1"));

    assert_eq!(expected_solution, computed_solution);
}
