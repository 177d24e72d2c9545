// SPDX-License-Identifier: MPL-2.0

use std::cell::Cell;
use std::error::Error;

use pepgrub::error::ResolveError;
use pepgrub::range::Range;
use pepgrub::solver::{resolve, Dependencies, DependencyProvider, OfflineDependencyProvider};
use pepgrub::version::Version;

type SemVS = Range<Version>;

fn v(version: &str) -> Version {
    version.parse().unwrap()
}

fn init_log() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn same_result_on_repeated_runs() {
    init_log();
    let mut dependency_provider = OfflineDependencyProvider::<_, SemVS>::new();

    dependency_provider.add_dependencies("c", v("0"), []);
    dependency_provider.add_dependencies("c", v("2"), []);
    dependency_provider.add_dependencies("b", v("0"), []);
    dependency_provider.add_dependencies("b", v("1"), [("c", Range::between(v("0"), v("1")))]);

    dependency_provider.add_dependencies(
        "a",
        v("0"),
        [("b", Range::full()), ("c", Range::full())],
    );

    let name = "a";
    let ver = v("0");
    let one = resolve(&dependency_provider, name, ver.clone());
    for _ in 0..10 {
        match (&one, &resolve(&dependency_provider, name, ver.clone())) {
            (Ok(l), Ok(r)) => assert_eq!(l, r),
            _ => panic!("not the same result"),
        }
    }
}

#[test]
fn should_always_find_a_satisfier() {
    init_log();
    let mut dependency_provider = OfflineDependencyProvider::<_, SemVS>::new();
    dependency_provider.add_dependencies("a", v("0"), [("b", Range::empty())]);
    assert!(matches!(
        resolve(&dependency_provider, "a", v("0")),
        Err(ResolveError::NoSolution { .. })
    ));

    dependency_provider.add_dependencies("c", v("0"), [("a", Range::full())]);
    assert!(matches!(
        resolve(&dependency_provider, "c", v("0")),
        Err(ResolveError::NoSolution { .. })
    ));
}

#[test]
fn cannot_depend_on_self() {
    init_log();
    let mut dependency_provider = OfflineDependencyProvider::<_, SemVS>::new();
    dependency_provider.add_dependencies("a", v("0"), [("a", Range::full())]);
    assert!(matches!(
        resolve(&dependency_provider, "a", v("0")),
        Err(ResolveError::SelfDependency { .. })
    ));
}

/// Wraps an [OfflineDependencyProvider] to stop the resolution
/// after a bounded number of `should_cancel` calls.
struct BoundedDependencyProvider {
    inner: OfflineDependencyProvider<&'static str, SemVS>,
    budget: u32,
    calls: Cell<u32>,
}

impl DependencyProvider<&'static str, SemVS> for BoundedDependencyProvider {
    fn available_versions(&self, package: &&'static str) -> Result<Vec<Version>, Box<dyn Error>> {
        self.inner.available_versions(package)
    }

    fn get_dependencies(
        &self,
        package: &&'static str,
        version: &Version,
    ) -> Result<Dependencies<&'static str, SemVS>, Box<dyn Error>> {
        self.inner.get_dependencies(package, version)
    }

    fn should_cancel(&self) -> Result<(), Box<dyn Error>> {
        let calls = self.calls.get() + 1;
        self.calls.set(calls);
        if calls > self.budget {
            Err("cancel budget exhausted".into())
        } else {
            Ok(())
        }
    }
}

#[test]
fn cancellation_stops_the_resolution() {
    init_log();
    let mut inner = OfflineDependencyProvider::<&str, SemVS>::new();
    inner.add_dependencies("a", v("0"), [("b", Range::full())]);
    inner.add_dependencies("b", v("0"), []);
    let dependency_provider = BoundedDependencyProvider {
        inner,
        budget: 1,
        calls: Cell::new(0),
    };
    assert!(matches!(
        resolve(&dependency_provider, "a", v("0")),
        Err(ResolveError::ErrorInShouldCancel(_))
    ));
}

#[test]
fn default_decision_policy_picks_fewest_matching_versions() {
    init_log();
    let mut inner = OfflineDependencyProvider::<&str, SemVS>::new();
    inner.add_dependencies("a", v("1"), []);
    inner.add_dependencies("a", v("2"), []);
    inner.add_dependencies("a", v("3"), []);
    inner.add_dependencies("b", v("1"), []);
    inner.add_dependencies("b", v("2"), []);
    let dependency_provider = BoundedDependencyProvider {
        inner,
        budget: u32::MAX,
        calls: Cell::new(0),
    };

    // "b" has fewer versions matching its constraint, so the trait-provided
    // strategy must pick it, at its newest matching version.
    let potential = vec![
        ("a", Range::full()),
        ("b", Range::strictly_lower_than(v("2"))),
    ];
    let (package, version) = dependency_provider
        .choose_package_version(potential.into_iter())
        .unwrap();
    assert_eq!(package, "b");
    assert_eq!(version, Some(v("1")));

    // Versions are listed newest first.
    let potential = vec![("a", Range::full())];
    let (package, version) = dependency_provider
        .choose_package_version(potential.into_iter())
        .unwrap();
    assert_eq!(package, "a");
    assert_eq!(version, Some(v("3")));
}

#[test]
fn solution_is_in_decision_order() {
    init_log();
    let mut dependency_provider = OfflineDependencyProvider::<_, SemVS>::new();
    dependency_provider.add_dependencies("root", v("1"), [("a", Range::full())]);
    dependency_provider.add_dependencies("a", v("1"), [("b", Range::full())]);
    dependency_provider.add_dependencies("b", v("1"), []);

    let solution = resolve(&dependency_provider, "root", v("1")).unwrap();

    // The chain forces one possible decision order,
    // which the output must follow.
    let packages: Vec<_> = solution.keys().copied().collect();
    assert_eq!(packages, ["root", "a", "b"]);
}

#[test]
fn depend_on_self_at_the_same_version() {
    init_log();
    // A self dependency is an error even when the range contains
    // the version being solved.
    let mut dependency_provider = OfflineDependencyProvider::<_, SemVS>::new();
    dependency_provider.add_dependencies("a", v("1.0"), [("a", Range::singleton(v("1.0")))]);
    assert!(matches!(
        resolve(&dependency_provider, "a", v("1.0")),
        Err(ResolveError::SelfDependency { .. })
    ));
}
