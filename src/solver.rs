// SPDX-License-Identifier: MPL-2.0

//! PubGrub version solving algorithm.
//!
//! It consists in efficiently finding a set of packages and versions
//! that satisfy all the constraints of a given project dependencies.
//! In addition, when that is not possible,
//! PubGrub tries to provide a very human-readable and clear
//! explanation as to why that failed.
//!
//! The algorithm is generic and works for any type of dependency system
//! as long as packages (P) and version sets (VS) implement
//! the [Package](crate::package::Package) and
//! [VersionSet](crate::version_set::VersionSet) traits.
//! [Package](crate::package::Package) is strictly equivalent and automatically generated
//! for any type that implement [Clone] + [Eq] + [Hash] + [Debug](std::fmt::Debug)
//! + [Display](std::fmt::Display).
//! [VersionSet](crate::version_set::VersionSet) describes sets of versions,
//! and [Range](crate::range::Range) provides an implementation of it
//! for any ordered version type, such as [Version](crate::version::Version).
//!
//! ## API
//!
//! ```
//! # use pepgrub::error::ResolveError;
//! # use pepgrub::range::Range;
//! # use pepgrub::solver::{resolve, OfflineDependencyProvider};
//! # use pepgrub::version::Version;
//! #
//! # fn try_main() -> Result<(), ResolveError<&'static str, Range<Version>>> {
//! #     let dependency_provider = OfflineDependencyProvider::<&str, Range<Version>>::new();
//! #     let package = "root";
//! #     let version = Version::from_release([1]);
//! let solution = resolve(&dependency_provider, package, version)?;
//! #     Ok(())
//! # }
//! # fn main() {
//! #     assert!(matches!(try_main(), Err(ResolveError::NoSolution(_))));
//! # }
//! ```
//!
//! Where `dependency_provider` supplies the list of available packages and versions,
//! as well as the dependencies of every available package
//! by implementing the [DependencyProvider] trait.
//! The call to [resolve] for a given package at a given version
//! will compute the set of packages and versions needed
//! to satisfy the dependencies of that package and version pair.
//! If there is no solution, the reason will be provided as clear as possible.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::error::Error;

use crate::error::ResolveError;
use crate::internal::core::State;
use crate::internal::incompatibility::Incompatibility;
use crate::package::Package;
use crate::type_aliases::{Map, SelectedDependencies, Set};
use crate::version_set::VersionSet;

/// Main function of the library.
/// Finds a set of packages satisfying dependency bounds for a given package + version pair.
pub fn resolve<P: Package, VS: VersionSet>(
    dependency_provider: &impl DependencyProvider<P, VS>,
    package: P,
    version: impl Into<VS::V>,
) -> Result<SelectedDependencies<P, VS::V>, ResolveError<P, VS>> {
    let mut state = State::init(package.clone(), version.into());
    let mut added_dependencies: Map<P, Set<VS::V>> = Map::default();
    let mut next = package;
    loop {
        dependency_provider
            .should_cancel()
            .map_err(ResolveError::ErrorInShouldCancel)?;

        log::info!("unit propagation for {}", next);
        state.unit_propagation(next)?;

        let potential_packages = state.partial_solution.potential_packages();
        if potential_packages.is_none() {
            drop(potential_packages);
            let solution = state.partial_solution.extract_solution().ok_or_else(|| {
                ResolveError::Failure(
                    "How did we end up with no package to choose but no solution?".into(),
                )
            })?;
            return Ok(solution);
        }
        let decision = dependency_provider
            .choose_package_version(potential_packages.unwrap())
            .map_err(ResolveError::ErrorChoosingPackageVersion)?;
        log::info!("DP chose: {} @ {:?}", decision.0.borrow(), decision.1);
        next = decision.0.borrow().clone();

        // Pick the next compatible version.
        let term_intersection = state
            .partial_solution
            .term_intersection_for_package(&next)
            .expect("a package was chosen but we don't have a term.");
        let v = match decision.1 {
            None => {
                let inc = Incompatibility::no_versions(next.clone(), term_intersection.clone());
                state.add_incompatibility(inc);
                continue;
            }
            Some(x) => x,
        };
        if !term_intersection.contains(&v) {
            return Err(ResolveError::ErrorChoosingPackageVersion(
                "choose_package_version picked an incompatible version".into(),
            ));
        }

        if added_dependencies
            .entry(next.clone())
            .or_default()
            .insert(v.clone())
        {
            // Retrieve that package dependencies.
            let p = &next;
            let dependencies = match dependency_provider.get_dependencies(p, &v).map_err(
                |err| ResolveError::ErrorRetrievingDependencies {
                    package: p.clone(),
                    version: v.clone(),
                    source: err,
                },
            )? {
                Dependencies::Unknown => {
                    state.add_incompatibility(Incompatibility::unavailable_dependencies(
                        p.clone(),
                        v.clone(),
                    ));
                    continue;
                }
                Dependencies::Known(x) => {
                    if x.contains_key(p) {
                        return Err(ResolveError::SelfDependency {
                            package: p.clone(),
                            version: v,
                        });
                    }
                    x
                }
            };

            // Add that package and version if the dependencies are not problematic.
            let dep_incompats =
                state.add_incompatibility_from_dependencies(p.clone(), v.clone(), &dependencies);

            if state.incompatibility_store[dep_incompats.clone()]
                .iter()
                .any(|incompat| state.is_terminal(incompat))
            {
                // For a dependency incompatibility to be terminal,
                // it can only mean that root depend on not root?
                return Err(ResolveError::Failure(
                    "Root package depends on itself at a different version?".into(),
                ));
            }
            state
                .partial_solution
                .add_version(p.clone(), v, dep_incompats, &state.incompatibility_store);
        } else {
            // `dep_incompats` are already in `incompatibilities` so we know they are not satisfied
            // or it would have been returned in `unit_propagation`.
            state.partial_solution.add_decision(next.clone(), v);
        }
    }
}

/// An enum used by [DependencyProvider] that holds information about package dependencies.
/// For each [Package] there is a set of versions allowed as a dependency.
#[derive(Clone)]
pub enum Dependencies<P: Package, VS: VersionSet> {
    /// Package dependencies are unavailable.
    Unknown,
    /// Container for all available package versions.
    Known(DependencyConstraints<P, VS>),
}

/// Subtype of [Dependencies] which holds information about
/// all possible versions a given package can accept.
/// There is a difference in semantics between an empty map
/// inside [DependencyConstraints] and [Dependencies::Unknown]:
/// the former means the package has no dependencies and it is a known fact,
/// while the latter means they could not be fetched by [DependencyProvider].
pub type DependencyConstraints<P, VS> = Map<P, VS>;

/// Trait that allows the algorithm to retrieve available packages and their dependencies.
/// An implementor needs to be supplied to the [resolve] function.
pub trait DependencyProvider<P: Package, VS: VersionSet> {
    /// Lists available versions for a given package.
    /// The strategy of which version should be preferably picked in the list of available versions
    /// is implied by the order of the list: first version in the list will be tried first.
    fn available_versions(&self, package: &P) -> Result<Vec<VS::V>, Box<dyn Error>>;

    /// Retrieves the package dependencies.
    /// Return [Dependencies::Unknown] if its dependencies are unknown.
    fn get_dependencies(
        &self,
        package: &P,
        version: &VS::V,
    ) -> Result<Dependencies<P, VS>, Box<dyn Error>>;

    /// Decision making is the process of choosing the next package
    /// and version that will be appended to the partial solution.
    /// Every time such a decision must be made,
    /// potential valid packages and sets of versions are preselected by the resolver,
    /// and the dependency provider must choose.
    ///
    /// The strategy employed to choose such package and version
    /// cannot change the existence of a solution or not,
    /// but can drastically change the performances of the solver,
    /// or the properties of the solution.
    ///
    /// The default strategy picks the package with the fewest versions
    /// matching the outstanding constraint,
    /// as listed by [available_versions](DependencyProvider::available_versions),
    /// and its first matching version.
    /// Packages with few candidates left run out of versions to try
    /// more quickly, so conflicts surface earlier.
    fn choose_package_version<T: Borrow<P>, U: Borrow<VS>>(
        &self,
        potential_packages: impl Iterator<Item = (T, U)>,
    ) -> Result<(T, Option<VS::V>), Box<dyn Error>> {
        let mut best: Option<(T, U, usize)> = None;
        for (package, set) in potential_packages {
            let count = self
                .available_versions(package.borrow())?
                .into_iter()
                .filter(|v| set.borrow().contains(v))
                .count();
            if best.as_ref().map_or(true, |(_, _, min)| count < *min) {
                best = Some((package, set, count));
            }
        }
        let (package, set, _) =
            best.expect("potential_packages gave us an empty iterator");
        let version = self
            .available_versions(package.borrow())?
            .into_iter()
            .find(|v| set.borrow().contains(v));
        Ok((package, version))
    }

    /// This is called fairly regularly during the resolution,
    /// if it returns an Err then resolution will be terminated.
    /// This is helpful if you want to add some form of early termination like a timeout,
    /// or you want to add some form of user feedback if things are taking a while.
    /// If not provided the resolver will run as long as needed.
    fn should_cancel(&self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}

/// A helper for [choose_package_version](DependencyProvider::choose_package_version)
/// implementing the "fewest versions" heuristic:
/// pick the package with the fewest versions
/// matching the outstanding constraint.
/// This tends to find conflicts earlier if any exist,
/// since these packages will run out of versions to try more quickly.
pub fn choose_package_with_fewest_versions<P: Package, VS: VersionSet, T, U, I, F>(
    list_available_versions: F,
    potential_packages: impl Iterator<Item = (T, U)>,
) -> (T, Option<VS::V>)
where
    T: Borrow<P>,
    U: Borrow<VS>,
    I: Iterator<Item = VS::V>,
    F: Fn(&P) -> I,
{
    let count_valid = |(p, set): &(T, U)| {
        list_available_versions(p.borrow())
            .filter(|v| set.borrow().contains(v))
            .count()
    };
    let (pkg, set) = potential_packages
        .min_by_key(count_valid)
        .expect("potential_packages gave us an empty iterator");
    let version = list_available_versions(pkg.borrow()).find(|v| set.borrow().contains(v));
    (pkg, version)
}

/// A basic implementation of [DependencyProvider].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "P: serde::Serialize, VS: serde::Serialize, VS::V: serde::Serialize",
        deserialize = "P: serde::Deserialize<'de>, VS: serde::Deserialize<'de>, VS::V: serde::Deserialize<'de>"
    ))
)]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OfflineDependencyProvider<P: Package, VS: VersionSet> {
    dependencies: Map<P, BTreeMap<VS::V, DependencyConstraints<P, VS>>>,
}

impl<P: Package, VS: VersionSet> OfflineDependencyProvider<P, VS> {
    /// Creates an empty OfflineDependencyProvider with no dependencies.
    pub fn new() -> Self {
        Self {
            dependencies: Map::default(),
        }
    }

    /// Registers the dependencies of a package and version pair.
    /// Dependencies must be added with a single call to
    /// [add_dependencies](OfflineDependencyProvider::add_dependencies).
    /// All subsequent calls to
    /// [add_dependencies](OfflineDependencyProvider::add_dependencies) for a given
    /// package version pair will replace the dependencies by the new ones.
    ///
    /// The API does not allow to add dependencies one at a time to uphold an assumption that
    /// [OfflineDependencyProvider.get_dependencies(p, v)](OfflineDependencyProvider::get_dependencies)
    /// provides all dependencies of a given package (p) and version (v) pair.
    pub fn add_dependencies<I: IntoIterator<Item = (P, VS)>>(
        &mut self,
        package: P,
        version: impl Into<VS::V>,
        dependencies: I,
    ) {
        let package_deps = dependencies.into_iter().collect();
        let v = version.into();
        *self
            .dependencies
            .entry(package)
            .or_default()
            .entry(v)
            .or_default() = package_deps;
    }

    /// Lists packages that have been saved.
    pub fn packages(&self) -> impl Iterator<Item = &P> {
        self.dependencies.keys()
    }

    /// Lists versions of saved packages in sorted order.
    /// Returns [None] if no information is available regarding that package.
    pub fn versions(&self, package: &P) -> Option<impl Iterator<Item = &VS::V>> {
        self.dependencies.get(package).map(|k| k.keys())
    }

    /// Lists dependencies of a given package and version.
    /// Returns [None] if no information is available regarding that package and version pair.
    fn dependencies(&self, package: &P, version: &VS::V) -> Option<DependencyConstraints<P, VS>> {
        self.dependencies.get(package)?.get(version).cloned()
    }
}

/// An implementation of [DependencyProvider] that
/// contains all dependency information available in memory.
/// Versions are listed with the newest versions first,
/// and the package with the fewest valid versions is chosen first.
impl<P: Package, VS: VersionSet> DependencyProvider<P, VS> for OfflineDependencyProvider<P, VS> {
    fn available_versions(&self, package: &P) -> Result<Vec<VS::V>, Box<dyn Error>> {
        Ok(self
            .dependencies
            .get(package)
            .into_iter()
            .flat_map(|k| k.keys())
            .rev()
            .cloned()
            .collect())
    }

    fn get_dependencies(
        &self,
        package: &P,
        version: &VS::V,
    ) -> Result<Dependencies<P, VS>, Box<dyn Error>> {
        Ok(match self.dependencies(package, version) {
            None => Dependencies::Unknown,
            Some(dependencies) => Dependencies::Known(dependencies),
        })
    }

    fn choose_package_version<T: Borrow<P>, U: Borrow<VS>>(
        &self,
        potential_packages: impl Iterator<Item = (T, U)>,
    ) -> Result<(T, Option<VS::V>), Box<dyn Error>> {
        Ok(choose_package_with_fewest_versions(
            |p| {
                self.dependencies
                    .get(p)
                    .into_iter()
                    .flat_map(|k| k.keys())
                    .rev()
                    .cloned()
            },
            potential_packages,
        ))
    }
}
