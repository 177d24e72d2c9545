// SPDX-License-Identifier: MPL-2.0

//! PubGrub version solving algorithm for PEP 440 versions.
//!
//! Version solving consists in efficiently finding a set of packages and versions
//! that satisfy all the constraints of a given project dependencies.
//! In addition, when that is not possible,
//! we should try to provide a very human-readable and clear
//! explanation as to why that failed.
//!
//! # Package and VersionSet traits
//!
//! All the code in this crate is manipulating packages and sets of versions,
//! and for this to work, we defined `Package` and `VersionSet` traits,
//! that are used as bounds on most of the exposed types and functions.
//!
//! Package identifiers needs to implement our `Package` trait,
//! which is automatic if the type already implements
//! `Clone + Eq + Hash + Debug + Display`.
//! So things like `String` will work out of the box.
//!
//! Our `VersionSet` trait describes sets of versions,
//! with the empty set, singleton sets, complement and intersection operations,
//! and a membership test.
//! For convenience, this library already provides
//! the `Range` type implementing `VersionSet`
//! for any version type that is `Clone + Ord + Hash + Debug + Display`,
//! such as the provided `Version` type implementing PEP 440 ordering rules.
//!
//! # Basic example
//!
//! Let's imagine that we are building a user interface
//! with a menu containing dropdowns with some icons,
//! icons that we are also directly using in other parts of the interface.
//! For this scenario our direct dependencies are `menu` and `icons`,
//! but the complete set of dependencies looks like follows:
//!
//! - `root` depends on `menu` and `icons`
//! - `menu` depends on `dropdown`
//! - `dropdown` depends on `icons`
//! - `icons` has no dependency
//!
//! We can model that scenario with this library as follows
//! ```
//! use pepgrub::range::Range;
//! use pepgrub::solver::{resolve, OfflineDependencyProvider};
//! use pepgrub::version::Version;
//!
//! let mut dependency_provider = OfflineDependencyProvider::<&str, Range<Version>>::new();
//!
//! dependency_provider.add_dependencies(
//!     "root",
//!     Version::from_release([1]),
//!     vec![("menu", Range::full()), ("icons", Range::full())],
//! );
//! dependency_provider.add_dependencies(
//!     "menu",
//!     Version::from_release([1]),
//!     vec![("dropdown", Range::full())],
//! );
//! dependency_provider.add_dependencies(
//!     "dropdown",
//!     Version::from_release([1]),
//!     vec![("icons", Range::full())],
//! );
//! dependency_provider.add_dependencies("icons", Version::from_release([1]), vec![]);
//!
//! // Run the algorithm.
//! let solution = resolve(&dependency_provider, "root", Version::from_release([1])).unwrap();
//! assert_eq!(solution.len(), 4);
//! ```
//!
//! # Version constraints
//!
//! Dependency constraints written as PEP 440 specifiers,
//! such as `>=1.4.5, <2` or `~=3.1`,
//! can be parsed with the `Specifiers` type
//! and translated into a `Range<Version>` for the solver:
//! ```
//! use pepgrub::range::Range;
//! use pepgrub::specifier::Specifiers;
//! use pepgrub::version::Version;
//!
//! let specifiers: Specifiers = "~=2.2, !=2.5".parse().unwrap();
//! let range: Range<Version> = specifiers.to_range();
//! assert!(range.contains(&"2.4.7".parse().unwrap()));
//! assert!(!range.contains(&"2.5".parse().unwrap()));
//! ```
//!
//! # DependencyProvider trait
//!
//! In our previous example we used the `OfflineDependencyProvider`,
//! which is a basic implementation of the `DependencyProvider` trait.
//!
//! But we might want to implement the `DependencyProvider` trait for our own type.
//! Let's say that we will use `String` for packages,
//! and `Range<Version>` for sets of versions.
//! This may be done by implementing the two following functions.
//! ```ignore
//! impl DependencyProvider<String, Range<Version>> for MyDependencyProvider {
//!     fn available_versions(
//!         &self,
//!         package: &String,
//!     ) -> Result<Vec<Version>, Box<dyn Error>> {
//!         ...
//!     }
//!
//!     fn get_dependencies(
//!         &self,
//!         package: &String,
//!         version: &Version,
//!     ) -> Result<Dependencies<String, Range<Version>>, Box<dyn Error>> {
//!         ...
//!     }
//! }
//! ```
//! The first method `available_versions` should return all available
//! versions of a package, preferred versions first.
//! The second method `get_dependencies` aims at retrieving the dependencies
//! of a given package at a given version.
//! Return `Dependencies::Unknown` if dependencies could not be fetched.
//!
//! On a real scenario, these two methods may involve reading the file system
//! or doing network request, so you may want to hold a cache in your
//! `MyDependencyProvider` type.
//! You could use the `OfflineDependencyProvider` type provided by the crate as guidance,
//! but you are free to use whatever approach makes sense in your situation.
//!
//! # Solution and error reporting
//!
//! When everything goes well, the algorithm finds and returns the complete
//! set of direct and indirect dependencies satisfying all the constraints.
//! The packages and versions selected are returned as
//! [SelectedDependencies<P, V>](type_aliases::SelectedDependencies).
//! But sometimes there is no solution because dependencies are incompatible.
//! In such cases, `resolve(...)` returns a
//! `ResolveError::NoSolution(derivation_tree)`,
//! where the provided derivation tree is a custom binary tree
//! containing the full chain of reasons why there is no solution.
//!
//! All the items in the tree are called incompatibilities
//! and may be of two types, either "external" or "derived".
//! Leaves of the tree are external incompatibilities,
//! and nodes are derived.
//! External incompatibilities have reasons that are independent
//! of the way this algorithm is implemented such as
//!  - dependencies: "package_a" at version 1 depends on "package_b" at version 4
//!  - missing dependencies: dependencies of "package_a" are unknown
//!  - absence of version: there is no version of "package_a" in the range [3.1.0  4.0.0[
//!
//! Derived incompatibilities are obtained during the algorithm execution by deduction,
//! such as if "a" depends on "b" and "b" depends on "c", "a" depends on "c".
//!
//! This crate defines a [Reporter](crate::report::Reporter) trait, with an associated
//! `Output` type and a single method.
//! ```ignore
//! report(derivation_tree: &DerivationTree<P, VS>) -> Output
//! ```
//! Implementing a `Reporter` may involve a lot of heuristics
//! to make the output human-readable and natural.
//! For convenience, we provide a default implementation
//! [DefaultStringReporter](crate::report::DefaultStringReporter)
//! that outputs the report as a [String].
//! You may use it as follows:
//! ```ignore
//! match resolve(&dependency_provider, root_package, root_version) {
//!     Ok(solution) => println!("{:?}", solution),
//!     Err(ResolveError::NoSolution(mut derivation_tree)) => {
//!         derivation_tree.collapse_no_versions();
//!         eprintln!("{}", DefaultStringReporter::report(&derivation_tree));
//!     }
//!     Err(err) => panic!("{:?}", err),
//! };
//! ```
//! Notice that we also used
//! [collapse_no_versions()](crate::report::DerivationTree::collapse_no_versions) above.
//! This method simplifies the derivation tree to get rid
//! of the `NoVersions` external incompatibilities in the derivation tree.
//! So instead of seeing things like this in the report:
//! ```txt
//! Because there is no version of foo in 1.0.1 <= v < 2
//! and foo 1.0.0 depends on bar 2 <= v < 3,
//! foo 1.0.0 <= v < 2 depends on bar 2 <= v < 3.
//! ```
//! you may have directly:
//! ```txt
//! foo 1.0.0 <= v < 2 depends on bar 2 <= v < 3.
//! ```
//! Beware though that if you are using some kind of offline mode
//! with a cache, you may want to know that some versions
//! do not exist in your cache.

#![warn(missing_docs)]

pub mod error;
pub mod package;
pub mod range;
pub mod report;
pub mod solver;
pub mod specifier;
pub mod term;
pub mod type_aliases;
pub mod version;
pub mod version_set;

mod internal;
