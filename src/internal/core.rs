// SPDX-License-Identifier: MPL-2.0

//! Core model and functions
//! to write a functional PubGrub algorithm.

use std::rc::Rc;

use crate::error::ResolveError;
use crate::internal::arena::Arena;
use crate::internal::incompatibility::{IncompId, Incompatibility, Relation};
use crate::internal::partial_solution::{DecisionLevel, PartialSolution, SatisfierSearch};
use crate::package::Package;
use crate::report::DerivationTree;
use crate::solver::DependencyConstraints;
use crate::type_aliases::Set;
use crate::version_set::VersionSet;

/// Current state of the PubGrub algorithm.
#[derive(Clone)]
pub struct State<P: Package, VS: VersionSet> {
    root_package: P,
    root_version: VS::V,

    incompatibilities: Rc<Vec<IncompId<P, VS>>>,

    /// Partial solution.
    pub partial_solution: PartialSolution<P, VS>,

    /// The store is the reference storage for all incompatibilities.
    pub incompatibility_store: Arena<Incompatibility<P, VS>>,

    /// This is a stack of work to be done in `unit_propagation`.
    /// It can definitely be a local variable to that method, but
    /// this way we can reuse the same allocation for better performance.
    unit_propagation_buffer: Vec<P>,
}

impl<P: Package, VS: VersionSet> State<P, VS> {
    /// Initialization of PubGrub state.
    pub fn init(root_package: P, root_version: VS::V) -> Self {
        let mut incompatibility_store = Arena::new();
        let not_root_id = incompatibility_store.alloc(Incompatibility::not_root(
            root_package.clone(),
            root_version.clone(),
        ));
        Self {
            root_package,
            root_version,
            incompatibilities: Rc::new(vec![not_root_id]),
            partial_solution: PartialSolution::empty(),
            incompatibility_store,
            unit_propagation_buffer: vec![],
        }
    }

    /// Add an incompatibility to the state.
    pub fn add_incompatibility(&mut self, incompat: Incompatibility<P, VS>) {
        Incompatibility::merge_into(
            self.incompatibility_store.alloc(incompat),
            Rc::make_mut(&mut self.incompatibilities),
        );
    }

    /// Add incompatibilities derived from the dependencies of a package version.
    pub fn add_incompatibility_from_dependencies(
        &mut self,
        package: P,
        version: VS::V,
        deps: &DependencyConstraints<P, VS>,
    ) -> std::ops::Range<IncompId<P, VS>> {
        // Create incompatibilities and allocate them in the store.
        let new_incompats_id_range = self
            .incompatibility_store
            .alloc_iter(deps.iter().map(|dep| {
                Incompatibility::from_dependency(package.clone(), version.clone(), dep)
            }));
        // Merge the newly created incompatibilities with the older ones.
        let incompatibilities = Rc::make_mut(&mut self.incompatibilities);
        for id in IncompId::range_to_iter(new_incompats_id_range.clone()) {
            Incompatibility::merge_into(id, incompatibilities);
        }
        new_incompats_id_range
    }

    /// Check if an incompatibility is terminal,
    /// that is if it is satisfied by the root package alone.
    pub fn is_terminal(&self, incompatibility: &Incompatibility<P, VS>) -> bool {
        incompatibility.is_terminal(&self.root_package, &self.root_version)
    }

    /// Unit propagation is the core mechanism of the solving algorithm.
    /// CF <https://github.com/dart-lang/pub/blob/master/doc/solver.md#unit-propagation>
    pub fn unit_propagation(&mut self, package: P) -> Result<(), ResolveError<P, VS>> {
        self.unit_propagation_buffer.clear();
        self.unit_propagation_buffer.push(package);
        while let Some(current_package) = self.unit_propagation_buffer.pop() {
            // Iterate over incompatibilities in reverse order
            // to evaluate first the newest incompatibilities.
            for &incompat_id in Rc::clone(&self.incompatibilities).iter().rev() {
                let current_incompat = &self.incompatibility_store[incompat_id];
                // We only care about that incompatibility if it contains the current package.
                if current_incompat.get(&current_package).is_none() {
                    continue;
                }
                match self.partial_solution.relation(current_incompat) {
                    // If the partial solution satisfies the incompatibility
                    // we must perform conflict resolution.
                    Relation::Satisfied => {
                        log::info!(
                            "Start conflict resolution because incompat satisfied:\n   {}",
                            current_incompat
                        );
                        let (package_almost, root_cause) = self.conflict_resolution(incompat_id)?;
                        self.unit_propagation_buffer.clear();
                        self.unit_propagation_buffer.push(package_almost.clone());
                        // Add to the partial solution with incompat as cause.
                        self.partial_solution.add_derivation(
                            package_almost,
                            root_cause,
                            &self.incompatibility_store,
                        );
                    }
                    Relation::AlmostSatisfied(package_almost) => {
                        self.unit_propagation_buffer.push(package_almost.clone());
                        // Add (not term) to the partial solution with incompat as cause.
                        self.partial_solution.add_derivation(
                            package_almost,
                            incompat_id,
                            &self.incompatibility_store,
                        );
                    }
                    _ => {}
                }
            }
        }
        // If there are no more changed packages, unit propagation is done.
        Ok(())
    }

    /// Return the root cause and the backtracked model.
    /// CF <https://github.com/dart-lang/pub/blob/master/doc/solver.md#conflict-resolution>
    fn conflict_resolution(
        &mut self,
        incompatibility: IncompId<P, VS>,
    ) -> Result<(P, IncompId<P, VS>), ResolveError<P, VS>> {
        let mut current_incompat_id = incompatibility;
        let mut current_incompat_changed = false;
        loop {
            if self.incompatibility_store[current_incompat_id]
                .is_terminal(&self.root_package, &self.root_version)
            {
                return Err(ResolveError::NoSolution(
                    self.build_derivation_tree(current_incompat_id),
                ));
            } else {
                let (package, satisfier_search_result) = self.partial_solution.satisfier_search(
                    &self.incompatibility_store[current_incompat_id],
                    &self.incompatibility_store,
                );
                match satisfier_search_result {
                    SatisfierSearch::DifferentDecisionLevels {
                        previous_satisfier_level,
                    } => {
                        self.backtrack(
                            current_incompat_id,
                            current_incompat_changed,
                            previous_satisfier_level,
                        );
                        log::info!("backtrack to {:?}", previous_satisfier_level);
                        return Ok((package, current_incompat_id));
                    }
                    SatisfierSearch::SameDecisionLevels { satisfier_cause } => {
                        let prior_cause = Incompatibility::prior_cause(
                            current_incompat_id,
                            satisfier_cause,
                            &package,
                            &self.incompatibility_store,
                        );
                        log::info!("prior cause: {}", prior_cause);
                        current_incompat_id = self.incompatibility_store.alloc(prior_cause);
                        current_incompat_changed = true;
                    }
                }
            }
        }
    }

    /// Backtracking.
    fn backtrack(
        &mut self,
        incompat: IncompId<P, VS>,
        incompat_changed: bool,
        decision_level: DecisionLevel,
    ) {
        self.partial_solution
            .backtrack(decision_level, &self.incompatibility_store);
        if incompat_changed {
            Incompatibility::merge_into(incompat, Rc::make_mut(&mut self.incompatibilities));
        }
    }

    // Error reporting #########################################################

    fn build_derivation_tree(&self, incompat: IncompId<P, VS>) -> DerivationTree<P, VS> {
        let shared_ids = self.find_shared_ids(incompat);
        Incompatibility::build_derivation_tree(incompat, &shared_ids, &self.incompatibility_store)
    }

    fn find_shared_ids(&self, incompat: IncompId<P, VS>) -> Set<IncompId<P, VS>> {
        let mut all_ids = Set::default();
        let mut shared_ids = Set::default();
        let mut stack = vec![incompat];
        while let Some(i) = stack.pop() {
            if let Some((id1, id2)) = self.incompatibility_store[i].causes() {
                if all_ids.contains(&i) {
                    shared_ids.insert(i);
                } else {
                    all_ids.insert(i);
                    stack.push(id1);
                    stack.push(id2);
                }
            }
        }
        shared_ids
    }
}
