//! Unit propagation to a fixpoint.
//!
//! Grounded on the occurrence-list scan of the propagation draft that
//! predates this corpus's two-watched-literal experiment: for each
//! newly-assigned literal, only the clauses mentioning its negation can
//! have become satisfied, falsified, or unit. The queue of "just-assigned"
//! literals is the trail itself (see [`crate::trail::Trail::pop_enqueued`]),
//! which gives FIFO ordering without a second buffer.

use crate::{
    assignment::VariableAssignment,
    clause::ClauseId,
    clause_db::ClauseDb,
    occurrence::OccurrenceMap,
    status::{
        self,
        ClauseStatus,
    },
    trail::Trail,
};
use log::trace;

/// Runs propagation until the queue drains or a clause falsifies.
///
/// The caller is responsible for having already pushed the seed literal(s)
/// onto `trail` (a decision, the unit-clause literals found at
/// construction, or a freshly-asserted learned clause's asserted literal).
///
/// Returns `Ok(())` once every derivable implication has been appended to
/// the trail, or `Err(conflict)` the moment a clause is found falsified;
/// in the error case the trail still contains every implication computed
/// up to that point, per contract.
pub fn propagate(
    trail: &mut Trail,
    clauses: &ClauseDb,
    occurrences: &OccurrenceMap,
    assignment: &mut VariableAssignment,
) -> Result<(), ClauseId> {
    while let Some(literal) = trail.pop_enqueued() {
        for candidate in occurrences.occurrences_of_negation(literal) {
            let clause = clauses
                .resolve(candidate)
                .expect("occurrence map referenced a missing clause");
            match status::classify(clause, assignment) {
                ClauseStatus::Satisfied | ClauseStatus::Free => {}
                ClauseStatus::Conflicting => {
                    trace!("BCP conflict on clause {:?}", candidate);
                    return Err(candidate)
                }
                ClauseStatus::Unit(implied) => {
                    trace!("BCP implies {:?} via clause {:?}", implied, candidate);
                    trail.push_implication(implied, candidate, assignment);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clause::Clause,
        literal::{
            Sign,
            Variable,
        },
    };

    fn var(index: usize) -> Variable {
        Variable::from_index(index).unwrap()
    }

    fn setup(num_vars: usize) -> (Trail, ClauseDb, OccurrenceMap, VariableAssignment) {
        let mut trail = Trail::default();
        trail.register_variables(num_vars);
        let mut assignment = VariableAssignment::default();
        assignment.register_variables(num_vars);
        let clauses = ClauseDb::default();
        let mut occurrences = OccurrenceMap::default();
        occurrences.register_variables(num_vars);
        (trail, clauses, occurrences, assignment)
    }

    fn add_clause(
        clauses: &mut ClauseDb,
        occurrences: &mut OccurrenceMap,
        literals: Vec<crate::literal::Literal>,
    ) -> ClauseId {
        let clause = Clause::new(literals).unwrap();
        let literals: Vec<_> = clause.into_iter().collect();
        let id = clauses.push_original(clause);
        for literal in literals {
            occurrences.register_for_literal(literal, id);
        }
        id
    }

    #[test]
    fn unit_cascade_propagates_through_binary_clauses() {
        let (mut trail, mut clauses, mut occurrences, mut assignment) = setup(3);
        // (-1 2), (-2 3)
        add_clause(
            &mut clauses,
            &mut occurrences,
            vec![var(0).into_literal(Sign::FALSE), var(1).into_literal(Sign::TRUE)],
        );
        add_clause(
            &mut clauses,
            &mut occurrences,
            vec![var(1).into_literal(Sign::FALSE), var(2).into_literal(Sign::TRUE)],
        );
        trail.push_implication(
            var(0).into_literal(Sign::TRUE),
            ClauseId::from_index(0),
            &mut assignment,
        );
        let result = propagate(&mut trail, &clauses, &occurrences, &mut assignment);
        assert!(result.is_ok());
        assert_eq!(assignment.value_of(var(1)), Some(Sign::TRUE));
        assert_eq!(assignment.value_of(var(2)), Some(Sign::TRUE));
    }

    #[test]
    fn propagation_detects_conflict() {
        let (mut trail, mut clauses, mut occurrences, mut assignment) = setup(2);
        // (-1 2), (-1 -2)
        add_clause(
            &mut clauses,
            &mut occurrences,
            vec![var(0).into_literal(Sign::FALSE), var(1).into_literal(Sign::TRUE)],
        );
        let conflicting = add_clause(
            &mut clauses,
            &mut occurrences,
            vec![var(0).into_literal(Sign::FALSE), var(1).into_literal(Sign::FALSE)],
        );
        trail.push_decision(var(0).into_literal(Sign::TRUE), &mut assignment);
        let result = propagate(&mut trail, &clauses, &occurrences, &mut assignment);
        assert_eq!(result, Err(conflicting));
    }

    proptest::proptest! {
        /// Idempotence law: once propagation reaches a fixpoint, running it
        /// again without seeding any new literal produces no further
        /// implications and no conflict, regardless of which binary clauses
        /// happen to be in the formula.
        #[test]
        fn second_propagate_call_is_a_no_op(
            polarities in proptest::collection::vec(proptest::bool::ANY, 2..6),
            extra_clause_polarities in proptest::collection::vec((0usize..5, 0usize..5, proptest::bool::ANY, proptest::bool::ANY), 0..6),
        ) {
            let num_vars = polarities.len();
            let (mut trail, mut clauses, mut occurrences, mut assignment) = setup(num_vars);
            for (first, second, sign_a, sign_b) in extra_clause_polarities {
                if first == second || first >= num_vars || second >= num_vars {
                    continue
                }
                let sign_a = if sign_a { Sign::TRUE } else { Sign::FALSE };
                let sign_b = if sign_b { Sign::TRUE } else { Sign::FALSE };
                add_clause(
                    &mut clauses,
                    &mut occurrences,
                    vec![var(first).into_literal(sign_a), var(second).into_literal(sign_b)],
                );
            }
            trail.push_decision(
                var(0).into_literal(if polarities[0] { Sign::TRUE } else { Sign::FALSE }),
                &mut assignment,
            );
            let first_result = propagate(&mut trail, &clauses, &occurrences, &mut assignment);
            if first_result.is_err() {
                return Ok(())
            }
            let len_after_first = trail.len();
            let second_result = propagate(&mut trail, &clauses, &occurrences, &mut assignment);
            proptest::prop_assert!(second_result.is_ok());
            proptest::prop_assert_eq!(trail.len(), len_after_first);
        }
    }
}
