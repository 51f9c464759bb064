//! Conflict analysis: first-UIP learned-clause derivation.
//!
//! Grounded on the stamp-and-resolve structure of the corpus's first-UIP
//! draft, generalized with the explicit assertion-level computation that
//! draft never performed, cross-checked against the literal C ancestor of
//! this algorithm (`get_asserting_clause`) for the queue/list partition.
//!
//! The queue *Q* and reason set *R* of the literature are realized here as
//! a live "how many stamped literals remain at the conflict level" counter
//! (`Q`, never materialized as its own collection) plus `lower_level`
//! (`R`), since scanning the current level's trail segment in reverse
//! visits exactly the variables *Q* would otherwise have to pick by
//! highest rank — reverse trail order already *is* descending rank order.

use crate::{
    clause::{
        Clause,
        ClauseId,
    },
    clause_db::ClauseDb,
    literal::{
        Literal,
        Variable,
    },
    trail::{
        DecisionLevel,
        Trail,
    },
};
use cdcl_bounded::BoundedBitmap;

/// Reusable scratch space for conflict analysis.
///
/// Kept across calls (rather than allocated fresh per conflict) since a
/// solver built on this core calls `analyze` once per conflict, often
/// thousands of times per search.
#[derive(Debug, Default, Clone)]
pub struct Analyzer {
    stamped: BoundedBitmap<Variable, bool>,
    lower_level: Vec<Literal>,
}

impl Analyzer {
    /// Grows the analyzer's stamp bitmap to accommodate `additional` more
    /// variables.
    pub fn register_variables(&mut self, additional: usize) {
        let new_len = self.stamped.len() + additional;
        self.stamped.resize_to_len(new_len);
    }

    fn is_stamped(&self, variable: Variable) -> bool {
        self.stamped
            .get(variable)
            .expect("encountered out of bounds variable during analysis")
    }

    fn stamp(&mut self, variable: Variable) {
        self.stamped
            .set(variable, true)
            .expect("encountered out of bounds variable during analysis");
    }

    fn unstamp(&mut self, variable: Variable) {
        self.stamped
            .set(variable, false)
            .expect("encountered out of bounds variable during analysis");
    }

    /// Folds `clause`'s literals into the pending analysis, excluding
    /// `pivot` (the literal just resolved away) and any already-stamped
    /// variable. Literals at the conflict level are counted and left
    /// implicit (`Q`); literals below it are appended to `lower_level`
    /// (`R`). Returns how many literals were added to `Q`.
    fn add_resolvent(&mut self, clause: &Clause, pivot: Option<Literal>, trail: &Trail) -> usize {
        if let Some(pivot) = pivot {
            self.unstamp(pivot.variable());
        }
        let current_level = trail.current_decision_level();
        let mut added_to_queue = 0;
        for literal in clause {
            let variable = literal.variable();
            if Some(literal) != pivot && !self.is_stamped(variable) {
                self.stamp(variable);
                let level = trail
                    .level_of(variable)
                    .expect("clause literal's variable is unassigned");
                if level == current_level {
                    added_to_queue += 1;
                } else {
                    self.lower_level.push(literal);
                }
            }
        }
        added_to_queue
    }

    /// Resolves backward through the trail until exactly one stamped
    /// literal remains at the conflict level, then returns it.
    fn resolve_until_uip(&mut self, pending: usize, trail: &Trail, clauses: &ClauseDb) -> Literal {
        let mut pending = pending;
        let mut scan = trail.current_level_literals().iter().rev().copied();
        while pending != 1 {
            let candidate = scan.next().expect(
                "ran out of current-level trail literals before reaching the first UIP",
            );
            if self.is_stamped(candidate.variable()) {
                match trail.antecedent_of(candidate.variable()) {
                    None => panic!(
                        "first-UIP search reached a decision literal with more than one \
                         literal still unresolved at the conflict level"
                    ),
                    Some(antecedent) => {
                        let reason = clauses
                            .resolve(antecedent)
                            .expect("trail referenced a missing antecedent clause");
                        pending += self.add_resolvent(reason, Some(candidate), trail);
                        pending -= 1;
                    }
                }
            }
        }
        let candidate = scan
            .find(|literal| self.is_stamped(literal.variable()))
            .expect("missing asserting literal after reaching the first UIP");
        self.unstamp(candidate.variable());
        // Every literal folded into the learned clause is falsified under
        // the current assignment: that's the invariant resolution
        // preserves, from the falsified conflict clause all the way
        // through. The trail holds the variable's *true*-under-assignment
        // literal, so the clause needs its negation, same as every other
        // literal already taken straight from a clause body.
        !candidate
    }

    /// Derives a learned clause from `conflict` plus its assertion level.
    ///
    /// The single literal at the conflict level (the first-UIP literal)
    /// is the one that becomes free, then implied again, once the caller
    /// backtracks to the returned assertion level; [`Clause`] itself
    /// doesn't track which literal that was, since order is informational
    /// and backtracking alone determines which literal is free again.
    pub fn analyze(
        &mut self,
        conflict: ClauseId,
        trail: &Trail,
        clauses: &ClauseDb,
    ) -> (Clause, DecisionLevel) {
        self.lower_level.clear();
        let conflict_clause = clauses
            .resolve(conflict)
            .expect("analyzed a missing conflict clause");
        let pending = self.add_resolvent(conflict_clause, None, trail);
        let asserting = self.resolve_until_uip(pending, trail, clauses);

        let assertion_level = self
            .lower_level
            .iter()
            .map(|literal| {
                trail
                    .level_of(literal.variable())
                    .expect("lower-level literal is unassigned")
            })
            .max()
            .unwrap_or(DecisionLevel::ROOT);

        let mut literals = Vec::with_capacity(self.lower_level.len() + 1);
        literals.push(asserting);
        literals.append(&mut self.lower_level);
        for literal in &literals[1..] {
            self.unstamp(literal.variable());
        }
        let learned = Clause::new(literals).expect("first-UIP analysis produced a bad clause");
        (learned, assertion_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assignment::VariableAssignment,
        clause::Clause as CoreClause,
        literal::Sign,
    };

    fn var(index: usize) -> Variable {
        Variable::from_index(index).unwrap()
    }

    /// Builds a two-decision-level scenario: `{(-1 3), (-3 -4 5), (-4 -5)}`,
    /// decide 1 then 4.
    #[test]
    fn multi_level_conflict_yields_expected_assertion_level() {
        let mut clauses = ClauseDb::default();
        let mut trail = Trail::default();
        let mut assignment = VariableAssignment::default();
        let mut analyzer = Analyzer::default();
        trail.register_variables(5);
        assignment.register_variables(5);
        analyzer.register_variables(5);

        let c_minus1_3 = clauses.push_original(
            CoreClause::new(vec![var(0).into_literal(Sign::FALSE), var(2).into_literal(Sign::TRUE)])
                .unwrap(),
        );
        // (-3 -4 5): falsified once 3 and 4 are true and 5 is false.
        let conflict_clause = clauses.push_original(
            CoreClause::new(vec![
                var(2).into_literal(Sign::FALSE),
                var(3).into_literal(Sign::FALSE),
                var(4).into_literal(Sign::TRUE),
            ])
            .unwrap(),
        );
        let c_minus4_minus5 = clauses.push_original(
            CoreClause::new(vec![
                var(3).into_literal(Sign::FALSE),
                var(4).into_literal(Sign::FALSE),
            ])
            .unwrap(),
        );

        // Decide 1 (level 2); 3 implied by (-1 3).
        trail.push_decision(var(0).into_literal(Sign::TRUE), &mut assignment);
        trail.push_implication(var(2).into_literal(Sign::TRUE), c_minus1_3, &mut assignment);

        // Decide 4 (level 3); -5 implied by (-4 -5); (-3 4 5) then conflicts.
        trail.push_decision(var(3).into_literal(Sign::TRUE), &mut assignment);
        trail.push_implication(
            var(4).into_literal(Sign::FALSE),
            c_minus4_minus5,
            &mut assignment,
        );

        let (learned, assertion_level) = analyzer.analyze(conflict_clause, &trail, &clauses);
        assert_eq!(assertion_level.as_u32(), 2);
        let lits: Vec<_> = learned.into_iter().collect();
        // Resolving (-3 -4 5) against (-4 -5) on variable 5 yields (-3 -4):
        // every surviving literal, including the asserting one, is the
        // negation of its trail-assigned value.
        assert!(lits.contains(&var(3).into_literal(Sign::FALSE)));
        assert!(lits.contains(&var(2).into_literal(Sign::FALSE)));
    }
}
