//! The public façade: the operations a search driver drives directly.
//!
//! Shaped after the corpus's `Solver` method surface (`decide`,
//! `consume_clause`, the assignment/propagation plumbing in `lib.rs`), with
//! the DPLL recursive search loop itself left out — that belongs to a
//! driver, not this core.

use crate::{
    analyze::Analyzer,
    bcp,
    clause::{
        Clause,
        ClauseId,
    },
    clause_db::ClauseDb,
    error::Error,
    literal::{
        Literal,
        Sign,
        Variable,
    },
    marks::Marks,
    occurrence::{
        ClauseIdIter,
        OccurrenceMap,
    },
    status::{
        self,
        ClauseStatus,
    },
    trail::{
        DecisionLevel,
        Trail,
    },
    assignment::VariableAssignment,
};

/// The result of an operation that may trigger propagation to a fixpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecideOutcome {
    /// Propagation reached a fixpoint with no falsified clause.
    NoConflict,
    /// Propagation found a falsified clause; this is the clause the
    /// analyzer derived from it. The caller must call
    /// [`FormulaState::undo_decide`] until [`FormulaState::at_assertion_level`]
    /// holds, then [`FormulaState::assert_clause`] with this clause.
    Conflict(Clause),
}

/// Owns every mutable piece of solver state for one formula.
#[derive(Debug)]
pub struct FormulaState {
    clauses: ClauseDb,
    occurrences: OccurrenceMap,
    assignment: VariableAssignment,
    trail: Trail,
    analyzer: Analyzer,
    marks: Marks,
    conflict: Option<ClauseId>,
    assertion_level: Option<DecisionLevel>,
}

impl FormulaState {
    /// Assembles a state from its already-constructed parts plus the
    /// outcome of the first ("first-call") propagation pass.
    ///
    /// Only [`crate::builder::FormulaBuilder`] calls this.
    pub(crate) fn from_parts(
        clauses: ClauseDb,
        occurrences: OccurrenceMap,
        assignment: VariableAssignment,
        trail: Trail,
        mut analyzer: Analyzer,
        marks: Marks,
        conflict: Option<ClauseId>,
    ) -> Self {
        let assertion_level =
            conflict.map(|id| analyzer.analyze(id, &trail, &clauses).1);
        Self {
            clauses,
            occurrences,
            assignment,
            trail,
            analyzer,
            marks,
            conflict,
            assertion_level,
        }
    }

    fn run_bcp_and_analyze(&mut self) -> DecideOutcome {
        match bcp::propagate(
            &mut self.trail,
            &self.clauses,
            &self.occurrences,
            &mut self.assignment,
        ) {
            Ok(()) => {
                self.conflict = None;
                self.assertion_level = None;
                DecideOutcome::NoConflict
            }
            Err(conflict) => self.record_conflict(conflict),
        }
    }

    fn record_conflict(&mut self, conflict: ClauseId) -> DecideOutcome {
        self.conflict = Some(conflict);
        let (learned, level) = self.analyzer.analyze(conflict, &self.trail, &self.clauses);
        self.assertion_level = Some(level);
        DecideOutcome::Conflict(learned)
    }

    /// Decides `literal` and propagates to a fixpoint.
    ///
    /// # Errors
    ///
    /// If `literal`'s variable is already assigned.
    pub fn decide(&mut self, literal: Literal) -> Result<DecideOutcome, Error> {
        if self.assignment.is_assigned(literal.variable()) {
            return Err(Error::VariableAlreadyAssigned)
        }
        self.trail.push_decision(literal, &mut self.assignment);
        Ok(self.run_bcp_and_analyze())
    }

    /// Undoes the most recent decision and every implication at its level.
    ///
    /// # Errors
    ///
    /// If the decision stack is already empty (at the root level).
    pub fn undo_decide(&mut self) -> Result<(), Error> {
        if self.trail.current_decision_level() == DecisionLevel::ROOT {
            return Err(Error::NoDecisionToUndo)
        }
        self.trail.undo_decision(&mut self.assignment);
        Ok(())
    }

    /// Appends `clause` to the learned pool and propagates to a fixpoint.
    ///
    /// # Errors
    ///
    /// If the current decision level is not `clause`'s assertion level
    /// (the level computed for the most recently returned conflict).
    pub fn assert_clause(&mut self, clause: Clause) -> Result<DecideOutcome, Error> {
        if !self.at_assertion_level() {
            return Err(Error::NotAtAssertionLevel)
        }
        self.marks.register_clauses(1);
        let literals = clause.as_slice().to_vec();
        let id = self.clauses.push_learned(clause);
        for literal in literals {
            self.occurrences.register_for_literal(literal, id);
        }
        self.conflict = None;
        self.assertion_level = None;
        let clause_ref = self.clauses.resolve(id).expect("just inserted");
        match status::classify(clause_ref, &self.assignment) {
            ClauseStatus::Unit(implied) => {
                self.trail.push_implication(implied, id, &mut self.assignment);
                Ok(self.run_bcp_and_analyze())
            }
            ClauseStatus::Conflicting => Ok(self.record_conflict(id)),
            ClauseStatus::Satisfied | ClauseStatus::Free => Ok(DecideOutcome::NoConflict),
        }
    }

    /// Returns `true` if the current decision level equals the assertion
    /// level of the most recently returned conflict.
    pub fn at_assertion_level(&self) -> bool {
        match self.assertion_level {
            Some(level) => self.trail.current_decision_level() == level,
            None => false,
        }
    }

    /// Returns `true` if the most recent propagation call failed.
    pub fn has_conflict(&self) -> bool {
        self.conflict.is_some()
    }

    /// Returns the falsified clause that caused the most recent BCP
    /// failure, if any.
    pub fn conflict_reason(&self) -> Option<ClauseId> {
        self.conflict
    }

    /// Returns the current decision level.
    pub fn current_decision_level(&self) -> DecisionLevel {
        self.trail.current_decision_level()
    }

    /// Returns the number of variables this state was constructed with.
    pub fn num_variables(&self) -> usize {
        self.assignment.len_variables()
    }

    /// Returns the variable for the given zero-based `index`, if in range.
    pub fn variable_of(&self, index: usize) -> Option<Variable> {
        if index >= self.num_variables() {
            return None
        }
        Variable::from_index(index)
    }

    /// Returns the literal for a 1-based signed DIMACS-style index, if its
    /// variable is in range. Positive → true-polarity, negative →
    /// false-polarity.
    pub fn literal_of(&self, signed_index: i32) -> Option<Literal> {
        if signed_index == 0 {
            return None
        }
        let literal = Literal::from(signed_index);
        self.variable_of(literal.variable().into_index())?;
        Some(literal)
    }

    /// Resolves a clause identifier to its clause, if valid.
    pub fn clause_of(&self, id: ClauseId) -> Option<&Clause> {
        self.clauses.resolve(id)
    }

    /// Returns the number of learned clauses appended so far.
    pub fn learned_clause_count(&self) -> usize {
        self.clauses.learned_count()
    }

    /// Returns `true` if `variable` currently holds an assignment.
    pub fn is_variable_assigned(&self, variable: Variable) -> bool {
        self.assignment.is_assigned(variable)
    }

    /// Returns the current assignment of `variable`, if any.
    pub fn value_of(&self, variable: Variable) -> Option<Sign> {
        self.assignment.value_of(variable)
    }

    /// Returns `true` if `id` names a clause with at least one satisfied
    /// literal.
    pub fn is_clause_satisfied(&self, id: ClauseId) -> bool {
        self.clause_of(id)
            .map(|clause| status::is_satisfied(clause, &self.assignment))
            .unwrap_or(false)
    }

    /// Returns the clauses (original or learned) that mention `literal`.
    pub fn occurrences_of(&self, literal: Literal) -> ClauseIdIter<'_> {
        self.occurrences.occurrences_of(literal)
    }

    /// Returns the original-formula occurrence counts `(positive, negative)`
    /// of `variable`.
    pub fn variable_occurrence_count(&self, variable: Variable) -> (usize, usize) {
        self.occurrences.len_pos_neg(variable)
    }

    /// Returns `true` if every clause mentioning `variable` (either
    /// polarity, original or learned) is currently satisfied.
    pub fn is_variable_irrelevant(&self, variable: Variable) -> bool {
        let positive = variable.into_literal(Sign::TRUE);
        let negative = variable.into_literal(Sign::FALSE);
        self.occurrences_of(positive)
            .chain(self.occurrences_of(negative))
            .all(|id| self.is_clause_satisfied(id))
    }

    /// Returns `true` if `variable`'s mark bit is set.
    pub fn is_variable_marked(&self, variable: Variable) -> bool {
        self.marks.is_variable_marked(variable)
    }

    /// Sets `variable`'s mark bit.
    pub fn mark_variable(&mut self, variable: Variable) {
        self.marks.mark_variable(variable)
    }

    /// Clears `variable`'s mark bit.
    pub fn unmark_variable(&mut self, variable: Variable) {
        self.marks.unmark_variable(variable)
    }

    /// Returns `true` if `id`'s mark bit is set.
    pub fn is_clause_marked(&self, id: ClauseId) -> bool {
        self.marks.is_clause_marked(id)
    }

    /// Sets `id`'s mark bit.
    pub fn mark_clause(&mut self, id: ClauseId) {
        self.marks.mark_clause(id)
    }

    /// Clears `id`'s mark bit.
    pub fn unmark_clause(&mut self, id: ClauseId) {
        self.marks.unmark_clause(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FormulaBuilder;

    fn lit(index: usize, sign: Sign) -> Literal {
        Variable::from_index(index).unwrap().into_literal(sign)
    }

    fn build<const N: usize>(clauses: [&[Literal]; N], num_vars: usize) -> FormulaState {
        let mut builder = FormulaBuilder::default();
        builder.set_problem(num_vars, clauses.len()).unwrap();
        for clause in clauses {
            for &literal in clause {
                builder.push_literal(literal);
            }
            builder.finalize_clause().unwrap();
        }
        builder.finish().unwrap()
    }

    #[test]
    fn immediate_conflict_on_decide_has_assertion_level_one() {
        // {(1 2), (-1 2), (1 -2), (-1 -2)}
        let mut state = build(
            [
                &[lit(0, Sign::TRUE), lit(1, Sign::TRUE)],
                &[lit(0, Sign::FALSE), lit(1, Sign::TRUE)],
                &[lit(0, Sign::TRUE), lit(1, Sign::FALSE)],
                &[lit(0, Sign::FALSE), lit(1, Sign::FALSE)],
            ],
            2,
        );
        let outcome = state.decide(lit(0, Sign::TRUE)).unwrap();
        match outcome {
            DecideOutcome::Conflict(_) => {}
            DecideOutcome::NoConflict => panic!("expected a conflict"),
        }
        assert!(state.has_conflict());
        assert_eq!(state.current_decision_level().as_u32(), 2);
        assert!(!state.at_assertion_level());
        state.undo_decide().unwrap();
        assert!(state.at_assertion_level());
    }

    #[test]
    fn irrelevant_variable_scenario() {
        // {(1 2), (1 3)}; decide 1.
        let mut state = build(
            [
                &[lit(0, Sign::TRUE), lit(1, Sign::TRUE)],
                &[lit(0, Sign::TRUE), lit(2, Sign::TRUE)],
            ],
            3,
        );
        let outcome = state.decide(lit(0, Sign::TRUE)).unwrap();
        assert_eq!(outcome, DecideOutcome::NoConflict);
        assert!(state.is_variable_irrelevant(Variable::from_index(1).unwrap()));
        assert!(state.is_variable_irrelevant(Variable::from_index(2).unwrap()));
    }

    #[test]
    fn undo_on_root_is_an_error() {
        let mut state = build([&[lit(0, Sign::TRUE)]], 1);
        assert_eq!(state.undo_decide(), Err(Error::NoDecisionToUndo));
    }

    #[test]
    fn learn_then_assert_exhibits_the_asserting_property() {
        // {(-1 3), (-3 -4 5), (-4 -5)}; decide 1, then 4.
        let mut state = build(
            [
                &[lit(0, Sign::FALSE), lit(2, Sign::TRUE)],
                &[lit(2, Sign::FALSE), lit(3, Sign::FALSE), lit(4, Sign::TRUE)],
                &[lit(3, Sign::FALSE), lit(4, Sign::FALSE)],
            ],
            5,
        );
        assert_eq!(state.decide(lit(0, Sign::TRUE)).unwrap(), DecideOutcome::NoConflict);
        assert_eq!(state.value_of(Variable::from_index(2).unwrap()), Some(Sign::TRUE));

        let learned = match state.decide(lit(3, Sign::TRUE)).unwrap() {
            DecideOutcome::Conflict(clause) => clause,
            DecideOutcome::NoConflict => panic!("expected a conflict"),
        };
        assert_eq!(state.current_decision_level().as_u32(), 3);

        while !state.at_assertion_level() {
            state.undo_decide().unwrap();
        }
        assert_eq!(state.current_decision_level().as_u32(), 2);

        // Right after backtracking, exactly one of the learned clause's
        // literals is free and every other one is already falsified.
        let var4 = Variable::from_index(3).unwrap();
        assert!(!state.is_variable_assigned(var4));
        for literal in learned.as_slice() {
            if literal.variable() != var4 {
                assert_eq!(state.value_of(literal.variable()), Some(!literal.sign()));
            }
        }

        let outcome = state.assert_clause(learned).unwrap();
        assert_eq!(outcome, DecideOutcome::NoConflict);
        assert_eq!(state.value_of(var4), Some(Sign::FALSE));
        assert_eq!(state.learned_clause_count(), 1);
    }

    #[test]
    fn deciding_an_assigned_variable_is_an_error() {
        let mut state = build([&[lit(0, Sign::TRUE), lit(1, Sign::TRUE)]], 2);
        state.decide(lit(0, Sign::TRUE)).unwrap();
        assert_eq!(
            state.decide(lit(0, Sign::FALSE)),
            Err(Error::VariableAlreadyAssigned)
        );
    }
}
