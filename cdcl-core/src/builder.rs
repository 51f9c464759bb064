//! Construction of a [`crate::state::FormulaState`] from a literal stream.
//!
//! Generalizes the corpus's `SolverBuilder`, which accumulates literals
//! clause-by-clause and hands the assembled clause to the solver once a
//! terminator is seen. This builder knows nothing about DIMACS text; a
//! reader (`cdcl-dimacs`, or any other front end) drives it by calling
//! [`FormulaBuilder::set_problem`], then [`FormulaBuilder::push_literal`]
//! and [`FormulaBuilder::finalize_clause`] per clause, then
//! [`FormulaBuilder::finish`].

use crate::{
    analyze::Analyzer,
    assignment::VariableAssignment,
    bcp,
    clause::Clause,
    clause_db::ClauseDb,
    config::SolverLimits,
    error::Error,
    literal::Literal,
    marks::Marks,
    occurrence::OccurrenceMap,
    sanitizer::{
        ClauseSanitizer,
        SanitizedLiterals,
    },
    state::FormulaState,
    trail::Trail,
};

/// Accumulates a formula's variables and clauses ahead of constructing a
/// [`FormulaState`].
#[derive(Debug)]
pub struct FormulaBuilder {
    limits: SolverLimits,
    num_variables: Option<usize>,
    clauses: ClauseDb,
    occurrences: OccurrenceMap,
    assignment: VariableAssignment,
    trail: Trail,
    analyzer: Analyzer,
    marks: Marks,
    sanitizer: ClauseSanitizer,
    current_clause: Vec<Literal>,
    root_conflict: Option<crate::clause::ClauseId>,
}

impl Default for FormulaBuilder {
    fn default() -> Self {
        Self::new(SolverLimits::default())
    }
}

impl FormulaBuilder {
    /// Creates a builder bounded by `limits`.
    pub fn new(limits: SolverLimits) -> Self {
        Self {
            limits,
            num_variables: None,
            clauses: ClauseDb::default(),
            occurrences: OccurrenceMap::default(),
            assignment: VariableAssignment::default(),
            trail: Trail::default(),
            analyzer: Analyzer::default(),
            marks: Marks::default(),
            sanitizer: ClauseSanitizer::default(),
            current_clause: Vec::new(),
            root_conflict: None,
        }
    }

    /// Declares the formula's size, matching a DIMACS `p cnf N M` header.
    ///
    /// Must be called exactly once, before any literal is pushed.
    pub fn set_problem(&mut self, num_variables: usize, num_clauses: usize) -> Result<(), Error> {
        if num_variables > self.limits.max_variables {
            return Err(Error::TooManyVariables {
                max: self.limits.max_variables,
            })
        }
        if num_clauses > self.limits.max_clauses {
            return Err(Error::ClauseOutOfRange)
        }
        self.num_variables = Some(num_variables);
        self.assignment.register_variables(num_variables);
        self.trail.register_variables(num_variables);
        self.occurrences.register_variables(num_variables);
        self.analyzer.register_variables(num_variables);
        self.marks.register_variables(num_variables);
        self.marks.register_clauses(num_clauses);
        Ok(())
    }

    /// Appends one literal to the clause currently being assembled.
    pub fn push_literal(&mut self, literal: Literal) {
        self.current_clause.push(literal);
    }

    /// Terminates the clause currently being assembled and stores it.
    ///
    /// A tautological clause is silently dropped, per spec. An empty
    /// clause is an error: the formula is trivially unsatisfiable and
    /// DIMACS readers are expected to reject it rather than construct a
    /// state around it (callers wanting to represent "unsatisfiable by
    /// construction" should surface this to their own caller instead).
    pub fn finalize_clause(&mut self) -> Result<(), Error> {
        let literals = core::mem::take(&mut self.current_clause);
        match self.sanitizer.sanitize(literals) {
            SanitizedLiterals::EmptyClause => Err(Error::EmptyClause),
            SanitizedLiterals::TautologicalClause => Ok(()),
            SanitizedLiterals::UnitClause(unit) => {
                let clause = Clause::new([unit]).expect("a single literal is never self-conflicting");
                let id = self.clauses.push_original(clause);
                self.occurrences.register_for_literal(unit, id);
                self.seed_root_unit(unit, id);
                Ok(())
            }
            SanitizedLiterals::Literals(literals) => {
                let literals: Vec<_> = literals.collect();
                let clause = Clause::new(literals)
                    .expect("sanitizer output is deduplicated and tautology-free");
                let id = self.clauses.push_original(clause.clone());
                for literal in &clause {
                    self.occurrences.register_for_literal(literal, id);
                }
                Ok(())
            }
        }
    }

    fn seed_root_unit(&mut self, unit: Literal, antecedent: crate::clause::ClauseId) {
        if self.root_conflict.is_some() {
            return
        }
        match self.assignment.literal_status(unit) {
            Some(true) => {} // already implied by an earlier unit clause
            // This unit clause's own literal is already falsified by an
            // earlier unit clause: it is itself the conflicting clause.
            Some(false) => self.root_conflict = Some(antecedent),
            None => self.trail.push_implication(unit, antecedent, &mut self.assignment),
        }
    }

    /// Finalizes construction, running the first propagation pass over any
    /// root-level unit clauses discovered while parsing.
    pub fn finish(mut self) -> Result<FormulaState, Error> {
        if !self.current_clause.is_empty() {
            self.finalize_clause()?;
        }
        self.clauses.finalize_originals();
        self.occurrences.freeze_original_counts();

        let conflict = if let Some(id) = self.root_conflict {
            Some(id)
        } else {
            bcp::propagate(
                &mut self.trail,
                &self.clauses,
                &self.occurrences,
                &mut self.assignment,
            )
            .err()
        };

        Ok(FormulaState::from_parts(
            self.clauses,
            self.occurrences,
            self.assignment,
            self.trail,
            self.analyzer,
            self.marks,
            conflict,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::{
        Sign,
        Variable,
    };

    fn lit(index: usize, sign: Sign) -> Literal {
        Variable::from_index(index).unwrap().into_literal(sign)
    }

    #[test]
    fn unit_cascade_propagates_during_construction() {
        // {(1), (-1 2), (-2 3)}
        let mut builder = FormulaBuilder::default();
        builder.set_problem(3, 3).unwrap();
        builder.push_literal(lit(0, Sign::TRUE));
        builder.finalize_clause().unwrap();
        builder.push_literal(lit(0, Sign::FALSE));
        builder.push_literal(lit(1, Sign::TRUE));
        builder.finalize_clause().unwrap();
        builder.push_literal(lit(1, Sign::FALSE));
        builder.push_literal(lit(2, Sign::TRUE));
        builder.finalize_clause().unwrap();
        let state = builder.finish().unwrap();
        assert!(!state.has_conflict());
        assert_eq!(state.value_of(Variable::from_index(2).unwrap()), Some(Sign::TRUE));
    }

    #[test]
    fn contradictory_unit_clauses_are_a_root_conflict() {
        let mut builder = FormulaBuilder::default();
        builder.set_problem(1, 2).unwrap();
        builder.push_literal(lit(0, Sign::TRUE));
        builder.finalize_clause().unwrap();
        builder.push_literal(lit(0, Sign::FALSE));
        builder.finalize_clause().unwrap();
        let state = builder.finish().unwrap();
        assert!(state.has_conflict());
    }

    #[test]
    fn empty_clause_is_rejected() {
        let mut builder = FormulaBuilder::default();
        builder.set_problem(1, 1).unwrap();
        assert_eq!(builder.finalize_clause(), Err(Error::EmptyClause));
    }
}
