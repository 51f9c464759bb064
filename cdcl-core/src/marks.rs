//! Opaque consumer-owned mark bits.
//!
//! Grounded on `satapi.h`'s `mark` field on `Var`/`Clause`
//! ("THIS FIELD MUST STAY AS IS") and its `sat_mark_var`/`sat_unmark_var`/
//! `sat_marked_var` accessors (clause equivalents identical in shape). The
//! core never reads these itself — they exist purely so a consumer (a
//! search driver doing graph traversal, say) has one bit of scratch space
//! per variable and per clause without needing its own side table.

use crate::{
    clause::ClauseId,
    literal::Variable,
};
use cdcl_bounded::BoundedBitmap;

/// One mark bit per variable and one per clause.
#[derive(Debug, Default, Clone)]
pub struct Marks {
    variables: BoundedBitmap<Variable, bool>,
    clauses: BoundedBitmap<ClauseId, bool>,
}

impl Marks {
    /// Grows variable mark storage to accommodate `additional` more
    /// variables.
    pub fn register_variables(&mut self, additional: usize) {
        let new_len = self.variables.len() + additional;
        self.variables.resize_to_len(new_len);
    }

    /// Grows clause mark storage to accommodate `additional` more clauses.
    pub fn register_clauses(&mut self, additional: usize) {
        let new_len = self.clauses.len() + additional;
        self.clauses.resize_to_len(new_len);
    }

    /// Returns `true` if `variable` is marked.
    pub fn is_variable_marked(&self, variable: Variable) -> bool {
        self.variables
            .get(variable)
            .expect("encountered out of bounds variable")
    }

    /// Sets `variable`'s mark bit.
    pub fn mark_variable(&mut self, variable: Variable) {
        self.variables
            .set(variable, true)
            .expect("encountered out of bounds variable");
    }

    /// Clears `variable`'s mark bit.
    pub fn unmark_variable(&mut self, variable: Variable) {
        self.variables
            .set(variable, false)
            .expect("encountered out of bounds variable");
    }

    /// Returns `true` if `clause` is marked.
    pub fn is_clause_marked(&self, clause: ClauseId) -> bool {
        self.clauses
            .get(clause)
            .expect("encountered out of bounds clause id")
    }

    /// Sets `clause`'s mark bit.
    pub fn mark_clause(&mut self, clause: ClauseId) {
        self.clauses
            .set(clause, true)
            .expect("encountered out of bounds clause id");
    }

    /// Clears `clause`'s mark bit.
    pub fn unmark_clause(&mut self, clause: ClauseId) {
        self.clauses
            .set(clause, false)
            .expect("encountered out of bounds clause id");
    }
}
