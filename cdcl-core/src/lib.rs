//! A CDCL Boolean-satisfiability state engine.
//!
//! This crate owns the trail, unit propagation and first-UIP conflict
//! analysis that any CDCL search loop is built on, and nothing else: no
//! decision heuristic, no restart policy, no DIMACS parsing. A search
//! loop drives a [`FormulaState`] by calling [`FormulaState::decide`],
//! inspecting the returned [`DecideOutcome`], and on conflict calling
//! [`FormulaState::undo_decide`] until [`FormulaState::at_assertion_level`]
//! before [`FormulaState::assert_clause`]-ing the learned clause back in.
//!
//! [`FormulaBuilder`] is the only way to build a [`FormulaState`]: declare
//! the problem size, push clauses, then [`FormulaBuilder::finish`].

#![forbid(unsafe_code)]

mod analyze;
mod assignment;
mod bcp;
mod builder;
mod clause;
mod clause_db;
mod config;
mod error;
mod literal;
mod marks;
mod occurrence;
mod sanitizer;
mod state;
mod status;
mod trail;

pub use crate::{
    builder::FormulaBuilder,
    clause::{
        Clause,
        ClauseId,
    },
    config::SolverLimits,
    error::Error,
    literal::{
        Literal,
        Sign,
        Variable,
    },
    state::{
        DecideOutcome,
        FormulaState,
    },
    trail::DecisionLevel,
};
