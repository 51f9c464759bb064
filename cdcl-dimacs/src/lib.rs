//! A DIMACS CNF reader that feeds a [`cdcl_core::FormulaBuilder`].
//!
//! Grounded on the corpus's `SolverBuilder`, which implements
//! [`cnf_parser::Output`] directly on top of its solver. Here the
//! `Output` impl lives in this crate instead, since `cdcl-core` knows
//! nothing about DIMACS; this reader is the only thing that does.
//!
//! Input rules:
//! - Lines beginning `c` are comments, ignored by the parser.
//! - One `p cnf N M` header declares `N` variables and `M` clauses.
//! - Each clause is whitespace-separated signed integers terminated by
//!   `0`.
//! - An empty clause (bare `0`) is silently dropped rather than treated
//!   as a parse error, since a DIMACS file with a stray terminator is
//!   common in the wild and isn't itself a malformed-clause report.

#![forbid(unsafe_code)]

use cdcl_core::{
    Error as CoreError,
    FormulaBuilder,
    FormulaState,
    Literal,
    SolverLimits,
};
use cnf_parser::{
    Error as CnfError,
    Input,
    Output,
};
use thiserror::Error;

/// Errors that can occur while reading a DIMACS CNF instance.
#[derive(Debug, Error)]
pub enum Error {
    /// The text itself is not valid DIMACS CNF.
    #[error("malformed DIMACS input: {0}")]
    Malformed(#[from] CnfError<CoreError>),

    /// The instance was well-formed but rejected by the formula store,
    /// e.g. more variables than its configured limits allow.
    #[error("rejected by the formula store: {0}")]
    Core(#[from] CoreError),
}

/// Reads a DIMACS CNF instance from `input`, bounded by `limits`.
pub fn read_dimacs<I>(input: &mut I, limits: SolverLimits) -> Result<FormulaState, Error>
where
    I: Input,
{
    let mut output = BuilderOutput::new(limits);
    cnf_parser::parse_cnf(input, &mut output)?;
    Ok(output.builder.finish()?)
}

/// Reads a DIMACS CNF instance from `input` with default formula-store
/// limits.
pub fn read_dimacs_default<I>(input: &mut I) -> Result<FormulaState, Error>
where
    I: Input,
{
    read_dimacs(input, SolverLimits::default())
}

fn literal_from_dimacs(literal: cnf_parser::Literal) -> Literal {
    Literal::from(literal.into_value().get())
}

/// Adapts a [`FormulaBuilder`] to the [`cnf_parser::Output`] the parser
/// drives clause-by-clause.
struct BuilderOutput {
    builder: FormulaBuilder,
    current_clause_len: usize,
}

impl BuilderOutput {
    fn new(limits: SolverLimits) -> Self {
        Self {
            builder: FormulaBuilder::new(limits),
            current_clause_len: 0,
        }
    }
}

impl Output for BuilderOutput {
    type Error = CoreError;

    fn problem(&mut self, num_variables: u32, num_clauses: u32) -> Result<(), Self::Error> {
        self.builder
            .set_problem(num_variables as usize, num_clauses as usize)
    }

    fn literal(&mut self, literal: cnf_parser::Literal) -> Result<(), Self::Error> {
        self.current_clause_len += 1;
        self.builder.push_literal(literal_from_dimacs(literal));
        Ok(())
    }

    fn finalize_clause(&mut self) -> Result<(), Self::Error> {
        let len = core::mem::take(&mut self.current_clause_len);
        if len == 0 {
            // An empty clause (bare terminator) is silently dropped.
            return Ok(())
        }
        self.builder.finalize_clause()
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        if self.current_clause_len != 0 {
            self.current_clause_len = 0;
            self.builder.finalize_clause()?;
        }
        Ok(())
    }
}
