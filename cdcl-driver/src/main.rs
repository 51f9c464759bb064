//! Example end-to-end CLI exercising [`cdcl_core::FormulaState`].
//!
//! This binary is not part of the library: it supplies the thinnest
//! possible branching policy (first free variable, always try its
//! positive literal) purely so the workspace has a runnable example.
//! It carries none of the core's invariants.

use cdcl_core::{
    Clause,
    DecideOutcome,
    DecisionLevel,
    Error as CoreError,
    FormulaState,
    Sign,
};
use cdcl_dimacs::Error as DimacsError;
use clap::Parser;
use std::{
    fs,
    path::PathBuf,
    process,
};

#[derive(Parser, Debug)]
#[command(name = "cdcl", about = "Decides satisfiability of a DIMACS CNF file")]
struct Cli {
    /// Path to a DIMACS `.cnf` file.
    input: PathBuf,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let bytes = fs::read(&cli.input).unwrap_or_else(|err| {
        eprintln!("couldn't read {}: {}", cli.input.display(), err);
        process::exit(2);
    });
    let mut state = match cdcl_dimacs::read_dimacs_default(&mut &bytes[..]) {
        Ok(state) => state,
        Err(DimacsError::Malformed(err)) => {
            eprintln!("malformed DIMACS input: {}", err);
            process::exit(2);
        }
        Err(DimacsError::Core(err)) => {
            eprintln!("rejected formula: {}", err);
            process::exit(2);
        }
    };

    match solve(&mut state) {
        Ok(true) => {
            println!("SAT");
            print_model(&state);
        }
        Ok(false) => println!("UNSAT"),
        Err(err) => {
            eprintln!("internal error: {}", err);
            process::exit(1);
        }
    }
}

/// Runs the search loop to completion. Returns `Ok(true)` for SAT,
/// `Ok(false)` for UNSAT.
///
/// The clause a conflict asserts is always the one `decide`/`assert_clause`
/// just handed back, not the original falsified clause `conflict_reason`
/// names: re-asserting the falsified clause itself may no longer be unit
/// once the driver backtracks, in which case nothing new would propagate
/// and the same decision would immediately repeat the same conflict.
fn solve(state: &mut FormulaState) -> Result<bool, CoreError> {
    if state.has_conflict() {
        return Ok(false)
    }
    let mut pending_conflict: Option<Clause> = None;
    loop {
        if let Some(learned) = pending_conflict.take() {
            if !backtrack_to_assertion_level(state)? {
                return Ok(false)
            }
            log::debug!("asserting learned clause of size {}", learned.as_slice().len());
            match state.assert_clause(learned)? {
                DecideOutcome::NoConflict => {}
                DecideOutcome::Conflict(next_learned) => pending_conflict = Some(next_learned),
            }
            continue
        }
        match next_unassigned(state) {
            None => return Ok(true),
            Some(variable) => {
                let literal = variable.into_literal(Sign::TRUE);
                log::trace!("deciding {:?}", literal);
                match state.decide(literal)? {
                    DecideOutcome::NoConflict => {}
                    DecideOutcome::Conflict(learned) => pending_conflict = Some(learned),
                }
            }
        }
    }
}

/// Undoes decisions until the current level matches the most recent
/// conflict's assertion level. Returns `false` if the decision stack is
/// already exhausted, meaning the conflict survives at the root level
/// with nothing left to undo: the formula is unsatisfiable.
fn backtrack_to_assertion_level(state: &mut FormulaState) -> Result<bool, CoreError> {
    if state.current_decision_level() == DecisionLevel::ROOT {
        return Ok(false)
    }
    while !state.at_assertion_level() {
        state.undo_decide()?;
        if state.current_decision_level() == DecisionLevel::ROOT {
            return Ok(state.at_assertion_level())
        }
    }
    Ok(true)
}

fn next_unassigned(state: &FormulaState) -> Option<cdcl_core::Variable> {
    (0..state.num_variables())
        .map(|index| state.variable_of(index).expect("index in range"))
        .find(|&variable| !state.is_variable_assigned(variable))
}

fn print_model(state: &FormulaState) {
    let assignments: Vec<String> = (0..state.num_variables())
        .map(|index| {
            let variable = state.variable_of(index).expect("index in range");
            match state.value_of(variable) {
                Some(Sign::TRUE) => format!("{}", index + 1),
                Some(Sign::FALSE) => format!("-{}", index + 1),
                None => format!("{}", index + 1),
            }
        })
        .collect();
    println!("{}", assignments.join(" "));
}
