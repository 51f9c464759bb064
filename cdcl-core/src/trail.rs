use crate::{
    clause::ClauseId,
    literal::{
        Literal,
        Sign,
        Variable,
    },
};
use cdcl_bounded::{
    BoundedMap,
    BoundedStack,
};
use core::fmt;

/// A decision level. Level 1 is the root (unit-clause consequences only);
/// a driver's first decision is level 2, matching the convention that an
/// empty decision stack is itself "at" the root level.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct DecisionLevel(u32);

impl fmt::Debug for DecisionLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Level({})", self.0)
    }
}

impl DecisionLevel {
    /// The root level: no decisions on the trail yet.
    pub const ROOT: Self = Self(1);

    fn from_raw(value: usize) -> Self {
        Self(value as u32)
    }

    /// Returns this level as a plain integer, for display and comparison
    /// against caller-tracked assertion levels.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Per-variable bookkeeping needed by the trail and the analyzer: the
/// level it was assigned at, its rank (chronological position on the
/// trail), and its antecedent clause if it was implied rather than
/// decided.
#[derive(Debug, Copy, Clone)]
struct VarInfo {
    level: DecisionLevel,
    rank: usize,
    antecedent: Option<ClauseId>,
}

/// The ordered record of decisions and their implications.
///
/// Decisions and implications share one backing stack (`stack`), the way
/// the newest of the corpus's propagation drafts keeps them: a literal's
/// *rank* is simply its position in this stack at push time, and popping
/// (`undo_decision`) both frees the corresponding variables and "releases"
/// every rank above the truncation point for free — no separate counter
/// is threaded through push/pop.
///
/// `level_starts[i]` is the stack position where level `i + 1` begins;
/// `level_starts[0]` is always `0` (the root level starts at the bottom of
/// the stack). `propagate_head` is the index of the next literal BCP has
/// not yet drained — the trail doubles as the BCP engine's FIFO queue.
#[derive(Debug, Default, Clone)]
pub struct Trail {
    stack: BoundedStack<Literal>,
    level_starts: Vec<usize>,
    propagate_head: usize,
    info: BoundedMap<Variable, VarInfo>,
}

impl Trail {
    /// Grows the trail to accommodate `additional` more variables.
    pub fn register_variables(&mut self, additional: usize) {
        let new_len = self.stack.capacity() + additional;
        self.stack.resize_capacity(new_len);
        self.info.resize_capacity(new_len);
    }

    fn ensure_root(&mut self) {
        if self.level_starts.is_empty() {
            self.level_starts.push(0);
        }
    }

    /// Returns the current decision level.
    pub fn current_decision_level(&self) -> DecisionLevel {
        DecisionLevel::from_raw(self.level_starts.len().max(1))
    }

    /// Returns the number of entries on the trail.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns `true` if no literal has been assigned yet.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Returns the decision level `variable` was assigned at, if assigned.
    pub fn level_of(&self, variable: Variable) -> Option<DecisionLevel> {
        self.info
            .get(variable)
            .expect("encountered out of bounds variable")
            .map(|info| info.level)
    }

    /// Returns the rank `variable` was assigned at, if assigned.
    pub fn rank_of(&self, variable: Variable) -> Option<usize> {
        self.info
            .get(variable)
            .expect("encountered out of bounds variable")
            .map(|info| info.rank)
    }

    /// Returns the antecedent clause that implied `variable`, if any.
    ///
    /// `None` both for free variables and for decided ones: the caller
    /// distinguishes those via [`Self::level_of`] plus whether the
    /// variable is the first entry of its level.
    pub fn antecedent_of(&self, variable: Variable) -> Option<ClauseId> {
        self.info
            .get(variable)
            .expect("encountered out of bounds variable")
            .and_then(|info| info.antecedent)
    }

    fn push_raw(
        &mut self,
        literal: Literal,
        antecedent: Option<ClauseId>,
        assignment: &mut crate::assignment::VariableAssignment,
    ) {
        let rank = self.stack.len();
        let level = self.current_decision_level();
        self.stack.push(literal);
        assignment.assign(literal.variable(), literal.sign());
        self.info
            .insert(
                literal.variable(),
                VarInfo {
                    level,
                    rank,
                    antecedent,
                },
            )
            .expect("encountered out of bounds variable during trail push");
    }

    /// Pushes a new decision, bumping the decision level.
    ///
    /// The variable of `literal` must currently be free.
    pub fn push_decision(
        &mut self,
        literal: Literal,
        assignment: &mut crate::assignment::VariableAssignment,
    ) {
        self.ensure_root();
        self.level_starts.push(self.stack.len());
        self.push_raw(literal, None, assignment);
    }

    /// Pushes a new implication at the current decision level.
    pub fn push_implication(
        &mut self,
        literal: Literal,
        antecedent: ClauseId,
        assignment: &mut crate::assignment::VariableAssignment,
    ) {
        self.ensure_root();
        self.push_raw(literal, Some(antecedent), assignment);
    }

    /// Pops the next not-yet-propagated literal, in FIFO order.
    pub fn pop_enqueued(&mut self) -> Option<Literal> {
        if self.propagate_head == self.stack.len() {
            return None
        }
        let literal = self.stack[self.propagate_head];
        self.propagate_head += 1;
        Some(literal)
    }

    /// Returns the literals assigned at the current decision level, in
    /// the order they were assigned (decision first, then its
    /// implications).
    pub fn current_level_literals(&self) -> &[Literal] {
        let start = *self
            .level_starts
            .last()
            .unwrap_or(&0);
        &self.stack[start..]
    }

    /// Undoes the most recent decision and every implication at its
    /// level, restoring the affected variables to free.
    ///
    /// # Panics
    ///
    /// If the decision stack is empty (already at the root level).
    pub fn undo_decision(&mut self, assignment: &mut crate::assignment::VariableAssignment) {
        assert!(
            self.level_starts.len() > 1,
            "attempted to undo a decision at the root level"
        );
        let new_len = self.level_starts.pop().expect("checked non-empty above");
        self.stack.pop_to(new_len, |popped| {
            assignment.unassign(popped.variable());
        });
        self.propagate_head = self.propagate_head.min(new_len);
    }
}
