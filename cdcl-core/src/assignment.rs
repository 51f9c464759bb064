use crate::literal::{
    Literal,
    Sign,
    Variable,
};
use cdcl_bounded::BoundedMap;

/// The current truth value of every variable, free or assigned.
#[derive(Debug, Default, Clone)]
pub struct VariableAssignment {
    values: BoundedMap<Variable, Sign>,
}

impl VariableAssignment {
    /// Grows the assignment to accommodate `additional` more variables.
    pub fn register_variables(&mut self, additional: usize) {
        let new_len = self.values.capacity() + additional;
        self.values.resize_capacity(new_len);
    }

    /// Returns the number of registered variables.
    pub fn len_variables(&self) -> usize {
        self.values.capacity()
    }

    /// Assigns `variable` the given sign.
    ///
    /// # Panics
    ///
    /// If `variable` is out of range.
    pub fn assign(&mut self, variable: Variable, sign: Sign) {
        self.values
            .insert(variable, sign)
            .expect("encountered out of bounds variable during assignment");
    }

    /// Restores `variable` to free.
    ///
    /// # Panics
    ///
    /// If `variable` is out of range.
    pub fn unassign(&mut self, variable: Variable) {
        self.values
            .take(variable)
            .expect("encountered out of bounds variable during unassignment");
    }

    /// Returns the current sign of `variable`, or `None` if free.
    pub fn value_of(&self, variable: Variable) -> Option<Sign> {
        self.values
            .get(variable)
            .expect("encountered out of bounds variable")
            .copied()
    }

    /// Returns `true` if `variable` currently holds an assignment.
    pub fn is_assigned(&self, variable: Variable) -> bool {
        self.value_of(variable).is_some()
    }

    /// Returns whether `literal` is satisfied (`Some(true)`), falsified
    /// (`Some(false)`), or its variable is free (`None`).
    pub fn literal_status(&self, literal: Literal) -> Option<bool> {
        self.value_of(literal.variable())
            .map(|sign| sign == literal.sign())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_and_unassign_round_trips() {
        let mut assignment = VariableAssignment::default();
        assignment.register_variables(2);
        let var = Variable::from_index(0).unwrap();
        assert!(!assignment.is_assigned(var));
        assignment.assign(var, Sign::TRUE);
        assert!(assignment.is_assigned(var));
        assert_eq!(assignment.value_of(var), Some(Sign::TRUE));
        assignment.unassign(var);
        assert!(!assignment.is_assigned(var));
    }

    #[test]
    fn literal_status_reflects_polarity() {
        let mut assignment = VariableAssignment::default();
        assignment.register_variables(1);
        let var = Variable::from_index(0).unwrap();
        let pos = var.into_literal(Sign::TRUE);
        let neg = var.into_literal(Sign::FALSE);
        assert_eq!(assignment.literal_status(pos), None);
        assignment.assign(var, Sign::TRUE);
        assert_eq!(assignment.literal_status(pos), Some(true));
        assert_eq!(assignment.literal_status(neg), Some(false));
    }
}
