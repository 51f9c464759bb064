use cdcl_bounded::{
    Bool,
    Index,
};
use core::{
    convert::TryFrom,
    fmt,
    fmt::{
        Debug,
        Display,
        Formatter,
    },
    ops::Not,
};

/// The polarity of a literal, or equivalently the truth value currently
/// assigned to a variable.
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Sign(bool);

impl Debug for Sign {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.into_bool() {
            true => write!(f, "Sign::True"),
            false => write!(f, "Sign::False"),
        }
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_false() {
            write!(f, "-")?;
        }
        Ok(())
    }
}

impl Sign {
    /// The sign representing a `true` assignment / positive literal polarity.
    pub const TRUE: Self = Self(true);
    /// The sign representing a `false` assignment / negative literal polarity.
    pub const FALSE: Self = Self(false);

    /// Returns `true` if this sign stands for a positive polarity or a `true` assignment.
    #[inline]
    pub fn is_true(self) -> bool {
        self.0
    }

    /// Returns `true` if this sign stands for a negative polarity or a `false` assignment.
    #[inline]
    pub fn is_false(self) -> bool {
        !self.is_true()
    }
}

impl Bool for Sign {
    #[inline]
    fn from_bool(value: bool) -> Self {
        Self(value)
    }

    #[inline]
    fn into_bool(self) -> bool {
        self.0
    }
}

impl Not for Sign {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

/// A literal: a signed reference to a [`Variable`].
///
/// Bit-packed as `(variable_index << 1) | polarity_bit`, following the
/// encoding the rest of the corpus uses for dense index types.
#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[repr(transparent)]
pub struct Literal {
    value: u32,
}

impl Debug for Literal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}{}", self.sign(), self.variable().into_index() + 1)
    }
}

impl Literal {
    /// Returns the variable this literal refers to.
    #[inline]
    pub fn variable(self) -> Variable {
        Variable::from(self)
    }

    /// Returns the polarity of this literal.
    #[inline]
    pub fn sign(self) -> Sign {
        Sign((self.value & 1) == 0)
    }

    /// Returns `true` if this literal has positive polarity.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.sign().is_true()
    }

    /// Returns `true` if this literal has negative polarity.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.sign().is_false()
    }

    /// Returns the reserved weight of this literal.
    ///
    /// Always `1.0` in the core; a hook reserved for a future weighted
    /// model counting extension, never read internally.
    #[inline]
    pub fn weight(self) -> f64 {
        1.0
    }
}

impl From<i32> for Literal {
    #[inline]
    fn from(signed: i32) -> Self {
        debug_assert!(signed != 0);
        let var = signed.unsigned_abs() - 1;
        let sign = (signed < 0) as u32;
        Literal {
            value: (var << 1) + sign,
        }
    }
}

impl Not for Literal {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        Self {
            value: self.value ^ 1,
        }
    }
}

/// A unique Boolean variable, identified by a dense zero-based index.
///
/// External-facing indices (DIMACS, driver output) are 1-based; the `+1`
/// translation happens at the boundary, never inside the core.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Variable {
    value: u32,
}

impl Debug for Variable {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Var({})", self.value + 1)
    }
}

impl From<Literal> for Variable {
    #[inline]
    fn from(literal: Literal) -> Self {
        Self {
            value: literal.value >> 1,
        }
    }
}

impl Variable {
    /// The maximum supported number of unique variables.
    pub const MAX_LEN: usize = (u32::MAX >> 1) as usize;

    /// Returns `true` if the given index could name a variable.
    #[inline]
    pub fn is_valid_index(index: usize) -> bool {
        index < Self::MAX_LEN && i32::try_from(index).is_ok()
    }

    /// Returns the variable for the given zero-based index if valid.
    pub fn from_index(index: usize) -> Option<Self> {
        if !Self::is_valid_index(index) {
            return None
        }
        u32::try_from(index).ok().map(|value| Self { value })
    }

    /// Returns the literal for this variable with the given sign.
    #[inline]
    pub fn into_literal(self, sign: Sign) -> Literal {
        let polarity = (!sign.into_bool()) as u32;
        Literal {
            value: (self.value << 1) + polarity,
        }
    }

    /// Returns the zero-based index of the variable.
    #[inline]
    pub fn into_index(self) -> usize {
        self.value as usize
    }
}

impl Index for Variable {
    #[inline]
    fn from_index(index: usize) -> Self {
        Variable::from_index(index).expect("encountered invalid variable index")
    }

    #[inline]
    fn into_index(self) -> usize {
        Variable::into_index(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_round_trips_through_variable_and_sign() {
        let var = Variable::from_index(4).unwrap();
        let pos = var.into_literal(Sign::TRUE);
        let neg = var.into_literal(Sign::FALSE);
        assert_eq!(pos.variable(), var);
        assert_eq!(neg.variable(), var);
        assert!(pos.is_positive());
        assert!(neg.is_negative());
        assert_eq!(!pos, neg);
        assert_eq!(!neg, pos);
    }

    #[test]
    fn literal_from_dimacs_int_works() {
        let pos = Literal::from(5);
        let neg = Literal::from(-5);
        assert_eq!(pos.variable(), neg.variable());
        assert!(pos.is_positive());
        assert!(neg.is_negative());
        assert_eq!(pos.variable(), Variable::from_index(4).unwrap());
    }

    #[test]
    fn variable_out_of_range_rejected() {
        assert!(Variable::from_index(Variable::MAX_LEN).is_none());
        assert!(Variable::from_index(Variable::MAX_LEN - 1).is_some());
    }
}
