use crate::{
    error::Error,
    literal::Literal,
};
use cdcl_bounded::Index;
use core::{
    iter,
    num::NonZeroU32,
    slice,
};
/// A slightly faster hash set due to usage of the `ahash` hasher.
type HashSet<T> = std::collections::HashSet<T, ahash::RandomState>;

/// The unique identifier of a stored clause.
///
/// Index `0` is reserved and never handed out, so a default-initialized
/// `ClauseId` can never alias a real clause.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ClauseId(NonZeroU32);

impl Index for ClauseId {
    #[inline]
    fn from_index(index: usize) -> Self {
        let raw = u32::try_from(index + 1).expect("encountered out of bounds clause index");
        Self(NonZeroU32::new(raw).expect("clause index overflowed"))
    }

    #[inline]
    fn into_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// An ordered sequence of literals, deduplicated and checked for
/// self-conflict at construction time.
///
/// Order is informational only: semantically a clause is a set of
/// literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    /// Creates a new clause from the given literals.
    ///
    /// Deduplicates repeated literals and sorts them in the process.
    ///
    /// # Errors
    ///
    /// - If the literals are empty.
    /// - If the literals are self-conflicting, e.g. `a AND -a`.
    pub fn new<L>(literals: L) -> Result<Self, Error>
    where
        L: IntoIterator<Item = Literal>,
    {
        let mut literals = literals.into_iter().collect::<Vec<_>>();
        if literals.is_empty() {
            return Err(Error::EmptyClause)
        }
        literals.sort_unstable();
        literals.dedup();
        let mut seen = HashSet::default();
        for &literal in &literals {
            if seen.contains(&!literal) {
                return Err(Error::SelfConflictingClause)
            }
            seen.insert(literal);
        }
        Ok(Self { literals })
    }

    /// Returns the single literal of this clause if it is a unit clause.
    pub fn unit_literal(&self) -> Option<Literal> {
        match self.literals.as_slice() {
            [unit] => Some(*unit),
            _ => None,
        }
    }

    /// Returns the number of literals in the clause.
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Returns `true` if the clause has no literals.
    ///
    /// Never true for a successfully constructed `Clause`; kept for symmetry
    /// with [`Self::len`].
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Returns the literals of the clause as a slice.
    pub fn as_slice(&self) -> &[Literal] {
        &self.literals
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = Literal;
    type IntoIter = iter::Copied<slice::Iter<'a, Literal>>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter().copied()
    }
}
