use std::fmt::{Display, Formatter};

/// A lightweight handle to a node owned by a [`Bdd`][crate::bdd::Bdd] manager.
///
/// Because nodes are hash-consed, two `Ref`s obtained from the same manager
/// are equal **iff** the functions they denote are equal. All set-level
/// equality tests in the fixed-point evaluator rely on this.
///
/// A `Ref` is only meaningful together with the manager that produced it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Ref(u32);

impl Ref {
    /// The `⊥` terminal. Interned at the same table slot by every manager.
    pub const ZERO: Self = Self(1);
    /// The `⊤` terminal. Interned at the same table slot by every manager.
    pub const ONE: Self = Self(2);

    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The index of the referenced node in the manager's node table.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Ref::ZERO => write!(f, "@F"),
            Ref::ONE => write!(f, "@T"),
            Ref(i) => write!(f, "@{}", i),
        }
    }
}
