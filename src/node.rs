use crate::reference::Ref;
use crate::types::Var;
use crate::utils::MyHash;

/// A BDD node representing a decision point in the diagram.
///
/// # Fields
///
/// - `variable`: Variable identity ([`Var::ZERO`] for terminals)
/// - `low`: Low child (followed when the variable is false)
/// - `high`: High child (followed when the variable is true)
///
/// # Structure
///
/// Each internal node represents a Shannon decomposition:
/// ```text
/// f = (¬v ∧ f_low) ∨ (v ∧ f_high)
/// ```
///
/// Reducedness (`low != high`) and uniqueness are enforced by
/// [`Bdd::mk_node`][crate::bdd::Bdd::mk_node], which interns every node
/// through the manager's [`Table`][crate::table::Table]. The hash of
/// `(variable, low, high)` is precomputed for fast bucket lookups.
#[derive(Debug, Copy, Clone)]
pub struct Node {
    pub variable: Var,
    pub low: Ref,
    pub high: Ref,
    /// Precomputed hash of `(variable, low, high)`.
    hash: u64,
}

impl Default for Node {
    fn default() -> Self {
        Self::terminal()
    }
}

impl Node {
    /// Creates a new node with the given variable and children.
    pub fn new(variable: Var, low: Ref, high: Ref) -> Self {
        let hash = MyHash::hash(&(variable, low, high));
        Self { variable, low, high, hash }
    }

    /// A terminal node. Terminals are installed directly by the manager and
    /// never participate in bucket chains.
    pub(crate) fn terminal() -> Self {
        Self::new(Var::ZERO, Ref::ZERO, Ref::ONE)
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.variable == other.variable && self.low == other.low && self.high == other.high
    }
}

impl Eq for Node {}
