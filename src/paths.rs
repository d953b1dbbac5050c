//! Iterator over satisfying paths in a BDD.
//!
//! Each yielded path is a partial assignment: the conjunction of literals
//! along one root-to-`⊤` traversal. Variables not mentioned on the path are
//! free (the function is true for either value).
//!
//! The projection layer ([`crate::state`]) uses this to enumerate the states
//! of a symbolic state set; witness extraction takes the first yielded path
//! as its deterministic pick.
//!
//! Note: The number of paths can be exponential in the number of variables,
//! so use with caution on large BDDs.

use crate::bdd::Bdd;
use crate::reference::Ref;
use crate::types::Lit;

impl Bdd {
    /// Returns an iterator over all satisfying paths (paths to `⊤`) in the BDD.
    ///
    /// Each path is a `Vec<Lit>` ordered by the variable order. The high
    /// branch of every node is explored first, so the iteration order is
    /// deterministic.
    ///
    /// # Examples
    ///
    /// ```
    /// use ctl_rs::bdd::Bdd;
    /// use ctl_rs::types::Var;
    ///
    /// let bdd = Bdd::default();
    /// let x = bdd.mk_var(Var::new(1));
    /// let y = bdd.mk_var(Var::new(2));
    ///
    /// // f = x XOR y (true when exactly one is true)
    /// let f = bdd.apply_xor(x, y);
    /// assert_eq!(bdd.paths(f).count(), 2);
    ///
    /// // Constant ⊤ has exactly one (empty) path; ⊥ has none.
    /// assert_eq!(bdd.paths(bdd.one()).count(), 1);
    /// assert_eq!(bdd.paths(bdd.zero()).count(), 0);
    /// ```
    pub fn paths(&self, f: Ref) -> BddPaths<'_> {
        BddPaths::new(self, f)
    }
}

/// Iterator state for exploring a single node.
#[derive(Debug, Clone, Copy)]
enum Branch {
    /// About to explore the high (then) branch
    High,
    /// About to explore the low (else) branch
    Low,
}

/// Frame on the exploration stack.
#[derive(Debug)]
struct StackFrame {
    node: Ref,
    /// Which branch to explore next (None if both explored)
    next_branch: Option<Branch>,
}

/// An iterator over satisfying paths in a BDD.
///
/// Created by [`Bdd::paths()`]. Uses depth-first traversal with backtracking;
/// the current path is maintained in a single vector that grows and shrinks
/// as the traversal proceeds.
pub struct BddPaths<'a> {
    bdd: &'a Bdd,
    stack: Vec<StackFrame>,
    current_path: Vec<Lit>,
}

impl<'a> BddPaths<'a> {
    pub fn new(bdd: &'a Bdd, f: Ref) -> Self {
        BddPaths {
            bdd,
            stack: vec![StackFrame {
                node: f,
                next_branch: Some(Branch::High),
            }],
            current_path: Vec::new(),
        }
    }
}

impl Iterator for BddPaths<'_> {
    type Item = Vec<Lit>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let node = frame.node;
            let next_branch = frame.next_branch;

            if self.bdd.is_one(node) {
                // Found a satisfying path.
                let result = self.current_path.clone();
                self.stack.pop();
                if !self.stack.is_empty() {
                    self.current_path.pop();
                }
                return Some(result);
            }

            if self.bdd.is_zero(node) {
                // Dead end.
                self.stack.pop();
                if !self.stack.is_empty() {
                    self.current_path.pop();
                }
                continue;
            }

            let var = self.bdd.variable(node);

            match next_branch {
                Some(Branch::High) => {
                    frame.next_branch = Some(Branch::Low);
                    let high = self.bdd.high(node);
                    self.current_path.push(Lit::pos(var));
                    self.stack.push(StackFrame {
                        node: high,
                        next_branch: Some(Branch::High),
                    });
                }
                Some(Branch::Low) => {
                    // The high literal was popped when we backtracked from the
                    // high child.
                    frame.next_branch = None;
                    let low = self.bdd.low(node);
                    self.current_path.push(Lit::neg(var));
                    self.stack.push(StackFrame {
                        node: low,
                        next_branch: Some(Branch::High),
                    });
                }
                None => {
                    // Both branches explored.
                    self.stack.pop();
                    if !self.stack.is_empty() {
                        self.current_path.pop();
                    }
                }
            }
        }
    }
}
