//! The BDD manager: canonical node construction and the core algorithms.
//!
//! All nodes live in a single hash-consing [`Table`]; user code holds
//! [`Ref`] handles. Because [`Bdd::mk_node`] is the only constructor of
//! internal nodes and always consults the table, structurally equal BDDs are
//! reference-equal, and every set-level equality test in the crate is a plain
//! `Ref` comparison.

use std::cell::RefCell;
use std::cmp::min;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;

use log::debug;

use crate::cache::Cache;
use crate::node::Node;
use crate::reference::Ref;
use crate::table::Table;
use crate::types::{Lit, Op, Var};

/// The BDD manager.
///
/// Owns the unique node table and the `apply` memoization cache. All
/// operations take `&self`; the manager is single-threaded and uses interior
/// mutability so that it can be shared behind an `Rc` by the model layer.
pub struct Bdd {
    table: RefCell<Table<Node>>,
    apply_cache: RefCell<Cache<(Op, Ref, Ref), Ref>>,
    zero: Ref,
    one: Ref,
}

impl Bdd {
    /// Create a manager with `2^bits` table buckets and cache slots.
    pub fn new(bits: usize) -> Self {
        let mut table = Table::new(bits);

        // Install the two terminals at their fixed slots. They are appended
        // directly (not interned), so no bucket chain can ever reach them.
        let zero = Ref::new(table.add(Node::terminal()) as u32);
        let one = Ref::new(table.add(Node::terminal()) as u32);
        assert_eq!(zero, Ref::ZERO);
        assert_eq!(one, Ref::ONE);

        Self {
            table: RefCell::new(table),
            apply_cache: RefCell::new(Cache::new(bits)),
            zero,
            one,
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(16)
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bdd").field("num_nodes", &self.num_nodes()).finish()
    }
}

impl Bdd {
    /// The `⊥` terminal.
    pub fn zero(&self) -> Ref {
        self.zero
    }
    /// The `⊤` terminal.
    pub fn one(&self) -> Ref {
        self.one
    }
    /// The terminal for a boolean value.
    pub fn constant(&self, value: bool) -> Ref {
        if value {
            self.one
        } else {
            self.zero
        }
    }

    pub fn is_zero(&self, f: Ref) -> bool {
        f == self.zero
    }
    pub fn is_one(&self, f: Ref) -> bool {
        f == self.one
    }
    pub fn is_terminal(&self, f: Ref) -> bool {
        self.is_zero(f) || self.is_one(f)
    }

    /// The root variable of `f`, or [`Var::ZERO`] for terminals.
    pub fn variable(&self, f: Ref) -> Var {
        self.table.borrow()[f.index()].variable
    }
    /// The low child of an internal node.
    pub fn low(&self, f: Ref) -> Ref {
        debug_assert!(!self.is_terminal(f));
        self.table.borrow()[f.index()].low
    }
    /// The high child of an internal node.
    pub fn high(&self, f: Ref) -> Ref {
        debug_assert!(!self.is_terminal(f));
        self.table.borrow()[f.index()].high
    }

    /// Total number of nodes owned by the manager, terminals included.
    pub fn num_nodes(&self) -> usize {
        self.table.borrow().size() - 1 // without the sentry
    }

    /// Hits of the `apply` memoization cache.
    pub fn cache_hits(&self) -> usize {
        self.apply_cache.borrow().hits()
    }
    /// Misses of the `apply` memoization cache.
    pub fn cache_misses(&self) -> usize {
        self.apply_cache.borrow().misses()
    }

    /// The only constructor of internal nodes.
    ///
    /// Enforces reducedness (collapse when `low == high`) and uniqueness
    /// (interning through the node table). Orderedness is the caller's
    /// obligation: `v` must precede the root variables of both children.
    pub fn mk_node(&self, v: Var, low: Ref, high: Ref) -> Ref {
        assert_ne!(v, Var::ZERO, "Terminal variable in an internal node");
        debug_assert!(self.is_terminal(low) || v < self.variable(low));
        debug_assert!(self.is_terminal(high) || v < self.variable(high));

        if low == high {
            debug!("mk_node(v = {}): collapsing duplicate children {}", v, low);
            return low;
        }

        let index = self.table.borrow_mut().put(Node::new(v, low, high));
        Ref::new(index as u32)
    }

    /// The positive literal of a variable.
    pub fn mk_var(&self, v: Var) -> Ref {
        self.mk_node(v, self.zero, self.one)
    }

    /// The conjunction of a set of literals over distinct variables.
    ///
    /// Built bottom-up along the variable order, so no `apply` calls are
    /// needed.
    ///
    /// # Panics
    ///
    /// Panics if two literals mention the same variable.
    pub fn mk_cube(&self, lits: impl IntoIterator<Item = Lit>) -> Ref {
        let mut lits: Vec<Lit> = lits.into_iter().collect();
        lits.sort_by_key(|lit| std::cmp::Reverse(lit.var()));
        let mut res = self.one;
        for pair in lits.windows(2) {
            assert_ne!(pair[0].var(), pair[1].var(), "Duplicate variable in cube");
        }
        for lit in lits {
            res = if lit.is_positive() {
                self.mk_node(lit.var(), self.zero, res)
            } else {
                self.mk_node(lit.var(), res, self.zero)
            };
        }
        res
    }

    /// Top cofactors of `f` with respect to `v`.
    ///
    /// For a terminal, or a node whose root lies below `v` in the order, both
    /// cofactors are `f` itself.
    fn cofactors(&self, f: Ref, v: Var) -> (Ref, Ref) {
        if self.is_terminal(f) || v < self.variable(f) {
            return (f, f);
        }
        debug_assert_eq!(v, self.variable(f));
        (self.low(f), self.high(f))
    }

    /// Apply a binary boolean operator, given by its 4-entry truth table, to
    /// two BDDs.
    ///
    /// The recursion splits both operands on the smaller of their root
    /// variables and reassembles the results through [`mk_node`][Bdd::mk_node].
    /// Every call consults a global memoization cache keyed on `(op, p, q)`
    /// by node identity; since identity is canonical, the keying is sound.
    pub fn apply(&self, op: Op, p: Ref, q: Ref) -> Ref {
        if self.is_terminal(p) && self.is_terminal(q) {
            return self.constant(op.eval(self.is_one(p), self.is_one(q)));
        }

        let key = (op, p, q);
        if let Some(&res) = self.apply_cache.borrow().get(&key) {
            return res;
        }

        let pv = self.variable(p);
        let qv = self.variable(q);
        let v = if pv == Var::ZERO {
            qv
        } else if qv == Var::ZERO {
            pv
        } else {
            min(pv, qv)
        };

        let (p0, p1) = self.cofactors(p, v);
        let (q0, q1) = self.cofactors(q, v);

        let low = self.apply(op, p0, q0);
        let high = self.apply(op, p1, q1);
        let res = self.mk_node(v, low, high);
        debug!("apply({}, {}, {}) -> {}", op, p, q, res);

        self.apply_cache.borrow_mut().insert(key, res);
        res
    }

    pub fn apply_and(&self, p: Ref, q: Ref) -> Ref {
        self.apply(Op::AND, p, q)
    }
    pub fn apply_or(&self, p: Ref, q: Ref) -> Ref {
        self.apply(Op::OR, p, q)
    }
    pub fn apply_xor(&self, p: Ref, q: Ref) -> Ref {
        self.apply(Op::XOR, p, q)
    }
    pub fn apply_eq(&self, p: Ref, q: Ref) -> Ref {
        self.apply(Op::EQ, p, q)
    }
    pub fn apply_imply(&self, p: Ref, q: Ref) -> Ref {
        self.apply(Op::IMPLY, p, q)
    }
    /// `¬p`, expressed as `p → ⊥`.
    pub fn apply_not(&self, p: Ref) -> Ref {
        self.apply(Op::IMPLY, p, self.zero)
    }

    /// Conjunction over an iterator of BDDs.
    pub fn apply_and_many(&self, fs: impl IntoIterator<Item = Ref>) -> Ref {
        fs.into_iter().fold(self.one, |acc, f| self.apply_and(acc, f))
    }

    /// Restrict `f` by fixing variable `v` to a constant: nodes on `v` are
    /// replaced by the selected branch.
    pub fn set(&self, f: Ref, v: Var, value: bool) -> Ref {
        self.set_rec(f, v, value, &mut HashMap::new())
    }

    fn set_rec(&self, f: Ref, v: Var, value: bool, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if self.is_terminal(f) {
            return f;
        }
        let fv = self.variable(f);
        if v < fv {
            // Orderedness: v cannot occur below fv.
            return f;
        }
        if fv == v {
            return if value { self.high(f) } else { self.low(f) };
        }
        if let Some(&res) = cache.get(&f) {
            return res;
        }
        let low = self.set_rec(self.low(f), v, value, cache);
        let high = self.set_rec(self.high(f), v, value, cache);
        let res = self.mk_node(fv, low, high);
        cache.insert(f, res);
        res
    }

    /// Existential quantification: `∃v. f = f[v:=⊤] ∨ f[v:=⊥]`.
    pub fn exists(&self, f: Ref, v: Var) -> Ref {
        let hi = self.set(f, v, true);
        let lo = self.set(f, v, false);
        self.apply_or(hi, lo)
    }

    /// Existential quantification over a set of variables. The result does
    /// not depend on the order of elimination.
    pub fn exists_all(&self, f: Ref, vars: impl IntoIterator<Item = Var>) -> Ref {
        vars.into_iter().fold(f, |acc, v| self.exists(acc, v))
    }

    /// Rebuild `f` with every variable replaced by its next-step twin.
    ///
    /// Structure-preserving because twins are adjacent in the order.
    /// Idempotent: already-primed variables are left alone.
    pub fn next(&self, f: Ref) -> Ref {
        self.rename(f, true, &mut HashMap::new())
    }

    /// The inverse of [`next`][Bdd::next]: rebuild `f` with every variable
    /// replaced by its current-step companion.
    pub fn norm(&self, f: Ref) -> Ref {
        self.rename(f, false, &mut HashMap::new())
    }

    fn rename(&self, f: Ref, to_next: bool, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if self.is_terminal(f) {
            return f;
        }
        if let Some(&res) = cache.get(&f) {
            return res;
        }
        let v = self.variable(f);
        let v = if to_next { v.next() } else { v.norm() };
        let low = self.rename(self.low(f), to_next, cache);
        let high = self.rename(self.high(f), to_next, cache);
        let res = self.mk_node(v, low, high);
        cache.insert(f, res);
        res
    }

    /// Whether `p` and `q` share at least one satisfying assignment.
    pub fn intersects(&self, p: Ref, q: Ref) -> bool {
        !self.is_zero(self.apply_and(p, q))
    }

    /// Whether every satisfying assignment of `q` also satisfies `p`.
    pub fn contains(&self, p: Ref, q: Ref) -> bool {
        self.is_one(self.apply_imply(q, p))
    }

    /// Number of nodes reachable from `f`, terminals excluded.
    pub fn size(&self, f: Ref) -> usize {
        let mut seen = HashSet::new();
        let mut stack = vec![f];
        while let Some(g) = stack.pop() {
            if self.is_terminal(g) || !seen.insert(g) {
                continue;
            }
            stack.push(self.low(g));
            stack.push(self.high(g));
        }
        seen.len()
    }
}
