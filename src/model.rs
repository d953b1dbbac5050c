//! The model: variables, transitions, and the CTL fixed-point evaluator.
//!
//! A [`Model`] owns a shared [`Bdd`] manager, the variable [`Registry`], the
//! list of declared integers, and the monolithic transition relation
//! `T(s, s')` — the disjunction of `cond ∧ frame` over all added transitions.
//!
//! The existential CTL operators are evaluated by iterating the symbolic
//! pre-image [`Model::ex`] to a fixed point. Termination is detected by
//! reference equality of the BDD roots, which is exact by canonicity.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;
use num_traits::ToPrimitive;

use crate::bdd::Bdd;
use crate::int::Integer;
use crate::reference::Ref;
use crate::registry::Registry;
use crate::types::Var;

/// A finite-state transition system over boolean and bounded-integer
/// variables, with symbolic CTL evaluation.
pub struct Model {
    bdd: Rc<Bdd>,
    pub(crate) registry: RefCell<Registry>,
    pub(crate) ints: RefCell<Vec<Integer>>,
    /// The transition relation `T(s, s')`; `⊥` while no transition was added.
    trans: Cell<Ref>,
}

impl Model {
    pub fn new() -> Self {
        let bdd = Rc::new(Bdd::default());
        let trans = Cell::new(bdd.zero());
        Model {
            bdd,
            registry: RefCell::new(Registry::new()),
            ints: RefCell::new(Vec::new()),
            trans,
        }
    }

    /// The shared BDD manager.
    pub fn bdd(&self) -> &Bdd {
        &self.bdd
    }

    /// The transition relation built so far.
    pub fn transition(&self) -> Ref {
        self.trans.get()
    }

    /// Declare a fresh boolean variable and return its positive literal.
    pub fn bool_var(&self, name: impl Into<String>) -> Ref {
        let v = self.registry.borrow_mut().alloc(name, false);
        self.bdd.mk_var(v)
    }

    /// Declare a fresh non-negative integer `0 <= x <= upper_bound`.
    ///
    /// The declared bound fixes the bit width `⌈log2(upper_bound+1)⌉`
    /// (minimum 1); the width, not the bound itself, is what the encoding
    /// enforces.
    pub fn int_var(&self, name: impl Into<String>, upper_bound: u64) -> Integer {
        let name = name.into();
        let width = Integer::width_for(upper_bound);
        let int = self.alloc_int(&name, width, false);
        self.register_int(int.clone());
        int
    }

    /// Allocate the bit-variables of an integer without registering it.
    pub(crate) fn alloc_int(&self, name: &str, width: usize, aux: bool) -> Integer {
        let mut registry = self.registry.borrow_mut();
        let bits = (0..width).map(|n| registry.alloc(format!("{}[{}]", name, n), aux)).collect();
        Integer::from_bits(name.to_string(), bits, aux, self.bdd.one())
    }

    /// Record an integer so that projection can collapse its bits.
    pub(crate) fn register_int(&self, int: Integer) {
        self.ints.borrow_mut().push(int);
    }

    /// Add a transition: `cond` over current-step variables, `frame` relating
    /// current-step to next-step variables.
    pub fn add(&self, cond: Ref, frame: Ref) {
        let step = self.bdd.apply_and(cond, frame);
        let trans = self.bdd.apply_or(self.trans.get(), step);
        self.trans.set(trans);
        debug!("add: transition relation now has {} nodes", self.bdd.size(trans));
    }

    /// All allocated variables (user and auxiliary), unprimed.
    fn all_vars(&self) -> Vec<Var> {
        self.registry.borrow().vars().collect()
    }

    /// The states in `start` that can transition to a state in `goal`.
    ///
    /// Computes `∃s'. start(s) ∧ T(s, s') ∧ goal(s')`; the result ranges over
    /// current-step variables only.
    pub fn ex(&self, start: Ref, goal: Ref) -> Ref {
        let bdd = self.bdd();
        let mut states = bdd.apply_and(start, self.trans.get());
        states = bdd.apply_and(states, bdd.next(goal));
        for v in self.all_vars() {
            states = bdd.exists(states, v.next());
        }
        states
    }

    /// The states in `goal` reachable from `start` in one step (the inverse
    /// pre-image), used for backward witness extraction.
    ///
    /// Computes `∃s. goal(s') ∧ T(s, s') ∧ start(s)` and renames the result
    /// back into the current-step alphabet.
    pub fn ex_inv(&self, start: Ref, goal: Ref) -> Ref {
        let bdd = self.bdd();
        let mut states = bdd.apply_and(bdd.next(goal), self.trans.get());
        states = bdd.apply_and(states, start);
        for v in self.all_vars() {
            states = bdd.exists(states, v);
        }
        bdd.norm(states)
    }

    /// The `E[step U goal]` fixed-point sequence.
    ///
    /// `sets[n]` is the set of states from which `goal` is reachable in at
    /// most `n` steps along states satisfying `step`. The iteration
    /// `S_{n+1} = S_n ∨ EX(step, S_n)` is monotone over a finite space, so it
    /// stabilizes; the returned sequence contains each distinct set once.
    pub fn eu(&self, step: Ref, goal: Ref) -> Vec<Ref> {
        let bdd = self.bdd();
        let mut sets = vec![goal];
        loop {
            let last = *sets.last().unwrap();
            let next = bdd.apply_or(last, self.ex(step, last));
            if next == last {
                debug!("eu: stabilized after {} sets", sets.len());
                return sets;
            }
            sets.push(next);
        }
    }

    /// The `EF goal` fixed-point sequence: `E[⊤ U goal]`.
    pub fn ef(&self, goal: Ref) -> Vec<Ref> {
        self.eu(self.bdd.one(), goal)
    }

    /// The `EG cond` fixed-point sequence.
    ///
    /// `sets[n]` is the set of states from which some path satisfies `cond`
    /// for at least `n` further steps. The iteration
    /// `S_{n+1} = S_n ∧ EX(cond, S_n)` is antitone, so it stabilizes; the
    /// final set is `EG cond` proper.
    pub fn eg(&self, cond: Ref) -> Vec<Ref> {
        let bdd = self.bdd();
        let mut sets = vec![cond];
        loop {
            let last = *sets.last().unwrap();
            let next = bdd.apply_and(last, self.ex(cond, last));
            if next == last {
                debug!("eg: stabilized after {} sets", sets.len());
                return sets;
            }
            sets.push(next);
        }
    }

    /// Number of assignments over all registered variables (auxiliaries
    /// included) satisfying `f`, if it fits a `u64`.
    pub fn count_states(&self, f: Ref) -> Option<u64> {
        let num_vars = self.registry.borrow().len();
        self.bdd.sat_count(f, num_vars).to_u64()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
