//! Concrete states and the projection from symbolic state sets.
//!
//! A [`State`] is the user-level view of one assignment: boolean variables by
//! name plus integer variables by name. Auxiliary variables are dropped
//! unless explicitly requested.
//!
//! Because auxiliary bits may take several witnessing values for the same
//! user-level state, projection de-duplicates after collapsing bit-vectors,
//! and sorts the result by the value-based total order of `State` for stable
//! outputs.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::model::Model;
use crate::reference::Ref;
use crate::types::{Lit, Var};

/// A concrete user-level state: boolean and integer variable valuations.
///
/// Equality and ordering are value-based (booleans first, then integers,
/// each sorted by name).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct State {
    bools: BTreeMap<String, bool>,
    ints: BTreeMap<String, u64>,
}

impl State {
    /// The value of a boolean variable, if present.
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.bools.get(name).copied()
    }

    /// The value of an integer variable, if present.
    pub fn int(&self, name: &str) -> Option<u64> {
        self.ints.get(name).copied()
    }

    /// Boolean entries, sorted by name.
    pub fn bools(&self) -> impl Iterator<Item = (&str, bool)> {
        self.bools.iter().map(|(name, &value)| (name.as_str(), value))
    }

    /// Integer entries, sorted by name.
    pub fn ints(&self) -> impl Iterator<Item = (&str, u64)> {
        self.ints.iter().map(|(name, &value)| (name.as_str(), value))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bools = self.bools().map(|(name, value)| format!("{}={}", name, if value { "1" } else { "0" }));
        let ints = self.ints().map(|(name, value)| format!("{}={}", name, value));
        write!(f, "{{{}}}", bools.chain(ints).collect::<Vec<_>>().join(", "))
    }
}

impl Model {
    /// Enumerate the user-level states of a symbolic state set, deduplicated
    /// and sorted.
    pub fn states(&self, f: Ref) -> Vec<State> {
        self.project(f, false)
    }

    /// Like [`states`][Model::states], but auxiliary variables are expanded
    /// and kept in the result.
    pub fn states_with_aux(&self, f: Ref) -> Vec<State> {
        self.project(f, true)
    }

    fn project(&self, f: Ref, aux: bool) -> Vec<State> {
        let assignments = self
            .bdd()
            .paths(f)
            .map(|path| path.into_iter().map(|lit| (lit.var(), lit.value())).collect())
            .collect();
        let expanded = self.expand_states(assignments, aux);

        let mut states: Vec<State> = Vec::with_capacity(expanded.len());
        for assignment in expanded {
            let state = self.project_state(assignment, aux);
            // Several auxiliary valuations can collapse to one visible state.
            if !states.contains(&state) {
                states.push(state);
            }
        }
        states.sort();
        states
    }

    /// Fork every partial assignment over its free variables (auxiliaries
    /// only when requested).
    fn expand_states(&self, mut states: Vec<HashMap<Var, bool>>, aux: bool) -> Vec<HashMap<Var, bool>> {
        let vars: Vec<Var> = {
            let registry = self.registry.borrow();
            registry.vars().filter(|&v| aux || !registry.is_aux(v)).collect()
        };
        for v in vars {
            states = states
                .into_iter()
                .flat_map(|mut state| {
                    if state.contains_key(&v) {
                        vec![state]
                    } else {
                        let mut other = state.clone();
                        state.insert(v, true);
                        other.insert(v, false);
                        vec![state, other]
                    }
                })
                .collect();
        }
        states
    }

    /// Collapse one assignment into user-visible form: integer bit-vectors
    /// are summed LSB-first into values; auxiliary entries are dropped unless
    /// requested.
    pub(crate) fn project_state(&self, mut assignment: HashMap<Var, bool>, aux: bool) -> State {
        let mut ints = BTreeMap::new();
        for int in self.ints.borrow().iter() {
            let mut value = 0u64;
            for (n, v) in int.bit_vars().iter().enumerate() {
                if assignment.remove(v) == Some(true) {
                    value += 1 << n;
                }
            }
            if aux || !int.is_aux() {
                ints.insert(int.name(), value);
            }
        }

        let registry = self.registry.borrow();
        let mut bools = BTreeMap::new();
        for (v, value) in assignment {
            debug_assert!(!v.is_next(), "Projection of a next-step variable");
            if aux || !registry.is_aux(v) {
                bools.insert(registry.name(v).to_string(), value);
            }
        }

        State { bools, ints }
    }

    /// Pick one concrete state from a non-empty set: take the first
    /// satisfying path and default every free user variable to false.
    ///
    /// Returns the projected state together with the cube encoding the full
    /// picked assignment (auxiliaries receive a witness value but are not
    /// surfaced in the state).
    pub(crate) fn pick_state(&self, f: Ref) -> Option<(State, Ref)> {
        let path = self.bdd().paths(f).next()?;
        let mut assignment: HashMap<Var, bool> = path.into_iter().map(|lit| (lit.var(), lit.value())).collect();
        {
            let registry = self.registry.borrow();
            for v in registry.vars() {
                if !registry.is_aux(v) {
                    assignment.entry(v).or_insert(false);
                }
            }
        }
        let cube = self
            .bdd()
            .mk_cube(assignment.iter().map(|(&v, &value)| Lit::new(v, !value)));
        let state = self.project_state(assignment, false);
        Some((state, cube))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::int::Integer;

    #[test]
    fn test_state_ordering() {
        let mut a = State::default();
        a.bools.insert("x".to_string(), false);
        let mut b = State::default();
        b.bools.insert("x".to_string(), true);
        assert!(a < b);
        assert_eq!(a, a.clone());
        assert_eq!(a.to_string(), "{x=0}");
    }

    #[test]
    fn test_states_expand_free_variables() {
        let m = Model::new();
        let a = m.bool_var("a");
        let _b = m.bool_var("b");

        // f = a leaves b free: two states.
        let states = m.states(a);
        assert_eq!(states.len(), 2);
        for state in &states {
            assert_eq!(state.bool("a"), Some(true));
        }
        assert_eq!(states[0].bool("b"), Some(false));
        assert_eq!(states[1].bool("b"), Some(true));
    }

    #[test]
    fn test_states_of_terminals() {
        let m = Model::new();
        let _a = m.bool_var("a");
        let bdd = m.bdd();

        assert!(m.states(bdd.zero()).is_empty());
        assert_eq!(m.states(bdd.one()).len(), 2);
    }

    #[test]
    fn test_states_collapse_integers() {
        let m = Model::new();
        let bdd = m.bdd();
        let x = m.int_var("x", 7);

        let five = x.eq(&Integer::constant(5), bdd);
        let states = m.states(five);
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].int("x"), Some(5));
        assert_eq!(states[0].bools().count(), 0);
    }

    #[test]
    fn test_states_dedup_aux_witnesses() {
        let m = Model::new();
        let bdd = m.bdd();
        let x = m.int_var("x", 7);
        let sum = x.add(&Integer::constant(1), &m);

        // x = 3 with the adder constraint attached: the auxiliary bits are
        // fixed by x, but projection must not leak them.
        let f = bdd.apply_and(x.eq(&Integer::constant(3), bdd), sum.constraint());
        let states = m.states(f);
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].int("x"), Some(3));
        assert_eq!(states[0].int("add(x,1)"), None);

        // With auxiliaries requested, the sum shows up with its value.
        let with_aux = m.states_with_aux(f);
        assert_eq!(with_aux.len(), 1);
        assert_eq!(with_aux[0].int("add(x,1)"), Some(4));
    }

    #[test]
    fn test_pick_state_is_deterministic_and_consistent() {
        let m = Model::new();
        let a = m.bool_var("a");
        let b = m.bool_var("b");
        let bdd = m.bdd();

        let f = bdd.apply_or(a, b);
        let (state, cube) = m.pick_state(f).expect("nonempty set");
        // The cube must select a subset of f.
        assert!(bdd.contains(f, cube));
        // First path goes through a=1; b is defaulted to false.
        assert_eq!(state.bool("a"), Some(true));
        assert_eq!(state.bool("b"), Some(false));

        assert!(m.pick_state(bdd.zero()).is_none());
    }
}
