//! Model counting over a fixed number of variables.

use std::collections::HashMap;

use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::reference::Ref;

impl Bdd {
    /// Number of satisfying assignments of `f` over `num_vars` variables.
    ///
    /// `num_vars` must cover every variable occurring in `f`; free variables
    /// contribute a factor of two each. Exact, via `BigUint`.
    pub fn sat_count(&self, f: Ref, num_vars: usize) -> BigUint {
        let mut cache = HashMap::new();
        let max = BigUint::from(2u32).pow(num_vars as u32);
        self.sat_count_rec(f, &max, &mut cache)
    }

    fn sat_count_rec(&self, f: Ref, max: &BigUint, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        if self.is_zero(f) {
            return BigUint::ZERO;
        } else if self.is_one(f) {
            return max.clone();
        }

        if let Some(count) = cache.get(&f) {
            return count.clone();
        }

        let count_low = self.sat_count_rec(self.low(f), max, cache);
        let count_high = self.sat_count_rec(self.high(f), max, cache);

        // Each level halves the share of the assignment space.
        let count: BigUint = (count_low + count_high) >> 1;

        cache.insert(f, count.clone());
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Lit, Var};

    #[test]
    fn test_sat_count_terminals() {
        let bdd = Bdd::default();

        for n in 1..=3 {
            assert_eq!(bdd.sat_count(bdd.zero(), n), BigUint::ZERO);
            assert_eq!(bdd.sat_count(bdd.one(), n), BigUint::from(1u32 << n));
        }
    }

    #[test]
    fn test_sat_count_literal() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(Var::new(1));
        assert_eq!(bdd.sat_count(x, 1), BigUint::from(1u32));
        assert_eq!(bdd.sat_count(x, 2), BigUint::from(2u32));
        assert_eq!(bdd.sat_count(x, 3), BigUint::from(4u32));
    }

    #[test]
    fn test_sat_count_cube_and_clause() {
        let bdd = Bdd::default();

        let cube = bdd.mk_cube([Lit::pos(Var::new(1)), Lit::pos(Var::new(2))]);
        assert_eq!(bdd.sat_count(cube, 2), BigUint::from(1u32));
        assert_eq!(bdd.sat_count(cube, 4), BigUint::from(4u32));

        let clause = bdd.apply_or(bdd.mk_var(Var::new(1)), bdd.mk_var(Var::new(2)));
        assert_eq!(bdd.sat_count(clause, 2), BigUint::from(3u32));
        assert_eq!(bdd.sat_count(clause, 3), BigUint::from(6u32));
    }

    #[test]
    fn test_sat_count_xor() {
        let bdd = Bdd::default();
        let x = bdd.mk_var(Var::new(1));
        let y = bdd.mk_var(Var::new(2));
        let f = bdd.apply_xor(x, y);
        assert_eq!(bdd.sat_count(f, 2), BigUint::from(2u32));
    }
}
