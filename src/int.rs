//! Bounded non-negative integers as little-endian bit-vectors of BDDs.
//!
//! An [`Integer`] is either a constant or a vector of bit-variables (LSB
//! first). Every integer carries a `constraint` BDD: the accumulated side
//! conditions produced by arithmetic, e.g. the equation relating an addition
//! result's bits to the summands' bits. Constants carry `⊤`.
//!
//! Arithmetic allocates fresh *auxiliary* bit-variables through the model;
//! auxiliaries are existentially quantified away by the pre-image operators
//! and never surface in projected states unless explicitly requested.

use crate::bdd::Bdd;
use crate::model::Model;
use crate::reference::Ref;
use crate::types::Var;

#[derive(Debug, Clone)]
enum Repr {
    /// A constant value with its minimal bit-count.
    Const(u64),
    /// A variable: one bit-variable per position, LSB first.
    Bits { name: String, bits: Vec<Var>, aux: bool },
}

/// A bounded non-negative integer.
#[derive(Debug, Clone)]
pub struct Integer {
    repr: Repr,
    constraint: Ref,
}

impl Integer {
    /// An integer constant.
    pub fn constant(value: u64) -> Self {
        Integer {
            repr: Repr::Const(value),
            // ⊤ sits at the same slot in every manager.
            constraint: Ref::ONE,
        }
    }

    pub(crate) fn from_bits(name: String, bits: Vec<Var>, aux: bool, constraint: Ref) -> Self {
        assert!(!bits.is_empty(), "Integer needs at least one bit");
        Integer {
            repr: Repr::Bits { name, bits, aux },
            constraint,
        }
    }

    fn with_constraint(&self, constraint: Ref) -> Self {
        Integer {
            repr: self.repr.clone(),
            constraint,
        }
    }

    /// Minimal number of bits for values `0..=upper_bound`.
    pub(crate) fn width_for(upper_bound: u64) -> usize {
        ((u64::BITS - upper_bound.leading_zeros()) as usize).max(1)
    }

    /// The number of bits this integer uses.
    pub fn width(&self) -> usize {
        match &self.repr {
            Repr::Const(value) => Self::width_for(*value),
            Repr::Bits { bits, .. } => bits.len(),
        }
    }

    /// The constant value, if this integer is a constant.
    pub fn value(&self) -> Option<u64> {
        match &self.repr {
            Repr::Const(value) => Some(*value),
            Repr::Bits { .. } => None,
        }
    }

    /// The display name: the declared name for variables, the value for
    /// constants.
    pub fn name(&self) -> String {
        match &self.repr {
            Repr::Const(value) => value.to_string(),
            Repr::Bits { name, .. } => name.clone(),
        }
    }

    /// Whether this integer is auxiliary (created by arithmetic expansion).
    /// Constants count as auxiliary: they are never part of a visible state.
    pub fn is_aux(&self) -> bool {
        match &self.repr {
            Repr::Const(_) => true,
            Repr::Bits { aux, .. } => *aux,
        }
    }

    /// The bit-variables, LSB first (empty for constants).
    pub fn bit_vars(&self) -> &[Var] {
        match &self.repr {
            Repr::Const(_) => &[],
            Repr::Bits { bits, .. } => bits,
        }
    }

    /// The accumulated side constraint.
    pub fn constraint(&self) -> Ref {
        self.constraint
    }

    /// The `n`-th bit as a BDD: a terminal for constant bits, the positive
    /// literal of the bit-variable otherwise. Bits past the width are `⊥`.
    pub fn bit(&self, bdd: &Bdd, n: usize) -> Ref {
        match &self.repr {
            Repr::Const(value) => {
                if n < u64::BITS as usize && (value >> n) & 1 == 1 {
                    bdd.one()
                } else {
                    bdd.zero()
                }
            }
            Repr::Bits { bits, .. } => {
                if n >= bits.len() {
                    bdd.zero()
                } else {
                    bdd.mk_var(bits[n])
                }
            }
        }
    }

    /// The integer denoting this value one transition later: primed
    /// bit-variables and a primed constraint.
    pub fn next(&self, bdd: &Bdd) -> Integer {
        match &self.repr {
            Repr::Const(_) => self.clone(),
            Repr::Bits { name, bits, aux } => Integer {
                repr: Repr::Bits {
                    name: name.clone(),
                    bits: bits.iter().map(|v| v.next()).collect(),
                    aux: *aux,
                },
                constraint: bdd.next(self.constraint),
            },
        }
    }

    /// A BDD that is true when `self == other`.
    pub fn eq(&self, other: &Integer, bdd: &Bdd) -> Ref {
        let size = self.width().max(other.width());
        let mut res = bdd.apply_and(self.constraint, other.constraint);
        for n in 0..size {
            let bits_eq = bdd.apply_eq(self.bit(bdd, n), other.bit(bdd, n));
            res = bdd.apply_and(res, bits_eq);
        }
        res
    }

    /// A BDD that is true when `self < other`.
    pub fn lt(&self, other: &Integer, bdd: &Bdd) -> Ref {
        let size = self.width().max(other.width());
        let cmp = self.cmp_rec(other, bdd, size - 1, true);
        bdd.apply_and(bdd.apply_and(self.constraint, other.constraint), cmp)
    }

    /// A BDD that is true when `self <= other`.
    pub fn leq(&self, other: &Integer, bdd: &Bdd) -> Ref {
        let size = self.width().max(other.width());
        let cmp = self.cmp_rec(other, bdd, size - 1, false);
        bdd.apply_and(bdd.apply_and(self.constraint, other.constraint), cmp)
    }

    /// Lexicographic comparison from the most significant bit `n` downward.
    fn cmp_rec(&self, other: &Integer, bdd: &Bdd, n: usize, strict: bool) -> Ref {
        let a = self.bit(bdd, n);
        let b = other.bit(bdd, n);
        let lt = bdd.apply_and(bdd.apply_not(a), b);
        // At the 0-th bit `<=` degenerates to implication.
        if n == 0 {
            return if strict { lt } else { bdd.apply_imply(a, b) };
        }
        let rest = bdd.apply_and(bdd.apply_eq(a, b), self.cmp_rec(other, bdd, n - 1, strict));
        bdd.apply_or(lt, rest)
    }

    /// The sum `self + other` as a fresh auxiliary integer.
    ///
    /// Constants fold numerically. Otherwise a result integer `k` with
    /// `max(width) + 1` bits is allocated and constrained by a ripple-carry
    /// equation whose carries are recovered implicitly from the result bits:
    ///
    /// ```text
    /// k_0 = i_0 ⊕ j_0
    /// c_n = (i_{n-1} ∧ j_{n-1}) ∨ ((i_{n-1} ⊕ j_{n-1}) ∧ ¬k_{n-1})
    /// k_n = i_n ⊕ j_n ⊕ c_n
    /// ```
    ///
    /// This halves the auxiliary variable count compared to
    /// [`add_carry`][Integer::add_carry] at the cost of a more intricate
    /// equation.
    pub fn add(&self, other: &Integer, m: &Model) -> Integer {
        if let (Some(a), Some(b)) = (self.value(), other.value()) {
            return Integer::constant(a + b);
        }
        let bdd = m.bdd();

        let size = self.width().max(other.width()) + 1;
        let name = format!("add({},{})", self.name(), other.name());
        let k = m.alloc_int(&name, size, true);

        // Bit 0 has no carry-in.
        let low_sum = bdd.apply_xor(self.bit(bdd, 0), other.bit(bdd, 0));
        let mut eqn = bdd.apply_eq(k.bit(bdd, 0), low_sum);
        for n in 1..size {
            let (i0, j0, k0) = (self.bit(bdd, n - 1), other.bit(bdd, n - 1), k.bit(bdd, n - 1));
            let (i1, j1) = (self.bit(bdd, n), other.bit(bdd, n));
            let half = bdd.apply_and(bdd.apply_xor(i0, j0), bdd.apply_not(k0));
            let carry = bdd.apply_or(bdd.apply_and(i0, j0), half);
            let sum = bdd.apply_xor(bdd.apply_xor(i1, j1), carry);
            eqn = bdd.apply_and(eqn, bdd.apply_eq(k.bit(bdd, n), sum));
        }

        let operands = bdd.apply_and(self.constraint, other.constraint);
        let k = k.with_constraint(bdd.apply_and(operands, eqn));
        m.register_int(k.clone());
        k
    }

    /// The sum `self + other` with an explicit carry bit-vector.
    ///
    /// Logically equivalent to [`add`][Integer::add]; allocates a second
    /// auxiliary integer for the carries but yields a simpler equation
    /// `i ⊕ j ⊕ c ⊕ k` per bit.
    pub fn add_carry(&self, other: &Integer, m: &Model) -> Integer {
        if let (Some(a), Some(b)) = (self.value(), other.value()) {
            return Integer::constant(a + b);
        }
        let bdd = m.bdd();

        let size = self.width().max(other.width()) + 1;
        let c = m.alloc_int(&format!("carry({},{})", self.name(), other.name()), size, true);
        let k = m.alloc_int(&format!("add({},{})", self.name(), other.name()), size, true);
        m.register_int(c.clone());

        // The first carry bit is 0; the one past the top is 0 by bit() being
        // ⊥ past the width, which closes the ripple.
        let mut eqn = bdd.apply_eq(c.bit(bdd, 0), bdd.zero());
        for n in 0..size {
            let (ib, jb, cb, kb) = (self.bit(bdd, n), other.bit(bdd, n), c.bit(bdd, n), k.bit(bdd, n));
            // k = i + j + c (mod 2)
            let parity = bdd.apply_eq(bdd.apply_eq(bdd.apply_eq(ib, jb), cb), kb);
            eqn = bdd.apply_and(eqn, parity);
            // The next carry is the majority of i, j, c.
            let majority = bdd.apply_or(
                bdd.apply_or(bdd.apply_and(ib, jb), bdd.apply_and(ib, cb)),
                bdd.apply_and(jb, cb),
            );
            eqn = bdd.apply_and(eqn, bdd.apply_eq(c.bit(bdd, n + 1), majority));
        }

        let operands = bdd.apply_and(self.constraint, other.constraint);
        let k = k.with_constraint(bdd.apply_and(operands, eqn));
        m.register_int(k.clone());
        k
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;

    use test_log::test;

    #[test]
    fn test_width_for() {
        assert_eq!(Integer::width_for(0), 1);
        assert_eq!(Integer::width_for(1), 1);
        assert_eq!(Integer::width_for(2), 2);
        assert_eq!(Integer::width_for(3), 2);
        assert_eq!(Integer::width_for(100), 7);
        assert_eq!(Integer::width_for(127), 7);
        assert_eq!(Integer::width_for(128), 8);
    }

    #[test]
    fn test_constant_bits_round_trip() {
        let m = Model::new();
        let bdd = m.bdd();

        let k = Integer::constant(0b101101);
        assert_eq!(k.width(), 6);
        for n in 0..8 {
            let expected = (0b101101 >> n) & 1 == 1;
            assert_eq!(k.bit(bdd, n), bdd.constant(expected), "bit {}", n);
        }
        // All higher bits are ⊥.
        assert_eq!(k.bit(bdd, 63), bdd.zero());
        assert_eq!(k.bit(bdd, 100), bdd.zero());
    }

    #[test]
    fn test_constant_comparisons() {
        let m = Model::new();
        let bdd = m.bdd();

        let five = Integer::constant(5);
        let nine = Integer::constant(9);
        assert_eq!(five.eq(&five, bdd), bdd.one());
        assert_eq!(five.eq(&nine, bdd), bdd.zero());
        assert_eq!(five.lt(&nine, bdd), bdd.one());
        assert_eq!(nine.lt(&five, bdd), bdd.zero());
        assert_eq!(five.lt(&five, bdd), bdd.zero());
        assert_eq!(five.leq(&five, bdd), bdd.one());
        assert_eq!(nine.leq(&five, bdd), bdd.zero());
    }

    #[test]
    fn test_variable_comparisons_by_exhaustion() {
        let m = Model::new();
        let bdd = m.bdd();
        let x = m.int_var("x", 7);

        for k in 0..=7u64 {
            let kc = Integer::constant(k);
            for v in 0..=7u64 {
                let vc = Integer::constant(v);
                let state = x.eq(&vc, bdd);
                // x = v fixes all bits, so each predicate must collapse to a
                // constant under that restriction.
                assert_eq!(bdd.contains(x.lt(&kc, bdd), state), v < k, "{} < {}", v, k);
                assert_eq!(bdd.contains(x.leq(&kc, bdd), state), v <= k, "{} <= {}", v, k);
                assert_eq!(bdd.contains(kc.lt(&x, bdd), state), k < v, "{} < x={}", k, v);
                assert_eq!(bdd.contains(kc.leq(&x, bdd), state), k <= v, "{} <= x={}", k, v);
            }
        }
    }

    #[test]
    fn test_eq_differing_widths() {
        let m = Model::new();
        let bdd = m.bdd();
        let x = m.int_var("x", 3);

        // A constant outside the representable range cannot be satisfied.
        let wide = Integer::constant(12);
        assert_eq!(x.eq(&wide, bdd), bdd.zero());
    }

    #[test]
    fn test_add_constant_folding() {
        let m = Model::new();
        let bdd = m.bdd();

        let sum = Integer::constant(7).add(&Integer::constant(9), &m);
        assert_eq!(sum.value(), Some(16));
        assert_eq!(sum.eq(&Integer::constant(16), bdd), bdd.one());
        // No auxiliary bits were allocated.
        assert_eq!(m.registry.borrow().len(), 0);
    }

    #[test]
    fn test_add_variable_constant() {
        let m = Model::new();
        let bdd = m.bdd();
        let x = m.int_var("x", 100);
        let sum = x.add(&Integer::constant(5), &m);

        assert_eq!(sum.width(), 8);
        assert!(sum.is_aux());

        // x = 44 forces x + 5 = 49.
        let x44 = x.eq(&Integer::constant(44), bdd);
        let is49 = sum.eq(&Integer::constant(49), bdd);
        let is50 = sum.eq(&Integer::constant(50), bdd);
        assert!(bdd.intersects(is49, x44));
        assert!(!bdd.intersects(is50, x44));
    }

    #[test]
    fn test_add_encodings_agree() {
        let m = Model::new();
        let bdd = m.bdd();
        let x = m.int_var("x", 7);
        let y = m.int_var("y", 7);

        let implicit = x.add(&y, &m);
        let explicit = x.add_carry(&y, &m);

        for a in 0..=7u64 {
            for b in 0..=7u64 {
                let fix = bdd.apply_and(
                    x.eq(&Integer::constant(a), bdd),
                    y.eq(&Integer::constant(b), bdd),
                );
                let target = Integer::constant(a + b);
                let ok_implicit = bdd.intersects(implicit.eq(&target, bdd), fix);
                let ok_explicit = bdd.intersects(explicit.eq(&target, bdd), fix);
                assert!(ok_implicit, "implicit {} + {}", a, b);
                assert!(ok_explicit, "explicit {} + {}", a, b);
                // And no other value is possible.
                let wrong = Integer::constant(a + b + 1);
                assert!(!bdd.intersects(implicit.eq(&wrong, bdd), fix));
                assert!(!bdd.intersects(explicit.eq(&wrong, bdd), fix));
            }
        }
    }

    #[test]
    fn test_next_primes_bits_and_constraint() {
        let m = Model::new();
        let bdd = m.bdd();
        let x = m.int_var("x", 3);
        let x_next = x.next(bdd);

        for (v, w) in x.bit_vars().iter().zip(x_next.bit_vars()) {
            assert_eq!(v.next(), *w);
        }

        let sum = x.add(&Integer::constant(1), &m);
        let sum_next = sum.next(bdd);
        assert_eq!(sum_next.constraint(), bdd.next(sum.constraint()));
        assert_eq!(bdd.norm(sum_next.constraint()), sum.constraint());
    }
}
