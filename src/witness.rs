//! Shortest-path witness extraction from fixed-point sequences.
//!
//! Given the sequence returned by [`Model::ef`]/[`Model::eu`], these
//! functions answer "how many steps" and "which concrete path". Both scan
//! from index 1: an initial state that already satisfies the goal reports
//! the first nontrivial satisfaction (or none), by convention.

use log::debug;

use crate::model::Model;
use crate::reference::Ref;
use crate::state::State;

/// The least number of steps after which a state satisfying `init` appears
/// in the fixed-point sequence, or `None` if it never does.
///
/// Index 0 is intentionally skipped, so the count is non-zero even when the
/// initial states already satisfy the goal; callers depending on other
/// semantics must pre-check `sets[0]`.
pub fn least_steps(m: &Model, init: Ref, sets: &[Ref]) -> Option<usize> {
    (1..sets.len()).find(|&i| m.bdd().intersects(init, sets[i]))
}

/// A shortest concrete path from a state satisfying `init` to the goal of
/// the fixed-point sequence, or an empty path if the goal is unreachable.
///
/// The path starts in `init`, consecutive states are connected by the
/// transition relation, and the `j`-th state from the end satisfies
/// `sets[j]`. Which satisfying assignment is picked at each step is
/// implementation-defined (first path, free user variables defaulted to
/// false); auxiliary variables receive witness values but are not surfaced.
///
/// # Panics
///
/// Panics if a beam comes up empty after the first step, which cannot happen
/// for a sequence produced by [`Model::eu`] on the same model.
pub fn generate_example(m: &Model, init: Ref, sets: &[Ref]) -> Vec<State> {
    let bdd = m.bdd();

    // Find the starting point: the first set intersecting init.
    let mut start = None;
    for i in 1..sets.len() {
        let beam = bdd.apply_and(init, sets[i]);
        if !bdd.is_zero(beam) {
            start = Some((i, beam));
            break;
        }
    }
    let Some((steps, mut beam)) = start else {
        return Vec::new();
    };
    debug!("generate_example: witness found at {} steps", steps);

    // Walk forward to the goal, narrowing the beam through the inverse
    // pre-image at each step.
    let mut path = Vec::with_capacity(steps + 1);
    for j in (0..=steps).rev() {
        let (state, cube) = m.pick_state(beam).expect("witness beam is empty");
        debug!("generate_example: step {} is {}", steps - j, state);
        path.push(state);
        if j > 0 {
            beam = m.ex_inv(cube, sets[j - 1]);
            assert!(!bdd.is_zero(beam), "witness beam is empty");
        }
    }
    path
}
