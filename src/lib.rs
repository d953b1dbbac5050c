//! # ctl-rs: Symbolic CTL Model Checking in Rust
//!
//! **`ctl-rs`** is a manager-centric library for symbolic model checking of
//! finite-state transition systems over boolean and bounded-integer variables.
//! State sets and the transition relation are encoded as **Reduced Ordered
//! Binary Decision Diagrams (ROBDDs)**, and the existential fragment of
//! **Computation Tree Logic (CTL)** is evaluated by fixed-point iteration of
//! symbolic pre-image operators.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: All BDD operations go through the
//!   [`Bdd`][crate::bdd::Bdd] manager. This ensures structural sharing (hash
//!   consing) and maintains the canonical form invariant: structurally equal
//!   BDDs are reference-equal, so set equality is a pointer comparison.
//! - **Truth-Table `apply`**: A single cached recursion parameterized by a
//!   4-entry truth table ([`Op`][crate::types::Op]) subsumes all binary
//!   boolean connectives.
//! - **Current/Next-Step Alphabets**: Every variable has a primed twin placed
//!   adjacently in the order, making the `next`/`norm` substitutions
//!   structure-preserving.
//! - **Bounded Integers**: Little-endian bit-vector encoding with equality,
//!   comparisons, and ripple-carry addition over fresh auxiliary variables.
//! - **Counter-Examples**: Shortest witnessing paths extracted from the
//!   fixed-point sequences, projected to concrete user-level states.
//!
//! ## Basic Usage
//!
//! ```rust
//! use ctl_rs::model::Model;
//! use ctl_rs::witness::least_steps;
//!
//! // A one-bit system that can only switch on.
//! let m = Model::new();
//! let a = m.bool_var("a");
//! let bdd = m.bdd();
//!
//! // a = 0  ->  a' = 1
//! let a_next = bdd.next(a);
//! m.add(bdd.apply_not(a), a_next);
//!
//! // "a" is reachable from "!a" in one step.
//! let sets = m.ef(a);
//! assert_eq!(least_steps(&m, bdd.apply_not(a), &sets), Some(1));
//! ```
//!
//! ## Core Components
//!
//! - **[`bdd`]**: The heart of the library. Contains the [`Bdd`][crate::bdd::Bdd]
//!   manager and the core algorithms (`mk_node`, `apply`, substitution,
//!   restriction, quantification).
//! - **[`model`]**: Variables, transitions, and the CTL fixed-point evaluator.
//! - **[`int`]**: Bounded non-negative integers as bit-vectors of BDDs.
//! - **[`witness`]**: Shortest-path witness extraction.
//! - **[`state`]**: Projection of BDDs to concrete user-level states.

pub mod bdd;
pub mod cache;
pub mod int;
pub mod model;
pub mod node;
pub mod paths;
pub mod reference;
pub mod registry;
pub mod sat;
pub mod state;
pub mod table;
pub mod types;
pub mod utils;
pub mod witness;

pub use crate::bdd::Bdd;
pub use crate::int::Integer;
pub use crate::model::Model;
pub use crate::reference::Ref;
pub use crate::state::State;
pub use crate::types::{Lit, Op, Var};
pub use crate::witness::{generate_example, least_steps};
