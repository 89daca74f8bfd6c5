//! Circuit construction front-end for rank-1 constraint systems.
//!
//! The crate builds arithmetic circuits over a prime field as an append-only
//! instruction log. A [`CircuitGenerator`] allocates wires, folds constant
//! subexpressions, deduplicates structurally identical instructions, and
//! tracks which wires are known to be binary. A [`CircuitEvaluator`] replays
//! the finished log over concrete input values to produce a witness, and the
//! file writers emit the circuit and witness in the textual format external
//! proving backends consume.
//!
//! # Example
//!
//! ```
//! use num_bigint::BigUint;
//! use zkgraph_core::{CircuitEvaluator, CircuitGenerator};
//!
//! let mut gen = CircuitGenerator::new("product");
//! let a = gen.create_input_wire("a");
//! let b = gen.create_input_wire("b");
//! let r = gen.mul(a, b);
//! let out = gen.make_output(r, "a * b");
//!
//! let mut eval = CircuitEvaluator::new(&gen);
//! eval.set_wire_value_u64(a, 5).unwrap();
//! eval.set_wire_value_u64(b, 6).unwrap();
//! eval.evaluate(&gen).unwrap();
//! assert_eq!(eval.get_wire_value(out).unwrap(), BigUint::from(30u8));
//! ```
//!
//! Integers wider than the field (RSA moduli, hash preimages) are handled by
//! [`LongElement`], which represents them as bounded limbs and provides
//! constraint-efficient equality and comparison protocols.

pub mod circuit;
pub mod config;
pub mod longint;
pub mod prover;
pub mod util;

pub use circuit::evaluator::{CircuitEvaluator, EvalError};
pub use circuit::generator::{CircuitGenerator, CircuitStats, WireKind};
pub use circuit::wire::Wire;
pub use circuit::wire_array::WireArray;
pub use circuit::BuildError;
pub use config::Config;
pub use longint::LongElement;
pub use prover::{run_prover, ProverError};
