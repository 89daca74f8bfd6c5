//! Circuit construction: wires, instructions, the generator, and the evaluator.
//!
//! A circuit is an append-only log of instructions over field-valued wires.
//! [`generator::CircuitGenerator`] owns all build state and exposes the
//! builder API; [`evaluator::CircuitEvaluator`] replays the finished log
//! against concrete inputs to produce a witness.

pub mod evaluator;
pub mod generator;
pub mod operations;
pub mod wire;
pub mod wire_array;

use thiserror::Error;

/// Errors raised while constructing a circuit.
///
/// These indicate incorrect use of the builder API. They abort the build
/// immediately; there is no partial state worth recovering.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A boolean operation received a wire that is not known to carry 0 or 1.
    #[error("operand wire {0} is not known to be binary")]
    NonBinaryOperand(usize),

    /// A bit width exceeds what the field can represent.
    #[error("bit width {width} exceeds the field capacity of {limit} bits")]
    InvalidBitWidth { width: usize, limit: usize },

    /// A constant does not fit in the declared number of bits.
    #[error("constant of {actual} bits does not fit in {declared} declared bits")]
    ConstantTooWide { actual: usize, declared: usize },

    /// Paired-element operations require arrays of the same length.
    #[error("mismatched array lengths: {0} vs {1}")]
    LengthMismatch(usize, usize),

    /// An invalid sub-range was requested from a wire array.
    #[error("invalid bit range {from}..{to} for array of length {len}")]
    InvalidBitRange { from: usize, to: usize, len: usize },

    /// A long-element operation requires aligned operands.
    #[error("long element operands must be aligned")]
    UnalignedOperand,

    /// An I/O failure while writing circuit files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
