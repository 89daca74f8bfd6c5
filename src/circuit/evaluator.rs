//! Witness generation by replay of the instruction log.
//!
//! A [`CircuitEvaluator`] owns a private value assignment for every wire of
//! one build. After the caller supplies concrete values for input and
//! witness wires, [`evaluate`](CircuitEvaluator::evaluate) walks the log in
//! insertion order: instructions compute their outputs from already-assigned
//! operands, witness hooks fill in prover-side values, and assertions are
//! checked against the concrete field values. A final pass verifies that no
//! wire was left without a value.
//!
//! Evaluation only reads the immutable log, so several evaluators may replay
//! the same circuit independently.

use num_bigint::BigUint;
use num_traits::One;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;
use thiserror::Error;

use crate::circuit::generator::{CircuitGenerator, LogEntry};
use crate::circuit::operations::LabelKind;
use crate::circuit::wire::Wire;

/// Errors raised during witness evaluation.
///
/// All of these are fatal to the evaluation pass: they indicate either a bug
/// in a witness-computation hook or a genuinely invalid input assignment.
#[derive(Debug, Error)]
pub enum EvalError {
    /// An instruction read an operand that has no value yet.
    #[error("wire {0} read before assignment")]
    Uninitialized(usize),

    /// A wire received a second value.
    #[error("wire {0} assigned twice")]
    DoubleAssignment(usize),

    /// An assertion did not hold over the concrete values.
    #[error("assertion failed: {left} != {right} ({desc})")]
    AssertionFailed {
        left: String,
        right: String,
        desc: String,
    },

    /// A value was wider than the declared bit-split width.
    #[error("value of wire {wire} needs {actual} bits, split declared {declared}")]
    SplitWidthExceeded {
        wire: usize,
        actual: usize,
        declared: usize,
    },

    /// A wire had no value after the full evaluation pass.
    #[error("wire {0} has no value after evaluation")]
    MissingValue(usize),

    /// Paired value assignment with mismatched lengths.
    #[error("mismatched lengths: {0} wires, {1} values")]
    LengthMismatch(usize, usize),

    /// A witness-computation hook could not produce a valid value.
    #[error("witness computation failed: {0}")]
    WitnessComputation(String),

    /// An I/O failure while writing the witness file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Replays one circuit against a concrete input assignment.
pub struct CircuitEvaluator {
    values: Vec<Option<BigUint>>,
    prime: BigUint,
}

impl CircuitEvaluator {
    /// Creates an evaluator for `gen` with only the one-wire assigned.
    pub fn new(gen: &CircuitGenerator) -> Self {
        let mut values = vec![None; gen.num_wires()];
        values[gen.one().id()] = Some(BigUint::one());
        CircuitEvaluator {
            values,
            prime: gen.field_prime().clone(),
        }
    }

    /// The field modulus values are reduced into.
    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    /// Assigns `value` (reduced into the field) to `w`.
    pub fn set_wire_value(&mut self, w: Wire, value: &BigUint) -> Result<(), EvalError> {
        self.assign(w, value % &self.prime)
    }

    /// Convenience assignment from a machine integer.
    pub fn set_wire_value_u64(&mut self, w: Wire, value: u64) -> Result<(), EvalError> {
        self.set_wire_value(w, &BigUint::from(value))
    }

    /// Assigns one value per wire; lengths must match.
    pub fn set_wire_values(&mut self, ws: &[Wire], values: &[BigUint]) -> Result<(), EvalError> {
        if ws.len() != values.len() {
            return Err(EvalError::LengthMismatch(ws.len(), values.len()));
        }
        for (w, v) in ws.iter().zip(values) {
            self.set_wire_value(*w, v)?;
        }
        Ok(())
    }

    /// The concrete value of `w`, if assigned.
    pub fn get_wire_value(&self, w: Wire) -> Result<BigUint, EvalError> {
        self.value(w).cloned()
    }

    /// The concrete values of all of `ws`.
    pub fn get_wire_values(&self, ws: &[Wire]) -> Result<Vec<BigUint>, EvalError> {
        ws.iter().map(|w| self.get_wire_value(*w)).collect()
    }

    pub(crate) fn value(&self, w: Wire) -> Result<&BigUint, EvalError> {
        self.values[w.id()]
            .as_ref()
            .ok_or(EvalError::Uninitialized(w.id()))
    }

    pub(crate) fn assign(&mut self, w: Wire, value: BigUint) -> Result<(), EvalError> {
        let slot = &mut self.values[w.id()];
        if slot.is_some() {
            return Err(EvalError::DoubleAssignment(w.id()));
        }
        *slot = Some(value);
        Ok(())
    }

    /// Runs the full evaluation pass over `gen`'s instruction log.
    pub fn evaluate(&mut self, gen: &CircuitGenerator) -> Result<(), EvalError> {
        for entry in gen.log() {
            match entry {
                LogEntry::Op(inst) => inst.evaluate(self)?,
                LogEntry::Hook(hook) => hook(self)?,
                LogEntry::Label(_) => {}
            }
        }
        for (id, value) in self.values.iter().enumerate() {
            if value.is_none() {
                return Err(EvalError::MissingValue(id));
            }
        }
        Ok(())
    }

    /// Writes the witness file consumed by the external prover: one
    /// `<wire-id> <value-in-hex>` line per input and witness wire.
    pub fn write_witness_file(
        &self,
        gen: &CircuitGenerator,
        path: &Path,
    ) -> Result<(), EvalError> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        for entry in gen.log() {
            if let LogEntry::Label(label) = entry {
                if matches!(label.kind, LabelKind::Input | LabelKind::NizkInput) {
                    let value = self.value(label.wire)?;
                    writeln!(out, "{} {}", label.wire.id(), value.to_str_radix(16))?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}
