//! The circuit generator.
//!
//! A [`CircuitGenerator`] owns all state of one circuit build: wire-id
//! allocation, the ordered instruction log, the constant-wire cache, the
//! common-subexpression cache, the bit-decomposition side table, and the
//! running multiplication-constraint count. All builder calls go through an
//! explicit `&mut` reference; there is no ambient "active circuit".
//!
//! The wire-level arithmetic API lives in [`crate::circuit::wire`]; this
//! module provides wire creation, assertions, output marking, prover-witness
//! hooks, and circuit-file emission.

use indexmap::IndexMap;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;

use crate::circuit::evaluator::{CircuitEvaluator, EvalError};
use crate::circuit::operations::{cache_key, Instruction, LabelKind, Op, OpKey, WireLabel};
use crate::circuit::wire::Wire;
use crate::circuit::BuildError;
use crate::config::Config;

/// A prover-witness computation callback, replayed by the evaluator in log
/// order to fill in witness wires that are cheaper to compute outside the
/// constraint system.
pub type WitnessHook = Box<dyn Fn(&mut CircuitEvaluator) -> Result<(), EvalError>>;

/// One entry of the build log.
pub enum LogEntry {
    /// A constraint-producing instruction.
    Op(Instruction),
    /// A wire role declaration (input / nizkinput / output).
    Label(WireLabel),
    /// A prover-witness computation hook.
    Hook(WitnessHook),
}

/// How a wire came to exist. Determines constant folding, output marking,
/// and binary-operand checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireKind {
    /// Compile-time constant with a known value.
    Constant(BigUint),
    /// Verifier-visible circuit input.
    Input,
    /// Prover-only witness input.
    Witness,
    /// Output of a multiplicative instruction; backed by an R1CS variable.
    Variable,
    /// Output of a linear instruction (add, pack, const-mul).
    Linear,
}

#[derive(Debug, Clone)]
struct WireMeta {
    kind: WireKind,
    bit: bool,
}

/// Summary of a finished circuit build.
#[derive(Debug, Clone, Serialize)]
pub struct CircuitStats {
    pub name: String,
    pub num_wires: usize,
    pub num_inputs: usize,
    pub num_witness_wires: usize,
    pub num_outputs: usize,
    pub num_mul_constraints: usize,
    pub instruction_counts: IndexMap<String, usize>,
}

/// Builder and owner of one circuit.
pub struct CircuitGenerator {
    name: String,
    config: Config,
    metas: Vec<WireMeta>,
    log: Vec<LogEntry>,
    dedup: IndexMap<OpKey, Vec<Wire>>,
    constants: IndexMap<BigUint, Wire>,
    bit_cache: HashMap<u32, Vec<Wire>>,
    num_mul_constraints: usize,
    one: Wire,
    zero: Wire,
    inputs: Vec<Wire>,
    witnesses: Vec<Wire>,
    outputs: Vec<Wire>,
}

impl CircuitGenerator {
    /// Creates a generator with the default configuration.
    pub fn new(name: &str) -> Self {
        Self::with_config(name, Config::default())
    }

    /// Creates a generator for a custom configuration.
    ///
    /// Wire 0 is the multiplicative identity, registered as a circuit input;
    /// the zero wire is derived from it by a constant multiplication.
    pub fn with_config(name: &str, config: Config) -> Self {
        let mut gen = CircuitGenerator {
            name: name.to_string(),
            config,
            metas: Vec::new(),
            log: Vec::new(),
            dedup: IndexMap::new(),
            constants: IndexMap::new(),
            bit_cache: HashMap::new(),
            num_mul_constraints: 0,
            one: Wire::new(0),
            zero: Wire::new(0),
            inputs: Vec::new(),
            witnesses: Vec::new(),
            outputs: Vec::new(),
        };
        let one = gen.alloc_wire(WireKind::Constant(BigUint::one()), true);
        gen.one = one;
        gen.log.push(LogEntry::Label(WireLabel {
            kind: LabelKind::Input,
            wire: one,
            desc: "The one-input wire".to_string(),
        }));
        gen.inputs.push(one);
        gen.constants.insert(BigUint::one(), one);

        let zero = gen.alloc_wire(WireKind::Constant(BigUint::zero()), true);
        gen.emit(
            Op::ConstMul {
                magnitude: BigUint::zero(),
                negative: false,
            },
            vec![one],
            vec![zero],
            "The zero wire".to_string(),
        );
        gen.zero = zero;
        gen.constants.insert(BigUint::zero(), zero);
        gen
    }

    /// The wire fixed to the value 1.
    pub fn one(&self) -> Wire {
        self.one
    }

    /// The wire fixed to the value 0.
    pub fn zero(&self) -> Wire {
        self.zero
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The prime modulus of the underlying field.
    pub fn field_prime(&self) -> &BigUint {
        &self.config.field_prime
    }

    /// Total number of allocated wires.
    pub fn num_wires(&self) -> usize {
        self.metas.len()
    }

    /// Running count of multiplication constraints.
    pub fn num_mul_constraints(&self) -> usize {
        self.num_mul_constraints
    }

    pub fn input_wires(&self) -> &[Wire] {
        &self.inputs
    }

    pub fn witness_wires(&self) -> &[Wire] {
        &self.witnesses
    }

    pub fn output_wires(&self) -> &[Wire] {
        &self.outputs
    }

    pub(crate) fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// The constant value of `w`, if it is a compile-time constant.
    pub fn constant_value(&self, w: Wire) -> Option<&BigUint> {
        match &self.metas[w.id()].kind {
            WireKind::Constant(v) => Some(v),
            _ => None,
        }
    }

    /// Whether `w` is known to carry only 0 or 1.
    pub fn is_bit(&self, w: Wire) -> bool {
        self.metas[w.id()].bit
    }

    pub(crate) fn kind(&self, w: Wire) -> &WireKind {
        &self.metas[w.id()].kind
    }

    pub(crate) fn mark_bit(&mut self, w: Wire) {
        self.metas[w.id()].bit = true;
    }

    pub(crate) fn cached_bits(&self, w: Wire) -> Option<&Vec<Wire>> {
        self.bit_cache.get(&w.raw())
    }

    pub(crate) fn set_cached_bits(&mut self, w: Wire, bits: Vec<Wire>) {
        self.bit_cache.insert(w.raw(), bits);
    }

    /// Allocates a fresh wire id.
    pub(crate) fn alloc_wire(&mut self, kind: WireKind, bit: bool) -> Wire {
        let id = self.metas.len() as u32;
        self.metas.push(WireMeta { kind, bit });
        Wire::new(id)
    }

    /// Looks up a structurally equal prior instruction, returning its outputs.
    pub(crate) fn lookup(&self, op: &Op, inputs: &[Wire], num_outputs: usize) -> Option<Vec<Wire>> {
        let key = cache_key(op, inputs, num_outputs)?;
        let outputs = self.dedup.get(&key)?;
        log::debug!("instruction cache hit for {:?}", key);
        Some(outputs.clone())
    }

    /// Appends an instruction to the log, registering it in the dedup cache
    /// and adding its constraint cost. Callers are expected to have checked
    /// the cache via [`lookup`](Self::lookup) first.
    pub(crate) fn emit(&mut self, op: Op, inputs: Vec<Wire>, outputs: Vec<Wire>, desc: String) {
        let inst = Instruction {
            op,
            inputs,
            outputs,
            desc,
        };
        self.num_mul_constraints += inst.constraint_cost();
        // Key wires follow the `lookup` convention: instruction inputs followed
        // by outputs, so Assert keys cover all three wires.
        let key_wires: Vec<Wire> = inst
            .inputs
            .iter()
            .chain(inst.outputs.iter())
            .copied()
            .collect();
        if let Some(key) = cache_key(&inst.op, &key_wires, inst.outputs.len()) {
            self.dedup.insert(key, inst.outputs.clone());
        }
        self.log.push(LogEntry::Op(inst));
    }

    /// Creates a verifier-visible input wire.
    pub fn create_input_wire(&mut self, desc: &str) -> Wire {
        let w = self.alloc_wire(WireKind::Input, false);
        self.log.push(LogEntry::Label(WireLabel {
            kind: LabelKind::Input,
            wire: w,
            desc: desc.to_string(),
        }));
        self.inputs.push(w);
        w
    }

    /// Creates `n` input wires.
    pub fn create_input_wire_array(&mut self, n: usize, desc: &str) -> Vec<Wire> {
        (0..n)
            .map(|i| self.create_input_wire(&format!("{} {}", desc, i)))
            .collect()
    }

    /// Creates a prover-only witness wire. Its value is supplied either by
    /// the caller before evaluation or by a witness hook.
    pub fn create_prover_witness_wire(&mut self, desc: &str) -> Wire {
        let w = self.alloc_wire(WireKind::Witness, false);
        self.log.push(LogEntry::Label(WireLabel {
            kind: LabelKind::NizkInput,
            wire: w,
            desc: desc.to_string(),
        }));
        self.witnesses.push(w);
        w
    }

    /// Creates `n` prover-only witness wires.
    pub fn create_prover_witness_wire_array(&mut self, n: usize, desc: &str) -> Vec<Wire> {
        (0..n)
            .map(|i| self.create_prover_witness_wire(&format!("{} {}", desc, i)))
            .collect()
    }

    /// Returns the wire fixed to `value` (reduced into the field), creating
    /// and caching it on first use.
    pub fn create_constant_wire(&mut self, value: &BigUint, desc: &str) -> Wire {
        let reduced = value % self.field_prime();
        if let Some(w) = self.constants.get(&reduced) {
            return *w;
        }
        let bit = reduced <= BigUint::one();
        let w = self.alloc_wire(WireKind::Constant(reduced.clone()), bit);
        let one = self.one;
        self.emit(
            Op::ConstMul {
                magnitude: reduced.clone(),
                negative: false,
            },
            vec![one],
            vec![w],
            desc.to_string(),
        );
        self.constants.insert(reduced, w);
        w
    }

    /// Creates constant wires for each value.
    pub fn create_constant_wire_array(&mut self, values: &[BigUint], desc: &str) -> Vec<Wire> {
        values
            .iter()
            .map(|v| self.create_constant_wire(v, desc))
            .collect()
    }

    /// Registers a callback that computes witness values during evaluation.
    pub fn specify_prover_witness_computation<F>(&mut self, hook: F)
    where
        F: Fn(&mut CircuitEvaluator) -> Result<(), EvalError> + 'static,
    {
        self.log.push(LogEntry::Hook(Box::new(hook)));
    }

    /// Asserts `w1 * w2 == w3`. Structurally identical assertions (including
    /// with the multiplicative pair swapped) are recorded once.
    pub fn add_assertion(&mut self, w1: Wire, w2: Wire, w3: Wire, desc: &str) {
        let inputs = vec![w1, w2, w3];
        if self.lookup(&Op::Assert, &inputs, 1).is_some() {
            return;
        }
        self.emit(Op::Assert, vec![w1, w2], vec![w3], desc.to_string());
    }

    /// Asserts `w1 == w2`.
    pub fn add_equality_assertion(&mut self, w1: Wire, w2: Wire, desc: &str) {
        let one = self.one;
        self.add_assertion(w1, one, w2, desc);
    }

    /// Asserts `w == value`.
    pub fn add_equality_with_constant(&mut self, w: Wire, value: &BigUint, desc: &str) {
        let c = self.create_constant_wire(value, desc);
        let one = self.one;
        self.add_assertion(w, one, c, desc);
    }

    /// Asserts `w == 0`.
    pub fn add_zero_assertion(&mut self, w: Wire, desc: &str) {
        let (one, zero) = (self.one, self.zero);
        self.add_assertion(w, one, zero, desc);
    }

    /// Asserts `w == 1`.
    pub fn add_one_assertion(&mut self, w: Wire, desc: &str) {
        let one = self.one;
        self.add_assertion(w, one, one, desc);
    }

    /// Asserts `w * (1 - w) == 0`, forcing `w` into {0, 1}.
    pub fn add_binary_assertion(&mut self, w: Wire, desc: &str) {
        let one = self.one;
        let complement = self.sub(one, w);
        let zero = self.zero;
        self.add_assertion(w, complement, zero, desc);
        self.mark_bit(w);
    }

    /// Marks `w` as a circuit output, returning the output wire.
    ///
    /// Constants, inputs, witness wires, and linear combinations are first
    /// re-materialized through a multiplication by one so that every output
    /// is backed by an independent R1CS variable.
    pub fn make_output(&mut self, w: Wire, desc: &str) -> Wire {
        let out = if matches!(self.kind(w), WireKind::Variable) {
            w
        } else {
            self.force_variable(w, desc)
        };
        self.log.push(LogEntry::Label(WireLabel {
            kind: LabelKind::Output,
            wire: out,
            desc: desc.to_string(),
        }));
        self.outputs.push(out);
        out
    }

    /// Marks every wire of `ws` as an output.
    pub fn make_output_array(&mut self, ws: &[Wire], desc: &str) -> Vec<Wire> {
        ws.iter()
            .enumerate()
            .map(|(i, w)| self.make_output(*w, &format!("{} {}", desc, i)))
            .collect()
    }

    fn force_variable(&mut self, w: Wire, desc: &str) -> Wire {
        let one = self.one;
        let inputs = vec![w, one];
        if let Some(outs) = self.lookup(&Op::Mul, &inputs, 1) {
            return outs[0];
        }
        let bit = self.is_bit(w);
        let out = self.alloc_wire(WireKind::Variable, bit);
        self.emit(Op::Mul, inputs, vec![out], desc.to_string());
        out
    }

    /// Writes the circuit file consumed by the external prover.
    pub fn write_circuit_file(&self, path: &Path) -> Result<(), BuildError> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        writeln!(out, "total {}", self.num_wires())?;
        for entry in &self.log {
            match entry {
                LogEntry::Op(inst) => writeln!(out, "{}", inst.circuit_line())?,
                LogEntry::Label(label) => writeln!(out, "{}", label.circuit_line())?,
                LogEntry::Hook(_) => {}
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Summarizes the build: wire counts and per-opcode instruction counts.
    pub fn stats(&self) -> CircuitStats {
        let mut instruction_counts: IndexMap<String, usize> = IndexMap::new();
        for entry in &self.log {
            if let LogEntry::Op(inst) = entry {
                *instruction_counts
                    .entry(inst.family().to_string())
                    .or_insert(0) += 1;
            }
        }
        CircuitStats {
            name: self.name.clone(),
            num_wires: self.num_wires(),
            num_inputs: self.inputs.len(),
            num_witness_wires: self.witnesses.len(),
            num_outputs: self.outputs.len(),
            num_mul_constraints: self.num_mul_constraints,
            instruction_counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_generator_has_one_and_zero() {
        let gen = CircuitGenerator::new("empty");
        assert_eq!(gen.num_wires(), 2);
        assert_eq!(gen.constant_value(gen.one()), Some(&BigUint::one()));
        assert_eq!(gen.constant_value(gen.zero()), Some(&BigUint::zero()));
        assert_eq!(gen.num_mul_constraints(), 0);
        assert_eq!(gen.input_wires(), &[gen.one()]);
    }

    #[test]
    fn constant_wires_are_cached() {
        let mut gen = CircuitGenerator::new("constants");
        let a = gen.create_constant_wire(&BigUint::from(42u8), "");
        let b = gen.create_constant_wire(&BigUint::from(42u8), "");
        assert_eq!(a, b);
        assert_eq!(gen.num_mul_constraints(), 0);
    }

    #[test]
    fn assertion_dedup_is_commutative() {
        let mut gen = CircuitGenerator::new("assertions");
        let a = gen.create_input_wire("a");
        let b = gen.create_input_wire("b");
        let c = gen.create_input_wire("c");
        gen.add_assertion(a, b, c, "");
        let count = gen.num_mul_constraints();
        gen.add_assertion(b, a, c, "");
        assert_eq!(gen.num_mul_constraints(), count);
    }

    #[test]
    fn make_output_forces_variable_for_inputs() {
        let mut gen = CircuitGenerator::new("outputs");
        let a = gen.create_input_wire("a");
        let out = gen.make_output(a, "out");
        assert_ne!(out, a);
        assert_eq!(gen.num_mul_constraints(), 1);
    }

    #[test]
    fn make_output_keeps_variable_wires() {
        let mut gen = CircuitGenerator::new("outputs");
        let a = gen.create_input_wire("a");
        let b = gen.create_input_wire("b");
        let p = gen.mul(a, b);
        let out = gen.make_output(p, "out");
        assert_eq!(out, p);
    }

    #[test]
    fn stats_count_instruction_families() {
        let mut gen = CircuitGenerator::new("stats");
        let a = gen.create_input_wire("a");
        let b = gen.create_input_wire("b");
        let p = gen.mul(a, b);
        gen.make_output(p, "out");
        let stats = gen.stats();
        assert_eq!(stats.num_inputs, 3); // one-wire + a + b
        assert_eq!(stats.num_outputs, 1);
        assert_eq!(stats.instruction_counts.get("mul"), Some(&1));
        assert_eq!(stats.num_mul_constraints, 1);
    }
}
