//! The instruction set of the constraint system.
//!
//! Each [`Instruction`] is an immutable record of one constraint-producing
//! operation: its opcode, ordered input wires, output wires, and an optional
//! human-readable tag that ends up as a trailing comment in the emitted
//! circuit file. Instructions know how to evaluate themselves over concrete
//! field values, how much they cost in multiplication constraints, and how to
//! identify themselves structurally for common-subexpression elimination.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::circuit::evaluator::{CircuitEvaluator, EvalError};
use crate::circuit::wire::Wire;

/// Opcode of a single instruction, with opcode-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Linear combination: `out = sum(inputs)`.
    Add,
    /// Product: `out = in0 * in1`.
    Mul,
    /// Multiplication by a compile-time constant. `magnitude` is reduced into
    /// `[0, P)`; when `negative` is set the effective multiplier is
    /// `P - magnitude`.
    ConstMul { magnitude: BigUint, negative: bool },
    /// Constraint `in0 * in1 == out0`, where `out0` is an existing wire.
    Assert,
    /// Bit decomposition of `in0` into `outputs.len()` bits, LSB first.
    Split,
    /// Recomposition `out = sum(in[i] * 2^i)` of binary inputs.
    Pack,
    /// Boolean exclusive or of two binary inputs.
    Xor,
    /// Boolean or of two binary inputs.
    Or,
    /// Non-zero check: `out0` is an inverse hint, `out1 = (in0 != 0)`.
    NonZeroCheck,
}

/// Structural identity of a deduplicatable instruction.
///
/// Commutative opcodes normalize their operand pair so that swapped operands
/// produce the same key. Additions and bit-packings carry no key: they cost
/// no multiplication constraints, so duplicating them is harmless.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OpKey {
    Mul(u32, u32),
    Xor(u32, u32),
    Or(u32, u32),
    Assert(u32, u32, u32),
    ConstMul(u32, BigUint, bool),
    NonZeroCheck(u32),
    Split(u32, usize),
}

/// Returns the structural key of an operation, if it participates in
/// deduplication. Pairs for commutative opcodes are sorted.
pub fn cache_key(op: &Op, inputs: &[Wire], num_outputs: usize) -> Option<OpKey> {
    let pair = |a: Wire, b: Wire| {
        let (x, y) = (a.raw(), b.raw());
        if x <= y {
            (x, y)
        } else {
            (y, x)
        }
    };
    match op {
        Op::Mul => {
            let (x, y) = pair(inputs[0], inputs[1]);
            Some(OpKey::Mul(x, y))
        }
        Op::Xor => {
            let (x, y) = pair(inputs[0], inputs[1]);
            Some(OpKey::Xor(x, y))
        }
        Op::Or => {
            let (x, y) = pair(inputs[0], inputs[1]);
            Some(OpKey::Or(x, y))
        }
        Op::Assert => {
            let (x, y) = pair(inputs[0], inputs[1]);
            Some(OpKey::Assert(x, y, inputs[2].raw()))
        }
        Op::ConstMul { magnitude, negative } => Some(OpKey::ConstMul(
            inputs[0].raw(),
            magnitude.clone(),
            *negative,
        )),
        Op::NonZeroCheck => Some(OpKey::NonZeroCheck(inputs[0].raw())),
        Op::Split => Some(OpKey::Split(inputs[0].raw(), num_outputs)),
        Op::Add | Op::Pack => None,
    }
}

/// One materialized instruction of the circuit.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub op: Op,
    pub inputs: Vec<Wire>,
    pub outputs: Vec<Wire>,
    pub desc: String,
}

impl Instruction {
    /// Number of multiplication constraints this instruction contributes.
    pub fn constraint_cost(&self) -> usize {
        match self.op {
            Op::Add | Op::Pack | Op::ConstMul { .. } => 0,
            Op::Mul | Op::Assert | Op::Xor | Op::Or => 1,
            Op::NonZeroCheck => 2,
            Op::Split => self.outputs.len() + 1,
        }
    }

    /// Opcode family name used for statistics.
    pub fn family(&self) -> &'static str {
        match self.op {
            Op::Add => "add",
            Op::Mul => "mul",
            Op::ConstMul { .. } => "const-mul",
            Op::Assert => "assert",
            Op::Split => "split",
            Op::Pack => "pack",
            Op::Xor => "xor",
            Op::Or => "or",
            Op::NonZeroCheck => "zerop",
        }
    }

    /// Opcode string as emitted in the circuit file.
    pub fn opcode(&self) -> String {
        match &self.op {
            Op::ConstMul { magnitude, negative } => {
                if *negative {
                    format!("const-mul-neg-{}", magnitude.to_str_radix(16))
                } else {
                    format!("const-mul-{}", magnitude.to_str_radix(16))
                }
            }
            _ => self.family().to_string(),
        }
    }

    /// Renders this instruction as one line of the circuit file.
    pub fn circuit_line(&self) -> String {
        let ids = |wires: &[Wire]| {
            wires
                .iter()
                .map(|w| w.id().to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let mut line = format!(
            "{} in {} <{}> out {} <{}>",
            self.opcode(),
            self.inputs.len(),
            ids(&self.inputs),
            self.outputs.len(),
            ids(&self.outputs),
        );
        if !self.desc.is_empty() {
            line.push_str(" # ");
            line.push_str(&self.desc);
        }
        line
    }

    /// Computes this instruction's output values from its input values, or
    /// checks the asserted identity for assertion instructions.
    pub fn evaluate(&self, evaluator: &mut CircuitEvaluator) -> Result<(), EvalError> {
        let prime = evaluator.prime().clone();
        match &self.op {
            Op::Add => {
                let mut sum = BigUint::zero();
                for w in &self.inputs {
                    sum += evaluator.value(*w)?;
                }
                evaluator.assign(self.outputs[0], sum % &prime)
            }
            Op::Mul => {
                let product = evaluator.value(self.inputs[0])? * evaluator.value(self.inputs[1])?;
                evaluator.assign(self.outputs[0], product % &prime)
            }
            Op::ConstMul { magnitude, negative } => {
                let product = evaluator.value(self.inputs[0])? * magnitude % &prime;
                let value = if *negative && !product.is_zero() {
                    &prime - product
                } else {
                    product
                };
                evaluator.assign(self.outputs[0], value)
            }
            Op::Assert => {
                let left = evaluator.value(self.inputs[0])? * evaluator.value(self.inputs[1])?
                    % &prime;
                let right = evaluator.value(self.outputs[0])?.clone();
                if left != right {
                    return Err(EvalError::AssertionFailed {
                        left: left.to_string(),
                        right: right.to_string(),
                        desc: self.desc.clone(),
                    });
                }
                Ok(())
            }
            Op::Split => {
                let value = evaluator.value(self.inputs[0])?.clone();
                let declared = self.outputs.len();
                let actual = value.bits() as usize;
                if actual > declared {
                    return Err(EvalError::SplitWidthExceeded {
                        wire: self.inputs[0].id(),
                        actual,
                        declared,
                    });
                }
                for (i, out) in self.outputs.iter().enumerate() {
                    evaluator.assign(*out, crate::util::bit(&value, i))?;
                }
                Ok(())
            }
            Op::Pack => {
                let mut sum = BigUint::zero();
                for (i, w) in self.inputs.iter().enumerate() {
                    sum += evaluator.value(*w)? << i;
                }
                evaluator.assign(self.outputs[0], sum % &prime)
            }
            Op::Xor => {
                let a = !evaluator.value(self.inputs[0])?.is_zero();
                let b = !evaluator.value(self.inputs[1])?.is_zero();
                let value = if a != b { BigUint::one() } else { BigUint::zero() };
                evaluator.assign(self.outputs[0], value)
            }
            Op::Or => {
                let a = !evaluator.value(self.inputs[0])?.is_zero();
                let b = !evaluator.value(self.inputs[1])?.is_zero();
                let value = if a || b { BigUint::one() } else { BigUint::zero() };
                evaluator.assign(self.outputs[0], value)
            }
            Op::NonZeroCheck => {
                let value = evaluator.value(self.inputs[0])?.clone();
                let (hint, bit) = if value.is_zero() {
                    (BigUint::zero(), BigUint::zero())
                } else {
                    // Modular inverse by Fermat's little theorem.
                    let exp = &prime - 2u8;
                    (value.modpow(&exp, &prime), BigUint::one())
                };
                evaluator.assign(self.outputs[0], hint)?;
                evaluator.assign(self.outputs[1], bit)
            }
        }
    }
}

/// Role of a labeled wire in the emitted circuit file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Verifier-visible circuit input.
    Input,
    /// Prover-only witness input.
    NizkInput,
    /// Circuit output.
    Output,
}

impl LabelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelKind::Input => "input",
            LabelKind::NizkInput => "nizkinput",
            LabelKind::Output => "output",
        }
    }
}

/// A wire role declaration; not itself a constraint.
#[derive(Debug, Clone)]
pub struct WireLabel {
    pub kind: LabelKind,
    pub wire: Wire,
    pub desc: String,
}

impl WireLabel {
    /// Renders this label as one line of the circuit file.
    pub fn circuit_line(&self) -> String {
        let mut line = format!("{} {}", self.kind.as_str(), self.wire.id());
        if !self.desc.is_empty() {
            line.push_str(" # ");
            line.push_str(&self.desc);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(id: u32) -> Wire {
        Wire::new(id)
    }

    #[test]
    fn commutative_keys_normalize_operand_order() {
        assert_eq!(
            cache_key(&Op::Mul, &[w(3), w(7)], 1),
            cache_key(&Op::Mul, &[w(7), w(3)], 1)
        );
        assert_eq!(
            cache_key(&Op::Xor, &[w(1), w(2)], 1),
            cache_key(&Op::Xor, &[w(2), w(1)], 1)
        );
        assert_eq!(
            cache_key(&Op::Assert, &[w(4), w(5), w(6)], 1),
            cache_key(&Op::Assert, &[w(5), w(4), w(6)], 1)
        );
    }

    #[test]
    fn linear_ops_have_no_key() {
        assert_eq!(cache_key(&Op::Add, &[w(1), w(2)], 1), None);
        assert_eq!(cache_key(&Op::Pack, &[w(1), w(2)], 1), None);
    }

    #[test]
    fn split_key_depends_on_width() {
        assert_ne!(
            cache_key(&Op::Split, &[w(1)], 8),
            cache_key(&Op::Split, &[w(1)], 16)
        );
    }

    #[test]
    fn constraint_costs() {
        let inst = |op: Op, outs: usize| Instruction {
            op,
            inputs: vec![w(0)],
            outputs: (0..outs as u32).map(w).collect(),
            desc: String::new(),
        };
        assert_eq!(inst(Op::Add, 1).constraint_cost(), 0);
        assert_eq!(inst(Op::Pack, 1).constraint_cost(), 0);
        assert_eq!(inst(Op::Mul, 1).constraint_cost(), 1);
        assert_eq!(inst(Op::NonZeroCheck, 2).constraint_cost(), 2);
        assert_eq!(inst(Op::Split, 8).constraint_cost(), 9);
    }

    #[test]
    fn const_mul_opcode_rendering() {
        let inst = Instruction {
            op: Op::ConstMul {
                magnitude: BigUint::from(26u8),
                negative: true,
            },
            inputs: vec![w(1)],
            outputs: vec![w(2)],
            desc: String::new(),
        };
        assert_eq!(inst.opcode(), "const-mul-neg-1a");
        assert_eq!(inst.circuit_line(), "const-mul-neg-1a in 1 <1> out 1 <2>");
    }
}
