//! Fixed-length sequences of wires and their bulk operations.
//!
//! A [`WireArray`] is most often a bit decomposition (LSB first), but word
//! arrays use the same type. Index shuffles (rotations, shifts, length
//! adjustment) are free; only packing and the element-wise boolean operations
//! touch the instruction log.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::circuit::generator::{CircuitGenerator, WireKind};
use crate::circuit::operations::Op;
use crate::circuit::wire::Wire;
use crate::circuit::BuildError;

/// An ordered, fixed-length sequence of wires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireArray {
    wires: Vec<Wire>,
}

impl WireArray {
    pub fn new(wires: Vec<Wire>) -> Self {
        WireArray { wires }
    }

    pub fn get(&self, i: usize) -> Wire {
        self.wires[i]
    }

    pub fn len(&self) -> usize {
        self.wires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn into_vec(self) -> Vec<Wire> {
        self.wires
    }

    /// Returns a copy truncated or zero-padded to `new_len`.
    pub fn adjust_length(&self, gen: &CircuitGenerator, new_len: usize) -> WireArray {
        let mut wires = self.wires.clone();
        wires.resize(new_len, gen.zero());
        WireArray::new(wires)
    }

    /// Sums all elements into a single wire.
    pub fn sum_all_elements(&self, gen: &mut CircuitGenerator) -> Wire {
        gen.add_many(&self.wires)
    }

    /// Element-wise addition after zero-padding both arrays to `len`.
    pub fn add_wire_array(
        &self,
        gen: &mut CircuitGenerator,
        other: &WireArray,
        len: usize,
    ) -> WireArray {
        let a = self.adjust_length(gen, len);
        let b = other.adjust_length(gen, len);
        let wires = a
            .wires
            .iter()
            .zip(&b.wires)
            .map(|(x, y)| gen.add(*x, *y))
            .collect();
        WireArray::new(wires)
    }

    /// Element-wise multiplication after zero-padding both arrays to `len`.
    pub fn mul_wire_array(
        &self,
        gen: &mut CircuitGenerator,
        other: &WireArray,
        len: usize,
    ) -> WireArray {
        let a = self.adjust_length(gen, len);
        let b = other.adjust_length(gen, len);
        let wires = a
            .wires
            .iter()
            .zip(&b.wires)
            .map(|(x, y)| gen.mul(*x, *y))
            .collect();
        WireArray::new(wires)
    }

    /// Element-wise exclusive or of two equal-length binary arrays.
    pub fn xor_wire_array(
        &self,
        gen: &mut CircuitGenerator,
        other: &WireArray,
    ) -> Result<WireArray, BuildError> {
        if self.len() != other.len() {
            return Err(BuildError::LengthMismatch(self.len(), other.len()));
        }
        let mut wires = Vec::with_capacity(self.len());
        for (x, y) in self.wires.iter().zip(&other.wires) {
            wires.push(gen.xor(*x, *y)?);
        }
        Ok(WireArray::new(wires))
    }

    /// Element-wise and of two equal-length binary arrays.
    pub fn and_wire_array(
        &self,
        gen: &mut CircuitGenerator,
        other: &WireArray,
    ) -> Result<WireArray, BuildError> {
        if self.len() != other.len() {
            return Err(BuildError::LengthMismatch(self.len(), other.len()));
        }
        let mut wires = Vec::with_capacity(self.len());
        for (x, y) in self.wires.iter().zip(&other.wires) {
            wires.push(gen.and(*x, *y)?);
        }
        Ok(WireArray::new(wires))
    }

    /// Element-wise or of two equal-length binary arrays.
    pub fn or_wire_array(
        &self,
        gen: &mut CircuitGenerator,
        other: &WireArray,
    ) -> Result<WireArray, BuildError> {
        if self.len() != other.len() {
            return Err(BuildError::LengthMismatch(self.len(), other.len()));
        }
        let mut wires = Vec::with_capacity(self.len());
        for (x, y) in self.wires.iter().zip(&other.wires) {
            wires.push(gen.or(*x, *y)?);
        }
        Ok(WireArray::new(wires))
    }

    /// Complements every bit of a binary array.
    pub fn inv_as_bits(&self, gen: &mut CircuitGenerator) -> Result<WireArray, BuildError> {
        let mut wires = Vec::with_capacity(self.len());
        for w in &self.wires {
            wires.push(gen.inv_as_bit(*w)?);
        }
        Ok(WireArray::new(wires))
    }

    /// Packs all bits into a single wire: `sum(bits[i] * 2^i)`.
    pub fn pack_as_bits(&self, gen: &mut CircuitGenerator) -> Result<Wire, BuildError> {
        self.pack_as_bits_range(gen, 0, self.len())
    }

    /// Packs the bits in `from..to` into a single wire.
    ///
    /// Every wire in the range must be known binary. If all bits are
    /// constants the result folds to a constant wire; otherwise a pack
    /// instruction (costing no multiplication constraints) is emitted and
    /// the packed wire remembers this decomposition.
    pub fn pack_as_bits_range(
        &self,
        gen: &mut CircuitGenerator,
        from: usize,
        to: usize,
    ) -> Result<Wire, BuildError> {
        if from > to || to > self.len() {
            return Err(BuildError::InvalidBitRange {
                from,
                to,
                len: self.len(),
            });
        }
        let bits = &self.wires[from..to];
        let mut all_constant = true;
        let mut sum = BigUint::zero();
        for (i, w) in bits.iter().enumerate() {
            match gen.constant_value(*w) {
                Some(v) => {
                    if v.is_one() {
                        sum += BigUint::one() << i;
                    } else if !v.is_zero() {
                        return Err(BuildError::NonBinaryOperand(w.id()));
                    }
                }
                None => {
                    if !gen.is_bit(*w) {
                        return Err(BuildError::NonBinaryOperand(w.id()));
                    }
                    all_constant = false;
                }
            }
        }
        if all_constant {
            return Ok(gen.create_constant_wire(&sum, ""));
        }
        let out = gen.alloc_wire(WireKind::Linear, bits.len() == 1);
        gen.emit(Op::Pack, bits.to_vec(), vec![out], String::new());
        gen.set_cached_bits(out, bits.to_vec());
        Ok(out)
    }

    /// Concatenated bit decompositions of all elements, `width` bits each.
    pub fn get_bits(
        &self,
        gen: &mut CircuitGenerator,
        width: usize,
    ) -> Result<WireArray, BuildError> {
        let mut bits = Vec::with_capacity(self.len() * width);
        for w in &self.wires {
            bits.extend(gen.get_bit_wires(*w, width)?.into_vec());
        }
        Ok(WireArray::new(bits))
    }

    /// Rotates bit positions left: result bit `i` is bit `i - amount mod n`.
    pub fn rotate_left(&self, amount: usize) -> WireArray {
        let n = self.len();
        if n == 0 {
            return self.clone();
        }
        let r = amount % n;
        let wires = (0..n).map(|i| self.wires[(i + n - r) % n]).collect();
        WireArray::new(wires)
    }

    /// Rotates bit positions right: result bit `i` is bit `i + amount mod n`.
    pub fn rotate_right(&self, amount: usize) -> WireArray {
        let n = self.len();
        if n == 0 {
            return self.clone();
        }
        let r = amount % n;
        let wires = (0..n).map(|i| self.wires[(i + r) % n]).collect();
        WireArray::new(wires)
    }

    /// Logical left shift of the represented value, filling with `zero`.
    pub fn shift_left(&self, amount: usize, zero: Wire) -> WireArray {
        let n = self.len();
        let wires = (0..n)
            .map(|i| if i >= amount { self.wires[i - amount] } else { zero })
            .collect();
        WireArray::new(wires)
    }

    /// Logical right shift of the represented value, filling with `zero`.
    pub fn shift_right(&self, amount: usize, zero: Wire) -> WireArray {
        let n = self.len();
        let wires = (0..n)
            .map(|i| {
                if i + amount < n {
                    self.wires[i + amount]
                } else {
                    zero
                }
            })
            .collect();
        WireArray::new(wires)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::evaluator::CircuitEvaluator;

    #[test]
    fn split_then_pack_round_trips() {
        let mut gen = CircuitGenerator::new("roundtrip");
        let a = gen.create_input_wire("a");
        let bits = gen.get_bit_wires(a, 16).unwrap();
        let packed = bits.pack_as_bits(&mut gen).unwrap();
        let out = gen.make_output(packed, "");

        let mut eval = CircuitEvaluator::new(&gen);
        eval.set_wire_value(a, &BigUint::from(0xBEEFu16)).unwrap();
        eval.evaluate(&gen).unwrap();
        assert_eq!(eval.get_wire_value(out).unwrap(), BigUint::from(0xBEEFu16));
    }

    #[test]
    fn packing_constant_bits_folds() {
        let mut gen = CircuitGenerator::new("fold");
        let one = gen.one();
        let zero = gen.zero();
        let arr = WireArray::new(vec![one, zero, one]); // 0b101
        let packed = arr.pack_as_bits(&mut gen).unwrap();
        assert_eq!(gen.constant_value(packed), Some(&BigUint::from(5u8)));
    }

    #[test]
    fn packing_non_binary_wire_is_rejected() {
        let mut gen = CircuitGenerator::new("reject");
        let a = gen.create_input_wire("a");
        let arr = WireArray::new(vec![a]);
        assert!(matches!(
            arr.pack_as_bits(&mut gen),
            Err(BuildError::NonBinaryOperand(_))
        ));
    }

    #[test]
    fn sum_with_constant_members() {
        let mut gen = CircuitGenerator::new("sum");
        let a = gen.create_input_wire("a");
        let c = gen.create_constant_wire(&BigUint::from(7u8), "");
        let arr = WireArray::new(vec![a, c]);
        let sum = arr.sum_all_elements(&mut gen);
        let out = gen.make_output(sum, "");

        let mut eval = CircuitEvaluator::new(&gen);
        eval.set_wire_value(a, &BigUint::from(3u8)).unwrap();
        eval.evaluate(&gen).unwrap();
        assert_eq!(eval.get_wire_value(out).unwrap(), BigUint::from(10u8));
    }

    #[test]
    fn shift_right_drops_low_bits() {
        let mut gen = CircuitGenerator::new("shift");
        let a = gen.create_input_wire("a");
        let shifted = gen.shift_right(a, 8, 3).unwrap();
        let out = gen.make_output(shifted, "");

        let mut eval = CircuitEvaluator::new(&gen);
        eval.set_wire_value(a, &BigUint::from(0b1011_0110u8)).unwrap();
        eval.evaluate(&gen).unwrap();
        assert_eq!(
            eval.get_wire_value(out).unwrap(),
            BigUint::from(0b0001_0110u8)
        );
    }

    #[test]
    fn adjust_length_pads_with_zero_wire() {
        let gen = CircuitGenerator::new("adjust");
        let arr = WireArray::new(vec![gen.one()]);
        let padded = arr.adjust_length(&gen, 3);
        assert_eq!(padded.len(), 3);
        assert_eq!(padded.get(1), gen.zero());
        assert_eq!(padded.get(2), gen.zero());
    }
}
