//! Wires and the wire-level arithmetic API.
//!
//! A [`Wire`] is a copyable handle to a value in the constraint system. All
//! per-wire state (its kind, binary flag, and cached bit decomposition) lives
//! in the owning [`CircuitGenerator`]; the arithmetic API is therefore a set
//! of generator methods taking wire handles.
//!
//! Operations fold constants wherever both operands are known at build time,
//! and multiplications by zero or one never allocate anything. Every
//! operation with a multiplication-constraint cost goes through the
//! deduplication cache, so rebuilding an identical sub-expression (even with
//! commuted operands) is free.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::circuit::generator::{CircuitGenerator, WireKind};
use crate::circuit::operations::Op;
use crate::circuit::wire_array::WireArray;
use crate::circuit::BuildError;

/// Handle to a value in the constraint system.
///
/// The id is assigned at materialization and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Wire(u32);

impl Wire {
    pub(crate) fn new(raw: u32) -> Self {
        Wire(raw)
    }

    /// The wire id as used in circuit files.
    pub fn id(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn raw(self) -> u32 {
        self.0
    }
}

/// Reduces a signed constant into the field, returning the magnitude of its
/// representative and whether it was negative.
fn reduce_signed(c: &BigInt, prime: &BigUint) -> (BigUint, bool) {
    let p = BigInt::from(prime.clone());
    let mut r = c % &p;
    let negative = r.sign() == Sign::Minus;
    if negative {
        r = -r;
    }
    (r.to_biguint().unwrap_or_default(), negative)
}

impl CircuitGenerator {
    /// Returns a wire carrying `a + b`.
    pub fn add(&mut self, a: Wire, b: Wire) -> Wire {
        match (
            self.constant_value(a).cloned(),
            self.constant_value(b).cloned(),
        ) {
            (Some(x), Some(y)) => {
                let sum = (x + y) % self.field_prime();
                self.create_constant_wire(&sum, "")
            }
            (Some(x), None) if x.is_zero() => b,
            (None, Some(y)) if y.is_zero() => a,
            _ => {
                let out = self.alloc_wire(WireKind::Linear, false);
                self.emit(Op::Add, vec![a, b], vec![out], String::new());
                out
            }
        }
    }

    /// Returns a wire carrying the sum of all of `ws`.
    pub fn add_many(&mut self, ws: &[Wire]) -> Wire {
        if ws.is_empty() {
            return self.zero();
        }
        if ws.len() == 1 {
            return ws[0];
        }
        let mut constant_sum = BigUint::zero();
        let mut all_constant = true;
        for w in ws {
            match self.constant_value(*w) {
                Some(v) => constant_sum += v,
                None => all_constant = false,
            }
        }
        if all_constant {
            let sum = constant_sum % self.field_prime();
            return self.create_constant_wire(&sum, "");
        }
        let out = self.alloc_wire(WireKind::Linear, false);
        self.emit(Op::Add, ws.to_vec(), vec![out], String::new());
        out
    }

    /// Returns a wire carrying `w + c`.
    pub fn add_const(&mut self, w: Wire, c: &BigInt) -> Wire {
        let (magnitude, negative) = reduce_signed(c, &self.field_prime().clone());
        if magnitude.is_zero() {
            return w;
        }
        let value = if negative {
            self.field_prime() - &magnitude
        } else {
            magnitude
        };
        let cw = self.create_constant_wire(&value, "");
        self.add(w, cw)
    }

    /// Returns a wire carrying `-w`.
    pub fn neg(&mut self, w: Wire) -> Wire {
        self.mul_const(w, &BigInt::from(-1))
    }

    /// Returns a wire carrying `a - b`.
    pub fn sub(&mut self, a: Wire, b: Wire) -> Wire {
        let nb = self.neg(b);
        self.add(a, nb)
    }

    /// Returns a wire carrying `a * b`.
    ///
    /// Multiplications where either operand is a compile-time constant cost
    /// no multiplication constraint.
    pub fn mul(&mut self, a: Wire, b: Wire) -> Wire {
        if let Some(x) = self.constant_value(a).cloned() {
            return self.mul_const(b, &BigInt::from(x));
        }
        if let Some(y) = self.constant_value(b).cloned() {
            return self.mul_const(a, &BigInt::from(y));
        }
        let inputs = vec![a, b];
        if let Some(outs) = self.lookup(&Op::Mul, &inputs, 1) {
            return outs[0];
        }
        let bit = self.is_bit(a) && self.is_bit(b);
        let out = self.alloc_wire(WireKind::Variable, bit);
        self.emit(Op::Mul, inputs, vec![out], String::new());
        out
    }

    /// Returns a wire carrying `w * c` for a compile-time constant `c`.
    pub fn mul_const(&mut self, w: Wire, c: &BigInt) -> Wire {
        let prime = self.field_prime().clone();
        let (magnitude, negative) = reduce_signed(c, &prime);
        if magnitude.is_zero() {
            return self.zero();
        }
        if !negative && magnitude.is_one() {
            return w;
        }
        if let Some(v) = self.constant_value(w).cloned() {
            let multiplier = if negative {
                &prime - &magnitude
            } else {
                magnitude
            };
            let product = v * multiplier % &prime;
            return self.create_constant_wire(&product, "");
        }
        let op = Op::ConstMul {
            magnitude,
            negative,
        };
        let inputs = vec![w];
        if let Some(outs) = self.lookup(&op, &inputs, 1) {
            return outs[0];
        }
        let out = self.alloc_wire(WireKind::Linear, false);
        self.emit(op, inputs, vec![out], String::new());
        out
    }

    fn require_bit(&self, w: Wire) -> Result<(), BuildError> {
        if self.is_bit(w) {
            Ok(())
        } else {
            Err(BuildError::NonBinaryOperand(w.id()))
        }
    }

    /// Complement of a known-binary wire; callers must have checked the
    /// operand. The result is a linear combination marked binary.
    fn inv_bit(&mut self, w: Wire) -> Wire {
        if let Some(v) = self.constant_value(w).cloned() {
            let inv = BigUint::one() - v;
            return self.create_constant_wire(&inv, "");
        }
        let n = self.neg(w);
        let one = self.one();
        let out = self.add(one, n);
        self.mark_bit(out);
        out
    }

    /// Returns a wire carrying `1 - w` for a binary wire `w`.
    pub fn inv_as_bit(&mut self, w: Wire) -> Result<Wire, BuildError> {
        self.require_bit(w)?;
        Ok(self.inv_bit(w))
    }

    /// Returns a binary wire carrying `a XOR b`. Both operands must be known
    /// to be binary.
    pub fn xor(&mut self, a: Wire, b: Wire) -> Result<Wire, BuildError> {
        self.require_bit(a)?;
        self.require_bit(b)?;
        if a == b {
            return Ok(self.zero());
        }
        match (
            self.constant_value(a).cloned(),
            self.constant_value(b).cloned(),
        ) {
            (Some(x), Some(y)) => {
                let value = if x != y { BigUint::one() } else { BigUint::zero() };
                Ok(self.create_constant_wire(&value, ""))
            }
            (Some(x), None) => Ok(if x.is_one() { self.inv_bit(b) } else { b }),
            (None, Some(y)) => Ok(if y.is_one() { self.inv_bit(a) } else { a }),
            (None, None) => {
                let inputs = vec![a, b];
                if let Some(outs) = self.lookup(&Op::Xor, &inputs, 1) {
                    return Ok(outs[0]);
                }
                let out = self.alloc_wire(WireKind::Variable, true);
                self.emit(Op::Xor, inputs, vec![out], String::new());
                Ok(out)
            }
        }
    }

    /// Returns a binary wire carrying `a OR b`. Both operands must be known
    /// to be binary.
    pub fn or(&mut self, a: Wire, b: Wire) -> Result<Wire, BuildError> {
        self.require_bit(a)?;
        self.require_bit(b)?;
        if a == b {
            return Ok(a);
        }
        match (
            self.constant_value(a).cloned(),
            self.constant_value(b).cloned(),
        ) {
            (Some(x), Some(y)) => {
                let value = if x.is_one() || y.is_one() {
                    BigUint::one()
                } else {
                    BigUint::zero()
                };
                Ok(self.create_constant_wire(&value, ""))
            }
            (Some(x), None) => Ok(if x.is_one() { self.one() } else { b }),
            (None, Some(y)) => Ok(if y.is_one() { self.one() } else { a }),
            (None, None) => {
                let inputs = vec![a, b];
                if let Some(outs) = self.lookup(&Op::Or, &inputs, 1) {
                    return Ok(outs[0]);
                }
                let out = self.alloc_wire(WireKind::Variable, true);
                self.emit(Op::Or, inputs, vec![out], String::new());
                Ok(out)
            }
        }
    }

    /// Returns a wire carrying `a AND b` for binary operands; identical to a
    /// product.
    pub fn and(&mut self, a: Wire, b: Wire) -> Result<Wire, BuildError> {
        self.require_bit(a)?;
        self.require_bit(b)?;
        Ok(self.mul(a, b))
    }

    /// Returns a binary wire that is 1 iff `w != 0`.
    pub fn is_nonzero(&mut self, w: Wire) -> Wire {
        if let Some(v) = self.constant_value(w).cloned() {
            let value = if v.is_zero() {
                BigUint::zero()
            } else {
                BigUint::one()
            };
            return self.create_constant_wire(&value, "");
        }
        let inputs = vec![w];
        if let Some(outs) = self.lookup(&Op::NonZeroCheck, &inputs, 2) {
            return outs[1];
        }
        let hint = self.alloc_wire(WireKind::Variable, false);
        let bit = self.alloc_wire(WireKind::Variable, true);
        self.emit(Op::NonZeroCheck, inputs, vec![hint, bit], String::new());
        bit
    }

    /// Returns a binary wire that is 1 iff `w == 0`.
    pub fn is_zero(&mut self, w: Wire) -> Wire {
        let bit = self.is_nonzero(w);
        self.inv_bit(bit)
    }

    /// Returns a binary wire that is 1 iff `a == b`.
    pub fn is_equal(&mut self, a: Wire, b: Wire) -> Wire {
        let d = self.sub(a, b);
        self.is_zero(d)
    }

    fn check_split_width(&self, width: usize) -> Result<(), BuildError> {
        let limit = self.config().log2_field_prime;
        if width > limit {
            Err(BuildError::InvalidBitWidth { width, limit })
        } else {
            Ok(())
        }
    }

    fn force_split(&mut self, w: Wire, width: usize) -> Vec<Wire> {
        if let Some(outs) = self.lookup(&Op::Split, &[w], width) {
            self.set_cached_bits(w, outs.clone());
            return outs;
        }
        let outs: Vec<Wire> = (0..width)
            .map(|_| self.alloc_wire(WireKind::Variable, true))
            .collect();
        self.emit(Op::Split, vec![w], outs.clone(), String::new());
        self.set_cached_bits(w, outs.clone());
        outs
    }

    /// Returns the `width` low bits of `w`, LSB first, splitting the wire
    /// and constraining the decomposition on first use. The decomposition is
    /// cached; later requests reuse it, padded or truncated to `width`.
    pub fn get_bit_wires(&mut self, w: Wire, width: usize) -> Result<WireArray, BuildError> {
        self.check_split_width(width)?;
        if let Some(v) = self.constant_value(w).cloned() {
            let actual = v.bits() as usize;
            if actual > width {
                return Err(BuildError::ConstantTooWide {
                    actual,
                    declared: width,
                });
            }
            let (one, zero) = (self.one(), self.zero());
            let bits = (0..width)
                .map(|i| if v.bit(i as u64) { one } else { zero })
                .collect();
            return Ok(WireArray::new(bits));
        }
        if let Some(cached) = self.cached_bits(w).cloned() {
            return Ok(WireArray::new(cached).adjust_length(self, width));
        }
        Ok(WireArray::new(self.force_split(w, width)))
    }

    /// Constrains `w` to fit in `width` bits.
    pub fn restrict_bit_length(&mut self, w: Wire, width: usize) -> Result<(), BuildError> {
        self.check_split_width(width)?;
        if let Some(v) = self.constant_value(w) {
            let actual = v.bits() as usize;
            if actual > width {
                return Err(BuildError::ConstantTooWide {
                    actual,
                    declared: width,
                });
            }
            return Ok(());
        }
        match self.cached_bits(w) {
            Some(cached) if cached.len() <= width => Ok(()),
            _ => {
                self.force_split(w, width);
                Ok(())
            }
        }
    }

    /// Packs the `desired` low bits of `w` (declared `current` bits wide)
    /// into a fresh wire, discarding the high bits.
    pub fn trim_bits(
        &mut self,
        w: Wire,
        current: usize,
        desired: usize,
    ) -> Result<Wire, BuildError> {
        let bits = self.get_bit_wires(w, current)?;
        bits.pack_as_bits_range(self, 0, desired)
    }

    /// Bits of `2^width + x - y`, the basis of the unsigned comparisons.
    fn comparison_bits(
        &mut self,
        x: Wire,
        y: Wire,
        width: usize,
    ) -> Result<WireArray, BuildError> {
        let limit = self.config().log2_field_prime - 2;
        if width > limit {
            return Err(BuildError::InvalidBitWidth { width, limit });
        }
        let boundary = BigUint::one() << width;
        let bw = self.create_constant_wire(&boundary, "");
        let s = self.add(bw, x);
        let s = self.sub(s, y);
        self.get_bit_wires(s, width + 1)
    }

    /// Returns a binary wire that is 1 iff `a < b`, treating both operands
    /// as unsigned `width`-bit values. The caller must guarantee both fit in
    /// `width` bits; the comparison does not verify this.
    pub fn is_less_than(&mut self, a: Wire, b: Wire, width: usize) -> Result<Wire, BuildError> {
        let bits = self.comparison_bits(a, b, width)?;
        Ok(self.inv_bit(bits.get(width)))
    }

    /// Returns a binary wire that is 1 iff `a <= b` over `width` bits.
    pub fn is_less_than_or_equal(
        &mut self,
        a: Wire,
        b: Wire,
        width: usize,
    ) -> Result<Wire, BuildError> {
        let bits = self.comparison_bits(b, a, width)?;
        Ok(bits.get(width))
    }

    /// Returns a binary wire that is 1 iff `a > b` over `width` bits.
    pub fn is_greater_than(&mut self, a: Wire, b: Wire, width: usize) -> Result<Wire, BuildError> {
        self.is_less_than(b, a, width)
    }

    /// Returns a binary wire that is 1 iff `a >= b` over `width` bits.
    pub fn is_greater_than_or_equal(
        &mut self,
        a: Wire,
        b: Wire,
        width: usize,
    ) -> Result<Wire, BuildError> {
        self.is_less_than_or_equal(b, a, width)
    }

    /// Rotates the `width`-bit value of `w` left by `amount`.
    pub fn rotate_left(
        &mut self,
        w: Wire,
        width: usize,
        amount: usize,
    ) -> Result<Wire, BuildError> {
        let bits = self.get_bit_wires(w, width)?;
        bits.rotate_left(amount).pack_as_bits(self)
    }

    /// Rotates the `width`-bit value of `w` right by `amount`.
    pub fn rotate_right(
        &mut self,
        w: Wire,
        width: usize,
        amount: usize,
    ) -> Result<Wire, BuildError> {
        let bits = self.get_bit_wires(w, width)?;
        bits.rotate_right(amount).pack_as_bits(self)
    }

    /// Logical left shift of the `width`-bit value of `w` by `amount`.
    pub fn shift_left(&mut self, w: Wire, width: usize, amount: usize) -> Result<Wire, BuildError> {
        let bits = self.get_bit_wires(w, width)?;
        let zero = self.zero();
        bits.shift_left(amount, zero).pack_as_bits(self)
    }

    /// Logical right shift of the `width`-bit value of `w` by `amount`.
    pub fn shift_right(
        &mut self,
        w: Wire,
        width: usize,
        amount: usize,
    ) -> Result<Wire, BuildError> {
        let bits = self.get_bit_wires(w, width)?;
        let zero = self.zero();
        bits.shift_right(amount, zero).pack_as_bits(self)
    }

    /// Returns `a` if `selector` is 1, `b` if it is 0: `b + sel * (a - b)`.
    pub fn mux(&mut self, selector: Wire, a: Wire, b: Wire) -> Wire {
        let d = self.sub(a, b);
        let t = self.mul(selector, d);
        self.add(b, t)
    }
}
