//! Big integers as arrays of bounded limbs.
//!
//! A [`LongElement`] represents a non-negative integer wider than the field
//! modulus as little-endian limbs of `chunk_bitwidth` bits each, alongside a
//! static maximum value per limb. The bounds are plain integers, never
//! reduced: they upper-bound every value the limb can take across valid
//! witnesses and drive the overflow diagnostics. The represented value is
//! `sum(limb[i] * 2^(chunk_bitwidth * i))` as an unbounded integer.
//!
//! Addition and multiplication track bounds without reducing. Equality and
//! ordering use specialized protocols: equality groups limbs into super-limbs
//! below the field capacity and chains prover-supplied carries through the
//! groups; less-than lets the prover point at the most significant differing
//! limb with a one-hot selector and only constrains that limb pair plus the
//! limbs above it.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use crate::circuit::evaluator::{CircuitEvaluator, EvalError};
use crate::circuit::generator::CircuitGenerator;
use crate::circuit::wire::Wire;
use crate::circuit::wire_array::WireArray;
use crate::circuit::BuildError;
use crate::util;

/// A big integer held as bounded limbs.
#[derive(Debug, Clone)]
pub struct LongElement {
    limbs: Vec<Wire>,
    max_values: Vec<BigUint>,
}

impl LongElement {
    /// Builds an element from limb wires with per-limb bit-width bounds.
    pub fn from_wires(limbs: Vec<Wire>, bitwidths: &[usize]) -> Result<Self, BuildError> {
        if limbs.len() != bitwidths.len() {
            return Err(BuildError::LengthMismatch(limbs.len(), bitwidths.len()));
        }
        let max_values = bitwidths.iter().map(|b| util::max_value(*b)).collect();
        Ok(LongElement { limbs, max_values })
    }

    /// Builds an element from limb wires with explicit per-limb bounds.
    pub fn from_wires_with_bounds(
        limbs: Vec<Wire>,
        max_values: Vec<BigUint>,
    ) -> Result<Self, BuildError> {
        if limbs.len() != max_values.len() {
            return Err(BuildError::LengthMismatch(limbs.len(), max_values.len()));
        }
        Ok(LongElement { limbs, max_values })
    }

    /// Single-limb element known to fit in `bitwidth` bits.
    pub fn single(limb: Wire, bitwidth: usize) -> Self {
        LongElement {
            limbs: vec![limb],
            max_values: vec![util::max_value(bitwidth)],
        }
    }

    /// Chunks a flat LSB-first bit array into limbs of the configured width.
    pub fn from_bits(gen: &mut CircuitGenerator, bits: &WireArray) -> Result<Self, BuildError> {
        let chunk = gen.config().chunk_bitwidth;
        if bits.len() <= chunk {
            let limb = bits.pack_as_bits(gen)?;
            return Ok(LongElement {
                limbs: vec![limb],
                max_values: vec![util::max_value(bits.len())],
            });
        }
        let num_limbs = bits.len().div_ceil(chunk);
        let mut limbs = Vec::with_capacity(num_limbs);
        let mut max_values = Vec::with_capacity(num_limbs);
        for i in 0..num_limbs {
            let from = i * chunk;
            let to = usize::min(from + chunk, bits.len());
            limbs.push(bits.pack_as_bits_range(gen, from, to)?);
            max_values.push(util::max_value(to - from));
        }
        Ok(LongElement { limbs, max_values })
    }

    /// Element holding a compile-time constant.
    pub fn from_constant(gen: &mut CircuitGenerator, value: &BigUint) -> Self {
        let chunk = gen.config().chunk_bitwidth;
        let chunks = util::split(value, chunk);
        let limbs = chunks
            .iter()
            .map(|c| gen.create_constant_wire(c, ""))
            .collect();
        LongElement {
            limbs,
            max_values: chunks,
        }
    }

    pub fn limbs(&self) -> &[Wire] {
        &self.limbs
    }

    pub fn max_values(&self) -> &[BigUint] {
        &self.max_values
    }

    pub fn len(&self) -> usize {
        self.limbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limbs.is_empty()
    }

    /// Whether every limb's bound fits the configured limb width.
    pub fn is_aligned(&self, gen: &CircuitGenerator) -> bool {
        let chunk = gen.config().chunk_bitwidth;
        self.max_values.iter().all(|m| m.bits() as usize <= chunk)
    }

    /// Upper bound of the represented integer.
    pub fn max_val(&self, chunk_bitwidth: usize) -> BigUint {
        util::group(&self.max_values, chunk_bitwidth)
    }

    fn is_constant(&self, gen: &CircuitGenerator) -> bool {
        self.limbs.iter().all(|w| gen.constant_value(*w).is_some())
    }

    /// The represented value, if every limb is a compile-time constant.
    pub fn constant_value(&self, gen: &CircuitGenerator) -> Option<BigUint> {
        let chunk = gen.config().chunk_bitwidth;
        let chunks: Option<Vec<BigUint>> = self
            .limbs
            .iter()
            .map(|w| gen.constant_value(*w).cloned())
            .collect();
        chunks.map(|c| util::group(&c, chunk))
    }

    fn padded_bounds(&self, len: usize) -> Vec<BigUint> {
        let mut bounds = self.max_values.clone();
        bounds.resize(len, BigUint::zero());
        bounds
    }

    fn add_overflow_check(&self, other: &LongElement, prime: &BigUint) -> bool {
        self.max_values
            .iter()
            .zip(&other.max_values)
            .any(|(a, b)| a + b >= *prime)
    }

    fn mul_bounds(&self, other: &LongElement) -> Vec<BigUint> {
        let len = self.len() + other.len() - 1;
        let mut bounds = vec![BigUint::zero(); len];
        for (i, a) in self.max_values.iter().enumerate() {
            for (j, b) in other.max_values.iter().enumerate() {
                bounds[i + j] += a * b;
            }
        }
        bounds
    }

    /// Limb-wise addition. Bounds are summed, not re-aligned; a potential
    /// overflow past the field modulus is logged, not rejected.
    pub fn add(&self, gen: &mut CircuitGenerator, other: &LongElement) -> LongElement {
        if self.add_overflow_check(other, gen.field_prime()) {
            log::warn!("long element addition may overflow the field");
        }
        let len = usize::max(self.len(), other.len());
        let a = WireArray::new(self.limbs.clone()).adjust_length(gen, len);
        let b = WireArray::new(other.limbs.clone()).adjust_length(gen, len);
        let bounds1 = self.padded_bounds(len);
        let bounds2 = other.padded_bounds(len);
        let mut limbs = Vec::with_capacity(len);
        let mut max_values = Vec::with_capacity(len);
        for i in 0..len {
            limbs.push(gen.add(a.get(i), b.get(i)));
            max_values.push(&bounds1[i] + &bounds2[i]);
        }
        LongElement { limbs, max_values }
    }

    /// Multiplication. Uses schoolbook cross products when either operand is
    /// a single limb or a constant; otherwise the limb products are supplied
    /// as prover witnesses and checked by evaluating the polynomial identity
    /// `A(x) * B(x) = R(x)` at the points `1..=len`.
    pub fn mul(&self, gen: &mut CircuitGenerator, other: &LongElement) -> LongElement {
        let max_values = self.mul_bounds(other);
        if max_values.iter().any(|b| b >= gen.field_prime()) {
            log::warn!("long element multiplication may overflow the field");
        }
        let n = self.len();
        let m = other.len();
        let len = n + m - 1;

        let limbs = if n == 1 || m == 1 || self.is_constant(gen) || other.is_constant(gen) {
            let mut result = vec![gen.zero(); len];
            for i in 0..n {
                for j in 0..m {
                    let t = gen.mul(self.limbs[i], other.limbs[j]);
                    result[i + j] = gen.add(result[i + j], t);
                }
            }
            result
        } else {
            let result = gen.create_prover_witness_wire_array(len, "long mul product limb");
            let a_limbs = self.limbs.clone();
            let b_limbs = other.limbs.clone();
            let product = result.clone();
            gen.specify_prover_witness_computation(move |eval| {
                let a = eval.get_wire_values(&a_limbs)?;
                let b = eval.get_wire_values(&b_limbs)?;
                let values = multiply_limb_polys(&a, &b, eval.prime());
                eval.set_wire_values(&product, &values)
            });

            let prime = gen.field_prime().clone();
            for k in 0..len {
                let point = BigUint::from(k as u64 + 1);
                let mut coeff = BigUint::one();
                let mut v1 = Vec::with_capacity(n);
                let mut v2 = Vec::with_capacity(m);
                let mut v3 = Vec::with_capacity(len);
                for i in 0..len {
                    if i < n {
                        v1.push(gen.mul_const(self.limbs[i], &BigInt::from(coeff.clone())));
                    }
                    if i < m {
                        v2.push(gen.mul_const(other.limbs[i], &BigInt::from(coeff.clone())));
                    }
                    v3.push(gen.mul_const(result[i], &BigInt::from(coeff.clone())));
                    coeff = coeff * &point % &prime;
                }
                let s1 = gen.add_many(&v1);
                let s2 = gen.add_many(&v2);
                let s3 = gen.add_many(&v3);
                gen.add_assertion(s1, s2, s3, "long multiplication point check");
            }
            result
        };
        LongElement { limbs, max_values }
    }

    /// Re-chunks into `total_chunks` limbs whose bounds fit the limb width,
    /// carrying the overflow of limb `i` into limb `i + 1`.
    pub fn align(
        &self,
        gen: &mut CircuitGenerator,
        total_chunks: usize,
    ) -> Result<LongElement, BuildError> {
        let chunk = gen.config().chunk_bitwidth;
        let mut limbs = WireArray::new(self.limbs.clone())
            .adjust_length(gen, total_chunks)
            .into_vec();
        let mut bounds = self.padded_bounds(total_chunks);
        let aligned_max = util::max_value(chunk);
        for i in 0..total_chunks {
            let width = bounds[i].bits() as usize;
            if width > chunk {
                let bits = gen.get_bit_wires(limbs[i], width)?;
                let low = bits.pack_as_bits_range(gen, 0, chunk)?;
                let rem = bits.pack_as_bits_range(gen, chunk, width)?;
                limbs[i] = low;
                if i != total_chunks - 1 {
                    bounds[i + 1] = (&bounds[i] >> chunk) + &bounds[i + 1];
                    limbs[i + 1] = gen.add(rem, limbs[i + 1]);
                }
                bounds[i] = aligned_max.clone();
            }
        }
        Ok(LongElement {
            limbs,
            max_values: bounds,
        })
    }

    /// Extracts `total` low bits of the represented integer, LSB first,
    /// aligning limbs on the fly where their bounds overflow the limb width.
    pub fn get_bits(
        &self,
        gen: &mut CircuitGenerator,
        total: usize,
    ) -> Result<WireArray, BuildError> {
        let chunk = gen.config().chunk_bitwidth;
        if self.len() == 1 || total <= chunk {
            let width = self.max_values[0].bits() as usize;
            let bits = gen.get_bit_wires(self.limbs[0], width)?;
            return Ok(bits.adjust_length(gen, total));
        }
        let max_total = self.max_val(chunk).bits() as usize;
        let new_len = max_total.div_ceil(chunk);
        let mut limbs = WireArray::new(self.limbs.clone())
            .adjust_length(gen, new_len)
            .into_vec();
        let mut bounds = self.padded_bounds(new_len);
        let mut bit_wires = vec![gen.zero(); total];
        let mut idx = 0;
        let mut ci = 0;
        while idx < total && ci < new_len {
            let width = bounds[ci].bits() as usize;
            let aligned_bits: Vec<Wire> = if width > chunk {
                let bits = gen.get_bit_wires(limbs[ci], width)?;
                let rem = bits.pack_as_bits_range(gen, chunk, width)?;
                if ci != new_len - 1 {
                    bounds[ci + 1] = (&bounds[ci] >> chunk) + &bounds[ci + 1];
                    limbs[ci + 1] = gen.add(rem, limbs[ci + 1]);
                }
                bits.wires()[..chunk].to_vec()
            } else {
                gen.get_bit_wires(limbs[ci], chunk)?.into_vec()
            };
            let take = usize::min(aligned_bits.len(), total - idx);
            bit_wires[idx..idx + take].copy_from_slice(&aligned_bits[..take]);
            idx += aligned_bits.len();
            ci += 1;
        }
        Ok(WireArray::new(bit_wires))
    }

    /// Limb-wise selection: `self` when `selector` is 0, `other` when 1.
    pub fn mux_bit(
        &self,
        gen: &mut CircuitGenerator,
        other: &LongElement,
        selector: Wire,
    ) -> LongElement {
        let len = usize::max(self.len(), other.len());
        let a = WireArray::new(self.limbs.clone()).adjust_length(gen, len);
        let b = WireArray::new(other.limbs.clone()).adjust_length(gen, len);
        let bounds1 = self.padded_bounds(len);
        let bounds2 = other.padded_bounds(len);
        let mut limbs = Vec::with_capacity(len);
        let mut max_values = Vec::with_capacity(len);
        for i in 0..len {
            let limb = gen.mux(selector, b.get(i), a.get(i));
            let bound = match gen.constant_value(limb) {
                Some(v) => v.clone(),
                None => BigUint::max(bounds1[i].clone(), bounds2[i].clone()),
            };
            limbs.push(limb);
            max_values.push(bound);
        }
        LongElement { limbs, max_values }
    }

    /// Marks every limb as a circuit output.
    pub fn make_output(&self, gen: &mut CircuitGenerator, desc: &str) -> Vec<Wire> {
        gen.make_output_array(&self.limbs, desc)
    }

    /// Returns a binary wire that is 1 iff the represented integer is
    /// non-zero, as an or over the per-limb checks.
    pub fn check_non_zero(&self, gen: &mut CircuitGenerator) -> Result<Wire, BuildError> {
        let mut acc = gen.zero();
        for limb in &self.limbs {
            let b = gen.is_nonzero(*limb);
            acc = gen.or(acc, b)?;
        }
        Ok(acc)
    }

    /// Returns `self - other` as a fresh aligned element. The difference is
    /// supplied as a witness, restricted to `self`'s bit length, and bound by
    /// asserting `difference + other == self`; the subtraction is therefore
    /// only satisfiable when `self >= other`.
    pub fn subtract(
        &self,
        gen: &mut CircuitGenerator,
        other: &LongElement,
    ) -> Result<LongElement, BuildError> {
        let chunk = gen.config().chunk_bitwidth;
        let bitwidth = self.max_val(chunk).bits() as usize;
        let result = gen.create_long_element_prover_witness(bitwidth, "difference");

        let a_limbs = self.limbs.clone();
        let b_limbs = other.limbs.clone();
        let result_elem = result.clone();
        gen.specify_prover_witness_computation(move |eval| {
            let a = util::group(&eval.get_wire_values(&a_limbs)?, chunk);
            let b = util::group(&eval.get_wire_values(&b_limbs)?, chunk);
            if b > a {
                return Err(EvalError::WitnessComputation(
                    "long subtraction underflow".to_string(),
                ));
            }
            eval.set_long_element_value(&result_elem, &(a - b), chunk)
        });

        result.restrict_bitwidth(gen)?;
        let recomposed = result.add(gen, other);
        recomposed.assert_equality(gen, self)?;
        Ok(result)
    }

    /// Constrains every limb to its declared bound's bit width. Warns when
    /// the element is not aligned, since the bounds are then unlikely to be
    /// the intended widths.
    pub fn restrict_bitwidth(&self, gen: &mut CircuitGenerator) -> Result<(), BuildError> {
        if !self.is_aligned(gen) {
            log::warn!("restricting bit widths of a non-aligned long element");
        }
        for (limb, bound) in self.limbs.iter().zip(&self.max_values) {
            gen.restrict_bit_length(*limb, bound.bits() as usize)?;
        }
        Ok(())
    }

    /// Equality via full bit decomposition of both operands. Simple and
    /// expensive; kept for cross-checking the grouped protocol.
    pub fn assert_equality_naive(
        &self,
        gen: &mut CircuitGenerator,
        other: &LongElement,
    ) -> Result<(), BuildError> {
        let chunk = gen.config().chunk_bitwidth;
        let w1 = self.max_val(chunk).bits() as usize;
        let w2 = other.max_val(chunk).bits() as usize;
        let bits1 = self.get_bits(gen, w1)?;
        let bits2 = other.get_bits(gen, w2)?;
        let v1 = LongElement::from_bits(gen, &bits1)?;
        let v2 = LongElement::from_bits(gen, &bits2)?;
        let len = usize::max(v1.len(), v2.len());
        let a = WireArray::new(v1.limbs).adjust_length(gen, len);
        let b = WireArray::new(v2.limbs).adjust_length(gen, len);
        for i in 0..len {
            gen.add_equality_assertion(a.get(i), b.get(i), "naive long equality");
        }
        Ok(())
    }

    /// Asserts that both elements represent the same integer.
    ///
    /// Consecutive limbs are greedily grouped while the grouped bound stays
    /// below `2^(log2(P) - 2)` on both sides; an auxiliary constant keeps the
    /// per-group subtraction non-negative, and prover-supplied carries,
    /// explicitly bounded and chained group to group, propagate the
    /// difference. Aligned or single-limb operands use direct per-limb
    /// assertions instead.
    pub fn assert_equality(
        &self,
        gen: &mut CircuitGenerator,
        other: &LongElement,
    ) -> Result<(), BuildError> {
        let chunk = gen.config().chunk_bitwidth;
        let limit = usize::max(self.len(), other.len());
        let a1 = WireArray::new(self.limbs.clone()).adjust_length(gen, limit);
        let a2 = WireArray::new(other.limbs.clone()).adjust_length(gen, limit);
        let bounds1 = self.padded_bounds(limit);
        let bounds2 = other.padded_bounds(limit);

        if limit == 1 {
            gen.add_equality_assertion(a1.get(0), a2.get(0), "long equality, single limb");
            return Ok(());
        }
        if self.is_aligned(gen) && other.is_aligned(gen) {
            for i in 0..limit {
                gen.add_equality_assertion(a1.get(i), a2.get(i), "long equality, aligned limb");
            }
            return Ok(());
        }

        // Group consecutive limbs while both grouped bounds stay safely
        // below the field size.
        let safe_bits = gen.config().log2_field_prime - 2;
        let mut group1: Vec<Wire> = Vec::new();
        let mut group2: Vec<Wire> = Vec::new();
        let mut group1_bounds: Vec<BigUint> = Vec::new();
        let mut group2_bounds: Vec<BigUint> = Vec::new();
        let mut steps: Vec<usize> = Vec::new();
        let mut i = 0;
        while i < limit {
            let mut step = 1;
            let mut w1 = a1.get(i);
            let mut w2 = a2.get(i);
            let mut b1 = bounds1[i].clone();
            let mut b2 = bounds2[i].clone();
            while i + step < limit {
                let delta = BigUint::one() << (chunk * step);
                let nb1 = &b1 + &bounds1[i + step] * &delta;
                let nb2 = &b2 + &bounds2[i + step] * &delta;
                if (nb1.bits() as usize) < safe_bits && (nb2.bits() as usize) < safe_bits {
                    let shift = BigInt::from(delta);
                    let t1 = gen.mul_const(a1.get(i + step), &shift);
                    let t2 = gen.mul_const(a2.get(i + step), &shift);
                    w1 = gen.add(w1, t1);
                    w2 = gen.add(w2, t2);
                    b1 = nb1;
                    b2 = nb2;
                    step += 1;
                } else {
                    break;
                }
            }
            group1.push(w1);
            group2.push(w2);
            group1_bounds.push(b1);
            group2_bounds.push(b2);
            steps.push(step);
            i += step;
        }

        if group1.len() == 1 {
            gen.add_equality_assertion(group1[0], group2[0], "long equality, single group");
            return Ok(());
        }
        let num_groups = group1.len();

        // The subtraction per group must stay non-negative, so an auxiliary
        // constant derived from the right side's bounds is added to the left
        // side before subtracting.
        let mut aux_constant = BigUint::zero();
        let mut aux_chunks = vec![BigUint::zero(); num_groups];
        let carries = gen.create_prover_witness_wire_array(num_groups - 1, "long equality carry");
        let mut carry_bitwidths = vec![0usize; num_groups - 1];
        let mut accum_step = 0;
        for j in 0..num_groups - 1 {
            aux_chunks[j] = BigUint::one() << group2_bounds[j].bits();
            aux_constant += &aux_chunks[j] << (chunk * accum_step);
            accum_step += steps[j];
            let wide = usize::max(
                aux_chunks[j].bits() as usize,
                group1_bounds[j].bits() as usize,
            );
            carry_bitwidths[j] = wide.saturating_sub(steps[j] * chunk) + 1;
        }

        // The aux constant itself is not aligned to the grouping; re-chunk it
        // and regroup the chunks along the same steps.
        let aligned_small = util::split(&aux_constant, chunk);
        let mut aligned_chunks = vec![BigUint::zero(); num_groups];
        let mut idx = 0;
        'outer: for j in 0..num_groups {
            for k in 0..steps[j] {
                aligned_chunks[j] += &aligned_small[idx] << (chunk * k);
                idx += 1;
                if idx == aligned_small.len() {
                    break 'outer;
                }
            }
        }
        if idx != aligned_small.len() {
            if idx == aligned_small.len() - 1 {
                aligned_chunks[num_groups - 1] +=
                    &aligned_small[idx] << (chunk * steps[num_groups - 1]);
            } else {
                return Err(BuildError::UnalignedOperand);
            }
        }

        let g1 = group1.clone();
        let g2 = group2.clone();
        let carry_wires = carries.clone();
        let hook_aux = aux_chunks.clone();
        let hook_aligned = aligned_chunks.clone();
        let hook_steps = steps.clone();
        gen.specify_prover_witness_computation(move |eval| {
            let mut prev = BigInt::zero();
            for i in 0..carry_wires.len() {
                let a = BigInt::from(eval.get_wire_value(g1[i])?);
                let b = BigInt::from(eval.get_wire_value(g2[i])?);
                let mut carry = BigInt::from(hook_aux[i].clone()) + a - b
                    - BigInt::from(hook_aligned[i].clone())
                    + &prev;
                carry >>= hook_steps[i] * chunk;
                let value = carry.to_biguint().ok_or_else(|| {
                    EvalError::WitnessComputation("negative carry in long equality".to_string())
                })?;
                eval.set_wire_value(carry_wires[i], &value)?;
                prev = carry;
            }
            Ok(())
        });

        for (carry, width) in carries.iter().zip(&carry_bitwidths) {
            gen.restrict_bit_length(*carry, *width)?;
        }

        let prime = gen.field_prime().clone();
        let mut prev_carry = gen.zero();
        let mut prev_bound = BigUint::zero();
        for j in 0..num_groups {
            let aux_wire = gen.create_constant_wire(&aux_chunks[j], "");
            let aligned_wire = gen.create_constant_wire(&aligned_chunks[j], "");
            let current_carry = if j == num_groups - 1 {
                gen.zero()
            } else {
                carries[j]
            };
            if &aux_chunks[j] + &group1_bounds[j] + &prev_bound >= prime {
                log::warn!("overflow possibility in long equality group {}", j);
            }
            let diff = gen.sub(group1[j], group2[j]);
            let t = gen.add(aux_wire, diff);
            let left = gen.add(t, prev_carry);
            let shift = BigInt::from(BigUint::one() << (chunk * steps[j]));
            let shifted_carry = gen.mul_const(current_carry, &shift);
            let right = gen.add(aligned_wire, shifted_carry);
            gen.add_equality_assertion(left, right, &format!("long equality group {}", j));
            prev_carry = current_carry;
            if j != num_groups - 1 {
                prev_bound = util::max_value(carry_bitwidths[j]);
            }
        }
        Ok(())
    }

    /// Asserts `self < other`. Both operands must be aligned.
    ///
    /// The prover supplies a one-hot selector marking the most significant
    /// limb where `other` strictly exceeds `self`; constraints verify the
    /// selector shape, the strict comparison at the selected limb, and
    /// equality of every limb above it.
    pub fn assert_less_than(
        &self,
        gen: &mut CircuitGenerator,
        other: &LongElement,
    ) -> Result<(), BuildError> {
        if !self.is_aligned(gen) || !other.is_aligned(gen) {
            return Err(BuildError::UnalignedOperand);
        }
        let chunk = gen.config().chunk_bitwidth;
        let len = usize::max(self.len(), other.len());
        let a1 = WireArray::new(self.limbs.clone())
            .adjust_length(gen, len)
            .into_vec();
        let a2 = WireArray::new(other.limbs.clone())
            .adjust_length(gen, len)
            .into_vec();

        let selector = gen.create_prover_witness_wire_array(len, "less-than selector");
        let hook_a1 = a1.clone();
        let hook_a2 = a2.clone();
        let hook_selector = selector.clone();
        gen.specify_prover_witness_computation(move |eval| {
            let mut found = false;
            for i in (0..hook_a1.len()).rev() {
                let v1 = eval.get_wire_value(hook_a1[i])?;
                let v2 = eval.get_wire_value(hook_a2[i])?;
                let set = v2 > v1 && !found;
                eval.set_wire_value(
                    hook_selector[i],
                    &if set { BigUint::one() } else { BigUint::zero() },
                )?;
                if set {
                    found = true;
                }
            }
            Ok(())
        });

        for s in &selector {
            gen.add_binary_assertion(*s, "less-than selector bit");
        }
        let sum = gen.add_many(&selector);
        gen.add_one_assertion(sum, "less-than selector is one-hot");

        // The selected limb pair must satisfy the strict comparison.
        let mut chunk1 = gen.zero();
        let mut chunk2 = gen.zero();
        for i in 0..len {
            let t1 = gen.mul(a1[i], selector[i]);
            let t2 = gen.mul(a2[i], selector[i]);
            chunk1 = gen.add(chunk1, t1);
            chunk2 = gen.add(chunk2, t2);
        }
        let lt = gen.is_less_than(chunk1, chunk2, chunk)?;
        gen.add_one_assertion(lt, "selected limb comparison");

        // Limbs above the selected index must match exactly.
        let mut above = gen.zero();
        for i in 1..len {
            above = gen.add(above, selector[i - 1]);
            let diff = gen.sub(a1[i], a2[i]);
            let zero = gen.zero();
            gen.add_assertion(above, diff, zero, "limbs above selector are equal");
        }
        Ok(())
    }
}

/// Plain integer polynomial product of limb values, reduced per coefficient.
fn multiply_limb_polys(a: &[BigUint], b: &[BigUint], prime: &BigUint) -> Vec<BigUint> {
    let mut product = vec![BigUint::zero(); a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            product[i + j] = (&product[i + j] + x * y) % prime;
        }
    }
    product
}

impl CircuitGenerator {
    /// Creates a long-element input of `total_bitwidth` bits from fresh
    /// input wires, one per limb.
    pub fn create_long_element_input(&mut self, total_bitwidth: usize, desc: &str) -> LongElement {
        let chunk = self.config().chunk_bitwidth;
        let num_limbs = total_bitwidth.div_ceil(chunk);
        let limbs = self.create_input_wire_array(num_limbs, desc);
        let bitwidths = limb_bitwidths(total_bitwidth, chunk, num_limbs);
        LongElement {
            limbs,
            max_values: bitwidths.iter().map(|b| util::max_value(*b)).collect(),
        }
    }

    /// Creates a long-element witness of `total_bitwidth` bits from fresh
    /// prover witness wires, one per limb.
    pub fn create_long_element_prover_witness(
        &mut self,
        total_bitwidth: usize,
        desc: &str,
    ) -> LongElement {
        let chunk = self.config().chunk_bitwidth;
        let num_limbs = total_bitwidth.div_ceil(chunk);
        let limbs = self.create_prover_witness_wire_array(num_limbs, desc);
        let bitwidths = limb_bitwidths(total_bitwidth, chunk, num_limbs);
        LongElement {
            limbs,
            max_values: bitwidths.iter().map(|b| util::max_value(*b)).collect(),
        }
    }
}

fn limb_bitwidths(total: usize, chunk: usize, num_limbs: usize) -> Vec<usize> {
    (0..num_limbs)
        .map(|i| {
            if i == num_limbs - 1 {
                total - chunk * (num_limbs - 1)
            } else {
                chunk
            }
        })
        .collect()
}

impl CircuitEvaluator {
    /// Assigns `value` across the limb wires of `e`, split at the limb width.
    pub fn set_long_element_value(
        &mut self,
        e: &LongElement,
        value: &BigUint,
        chunk_bitwidth: usize,
    ) -> Result<(), EvalError> {
        let chunks = util::split_fixed(value, chunk_bitwidth, e.len());
        self.set_wire_values(&e.limbs, &chunks)
    }

    /// Recombines the concrete limb values of `e` into one integer.
    pub fn get_long_element_value(
        &self,
        e: &LongElement,
        chunk_bitwidth: usize,
    ) -> Result<BigUint, EvalError> {
        let values = self.get_wire_values(&e.limbs)?;
        Ok(util::group(&values, chunk_bitwidth))
    }
}
