//! Big-integer helpers shared by the wire algebra and the long-element engine.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Returns `2^bitwidth - 1`, the largest value representable in `bitwidth` bits.
pub fn max_value(bitwidth: usize) -> BigUint {
    (BigUint::one() << bitwidth) - 1u8
}

/// Splits `value` into exactly `num_chunks` little-endian chunks of
/// `chunk_bitwidth` bits each. High chunks beyond the value's bit length are
/// zero; bits beyond `num_chunks * chunk_bitwidth` are discarded.
pub fn split_fixed(value: &BigUint, chunk_bitwidth: usize, num_chunks: usize) -> Vec<BigUint> {
    let mask = max_value(chunk_bitwidth);
    let mut chunks = Vec::with_capacity(num_chunks);
    let mut rest = value.clone();
    for _ in 0..num_chunks {
        chunks.push(&rest & &mask);
        rest >>= chunk_bitwidth;
    }
    chunks
}

/// Splits `value` into as many `chunk_bitwidth`-bit chunks as its bit length
/// requires (at least one).
pub fn split(value: &BigUint, chunk_bitwidth: usize) -> Vec<BigUint> {
    let num_chunks = usize::max(1, (value.bits() as usize).div_ceil(chunk_bitwidth));
    split_fixed(value, chunk_bitwidth, num_chunks)
}

/// Recombines little-endian chunks: `sum(chunks[i] * 2^(chunk_bitwidth * i))`.
pub fn group(chunks: &[BigUint], chunk_bitwidth: usize) -> BigUint {
    let mut total = BigUint::zero();
    for (i, chunk) in chunks.iter().enumerate() {
        total += chunk << (chunk_bitwidth * i);
    }
    total
}

/// Extracts bit `i` of `value` as 0 or 1.
pub fn bit(value: &BigUint, i: usize) -> BigUint {
    if value.bit(i as u64) {
        BigUint::one()
    } else {
        BigUint::zero()
    }
}
