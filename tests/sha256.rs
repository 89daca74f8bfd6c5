//! A SHA-256 compression circuit assembled from the bit-level primitives,
//! checked against the `sha2` crate and the published test vector.

use num_bigint::BigUint;
use sha2::{Digest, Sha256};
use zkgraph_core::{CircuitEvaluator, CircuitGenerator, Wire, WireArray};

const H: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

// Words are LSB-first 32-bit wire arrays, so index rotations on the array
// match value rotations of the word.

fn constant_word(gen: &mut CircuitGenerator, value: u32) -> WireArray {
    let w = gen.create_constant_wire(&BigUint::from(value), "");
    gen.get_bit_wires(w, 32).unwrap()
}

// Adds up to a handful of words modulo 2^32 by packing, summing over the
// field, re-splitting at the widened length, and keeping the low 32 bits.
fn add_words(gen: &mut CircuitGenerator, words: &[WireArray]) -> WireArray {
    let packed: Vec<Wire> = words
        .iter()
        .map(|w| w.pack_as_bits(gen).unwrap())
        .collect();
    let sum = gen.add_many(&packed);
    let width = 32 + words.len().next_power_of_two().trailing_zeros() as usize;
    let bits = gen.get_bit_wires(sum, width).unwrap();
    WireArray::new(bits.wires()[..32].to_vec())
}

fn ch(gen: &mut CircuitGenerator, e: &WireArray, f: &WireArray, g: &WireArray) -> WireArray {
    let ef = e.and_wire_array(gen, f).unwrap();
    let ne = e.inv_as_bits(gen).unwrap();
    let ng = ne.and_wire_array(gen, g).unwrap();
    ef.xor_wire_array(gen, &ng).unwrap()
}

fn maj(gen: &mut CircuitGenerator, a: &WireArray, b: &WireArray, c: &WireArray) -> WireArray {
    let ab = a.and_wire_array(gen, b).unwrap();
    let ac = a.and_wire_array(gen, c).unwrap();
    let bc = b.and_wire_array(gen, c).unwrap();
    let x = ab.xor_wire_array(gen, &ac).unwrap();
    x.xor_wire_array(gen, &bc).unwrap()
}

fn big_sigma0(gen: &mut CircuitGenerator, a: &WireArray) -> WireArray {
    let x = a
        .rotate_right(2)
        .xor_wire_array(gen, &a.rotate_right(13))
        .unwrap();
    x.xor_wire_array(gen, &a.rotate_right(22)).unwrap()
}

fn big_sigma1(gen: &mut CircuitGenerator, e: &WireArray) -> WireArray {
    let x = e
        .rotate_right(6)
        .xor_wire_array(gen, &e.rotate_right(11))
        .unwrap();
    x.xor_wire_array(gen, &e.rotate_right(25)).unwrap()
}

fn small_sigma0(gen: &mut CircuitGenerator, w: &WireArray) -> WireArray {
    let zero = gen.zero();
    let x = w
        .rotate_right(7)
        .xor_wire_array(gen, &w.rotate_right(18))
        .unwrap();
    x.xor_wire_array(gen, &w.shift_right(3, zero)).unwrap()
}

fn small_sigma1(gen: &mut CircuitGenerator, w: &WireArray) -> WireArray {
    let zero = gen.zero();
    let x = w
        .rotate_right(17)
        .xor_wire_array(gen, &w.rotate_right(19))
        .unwrap();
    x.xor_wire_array(gen, &w.shift_right(10, zero)).unwrap()
}

#[test]
fn sha256_of_abc_matches_the_reference_digest() {
    let mut gen = CircuitGenerator::new("sha256");
    let message = gen.create_input_wire_array(3, "message byte");

    // The padded 512-bit block for a 3-byte message, as sixteen words. The
    // first word is the three message bytes followed by the 0x80 padding
    // byte; the last word is the message length in bits.
    let mut schedule: Vec<WireArray> = Vec::with_capacity(64);
    let mut first = vec![gen.zero(); 32];
    first[7] = gen.one();
    for (i, byte) in message.iter().enumerate() {
        let bits = gen.get_bit_wires(*byte, 8).unwrap();
        let lo = 8 * (3 - i);
        first[lo..lo + 8].copy_from_slice(bits.wires());
    }
    schedule.push(WireArray::new(first));
    for _ in 1..15 {
        schedule.push(constant_word(&mut gen, 0));
    }
    schedule.push(constant_word(&mut gen, 24));

    for t in 16..64 {
        let s1 = small_sigma1(&mut gen, &schedule[t - 2]);
        let s0 = small_sigma0(&mut gen, &schedule[t - 15]);
        let next = add_words(
            &mut gen,
            &[s1, schedule[t - 7].clone(), s0, schedule[t - 16].clone()],
        );
        schedule.push(next);
    }

    let state: Vec<WireArray> = H.iter().map(|h| constant_word(&mut gen, *h)).collect();
    let mut vs = state.clone();
    for t in 0..64 {
        let bs1 = big_sigma1(&mut gen, &vs[4]);
        let chw = ch(&mut gen, &vs[4], &vs[5], &vs[6]);
        let kt = constant_word(&mut gen, K[t]);
        let t1 = add_words(
            &mut gen,
            &[vs[7].clone(), bs1, chw, kt, schedule[t].clone()],
        );
        let bs0 = big_sigma0(&mut gen, &vs[0]);
        let mj = maj(&mut gen, &vs[0], &vs[1], &vs[2]);
        let t2 = add_words(&mut gen, &[bs0, mj]);
        let new_e = add_words(&mut gen, &[vs[3].clone(), t1.clone()]);
        let new_a = add_words(&mut gen, &[t1, t2]);
        vs = vec![
            new_a,
            vs[0].clone(),
            vs[1].clone(),
            vs[2].clone(),
            new_e,
            vs[4].clone(),
            vs[5].clone(),
            vs[6].clone(),
        ];
    }

    let mut outputs = Vec::with_capacity(8);
    for i in 0..8 {
        let word = add_words(&mut gen, &[state[i].clone(), vs[i].clone()]);
        let packed = word.pack_as_bits(&mut gen).unwrap();
        outputs.push(gen.make_output(packed, "digest word"));
    }

    let mut eval = CircuitEvaluator::new(&gen);
    for (wire, byte) in message.iter().zip(b"abc") {
        eval.set_wire_value_u64(*wire, *byte as u64).unwrap();
    }
    eval.evaluate(&gen).unwrap();

    let expected = Sha256::digest(b"abc");
    let mut digest_hex = String::new();
    for (i, out) in outputs.iter().enumerate() {
        let value = eval.get_wire_value(*out).unwrap();
        let expected_word = u32::from_be_bytes(expected[4 * i..4 * i + 4].try_into().unwrap());
        assert_eq!(value, BigUint::from(expected_word));
        digest_hex.push_str(&format!("{:08x}", value));
    }
    assert_eq!(
        digest_hex,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}
