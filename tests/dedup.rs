//! Common-subexpression elimination across the builder API.

use num_bigint::BigUint;
use zkgraph_core::CircuitGenerator;

#[test]
fn multiplication_adds_exactly_one_constraint() {
    let mut gen = CircuitGenerator::new("product");
    let a = gen.create_input_wire("a");
    let b = gen.create_input_wire("b");
    assert_eq!(gen.num_mul_constraints(), 0);
    gen.mul(a, b);
    assert_eq!(gen.num_mul_constraints(), 1);
}

#[test]
fn commuted_rebuild_adds_no_wires_or_constraints() {
    let mut gen = CircuitGenerator::new("rebuild");
    let a = gen.create_input_wire("a");
    let b = gen.create_input_wire("b");
    let first = gen.mul(a, b);
    let wires = gen.num_wires();
    let constraints = gen.num_mul_constraints();

    let second = gen.mul(b, a);
    assert_eq!(first, second);
    assert_eq!(gen.num_wires(), wires);
    assert_eq!(gen.num_mul_constraints(), constraints);
}

#[test]
fn boolean_operations_are_deduplicated() {
    let mut gen = CircuitGenerator::new("boolean");
    let a = gen.create_input_wire("a");
    let b = gen.create_input_wire("b");
    let abit = gen.get_bit_wires(a, 1).unwrap().get(0);
    let bbit = gen.get_bit_wires(b, 1).unwrap().get(0);

    let x1 = gen.xor(abit, bbit).unwrap();
    let o1 = gen.or(abit, bbit).unwrap();
    let count = gen.num_mul_constraints();

    let x2 = gen.xor(bbit, abit).unwrap();
    let o2 = gen.or(bbit, abit).unwrap();
    assert_eq!(x1, x2);
    assert_eq!(o1, o2);
    assert_eq!(gen.num_mul_constraints(), count);
}

#[test]
fn repeated_splits_of_one_wire_are_free() {
    let mut gen = CircuitGenerator::new("splits");
    let a = gen.create_input_wire("a");
    let first = gen.get_bit_wires(a, 16).unwrap();
    let count = gen.num_mul_constraints();
    assert_eq!(count, 17); // 16 bits + 1

    let again = gen.get_bit_wires(a, 16).unwrap();
    assert_eq!(first, again);
    assert_eq!(gen.num_mul_constraints(), count);

    // A narrower request reuses the cached decomposition, truncated.
    let low = gen.get_bit_wires(a, 8).unwrap();
    assert_eq!(low.wires(), &first.wires()[..8]);
    assert_eq!(gen.num_mul_constraints(), count);
}

#[test]
fn nonzero_checks_are_deduplicated() {
    let mut gen = CircuitGenerator::new("zerop");
    let a = gen.create_input_wire("a");
    let n1 = gen.is_nonzero(a);
    let count = gen.num_mul_constraints();
    assert_eq!(count, 2);

    let n2 = gen.is_nonzero(a);
    assert_eq!(n1, n2);
    assert_eq!(gen.num_mul_constraints(), count);
}

#[test]
fn assertions_are_recorded_once() {
    let mut gen = CircuitGenerator::new("assertions");
    let a = gen.create_input_wire("a");
    let b = gen.create_input_wire("b");
    let c = gen.create_input_wire("c");
    gen.add_assertion(a, b, c, "a * b == c");
    let count = gen.num_mul_constraints();
    gen.add_assertion(b, a, c, "b * a == c");
    assert_eq!(gen.num_mul_constraints(), count);
}

#[test]
fn constant_subexpressions_never_reach_the_log() {
    let mut gen = CircuitGenerator::new("constants");
    let five = gen.create_constant_wire(&BigUint::from(5u8), "");
    let six = gen.create_constant_wire(&BigUint::from(6u8), "");
    let product = gen.mul(five, six);
    assert_eq!(gen.constant_value(product), Some(&BigUint::from(30u8)));
    assert_eq!(gen.num_mul_constraints(), 0);
}
