//! Exact textual output of the circuit and witness writers.

use std::fs;
use zkgraph_core::{CircuitEvaluator, CircuitGenerator};

#[test]
fn circuit_file_lines_match_the_expected_format() {
    let mut gen = CircuitGenerator::new("files");
    let a = gen.create_input_wire("a");
    let b = gen.create_prover_witness_wire("b");
    let p = gen.mul(a, b);
    gen.make_output(p, "product");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("files.arith");
    gen.write_circuit_file(&path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            "total 5",
            "input 0 # The one-input wire",
            "const-mul-0 in 1 <0> out 1 <1> # The zero wire",
            "input 2 # a",
            "nizkinput 3 # b",
            "mul in 2 <2 3> out 1 <4>",
            "output 4 # product",
        ]
    );
}

#[test]
fn witness_file_covers_inputs_and_witness_wires() {
    let mut gen = CircuitGenerator::new("witness");
    let a = gen.create_input_wire("a");
    let b = gen.create_prover_witness_wire("b");
    let p = gen.mul(a, b);
    gen.make_output(p, "product");

    let mut eval = CircuitEvaluator::new(&gen);
    eval.set_wire_value_u64(a, 255).unwrap();
    eval.set_wire_value_u64(b, 2).unwrap();
    eval.evaluate(&gen).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("witness.in");
    eval.write_witness_file(&gen, &path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec!["0 1", "2 ff", "3 2"]);
}

#[test]
fn negative_constant_multipliers_render_with_neg_opcode() {
    let mut gen = CircuitGenerator::new("neg");
    let a = gen.create_input_wire("a");
    let n = gen.neg(a);
    gen.make_output(n, "-a");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("neg.arith");
    gen.write_circuit_file(&path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("const-mul-neg-1 in 1 <2> out 1 <3>"));
}

#[test]
fn stats_summarize_the_build() {
    let mut gen = CircuitGenerator::new("stats");
    let a = gen.create_input_wire("a");
    let b = gen.create_prover_witness_wire("b");
    let p = gen.mul(a, b);
    gen.make_output(p, "product");

    let stats = gen.stats();
    assert_eq!(stats.name, "stats");
    assert_eq!(stats.num_inputs, 2); // one-wire + a
    assert_eq!(stats.num_witness_wires, 1);
    assert_eq!(stats.num_outputs, 1);
    assert_eq!(stats.num_mul_constraints, 1);
    assert_eq!(stats.instruction_counts.get("mul"), Some(&1));

    let json = serde_json::to_string(&stats).unwrap();
    assert!(json.contains("\"num_mul_constraints\":1"));
}
