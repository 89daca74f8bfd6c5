//! Global configuration for circuit construction.
//!
//! A [`Config`] fixes the prime field the circuit is defined over, the limb
//! width used by long-integer arithmetic, and the location of the external
//! prover executable. Every [`CircuitGenerator`](crate::CircuitGenerator)
//! carries its own copy, so independent builds can use different settings.

use num_bigint::BigUint;
use num_traits::Num;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Decimal representation of the BN254 scalar field modulus.
pub const DEFAULT_FIELD_PRIME: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// Circuit-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// The prime modulus of the field all wire values live in.
    pub field_prime: BigUint,
    /// Bit length of `field_prime`.
    pub log2_field_prime: usize,
    /// Limb width (in bits) for long-element arithmetic.
    pub chunk_bitwidth: usize,
    /// Path to the external prover executable.
    pub prover_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        // The radix-10 literal above is well formed, so parsing cannot fail.
        let field_prime =
            BigUint::from_str_radix(DEFAULT_FIELD_PRIME, 10).unwrap_or_default();
        let log2_field_prime = field_prime.bits() as usize;
        Config {
            field_prime,
            log2_field_prime,
            chunk_bitwidth: 32,
            prover_path: PathBuf::from("run_ppzksnark"),
        }
    }
}

impl Config {
    /// Creates a configuration for a custom prime field.
    pub fn with_prime(field_prime: BigUint) -> Self {
        let log2_field_prime = field_prime.bits() as usize;
        Config {
            field_prime,
            log2_field_prime,
            ..Config::default()
        }
    }
}
