//! Invariant checks for solved networks

pub mod correctness;

pub use self::correctness::{
    brute_force_min_cut, check_antisymmetry, check_capacity_bounds, check_conservation,
    verify_solution, VerificationError, VerificationResult,
};
