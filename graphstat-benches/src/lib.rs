//! Benchmark support crate for graphstat.
//!
//! Provides parameter types and prebuilt graph fixtures used by the Criterion
//! benchmarks for edge generation and all-pairs analysis.

pub mod error;
pub mod fixture;
pub mod params;
