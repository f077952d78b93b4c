//! Benchmark setup error type.
//!
//! Lets setup functions propagate generation and graph-build failures with
//! `?` instead of calling `.expect()`.

use graphstat_core::{AnalyzerError, GraphStatError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Parameter validation or edge generation failed.
    #[error("graph generation failed: {0}")]
    Generation(#[from] GraphStatError),
    /// Building the adjacency structure or analysing it failed.
    #[error("graph analysis failed: {0}")]
    Analysis(#[from] AnalyzerError),
}
