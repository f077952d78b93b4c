//! Benchmark parameter types.
//!
//! Groups related benchmark parameters into structs so that benchmark ids
//! render consistently in Criterion reports.

use std::fmt;

/// Graph model exercised by a benchmark.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BenchGenerator {
    /// R-MAT with the default Graph500 weights.
    Rmat,
    /// Barabási–Albert preferential attachment.
    BarabasiAlbert,
}

impl fmt::Display for BenchGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rmat => "rmat",
            Self::BarabasiAlbert => "ba",
        })
    }
}

/// Parameters for a single generated graph.
#[derive(Clone, Copy, Debug)]
pub struct GraphBenchParams {
    /// Graph model to sample.
    pub generator: BenchGenerator,
    /// Vertex-count exponent.
    pub scale: u32,
    /// Edges per vertex, or attachments per new vertex.
    pub edge_factor: u64,
    /// Whether edges are directed.
    pub directed: bool,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},scale={},ef={}{}",
            self.generator,
            self.scale,
            self.edge_factor,
            if self.directed { ",directed" } else { "" },
        )
    }
}
