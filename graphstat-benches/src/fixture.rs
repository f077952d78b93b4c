//! Prebuilt graphs for analysis benchmarks.

use graphstat_core::{
    BarabasiAlbertGenerator, BarabasiAlbertParams, EdgeList, Graph, RmatGenerator, TrialSeeds,
    vertex_count_for_scale,
};

use crate::{
    error::BenchSetupError,
    params::{BenchGenerator, GraphBenchParams},
};

/// Run seed shared by every benchmark fixture.
pub const BENCH_SEED: u64 = 42;

/// Samples the edge list described by `params` for trial zero of
/// [`BENCH_SEED`].
///
/// # Errors
/// Returns [`BenchSetupError::Generation`] when the parameters are invalid.
pub fn generate_edges(params: GraphBenchParams) -> Result<EdgeList, BenchSetupError> {
    let seeds = TrialSeeds::derive(BENCH_SEED, 0);
    let vertex_count = vertex_count_for_scale(params.scale)?;
    let edges = match params.generator {
        BenchGenerator::Rmat => {
            let edge_count = params.edge_factor.saturating_mul(vertex_count);
            RmatGenerator::default().generate(
                params.scale,
                edge_count,
                seeds.seed1,
                seeds.seed2,
                params.directed,
            )?
        }
        BenchGenerator::BarabasiAlbert => {
            let ba = BarabasiAlbertParams::new(vertex_count, params.edge_factor, params.directed)?;
            BarabasiAlbertGenerator::new(ba).generate(&mut seeds.stream())?
        }
    };
    Ok(edges)
}

/// A generated graph ready for repeated analysis.
#[derive(Clone, Debug)]
pub struct GraphFixture {
    /// Parameters the graph was sampled with.
    pub params: GraphBenchParams,
    /// Sampled edges.
    pub edges: EdgeList,
    /// Adjacency built from [`Self::edges`].
    pub graph: Graph,
}

impl GraphFixture {
    /// Generates edges for `params` and builds their adjacency.
    ///
    /// # Errors
    /// Returns [`BenchSetupError`] when generation or the graph build fails.
    pub fn build(params: GraphBenchParams) -> Result<Self, BenchSetupError> {
        let edges = generate_edges(params)?;
        let graph = Graph::from_edge_list(&edges)?;
        Ok(Self {
            params,
            edges,
            graph,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(BenchGenerator::Rmat)]
    #[case(BenchGenerator::BarabasiAlbert)]
    fn fixtures_cover_every_vertex(#[case] generator: BenchGenerator) {
        let params = GraphBenchParams {
            generator,
            scale: 6,
            edge_factor: 4,
            directed: false,
        };
        let fixture = GraphFixture::build(params).expect("fixture must build");
        assert_eq!(fixture.graph.vertex_count(), 64);
        assert!(!fixture.edges.is_empty());
    }

    #[test]
    fn invalid_attachment_count_is_reported() {
        let params = GraphBenchParams {
            generator: BenchGenerator::BarabasiAlbert,
            scale: 2,
            edge_factor: 4,
            directed: false,
        };
        let err = GraphFixture::build(params).expect_err("m >= n must fail");
        assert!(matches!(err, BenchSetupError::Generation(_)));
    }
}
