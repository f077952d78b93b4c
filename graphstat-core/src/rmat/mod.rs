//! Recursive-matrix (R-MAT / Kronecker) edge generation.
//!
//! Each edge is sampled by descending `scale` levels of a
//! `2^scale × 2^scale` adjacency matrix. At every level the quadrant
//! weights are perturbed by multiplicative noise, renormalised, and one
//! quadrant is chosen; its row and column bits are appended to the edge's
//! endpoints. Edges are sampled in fixed-size blocks, each with its own
//! sub-stream, so the output is identical regardless of how many rayon
//! workers take part. A single random vertex relabelling is applied once
//! all edges are sampled.

mod permutation;
mod sampling;


use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    edge::{Edge, EdgeList},
    error::{GraphStatError, Result, try_reserve},
    rng::RandomStream,
};

pub use self::{
    permutation::VertexPermutation,
    sampling::{Quadrant, QuadrantWeights},
};

/// Largest supported scale. Vertex identifiers and edge counts must fit in
/// `u64` with headroom for the edge factor.
pub const MAX_SCALE: u32 = 62;

/// Default per-level multiplicative noise (±5%).
pub const DEFAULT_NOISE: f64 = 0.05;

/// Number of edges drawn from one sub-stream.
const EDGE_BLOCK: usize = 1024;

/// Sub-stream index reserved for the vertex relabelling.
const PERMUTATION_STREAM: u64 = u64::MAX;

/// Parameters of the recursive sampler.
///
/// # Examples
/// ```
/// use graphstat_core::{QuadrantWeights, RmatParams};
///
/// let params = RmatParams::new(QuadrantWeights::GRAPH500, 0.1)?;
/// assert_eq!(params.noise(), 0.1);
/// assert!(RmatParams::new(QuadrantWeights::GRAPH500, 1.5).is_err());
/// # Ok::<(), graphstat_core::GraphStatError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RmatParams {
    weights: QuadrantWeights,
    noise: f64,
}

impl Default for RmatParams {
    fn default() -> Self {
        Self {
            weights: QuadrantWeights::GRAPH500,
            noise: DEFAULT_NOISE,
        }
    }
}

impl RmatParams {
    /// Validates and constructs sampler parameters.
    ///
    /// # Errors
    /// Returns [`GraphStatError::InvalidParameter`] when `noise` is not in
    /// `[0, 1)`.
    pub fn new(weights: QuadrantWeights, noise: f64) -> Result<Self> {
        if !noise.is_finite() || !(0.0..1.0).contains(&noise) {
            return Err(GraphStatError::invalid(
                "noise",
                format!("noise must lie in [0, 1) (got {noise})"),
            ));
        }
        Ok(Self { weights, noise })
    }

    /// Returns the base quadrant weights.
    #[must_use]
    #[rustfmt::skip]
    pub const fn weights(&self) -> QuadrantWeights { self.weights }

    /// Returns the per-level multiplicative noise amplitude.
    #[must_use]
    #[rustfmt::skip]
    pub const fn noise(&self) -> f64 { self.noise }
}

/// Generates R-MAT edge lists.
///
/// # Examples
/// ```
/// use graphstat_core::RmatGenerator;
///
/// let generator = RmatGenerator::default();
/// let edges = generator.generate(8, 4096, 2, 3, false)?;
/// assert_eq!(edges.len(), 4096);
/// assert!(edges.edges().iter().all(|e| e.v0() < 256 && e.v1() < 256));
/// assert_eq!(edges, generator.generate(8, 4096, 2, 3, false)?);
/// # Ok::<(), graphstat_core::GraphStatError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RmatGenerator {
    params: RmatParams,
}

impl RmatGenerator {
    /// Creates a generator with the given parameters.
    #[must_use]
    pub const fn new(params: RmatParams) -> Self {
        Self { params }
    }

    /// Returns the sampler parameters.
    #[must_use]
    #[rustfmt::skip]
    pub const fn params(&self) -> RmatParams { self.params }

    /// Samples `edge_count` edges over `2^scale` vertices.
    ///
    /// The same `(scale, edge_count, seed1, seed2)` always yields the same
    /// edge sequence. `directed` is recorded on the returned list; edges are
    /// not canonicalised either way.
    ///
    /// # Errors
    /// Returns [`GraphStatError::InvalidParameter`] when `scale` is zero or
    /// exceeds [`MAX_SCALE`], and [`GraphStatError::ResourceExhaustion`]
    /// when the edge list or the permutation table cannot be allocated.
    #[instrument(
        name = "core.rmat.generate",
        err,
        skip(self),
        fields(noise = self.params.noise),
    )]
    pub fn generate(
        &self,
        scale: u32,
        edge_count: u64,
        seed1: u64,
        seed2: u64,
        directed: bool,
    ) -> Result<EdgeList> {
        let vertex_count = vertex_count_for_scale(scale)?;
        let root = RandomStream::from_seed_pair(seed1, seed2);

        let mut edges = self.sample_edges(scale, edge_count, &root)?;

        let mut permutation_stream = root.substream(PERMUTATION_STREAM);
        let permutation = VertexPermutation::random(vertex_count, &mut permutation_stream)?;
        permutation.apply_to_edges(&mut edges);

        let list = EdgeList::new(vertex_count, directed, edges);
        debug!(
            vertex_count,
            edges = list.len(),
            self_loops = list.self_loop_count(),
            "rmat edge list generated"
        );
        Ok(list)
    }

    /// Samples the raw (unpermuted) edges.
    fn sample_edges(&self, scale: u32, edge_count: u64, root: &RandomStream) -> Result<Vec<Edge>> {
        let mut edges = Vec::new();
        try_reserve(&mut edges, "edge list", edge_count)?;
        let len = usize::try_from(edge_count).map_err(|_| GraphStatError::ResourceExhaustion {
            resource: "edge list",
            requested: edge_count,
        })?;
        edges.resize(len, Edge::new(0, 0));

        let weights = self.params.weights;
        let noise = self.params.noise;
        edges
            .par_chunks_mut(EDGE_BLOCK)
            .enumerate()
            .for_each(|(block, chunk)| {
                let mut stream = root.substream(block as u64);
                for slot in chunk {
                    *slot = sampling::sample_edge(&weights, noise, scale, &mut stream);
                }
            });
        Ok(edges)
    }
}

/// Returns `2^scale`, validating the scale.
///
/// # Errors
/// Returns [`GraphStatError::InvalidParameter`] when `scale` is zero or
/// exceeds [`MAX_SCALE`].
///
/// # Examples
/// ```
/// use graphstat_core::vertex_count_for_scale;
///
/// assert_eq!(vertex_count_for_scale(12)?, 4096);
/// assert!(vertex_count_for_scale(0).is_err());
/// # Ok::<(), graphstat_core::GraphStatError>(())
/// ```
pub fn vertex_count_for_scale(scale: u32) -> Result<u64> {
    if scale == 0 || scale > MAX_SCALE {
        return Err(GraphStatError::invalid(
            "scale",
            format!("scale must lie in 1..={MAX_SCALE} (got {scale})"),
        ));
    }
    Ok(1_u64 << scale)
}
