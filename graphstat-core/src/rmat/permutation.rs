//! Uniform vertex relabelling applied after recursive sampling.
//!
//! Recursive sampling concentrates high degree on low-numbered vertices.
//! Relabelling every endpoint through one uniformly random bijection removes
//! that artefact without changing the degree distribution.

use rayon::prelude::*;

use crate::{
    edge::{Edge, VertexId},
    error::{Result, try_reserve},
    rng::RandomStream,
};

/// A bijection over `{0 … len − 1}`.
///
/// # Examples
/// ```
/// use graphstat_core::{RandomStream, VertexPermutation};
///
/// let mut stream = RandomStream::from_seed(3);
/// let permutation = VertexPermutation::random(16, &mut stream)?;
/// let mut labels = permutation.labels().to_vec();
/// labels.sort_unstable();
/// assert_eq!(labels, (0..16).collect::<Vec<u64>>());
/// # Ok::<(), graphstat_core::GraphStatError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VertexPermutation {
    labels: Vec<VertexId>,
}

impl VertexPermutation {
    /// Draws a uniformly random permutation of `vertex_count` labels with a
    /// Fisher–Yates shuffle.
    ///
    /// # Errors
    /// Returns [`crate::GraphStatError::ResourceExhaustion`] when the label
    /// table cannot be allocated.
    pub fn random(vertex_count: u64, stream: &mut RandomStream) -> Result<Self> {
        let mut labels = Vec::new();
        try_reserve(&mut labels, "vertex permutation", vertex_count)?;
        labels.extend(0..vertex_count);
        for upper in (1..labels.len()).rev() {
            let pick = stream.next_index(upper + 1);
            labels.swap(upper, pick);
        }
        Ok(Self { labels })
    }

    /// Returns the new label for every original vertex, indexed by the
    /// original identifier.
    #[must_use]
    #[rustfmt::skip]
    pub fn labels(&self) -> &[VertexId] { &self.labels }

    /// Returns the size of the permuted domain.
    #[must_use]
    #[rustfmt::skip]
    pub const fn len(&self) -> usize { self.labels.len() }

    /// Returns whether the domain is empty.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_empty(&self) -> bool { self.labels.is_empty() }

    /// Maps `vertex` to its new label. Vertices outside the domain are
    /// returned unchanged.
    #[must_use]
    pub fn apply(&self, vertex: VertexId) -> VertexId {
        usize::try_from(vertex)
            .ok()
            .and_then(|index| self.labels.get(index))
            .copied()
            .unwrap_or(vertex)
    }

    /// Relabels both endpoints of every edge in place.
    pub fn apply_to_edges(&self, edges: &mut [Edge]) {
        edges.par_iter_mut().for_each(|edge| {
            *edge = Edge::new(self.apply(edge.v0()), self.apply(edge.v1()));
        });
    }
}
