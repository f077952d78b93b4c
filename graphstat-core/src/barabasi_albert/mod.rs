//! Barabási–Albert preferential-attachment generation.
//!
//! Growth starts from a complete graph on `m + 1` seed vertices. Every later
//! vertex attaches `m` edges to distinct existing vertices, each chosen with
//! probability proportional to its current degree. Degree-proportional
//! sampling draws a uniform slot from the endpoint multiset, in which each
//! vertex appears once per incident edge end.


use tracing::{debug, instrument};

use crate::{
    edge::{Edge, EdgeList, VertexId},
    error::{GraphStatError, Result, try_reserve},
    rng::RandomStream,
};

/// Parameters for a preferential-attachment run.
///
/// # Examples
/// ```
/// use graphstat_core::BarabasiAlbertParams;
///
/// let params = BarabasiAlbertParams::new(1000, 4, false)?;
/// assert_eq!(params.seed_size(), 5);
/// assert_eq!(params.expected_edge_count(), Some(995 * 4 + 10));
/// assert!(BarabasiAlbertParams::new(4, 4, false).is_err());
/// # Ok::<(), graphstat_core::GraphStatError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BarabasiAlbertParams {
    vertex_count: u64,
    edges_per_vertex: u64,
    directed: bool,
}

impl BarabasiAlbertParams {
    /// Validates and constructs attachment parameters.
    ///
    /// # Errors
    /// Returns [`GraphStatError::InvalidParameter`] when `edges_per_vertex`
    /// is zero or not smaller than `vertex_count`.
    pub fn new(vertex_count: u64, edges_per_vertex: u64, directed: bool) -> Result<Self> {
        if edges_per_vertex == 0 {
            return Err(GraphStatError::invalid(
                "edges_per_vertex",
                "each new vertex must attach at least one edge",
            ));
        }
        if edges_per_vertex >= vertex_count {
            return Err(GraphStatError::invalid(
                "edges_per_vertex",
                format!(
                    "edges_per_vertex ({edges_per_vertex}) must be smaller than vertex_count ({vertex_count})"
                ),
            ));
        }
        Ok(Self {
            vertex_count,
            edges_per_vertex,
            directed,
        })
    }

    /// Returns the final number of vertices.
    #[must_use]
    #[rustfmt::skip]
    pub const fn vertex_count(&self) -> u64 { self.vertex_count }

    /// Returns the number of edges attached by each new vertex.
    #[must_use]
    #[rustfmt::skip]
    pub const fn edges_per_vertex(&self) -> u64 { self.edges_per_vertex }

    /// Returns whether edges are recorded as directed (new → existing).
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_directed(&self) -> bool { self.directed }

    /// Returns the size of the complete seed graph (`m + 1`).
    #[must_use]
    pub const fn seed_size(&self) -> u64 {
        self.edges_per_vertex + 1
    }

    /// Returns the number of edges in the complete seed graph, or `None`
    /// when it does not fit in a `u64`.
    #[must_use]
    pub const fn seed_edge_count(&self) -> Option<u64> {
        let size = self.seed_size();
        // Halve whichever of `size` and `size − 1` is even.
        let (even, odd) = if size & 1 == 0 {
            (size, size - 1)
        } else {
            (size - 1, size)
        };
        (even >> 1).checked_mul(odd)
    }

    /// Returns the exact edge count of a generated graph,
    /// `(n − seed_size) · m + seed_edge_count`, or `None` on overflow.
    #[must_use]
    pub const fn expected_edge_count(&self) -> Option<u64> {
        let Some(seed_edges) = self.seed_edge_count() else {
            return None;
        };
        match (self.vertex_count - self.seed_size()).checked_mul(self.edges_per_vertex) {
            Some(attached) => attached.checked_add(seed_edges),
            None => None,
        }
    }
}

/// Mutable state while the graph grows.
///
/// Groups the edge list and the endpoint multiset so helper functions share
/// one borrow.
struct GrowthState {
    edges: Vec<Edge>,
    endpoints: Vec<VertexId>,
}

impl GrowthState {
    fn add_edge(&mut self, from: VertexId, to: VertexId) {
        self.edges.push(Edge::new(from, to));
        self.endpoints.push(from);
        self.endpoints.push(to);
    }
}

/// Generates preferential-attachment graphs.
///
/// # Examples
/// ```
/// use graphstat_core::{BarabasiAlbertGenerator, BarabasiAlbertParams, RandomStream};
///
/// let params = BarabasiAlbertParams::new(100, 3, false)?;
/// let mut stream = RandomStream::from_seed(7);
/// let edges = BarabasiAlbertGenerator::new(params).generate(&mut stream)?;
/// assert_eq!(Some(edges.len() as u64), params.expected_edge_count());
/// # Ok::<(), graphstat_core::GraphStatError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BarabasiAlbertGenerator {
    params: BarabasiAlbertParams,
}

impl BarabasiAlbertGenerator {
    /// Creates a generator with validated parameters.
    #[must_use]
    pub const fn new(params: BarabasiAlbertParams) -> Self {
        Self { params }
    }

    /// Returns the attachment parameters.
    #[must_use]
    #[rustfmt::skip]
    pub const fn params(&self) -> BarabasiAlbertParams { self.params }

    /// Grows a graph to `vertex_count` vertices, drawing from `stream`.
    ///
    /// # Errors
    /// Returns [`GraphStatError::ResourceExhaustion`] when the edge count
    /// overflows `u64` or when the edge list or the endpoint table cannot be
    /// allocated.
    #[instrument(
        name = "core.barabasi_albert.generate",
        err,
        skip(self, stream),
        fields(
            vertex_count = self.params.vertex_count,
            edges_per_vertex = self.params.edges_per_vertex,
        ),
    )]
    pub fn generate(&self, stream: &mut RandomStream) -> Result<EdgeList> {
        let edge_count = self.params.expected_edge_count().ok_or(
            GraphStatError::ResourceExhaustion {
                resource: "edge list",
                requested: u64::MAX,
            },
        )?;
        let mut state = GrowthState {
            edges: Vec::new(),
            endpoints: Vec::new(),
        };
        try_reserve(&mut state.edges, "edge list", edge_count)?;
        try_reserve(
            &mut state.endpoints,
            "attachment endpoints",
            edge_count.saturating_mul(2),
        )?;

        self.seed_complete_graph(&mut state);
        let m = usize::try_from(self.params.edges_per_vertex).map_err(|_| {
            GraphStatError::ResourceExhaustion {
                resource: "attachment targets",
                requested: self.params.edges_per_vertex,
            }
        })?;
        let mut targets = Vec::with_capacity(m);
        for vertex in self.params.seed_size()..self.params.vertex_count {
            choose_targets(&state.endpoints, m, stream, &mut targets);
            for &target in &targets {
                state.add_edge(vertex, target);
            }
        }

        debug!(edges = state.edges.len(), "preferential attachment completed");
        Ok(EdgeList::new(
            self.params.vertex_count,
            self.params.directed,
            state.edges,
        ))
    }

    fn seed_complete_graph(&self, state: &mut GrowthState) {
        let size = self.params.seed_size();
        for left in 0..size {
            for right in (left + 1)..size {
                state.add_edge(right, left);
            }
        }
    }
}

/// Fills `targets` with `count` distinct vertices drawn with probability
/// proportional to their multiplicity in `endpoints`.
///
/// Repeated picks are discarded and redrawn. The caller guarantees that
/// `endpoints` holds more than `count` distinct vertices, so the loop ends.
fn choose_targets(
    endpoints: &[VertexId],
    count: usize,
    stream: &mut RandomStream,
    targets: &mut Vec<VertexId>,
) {
    targets.clear();
    while targets.len() < count {
        let slot = stream.next_index(endpoints.len());
        let Some(&candidate) = endpoints.get(slot) else {
            continue;
        };
        if !targets.contains(&candidate) {
            targets.push(candidate);
        }
    }
}
