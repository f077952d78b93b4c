//! Edge and edge-list types shared by both generators.

/// Vertex identifier wide enough to address `2^scale` vertices.
pub type VertexId = u64;

/// An ordered pair of vertex identifiers.
///
/// Undirected edges are stored once; whether `(v0, v1)` is read as directed
/// is a property of the owning [`EdgeList`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Edge {
    v0: VertexId,
    v1: VertexId,
}

impl Edge {
    /// Creates an edge from `v0` to `v1`.
    #[must_use]
    #[rustfmt::skip]
    pub const fn new(v0: VertexId, v1: VertexId) -> Self { Self { v0, v1 } }

    /// Returns the first endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn v0(&self) -> VertexId { self.v0 }

    /// Returns the second endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn v1(&self) -> VertexId { self.v1 }

    /// Returns whether both endpoints are the same vertex.
    #[must_use]
    pub const fn is_self_loop(&self) -> bool {
        self.v0 == self.v1
    }
}

/// A generated edge sequence over the vertex set `{0 … vertex_count − 1}`.
///
/// Insertion order is generation order. Self-loops and duplicate edges are
/// permitted.
///
/// # Examples
/// ```
/// use graphstat_core::{Edge, EdgeList};
///
/// let list = EdgeList::new(3, false, vec![Edge::new(0, 1), Edge::new(2, 2)]);
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.self_loop_count(), 1);
/// assert!(!list.is_directed());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EdgeList {
    vertex_count: u64,
    directed: bool,
    edges: Vec<Edge>,
}

impl EdgeList {
    /// Wraps `edges` generated over `vertex_count` vertices.
    #[must_use]
    pub const fn new(vertex_count: u64, directed: bool, edges: Vec<Edge>) -> Self {
        Self {
            vertex_count,
            directed,
            edges,
        }
    }

    /// Returns the size of the vertex set.
    #[must_use]
    #[rustfmt::skip]
    pub const fn vertex_count(&self) -> u64 { self.vertex_count }

    /// Returns whether edges are read as directed.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_directed(&self) -> bool { self.directed }

    /// Returns the edges in generation order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[Edge] { &self.edges }

    /// Returns the number of edges.
    #[must_use]
    #[rustfmt::skip]
    pub const fn len(&self) -> usize { self.edges.len() }

    /// Returns whether the list holds no edges.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_empty(&self) -> bool { self.edges.is_empty() }

    /// Counts edges whose endpoints coincide.
    #[must_use]
    pub fn self_loop_count(&self) -> usize {
        self.edges.iter().filter(|edge| edge.is_self_loop()).count()
    }

    /// Consumes the list and returns the raw edges.
    #[must_use]
    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}
