//! Immutable compressed-sparse-row adjacency built from an [`EdgeList`].
//!
//! Undirected lists store every edge in both directions; a self-loop appears
//! twice in its vertex's list so list length equals degree. Directed lists
//! keep separate outgoing and incoming rows.

use crate::{
    edge::{EdgeList, VertexId},
    error::AnalyzerError,
};

/// Whether self-loops contribute to vertex degree.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LoopDegree {
    /// A self-loop adds two to its vertex's degree.
    #[default]
    Count,
    /// Self-loops add nothing to degree.
    Ignore,
}

impl LoopDegree {
    /// Maps a `count_self_loops` flag to the matching mode.
    #[must_use]
    pub const fn from_flag(count_self_loops: bool) -> Self {
        if count_self_loops {
            Self::Count
        } else {
            Self::Ignore
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Csr {
    offsets: Vec<usize>,
    targets: Vec<usize>,
}

impl Csr {
    fn from_pairs(vertex_count: usize, pairs: &[(usize, usize)]) -> Self {
        let mut offsets = vec![0_usize; vertex_count + 1];
        for &(from, _) in pairs {
            if let Some(slot) = offsets.get_mut(from + 1) {
                *slot += 1;
            }
        }
        for index in 1..offsets.len() {
            let previous = offsets.get(index - 1).copied().unwrap_or(0);
            if let Some(slot) = offsets.get_mut(index) {
                *slot += previous;
            }
        }

        let mut cursor = offsets.clone();
        let mut targets = vec![0_usize; pairs.len()];
        for &(from, to) in pairs {
            let Some(position) = cursor.get_mut(from) else {
                continue;
            };
            if let Some(slot) = targets.get_mut(*position) {
                *slot = to;
            }
            *position += 1;
        }
        Self { offsets, targets }
    }

    fn row(&self, vertex: usize) -> &[usize] {
        let start = self.offsets.get(vertex).copied().unwrap_or(0);
        let end = self.offsets.get(vertex + 1).copied().unwrap_or(start);
        self.targets.get(start..end).unwrap_or(&[])
    }
}

/// Trial-scoped adjacency structure over `{0 … vertex_count − 1}`.
///
/// # Examples
/// ```
/// use graphstat_core::{Edge, EdgeList, Graph, LoopDegree};
///
/// let list = EdgeList::new(3, false, vec![Edge::new(0, 1), Edge::new(1, 1)]);
/// let graph = Graph::from_edge_list(&list)?;
/// assert_eq!(graph.degrees(LoopDegree::Count), vec![1, 3, 0]);
/// assert_eq!(graph.degrees(LoopDegree::Ignore), vec![1, 1, 0]);
/// # Ok::<(), graphstat_core::AnalyzerError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Graph {
    vertex_count: usize,
    directed: bool,
    outgoing: Csr,
    incoming: Option<Csr>,
    self_loops: Vec<u64>,
}

impl Graph {
    /// Builds the adjacency for `list`.
    ///
    /// # Errors
    /// Returns [`AnalyzerError::VertexOutOfRange`] when an edge references a
    /// vertex outside the list's vertex set.
    pub fn from_edge_list(list: &EdgeList) -> Result<Self, AnalyzerError> {
        let vertex_count = usize::try_from(list.vertex_count()).map_err(|_| {
            AnalyzerError::VertexOutOfRange {
                vertex: list.vertex_count(),
                vertex_count: list.vertex_count(),
            }
        })?;
        let index_of = |vertex: VertexId| -> Result<usize, AnalyzerError> {
            usize::try_from(vertex)
                .ok()
                .filter(|&index| index < vertex_count)
                .ok_or(AnalyzerError::VertexOutOfRange {
                    vertex,
                    vertex_count: list.vertex_count(),
                })
        };

        let mut self_loops = vec![0_u64; vertex_count];
        let mut forward = Vec::with_capacity(list.len() * if list.is_directed() { 1 } else { 2 });
        for edge in list.edges() {
            let v0 = index_of(edge.v0())?;
            let v1 = index_of(edge.v1())?;
            if v0 == v1 {
                if let Some(count) = self_loops.get_mut(v0) {
                    *count += 1;
                }
            }
            forward.push((v0, v1));
            if !list.is_directed() {
                forward.push((v1, v0));
            }
        }

        let incoming = list.is_directed().then(|| {
            let reversed: Vec<(usize, usize)> = forward.iter().map(|&(a, b)| (b, a)).collect();
            Csr::from_pairs(vertex_count, &reversed)
        });
        let outgoing = Csr::from_pairs(vertex_count, &forward);

        Ok(Self {
            vertex_count,
            directed: list.is_directed(),
            outgoing,
            incoming,
            self_loops,
        })
    }

    /// Returns the number of vertices.
    #[must_use]
    #[rustfmt::skip]
    pub const fn vertex_count(&self) -> usize { self.vertex_count }

    /// Returns whether the graph was built from a directed edge list.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_directed(&self) -> bool { self.directed }

    /// Returns the vertices reachable from `vertex` in one step.
    ///
    /// With `follow_direction` unset on a directed graph, incoming edges are
    /// traversed as well.
    pub fn neighbours(
        &self,
        vertex: usize,
        follow_direction: bool,
    ) -> impl Iterator<Item = usize> + '_ {
        let backward = match (&self.incoming, follow_direction) {
            (Some(incoming), false) => incoming.row(vertex),
            _ => &[],
        };
        self.outgoing
            .row(vertex)
            .iter()
            .chain(backward)
            .copied()
    }

    /// Returns the degree of every vertex. Directed graphs report in-degree
    /// plus out-degree.
    #[must_use]
    pub fn degrees(&self, loops: LoopDegree) -> Vec<u64> {
        (0..self.vertex_count)
            .map(|vertex| {
                let incoming = self
                    .incoming
                    .as_ref()
                    .map_or(0, |csr| csr.row(vertex).len());
                let total = (self.outgoing.row(vertex).len() + incoming) as u64;
                match loops {
                    LoopDegree::Count => total,
                    LoopDegree::Ignore => {
                        let own = self.self_loops.get(vertex).copied().unwrap_or(0);
                        total.saturating_sub(own * 2)
                    }
                }
            })
            .collect()
    }
}
