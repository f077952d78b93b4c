//! Graph analysis boundary and the breadth-first default implementation.

use rayon::prelude::*;

use crate::{
    error::AnalyzerError,
    graph::{Graph, LoopDegree},
};

/// Shortest-path statistics over every reachable ordered pair `(u, v)` with
/// `u ≠ v`.
///
/// # Examples
/// ```
/// use graphstat_core::PathStatistics;
///
/// let stats = PathStatistics::new(3, 8, 4);
/// assert_eq!(stats.diameter(), 3);
/// assert_eq!(stats.average_path_length(), Some(2.0));
/// assert_eq!(PathStatistics::default().average_path_length(), None);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct PathStatistics {
    diameter: u64,
    total_distance: u64,
    reachable_pairs: u64,
}

impl PathStatistics {
    /// Creates statistics from raw totals.
    #[must_use]
    pub const fn new(diameter: u64, total_distance: u64, reachable_pairs: u64) -> Self {
        Self {
            diameter,
            total_distance,
            reachable_pairs,
        }
    }

    /// Returns the longest finite shortest-path length.
    #[must_use]
    #[rustfmt::skip]
    pub const fn diameter(&self) -> u64 { self.diameter }

    /// Returns the sum of all finite shortest-path lengths.
    #[must_use]
    #[rustfmt::skip]
    pub const fn total_distance(&self) -> u64 { self.total_distance }

    /// Returns the number of reachable ordered pairs.
    #[must_use]
    #[rustfmt::skip]
    pub const fn reachable_pairs(&self) -> u64 { self.reachable_pairs }

    /// Returns the mean shortest-path length, or `None` when no pair is
    /// reachable.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "the mean path length is reported as a real number"
    )]
    pub fn average_path_length(&self) -> Option<f64> {
        (self.reachable_pairs > 0)
            .then(|| self.total_distance as f64 / self.reachable_pairs as f64)
    }

    /// Combines two disjoint sets of pair statistics.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            diameter: if self.diameter > other.diameter {
                self.diameter
            } else {
                other.diameter
            },
            total_distance: self.total_distance + other.total_distance,
            reachable_pairs: self.reachable_pairs + other.reachable_pairs,
        }
    }

    const fn record(&mut self, distance: u64) {
        if distance > self.diameter {
            self.diameter = distance;
        }
        self.total_distance += distance;
        self.reachable_pairs += 1;
    }
}

/// Computes path and degree statistics for a [`Graph`].
///
/// Only [`path_statistics`](Self::path_statistics) must be implemented; the
/// scalar queries derive from it.
///
/// # Examples
/// ```
/// use graphstat_core::{
///     AnalyzerError, Edge, EdgeList, Graph, GraphAnalyzer, PathStatistics,
/// };
///
/// struct Constant;
///
/// impl GraphAnalyzer for Constant {
///     fn path_statistics(&self, _: &Graph, _: bool) -> Result<PathStatistics, AnalyzerError> {
///         Ok(PathStatistics::new(2, 6, 4))
///     }
/// }
///
/// let graph = Graph::from_edge_list(&EdgeList::new(2, false, vec![Edge::new(0, 1)]))?;
/// assert_eq!(Constant.diameter(&graph, false)?, 2);
/// assert_eq!(Constant.average_path_length(&graph, false)?, 1.5);
/// # Ok::<(), AnalyzerError>(())
/// ```
pub trait GraphAnalyzer {
    /// Computes shortest-path statistics over reachable ordered pairs.
    ///
    /// With `directed` unset, edges of a directed graph are traversed in both
    /// directions.
    ///
    /// # Errors
    /// Returns [`AnalyzerError::EmptyGraph`] when the graph has no vertices
    /// and [`AnalyzerError::NoReachablePairs`] when no vertex reaches another.
    fn path_statistics(
        &self,
        graph: &Graph,
        directed: bool,
    ) -> Result<PathStatistics, AnalyzerError>;

    /// Returns the longest finite shortest-path length.
    ///
    /// # Errors
    /// Propagates errors from [`path_statistics`](Self::path_statistics).
    fn diameter(&self, graph: &Graph, directed: bool) -> Result<u64, AnalyzerError> {
        Ok(self.path_statistics(graph, directed)?.diameter())
    }

    /// Returns the mean finite shortest-path length.
    ///
    /// # Errors
    /// Propagates errors from [`path_statistics`](Self::path_statistics).
    fn average_path_length(&self, graph: &Graph, directed: bool) -> Result<f64, AnalyzerError> {
        self.path_statistics(graph, directed)?
            .average_path_length()
            .ok_or(AnalyzerError::NoReachablePairs {
                vertex_count: graph.vertex_count() as u64,
            })
    }

    /// Returns one degree per vertex, in vertex order.
    fn degree_sequence(&self, graph: &Graph, loops: LoopDegree) -> Vec<u64> {
        graph.degrees(loops)
    }
}

const UNVISITED: u64 = u64::MAX;

/// Per-worker breadth-first search buffers.
struct BfsScratch {
    distances: Vec<u64>,
    queue: Vec<usize>,
}

impl BfsScratch {
    fn new(vertex_count: usize) -> Self {
        Self {
            distances: vec![UNVISITED; vertex_count],
            queue: Vec::with_capacity(vertex_count),
        }
    }

    fn explore(&mut self, graph: &Graph, source: usize, follow_direction: bool) -> PathStatistics {
        let mut stats = PathStatistics::default();
        self.queue.clear();
        if let Some(slot) = self.distances.get_mut(source) {
            *slot = 0;
            self.queue.push(source);
        }

        let mut head = 0;
        while let Some(&vertex) = self.queue.get(head) {
            head += 1;
            let next = self.distances.get(vertex).copied().unwrap_or(0) + 1;
            for neighbour in graph.neighbours(vertex, follow_direction) {
                let Some(slot) = self.distances.get_mut(neighbour) else {
                    continue;
                };
                if *slot == UNVISITED {
                    *slot = next;
                    self.queue.push(neighbour);
                    stats.record(next);
                }
            }
        }

        for &visited in &self.queue {
            if let Some(slot) = self.distances.get_mut(visited) {
                *slot = UNVISITED;
            }
        }
        stats
    }
}

/// Exact all-pairs analysis by one breadth-first search per source vertex.
///
/// Sources are processed in parallel; the reduction is an integer sum, so
/// results do not depend on the number of rayon workers.
///
/// # Examples
/// ```
/// use graphstat_core::{BfsAnalyzer, Edge, EdgeList, Graph, GraphAnalyzer};
///
/// let path = EdgeList::new(3, false, vec![Edge::new(0, 1), Edge::new(1, 2)]);
/// let graph = Graph::from_edge_list(&path)?;
/// let stats = BfsAnalyzer.path_statistics(&graph, false)?;
/// assert_eq!(stats.diameter(), 2);
/// assert_eq!(stats.reachable_pairs(), 6);
/// assert_eq!(stats.total_distance(), 8);
/// # Ok::<(), graphstat_core::AnalyzerError>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct BfsAnalyzer;

impl GraphAnalyzer for BfsAnalyzer {
    fn path_statistics(
        &self,
        graph: &Graph,
        directed: bool,
    ) -> Result<PathStatistics, AnalyzerError> {
        let vertex_count = graph.vertex_count();
        if vertex_count == 0 {
            return Err(AnalyzerError::EmptyGraph);
        }
        let stats = (0..vertex_count)
            .into_par_iter()
            .map_init(
                || BfsScratch::new(vertex_count),
                |scratch, source| scratch.explore(graph, source, directed),
            )
            .reduce(PathStatistics::default, PathStatistics::merge);
        if stats.reachable_pairs() == 0 {
            return Err(AnalyzerError::NoReachablePairs {
                vertex_count: vertex_count as u64,
            });
        }
        Ok(stats)
    }
}
