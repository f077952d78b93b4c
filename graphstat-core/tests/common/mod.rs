//! Shared helpers for graphstat-core integration tests.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use graphstat_core::{AnalyzerError, BfsAnalyzer, Graph, GraphAnalyzer, PathStatistics};

/// Delegates to [`BfsAnalyzer`] but fails every call whose zero-based index
/// is listed in `failing_calls`.
pub struct FlakyAnalyzer {
    calls: AtomicU64,
    failing_calls: Vec<u64>,
}

impl FlakyAnalyzer {
    pub fn failing_on(failing_calls: &[u64]) -> Self {
        Self {
            calls: AtomicU64::new(0),
            failing_calls: failing_calls.to_vec(),
        }
    }
}

impl GraphAnalyzer for FlakyAnalyzer {
    fn path_statistics(
        &self,
        graph: &Graph,
        directed: bool,
    ) -> Result<PathStatistics, AnalyzerError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_calls.contains(&call) {
            return Err(AnalyzerError::EmptyGraph);
        }
        BfsAnalyzer.path_statistics(graph, directed)
    }
}

/// Delegates to [`BfsAnalyzer`] and raises `flag` after `after` calls.
pub struct CancellingAnalyzer<'a> {
    calls: AtomicU64,
    after: u64,
    flag: &'a AtomicBool,
}

impl<'a> CancellingAnalyzer<'a> {
    pub const fn new(after: u64, flag: &'a AtomicBool) -> Self {
        Self {
            calls: AtomicU64::new(0),
            after,
            flag,
        }
    }
}

impl GraphAnalyzer for CancellingAnalyzer<'_> {
    fn path_statistics(
        &self,
        graph: &Graph,
        directed: bool,
    ) -> Result<PathStatistics, AnalyzerError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) + 1 >= self.after {
            self.flag.store(true, Ordering::Release);
        }
        BfsAnalyzer.path_statistics(graph, directed)
    }
}
