//! Multi-trial driver that averages path statistics and accumulates the
//! degree histogram.

use std::{
    num::NonZeroUsize,
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

use tracing::{info, instrument, warn};

use crate::{
    analyzer::{GraphAnalyzer, PathStatistics},
    barabasi_albert::{BarabasiAlbertGenerator, BarabasiAlbertParams},
    config::{GeneratorKind, RunConfig},
    edge::EdgeList,
    error::{AnalyzerError, GraphStatError, Result},
    graph::Graph,
    histogram::{DegreeHistogram, HistogramBins},
    rmat::RmatGenerator,
    rng::TrialSeeds,
};

/// Running sums over completed trials.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Accumulators {
    diameter_sum: u64,
    distance_sum: f64,
    completed: u64,
}

impl Accumulators {
    #[expect(
        clippy::float_arithmetic,
        reason = "average path lengths are accumulated as reals"
    )]
    fn add(&mut self, diameter: u64, average_distance: f64) {
        self.diameter_sum += diameter;
        self.distance_sum += average_distance;
        self.completed += 1;
    }

    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "averages over trials are reported as reals"
    )]
    fn averages(&self) -> (f64, f64) {
        let trials = self.completed as f64;
        (
            self.diameter_sum as f64 / trials,
            self.distance_sum / trials,
        )
    }
}

/// Statistics of one analysed trial.
struct TrialOutcome {
    diameter: u64,
    average_distance: f64,
    degrees: Vec<u64>,
}

/// Summary of an aggregation run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    seed: u64,
    vertex_count: u64,
    bin_width: NonZeroUsize,
    trials_requested: u64,
    trials_attempted: u64,
    trials_completed: u64,
    trials_skipped: u64,
    average_diameter: f64,
    average_distance: f64,
    histogram: DegreeHistogram,
    generation_time: Duration,
    analysis_time: Duration,
}

impl RunReport {
    /// Returns the run seed.
    #[must_use]
    #[rustfmt::skip]
    pub const fn seed(&self) -> u64 { self.seed }

    /// Returns the vertex count of every generated graph.
    #[must_use]
    #[rustfmt::skip]
    pub const fn vertex_count(&self) -> u64 { self.vertex_count }

    /// Returns the configured number of trials.
    #[must_use]
    #[rustfmt::skip]
    pub const fn trials_requested(&self) -> u64 { self.trials_requested }

    /// Returns the number of trials started before completion or
    /// cancellation.
    #[must_use]
    #[rustfmt::skip]
    pub const fn trials_attempted(&self) -> u64 { self.trials_attempted }

    /// Returns the number of trials whose statistics were accumulated.
    #[must_use]
    #[rustfmt::skip]
    pub const fn trials_completed(&self) -> u64 { self.trials_completed }

    /// Returns the number of trials skipped after an analyzer failure.
    #[must_use]
    #[rustfmt::skip]
    pub const fn trials_skipped(&self) -> u64 { self.trials_skipped }

    /// Returns whether the run stopped before every trial was attempted.
    #[must_use]
    pub const fn was_cancelled(&self) -> bool {
        self.trials_attempted < self.trials_requested
    }

    /// Returns the mean diameter over completed trials.
    #[must_use]
    #[rustfmt::skip]
    pub const fn average_diameter(&self) -> f64 { self.average_diameter }

    /// Returns the mean average path length over completed trials.
    #[must_use]
    #[rustfmt::skip]
    pub const fn average_distance(&self) -> f64 { self.average_distance }

    /// Returns the accumulated degree histogram.
    #[must_use]
    #[rustfmt::skip]
    pub const fn histogram(&self) -> &DegreeHistogram { &self.histogram }

    /// Returns the total time spent generating edge lists.
    #[must_use]
    #[rustfmt::skip]
    pub const fn generation_time(&self) -> Duration { self.generation_time }

    /// Returns the total time spent building and analysing graphs.
    #[must_use]
    #[rustfmt::skip]
    pub const fn analysis_time(&self) -> Duration { self.analysis_time }

    /// Returns the histogram binned with the configured width and
    /// normalised per completed trial and per vertex.
    #[must_use]
    pub fn bins(&self) -> HistogramBins {
        self.histogram
            .bins(self.bin_width, self.trials_completed, self.vertex_count)
    }
}

/// Runs repeated generate-and-analyse trials.
///
/// Trials run sequentially. Trial `k` depends only on the run seed and `k`,
/// so rerunning a configuration reproduces every trial.
///
/// # Examples
/// ```
/// use graphstat_core::{BfsAnalyzer, RunConfigBuilder, TrialAggregator};
///
/// let config = RunConfigBuilder::new()
///     .with_scale(6)
///     .with_edge_factor(8)
///     .with_trial_count(2)
///     .with_seed(42)
///     .build()?;
/// let report = TrialAggregator::new(config, BfsAnalyzer).run()?;
/// assert_eq!(report.trials_completed(), 2);
/// assert!(report.average_diameter() > 0.0);
/// assert_eq!(report.histogram().total_mass(), 2 * 64);
/// # Ok::<(), graphstat_core::GraphStatError>(())
/// ```
#[derive(Clone, Debug)]
pub struct TrialAggregator<A> {
    config: RunConfig,
    analyzer: A,
}

impl<A: GraphAnalyzer> TrialAggregator<A> {
    /// Creates an aggregator for `config` using `analyzer`.
    #[must_use]
    pub const fn new(config: RunConfig, analyzer: A) -> Self {
        Self { config, analyzer }
    }

    /// Returns the run configuration.
    #[must_use]
    #[rustfmt::skip]
    pub const fn config(&self) -> &RunConfig { &self.config }

    /// Runs every configured trial.
    ///
    /// # Errors
    /// See [`run_until`](Self::run_until).
    pub fn run(&self) -> Result<RunReport> {
        self.run_until(&AtomicBool::new(false))
    }

    /// Runs trials until all complete or `cancel` is observed set at a trial
    /// boundary.
    ///
    /// A trial whose analysis fails is skipped and leaves the accumulators
    /// untouched. Averages divide by the number of completed trials.
    ///
    /// # Errors
    /// Returns generator errors unchanged, [`GraphStatError::Analyzer`] when
    /// an edge list cannot be turned into a graph,
    /// [`GraphStatError::ResourceExhaustion`] when the histogram cannot grow,
    /// and [`GraphStatError::NoCompletedTrials`] when no trial completed.
    #[instrument(
        name = "core.aggregate",
        err,
        skip(self, cancel),
        fields(
            scale = self.config.scale(),
            edge_factor = self.config.edge_factor(),
            trials = self.config.trial_count().get(),
            directed = self.config.is_directed(),
            seed = self.config.seed(),
        ),
    )]
    pub fn run_until(&self, cancel: &AtomicBool) -> Result<RunReport> {
        let trials_requested = self.config.trial_count().get();
        let mut accumulators = Accumulators::default();
        let mut histogram = DegreeHistogram::with_len(self.config.vertex_count())?;
        let mut trials_attempted = 0;
        let mut trials_skipped = 0;
        let mut generation_time = Duration::ZERO;
        let mut analysis_time = Duration::ZERO;

        for trial in 0..trials_requested {
            if cancel.load(Ordering::Acquire) {
                warn!(trial, "cancellation requested; stopping before trial");
                break;
            }
            trials_attempted += 1;

            let started = Instant::now();
            let edges = self.generate(TrialSeeds::derive(self.config.seed(), trial))?;
            generation_time += started.elapsed();

            let started = Instant::now();
            let graph = Graph::from_edge_list(&edges)
                .map_err(|error| GraphStatError::Analyzer { trial, error })?;
            drop(edges);
            let outcome = self.analyze(&graph);
            drop(graph);
            let elapsed = started.elapsed();
            analysis_time += elapsed;

            match outcome {
                Ok(outcome) => {
                    histogram.record(&outcome.degrees)?;
                    accumulators.add(outcome.diameter, outcome.average_distance);
                    record_trial_completed(elapsed);
                    info!(
                        trial,
                        diameter = outcome.diameter,
                        average_distance = outcome.average_distance,
                        elapsed_ms = elapsed.as_millis(),
                        "trial completed"
                    );
                }
                Err(error) => {
                    trials_skipped += 1;
                    record_trial_skipped();
                    warn!(trial, code = %error.code(), %error, "analysis failed; trial skipped");
                }
            }
        }

        if accumulators.completed == 0 {
            return Err(GraphStatError::NoCompletedTrials {
                attempted: trials_attempted,
            });
        }
        let (average_diameter, average_distance) = accumulators.averages();
        info!(
            completed = accumulators.completed,
            skipped = trials_skipped,
            average_diameter,
            average_distance,
            "run completed"
        );

        Ok(RunReport {
            seed: self.config.seed(),
            vertex_count: self.config.vertex_count(),
            bin_width: self.config.bin_width(),
            trials_requested,
            trials_attempted,
            trials_completed: accumulators.completed,
            trials_skipped,
            average_diameter,
            average_distance,
            histogram,
            generation_time,
            analysis_time,
        })
    }

    fn generate(&self, seeds: TrialSeeds) -> Result<EdgeList> {
        match self.config.generator() {
            GeneratorKind::Rmat(params) => RmatGenerator::new(params).generate(
                self.config.scale(),
                self.config.edge_count(),
                seeds.seed1,
                seeds.seed2,
                self.config.is_directed(),
            ),
            GeneratorKind::BarabasiAlbert => {
                let params = BarabasiAlbertParams::new(
                    self.config.vertex_count(),
                    self.config.edge_factor(),
                    self.config.is_directed(),
                )?;
                BarabasiAlbertGenerator::new(params).generate(&mut seeds.stream())
            }
        }
    }

    fn analyze(&self, graph: &Graph) -> core::result::Result<TrialOutcome, AnalyzerError> {
        let stats: PathStatistics = self
            .analyzer
            .path_statistics(graph, self.config.is_directed())?;
        let average_distance =
            stats
                .average_path_length()
                .ok_or(AnalyzerError::NoReachablePairs {
                    vertex_count: graph.vertex_count() as u64,
                })?;
        Ok(TrialOutcome {
            diameter: stats.diameter(),
            average_distance,
            degrees: self
                .analyzer
                .degree_sequence(graph, self.config.loop_degree()),
        })
    }
}

#[cfg(feature = "metrics")]
fn record_trial_completed(elapsed: Duration) {
    metrics::counter!("graphstat_trials_completed").increment(1);
    metrics::histogram!("graphstat_trial_analysis_seconds").record(elapsed.as_secs_f64());
}

#[cfg(not(feature = "metrics"))]
const fn record_trial_completed(_elapsed: Duration) {}

#[cfg(feature = "metrics")]
fn record_trial_skipped() {
    metrics::counter!("graphstat_trials_skipped").increment(1);
}

#[cfg(not(feature = "metrics"))]
const fn record_trial_skipped() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_divide_by_completed_trials() {
        let mut accumulators = Accumulators::default();
        accumulators.add(4, 2.0);
        accumulators.add(6, 3.0);
        assert_eq!(accumulators.averages(), (5.0, 2.5));
    }
}
