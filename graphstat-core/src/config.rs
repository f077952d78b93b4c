//! Run configuration and its validating builder.

use std::num::{NonZeroU64, NonZeroUsize};

use crate::{
    barabasi_albert::BarabasiAlbertParams,
    error::{GraphStatError, Result},
    graph::LoopDegree,
    histogram::DEFAULT_BIN_WIDTH,
    rmat::{RmatParams, vertex_count_for_scale},
};

/// Selects the random graph model used for every trial.
///
/// # Examples
/// ```
/// use graphstat_core::GeneratorKind;
///
/// assert!(matches!(GeneratorKind::default(), GeneratorKind::Rmat(_)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GeneratorKind {
    /// Recursive-matrix sampling with `edge_factor × 2^scale` edges.
    Rmat(RmatParams),
    /// Preferential attachment over `2^scale` vertices, attaching
    /// `edge_factor` edges per new vertex.
    BarabasiAlbert,
}

impl Default for GeneratorKind {
    fn default() -> Self {
        Self::Rmat(RmatParams::default())
    }
}

/// Validated, immutable parameters of one aggregation run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunConfig {
    scale: u32,
    vertex_count: u64,
    edge_factor: u64,
    edge_count: u64,
    trial_count: NonZeroU64,
    directed: bool,
    seed: u64,
    generator: GeneratorKind,
    count_self_loops: bool,
    bin_width: NonZeroUsize,
}

impl RunConfig {
    /// Returns the vertex-count exponent.
    #[must_use]
    #[rustfmt::skip]
    pub const fn scale(&self) -> u32 { self.scale }

    /// Returns `2^scale`.
    #[must_use]
    #[rustfmt::skip]
    pub const fn vertex_count(&self) -> u64 { self.vertex_count }

    /// Returns the edge factor.
    #[must_use]
    #[rustfmt::skip]
    pub const fn edge_factor(&self) -> u64 { self.edge_factor }

    /// Returns `edge_factor × 2^scale`, the R-MAT edge count.
    #[must_use]
    #[rustfmt::skip]
    pub const fn edge_count(&self) -> u64 { self.edge_count }

    /// Returns the number of trials to run.
    #[must_use]
    #[rustfmt::skip]
    pub const fn trial_count(&self) -> NonZeroU64 { self.trial_count }

    /// Returns whether graphs are generated and analysed as directed.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_directed(&self) -> bool { self.directed }

    /// Returns the run seed from which every trial seed derives.
    #[must_use]
    #[rustfmt::skip]
    pub const fn seed(&self) -> u64 { self.seed }

    /// Returns the generator selection.
    #[must_use]
    #[rustfmt::skip]
    pub const fn generator(&self) -> GeneratorKind { self.generator }

    /// Returns whether self-loops contribute to degree.
    #[must_use]
    #[rustfmt::skip]
    pub const fn counts_self_loops(&self) -> bool { self.count_self_loops }

    /// Returns the degree mode matching [`counts_self_loops`](Self::counts_self_loops).
    #[must_use]
    pub const fn loop_degree(&self) -> LoopDegree {
        LoopDegree::from_flag(self.count_self_loops)
    }

    /// Returns the histogram bin width.
    #[must_use]
    #[rustfmt::skip]
    pub const fn bin_width(&self) -> NonZeroUsize { self.bin_width }
}

/// Configures and validates a [`RunConfig`].
///
/// # Examples
/// ```
/// use graphstat_core::{GeneratorKind, RunConfigBuilder};
///
/// let config = RunConfigBuilder::new()
///     .with_scale(12)
///     .with_edge_factor(16)
///     .with_trial_count(10)
///     .with_directed(true)
///     .with_seed(777)
///     .build()?;
/// assert_eq!(config.vertex_count(), 4096);
/// assert_eq!(config.edge_count(), 65_536);
/// assert_eq!(config.bin_width().get(), 100);
/// assert!(matches!(config.generator(), GeneratorKind::Rmat(_)));
///
/// assert!(RunConfigBuilder::new().with_trial_count(0).build().is_err());
/// # Ok::<(), graphstat_core::GraphStatError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunConfigBuilder {
    scale: u32,
    edge_factor: u64,
    trial_count: u64,
    directed: bool,
    seed: u64,
    generator: GeneratorKind,
    count_self_loops: bool,
    bin_width: usize,
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self {
            scale: 8,
            edge_factor: 16,
            trial_count: 1,
            directed: false,
            seed: 0,
            generator: GeneratorKind::default(),
            count_self_loops: true,
            bin_width: DEFAULT_BIN_WIDTH.get(),
        }
    }
}

impl RunConfigBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the vertex-count exponent.
    #[must_use]
    pub const fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the edge factor.
    #[must_use]
    pub const fn with_edge_factor(mut self, edge_factor: u64) -> Self {
        self.edge_factor = edge_factor;
        self
    }

    /// Sets the number of trials.
    #[must_use]
    pub const fn with_trial_count(mut self, trial_count: u64) -> Self {
        self.trial_count = trial_count;
        self
    }

    /// Sets whether graphs are directed.
    #[must_use]
    pub const fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Pins the run seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Selects the generator.
    #[must_use]
    pub const fn with_generator(mut self, generator: GeneratorKind) -> Self {
        self.generator = generator;
        self
    }

    /// Sets whether self-loops contribute to degree.
    #[must_use]
    pub const fn with_count_self_loops(mut self, count: bool) -> Self {
        self.count_self_loops = count;
        self
    }

    /// Sets the histogram bin width.
    #[must_use]
    pub const fn with_bin_width(mut self, bin_width: usize) -> Self {
        self.bin_width = bin_width;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`GraphStatError::InvalidParameter`] when `scale` is out of
    /// range, `trial_count` or `bin_width` is zero, the edge count overflows,
    /// or the Barabási–Albert attachment count is not in `1..2^scale`.
    pub fn build(self) -> Result<RunConfig> {
        let vertex_count = vertex_count_for_scale(self.scale)?;
        let trial_count = NonZeroU64::new(self.trial_count).ok_or_else(|| {
            GraphStatError::invalid("trial_count", "at least one trial is required")
        })?;
        let bin_width = NonZeroUsize::new(self.bin_width)
            .ok_or_else(|| GraphStatError::invalid("bin_width", "bin width must be positive"))?;
        let edge_count = self.edge_factor.checked_mul(vertex_count).ok_or_else(|| {
            GraphStatError::invalid(
                "edge_factor",
                format!(
                    "edge_factor {} × 2^{} overflows the edge count",
                    self.edge_factor, self.scale
                ),
            )
        })?;
        if matches!(self.generator, GeneratorKind::BarabasiAlbert) {
            BarabasiAlbertParams::new(vertex_count, self.edge_factor, self.directed)?;
        }

        Ok(RunConfig {
            scale: self.scale,
            vertex_count,
            edge_factor: self.edge_factor,
            edge_count,
            trial_count,
            directed: self.directed,
            seed: self.seed,
            generator: self.generator,
            count_self_loops: self.count_self_loops,
            bin_width,
        })
    }
}
