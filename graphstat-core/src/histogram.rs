//! Degree-frequency accumulation and normalised binning.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    num::NonZeroUsize,
    path::Path,
};

use crate::error::{GraphStatError, Result, try_reserve};

/// Default number of consecutive degree values folded into one output bin.
pub const DEFAULT_BIN_WIDTH: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(width) => width,
    None => NonZeroUsize::MIN,
};

/// Dense counters indexed by degree, accumulated across trials.
///
/// The table only ever grows: recording a degree beyond the current length
/// appends zeroed counters up to it.
///
/// # Examples
/// ```
/// use graphstat_core::DegreeHistogram;
///
/// let mut histogram = DegreeHistogram::with_len(4)?;
/// histogram.record(&[1, 1, 2, 6])?;
/// assert_eq!(histogram.counts(), &[0, 2, 1, 0, 0, 0, 1]);
/// assert_eq!(histogram.total_mass(), 4);
/// # Ok::<(), graphstat_core::GraphStatError>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DegreeHistogram {
    counts: Vec<u64>,
}

impl DegreeHistogram {
    /// Creates a histogram covering degrees `0 … len − 1`.
    ///
    /// # Errors
    /// Returns [`GraphStatError::ResourceExhaustion`] when the table cannot
    /// be allocated.
    pub fn with_len(len: u64) -> Result<Self> {
        let size = usize::try_from(len).map_err(|_| GraphStatError::ResourceExhaustion {
            resource: "degree histogram",
            requested: len,
        })?;
        let mut counts = Vec::new();
        try_reserve(&mut counts, "degree histogram", len)?;
        counts.resize(size, 0);
        Ok(Self { counts })
    }

    /// Adds one count per entry of `degrees`.
    ///
    /// # Errors
    /// Returns [`GraphStatError::ResourceExhaustion`] when growing the table
    /// to the largest degree fails.
    pub fn record(&mut self, degrees: &[u64]) -> Result<()> {
        let Some(&max) = degrees.iter().max() else {
            return Ok(());
        };
        self.grow_to(max)?;
        for &degree in degrees {
            let slot = usize::try_from(degree)
                .ok()
                .and_then(|index| self.counts.get_mut(index));
            if let Some(count) = slot {
                *count += 1;
            }
        }
        Ok(())
    }

    fn grow_to(&mut self, degree: u64) -> Result<()> {
        let required = degree.saturating_add(1);
        let current = self.counts.len() as u64;
        if required <= current {
            return Ok(());
        }
        try_reserve(&mut self.counts, "degree histogram", required - current)?;
        let len = usize::try_from(required).map_err(|_| GraphStatError::ResourceExhaustion {
            resource: "degree histogram",
            requested: required,
        })?;
        self.counts.resize(len, 0);
        Ok(())
    }

    /// Returns the raw counters.
    #[must_use]
    #[rustfmt::skip]
    pub fn counts(&self) -> &[u64] { &self.counts }

    /// Returns the number of tracked degree values.
    #[must_use]
    #[rustfmt::skip]
    pub const fn len(&self) -> usize { self.counts.len() }

    /// Returns whether no degree value is tracked.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_empty(&self) -> bool { self.counts.is_empty() }

    /// Returns the sum of all counters.
    #[must_use]
    pub fn total_mass(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Folds the counters into bins of `bin_width` consecutive degrees and
    /// normalises each bin by `trials × vertex_count`.
    ///
    /// The final bin is partial when the table length is not a multiple of
    /// the width. Zero `trials` or `vertex_count` yields zeroed bins.
    ///
    /// # Examples
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use graphstat_core::DegreeHistogram;
    ///
    /// let mut histogram = DegreeHistogram::with_len(5)?;
    /// histogram.record(&[0, 1, 1, 4])?;
    /// let width = NonZeroUsize::new(2).expect("non-zero");
    /// let bins = histogram.bins(width, 1, 4);
    /// assert_eq!(bins.values(), &[0.75, 0.0, 0.25]);
    /// # Ok::<(), graphstat_core::GraphStatError>(())
    /// ```
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "bin values are normalised fractions"
    )]
    pub fn bins(&self, bin_width: NonZeroUsize, trials: u64, vertex_count: u64) -> HistogramBins {
        let scale = trials as f64 * vertex_count as f64;
        let values = self
            .counts
            .chunks(bin_width.get())
            .map(|chunk| {
                let sum: u64 = chunk.iter().sum();
                if scale > 0.0 { sum as f64 / scale } else { 0.0 }
            })
            .collect();
        HistogramBins { bin_width, values }
    }
}

/// Normalised average fraction of vertices per degree bin, in increasing
/// degree order.
#[derive(Clone, Debug, PartialEq)]
pub struct HistogramBins {
    bin_width: NonZeroUsize,
    values: Vec<f64>,
}

impl HistogramBins {
    /// Returns the number of degree values per bin.
    #[must_use]
    #[rustfmt::skip]
    pub const fn bin_width(&self) -> NonZeroUsize { self.bin_width }

    /// Returns the bin values.
    #[must_use]
    #[rustfmt::skip]
    pub fn values(&self) -> &[f64] { &self.values }

    /// Writes one value per line.
    ///
    /// # Errors
    /// Propagates I/O errors from `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for value in &self.values {
            writeln!(writer, "{value}")?;
        }
        writer.flush()
    }

    /// Truncates or creates `path` and writes the bins to it.
    ///
    /// # Errors
    /// Propagates I/O errors from creating or writing the file.
    pub fn export(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }
}
