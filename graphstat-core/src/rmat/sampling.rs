//! Pure quadrant-sampling primitives for the recursive matrix walk.
//!
//! Nothing here owns mutable state beyond the explicit values passed in, so
//! each edge can be sampled independently on any worker.

use crate::{
    edge::{Edge, VertexId},
    error::{GraphStatError, Result},
    rng::RandomStream,
};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// One of the four sub-quadrants of the current adjacency-matrix cell.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Quadrant {
    /// Top-left quadrant (weight `A`): row bit 0, column bit 0.
    A,
    /// Top-right quadrant (weight `B`): row bit 0, column bit 1.
    B,
    /// Bottom-left quadrant (weight `C`): row bit 1, column bit 0.
    C,
    /// Bottom-right quadrant (weight `D`): row bit 1, column bit 1.
    D,
}

impl Quadrant {
    /// Returns the bit contributed to the row (source) vertex.
    #[must_use]
    pub const fn row_bit(self) -> u64 {
        match self {
            Self::A | Self::B => 0,
            Self::C | Self::D => 1,
        }
    }

    /// Returns the bit contributed to the column (target) vertex.
    #[must_use]
    pub const fn col_bit(self) -> u64 {
        match self {
            Self::A | Self::C => 0,
            Self::B | Self::D => 1,
        }
    }
}

/// Probabilities of descending into each quadrant.
///
/// # Examples
/// ```
/// use graphstat_core::{Quadrant, QuadrantWeights};
///
/// let weights = QuadrantWeights::default();
/// assert_eq!(weights, QuadrantWeights::GRAPH500);
/// assert_eq!(weights.select(0.0), Quadrant::A);
/// assert_eq!(weights.select(0.99), Quadrant::D);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadrantWeights {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl Default for QuadrantWeights {
    fn default() -> Self {
        Self::GRAPH500
    }
}

impl QuadrantWeights {
    /// The canonical Graph500 initiator `(0.57, 0.19, 0.19, 0.05)`.
    pub const GRAPH500: Self = Self {
        a: 0.57,
        b: 0.19,
        c: 0.19,
        d: 0.05,
    };

    /// Validates and constructs a weight set.
    ///
    /// # Errors
    /// Returns [`GraphStatError::InvalidParameter`] when any weight is
    /// negative or non-finite, or when the weights do not sum to one.
    #[expect(
        clippy::float_arithmetic,
        reason = "weight validation sums floating-point probabilities"
    )]
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        for (parameter, value) in [("a", a), ("b", b), ("c", c), ("d", d)] {
            if !value.is_finite() || value < 0.0 {
                return Err(GraphStatError::invalid(
                    parameter,
                    format!("quadrant weight must be finite and non-negative (got {value})"),
                ));
            }
        }
        let sum = a + b + c + d;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(GraphStatError::invalid(
                "weights",
                format!("quadrant weights must sum to 1 (got {sum})"),
            ));
        }
        Ok(Self { a, b, c, d })
    }

    /// Constructs weights from `A`, `B` and `C`, deriving `D = 1 − A − B − C`.
    ///
    /// # Errors
    /// Returns [`GraphStatError::InvalidParameter`] under the same
    /// conditions as [`QuadrantWeights::new`].
    #[expect(
        clippy::float_arithmetic,
        reason = "the fourth weight is the complement of the other three"
    )]
    pub fn from_abc(a: f64, b: f64, c: f64) -> Result<Self> {
        let residue = 1.0 - a - b - c;
        // Clamp rounding residue such as -1e-17 back to zero.
        let d = if residue < 0.0 && residue > -WEIGHT_SUM_TOLERANCE {
            0.0
        } else {
            residue
        };
        Self::new(a, b, c, d)
    }

    /// Returns the weights in `[A, B, C, D]` order.
    #[must_use]
    pub const fn as_array(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Scales each weight by the matching factor and renormalises the result
    /// to sum to one.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "noise is applied multiplicatively and renormalised"
    )]
    pub fn perturbed(&self, factors: [f64; 4]) -> Self {
        let [fa, fb, fc, fd] = factors;
        let a = self.a * fa;
        let b = self.b * fb;
        let c = self.c * fc;
        let d = self.d * fd;
        let sum = a + b + c + d;
        if sum <= 0.0 || !sum.is_finite() {
            return *self;
        }
        Self {
            a: a / sum,
            b: b / sum,
            c: c / sum,
            d: d / sum,
        }
    }

    /// Maps a uniform draw in `[0, 1)` to a quadrant by cumulative weight.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "quadrant selection compares against cumulative probabilities"
    )]
    pub fn select(&self, draw: f64) -> Quadrant {
        let ab = self.a + self.b;
        if draw < self.a {
            Quadrant::A
        } else if draw < ab {
            Quadrant::B
        } else if draw < ab + self.c {
            Quadrant::C
        } else {
            Quadrant::D
        }
    }
}

/// Row and column prefix accumulated while descending the matrix.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct CellCursor {
    row: VertexId,
    col: VertexId,
}

impl CellCursor {
    /// Appends the bits of `quadrant` below the current prefix.
    #[must_use]
    pub(crate) const fn descend(self, quadrant: Quadrant) -> Self {
        Self {
            row: (self.row << 1) | quadrant.row_bit(),
            col: (self.col << 1) | quadrant.col_bit(),
        }
    }

    pub(crate) const fn into_edge(self) -> Edge {
        Edge::new(self.row, self.col)
    }
}

/// Draws the four multiplicative noise factors in `[1 − noise, 1 + noise]`.
#[expect(
    clippy::float_arithmetic,
    reason = "noise factors are affine transforms of uniform draws"
)]
pub(crate) fn noise_factors(noise: f64, stream: &mut RandomStream) -> [f64; 4] {
    if noise <= 0.0 {
        return [1.0; 4];
    }
    let mut factors = [1.0; 4];
    for factor in &mut factors {
        *factor = 1.0 - noise + 2.0 * noise * stream.next_uniform();
    }
    factors
}

/// Samples one edge by walking `scale` recursion levels.
pub(crate) fn sample_edge(
    weights: &QuadrantWeights,
    noise: f64,
    scale: u32,
    stream: &mut RandomStream,
) -> Edge {
    (0..scale)
        .fold(CellCursor::default(), |cursor, _| {
            let level_weights = weights.perturbed(noise_factors(noise, stream));
            cursor.descend(level_weights.select(stream.next_uniform()))
        })
        .into_edge()
}
