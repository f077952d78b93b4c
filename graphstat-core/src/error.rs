//! Error types for the graphstat core library.
//!
//! Defines the run-level [`GraphStatError`], the analyzer-level
//! [`AnalyzerError`], their stable machine-readable codes, and a convenient
//! result alias.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by a [`crate::GraphAnalyzer`] or while building a
/// [`crate::Graph`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum AnalyzerError {
    /// The graph has no vertices.
    #[error("graph contains no vertices")]
    EmptyGraph,
    /// No vertex can reach any other vertex, so path statistics are undefined.
    #[error("graph with {vertex_count} vertices has no reachable vertex pairs")]
    NoReachablePairs {
        /// Number of vertices in the analysed graph.
        vertex_count: u64,
    },
    /// An edge referenced a vertex outside the graph's vertex set.
    #[error("edge references vertex {vertex}, but vertex_count is {vertex_count}")]
    VertexOutOfRange {
        /// The offending vertex identifier.
        vertex: u64,
        /// The number of vertices in the graph.
        vertex_count: u64,
    },
}

define_error_codes! {
    /// Stable codes describing [`AnalyzerError`] variants.
    enum AnalyzerErrorCode for AnalyzerError {
        /// The graph has no vertices.
        EmptyGraph => EmptyGraph => "ANALYZER_EMPTY_GRAPH",
        /// No reachable vertex pairs exist.
        NoReachablePairs => NoReachablePairs { .. } => "ANALYZER_NO_REACHABLE_PAIRS",
        /// An edge referenced a vertex outside the graph.
        VertexOutOfRange => VertexOutOfRange { .. } => "ANALYZER_VERTEX_OUT_OF_RANGE",
    }
}

/// Error type produced when generating graphs or running trials.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphStatError {
    /// A caller-supplied parameter violated its precondition.
    #[error("invalid parameter `{parameter}`: {detail}")]
    InvalidParameter {
        /// Name of the rejected parameter.
        parameter: &'static str,
        /// Human-readable description of the violated constraint.
        detail: String,
    },
    /// An allocation at the requested scale could not be satisfied.
    #[error("cannot allocate {resource} with {requested} entries")]
    ResourceExhaustion {
        /// Name of the structure that failed to allocate.
        resource: &'static str,
        /// Number of entries requested.
        requested: u64,
    },
    /// Every attempted trial was skipped or cancelled, so no averages exist.
    #[error("no trial completed out of {attempted} attempted")]
    NoCompletedTrials {
        /// Number of trials that were started.
        attempted: u64,
    },
    /// A generated edge list could not be turned into a graph.
    #[error("trial {trial} failed: {error}")]
    Analyzer {
        /// Zero-based index of the failing trial.
        trial: u64,
        #[source]
        /// Underlying analyzer error.
        error: AnalyzerError,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphStatError`] variants.
    enum GraphStatErrorCode for GraphStatError {
        /// A caller-supplied parameter violated its precondition.
        InvalidParameter => InvalidParameter { .. } => "GRAPHSTAT_INVALID_PARAMETER",
        /// An allocation at the requested scale could not be satisfied.
        ResourceExhaustion => ResourceExhaustion { .. } => "GRAPHSTAT_RESOURCE_EXHAUSTION",
        /// No trial completed.
        NoCompletedTrials => NoCompletedTrials { .. } => "GRAPHSTAT_NO_COMPLETED_TRIALS",
        /// A generated edge list could not be turned into a graph.
        AnalyzerFailure => Analyzer { .. } => "GRAPHSTAT_ANALYZER_FAILURE",
    }
}

impl GraphStatError {
    /// Retrieve the inner [`AnalyzerErrorCode`] when the error originated in
    /// graph analysis.
    #[must_use]
    pub const fn analyzer_code(&self) -> Option<AnalyzerErrorCode> {
        match self {
            Self::Analyzer { error, .. } => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) fn invalid(parameter: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            detail: detail.into(),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GraphStatError>;

/// Reserves exactly `requested` slots in `buffer`, reporting failures as
/// [`GraphStatError::ResourceExhaustion`].
pub(crate) fn try_reserve<T>(
    buffer: &mut Vec<T>,
    resource: &'static str,
    requested: u64,
) -> Result<()> {
    let exhausted = GraphStatError::ResourceExhaustion {
        resource,
        requested,
    };
    let Ok(additional) = usize::try_from(requested) else {
        return Err(exhausted);
    };
    buffer.try_reserve_exact(additional).map_err(|_| exhausted)
}
