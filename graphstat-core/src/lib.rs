//! Graphstat core library.
//!
//! Generates R-MAT and Barabási–Albert random graphs and aggregates path
//! and degree statistics over repeated seeded trials.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod aggregator;
mod analyzer;
mod barabasi_albert;
mod config;
mod edge;
mod error;
mod graph;
mod histogram;
mod rmat;
mod rng;

pub use crate::{
    aggregator::{RunReport, TrialAggregator},
    analyzer::{BfsAnalyzer, GraphAnalyzer, PathStatistics},
    barabasi_albert::{BarabasiAlbertGenerator, BarabasiAlbertParams},
    config::{GeneratorKind, RunConfig, RunConfigBuilder},
    edge::{Edge, EdgeList, VertexId},
    error::{AnalyzerError, AnalyzerErrorCode, GraphStatError, GraphStatErrorCode, Result},
    graph::{Graph, LoopDegree},
    histogram::{DEFAULT_BIN_WIDTH, DegreeHistogram, HistogramBins},
    rmat::{
        DEFAULT_NOISE, MAX_SCALE, Quadrant, QuadrantWeights, RmatGenerator, RmatParams,
        VertexPermutation, vertex_count_for_scale,
    },
    rng::{RandomStream, TrialSeeds, splitmix64},
};
