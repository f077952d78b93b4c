//! Command implementations and argument parsing for the graphstat CLI.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use graphstat_core::{
    BfsAnalyzer, DEFAULT_NOISE, GeneratorKind, GraphStatError, QuadrantWeights, RmatParams,
    RunConfigBuilder, RunReport, TrialAggregator,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_SCALE: u32 = 12;
const DEFAULT_EDGE_FACTOR: u64 = 16;
const DEFAULT_TRIALS: u64 = 10;
const DEFAULT_BIN_WIDTH: usize = 100;
const DEFAULT_OUTPUT: &str = "degree_histogram.txt";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "graphstat",
    about = "Generate random graphs and aggregate path and degree statistics."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run repeated generate-and-analyse trials and export the histogram.
    Run(RunCommand),
}

/// Random graph models selectable on the command line.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum GeneratorArg {
    /// Recursive-matrix (Kronecker) sampling.
    Rmat,
    /// Barabási–Albert preferential attachment.
    BarabasiAlbert,
}

impl GeneratorArg {
    const fn label(self) -> &'static str {
        match self {
            Self::Rmat => "rmat",
            Self::BarabasiAlbert => "barabasi-albert",
        }
    }
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Graph model to sample.
    #[arg(value_enum)]
    pub generator: GeneratorArg,

    /// Vertex-count exponent; graphs have `2^scale` vertices.
    #[arg(long, env = "GRAPHSTAT_SCALE", default_value_t = DEFAULT_SCALE)]
    pub scale: u32,

    /// Edges per vertex (R-MAT) or attachments per new vertex
    /// (Barabási–Albert).
    #[arg(long, env = "GRAPHSTAT_EDGE_FACTOR", default_value_t = DEFAULT_EDGE_FACTOR)]
    pub edge_factor: u64,

    /// Number of independent trials.
    #[arg(long, env = "GRAPHSTAT_TRIALS", default_value_t = DEFAULT_TRIALS)]
    pub trials: u64,

    /// Generate and analyse directed graphs.
    #[arg(long, env = "GRAPHSTAT_DIRECTED")]
    pub directed: bool,

    /// Run seed; drawn from OS entropy and logged when omitted.
    #[arg(long, env = "GRAPHSTAT_SEED")]
    pub seed: Option<u64>,

    /// Count self-loops (two per loop) in vertex degree.
    #[arg(
        long,
        env = "GRAPHSTAT_COUNT_SELF_LOOPS",
        default_value_t = true,
        action = clap::ArgAction::Set,
    )]
    pub count_self_loops: bool,

    /// Degree values per histogram bin.
    #[arg(long, env = "GRAPHSTAT_BIN_WIDTH", default_value_t = DEFAULT_BIN_WIDTH)]
    pub bin_width: usize,

    /// Histogram output file, truncated on each run.
    #[arg(long, short, env = "GRAPHSTAT_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// R-MAT quadrant weights.
    #[command(flatten)]
    pub rmat: RmatArgs,
}

/// R-MAT sampler options; ignored by other generators.
#[derive(Debug, Args, Clone, Copy, PartialEq)]
pub struct RmatArgs {
    /// Top-left quadrant weight.
    #[arg(long = "a", env = "GRAPHSTAT_RMAT_A", default_value_t = 0.57)]
    pub a: f64,

    /// Top-right quadrant weight.
    #[arg(long = "b", env = "GRAPHSTAT_RMAT_B", default_value_t = 0.19)]
    pub b: f64,

    /// Bottom-left quadrant weight.
    #[arg(long = "c", env = "GRAPHSTAT_RMAT_C", default_value_t = 0.19)]
    pub c: f64,

    /// Bottom-right quadrant weight; defaults to `1 − a − b − c`.
    #[arg(long = "d", env = "GRAPHSTAT_RMAT_D")]
    pub d: Option<f64>,

    /// Per-level multiplicative noise amplitude in `[0, 1)`.
    #[arg(long, env = "GRAPHSTAT_RMAT_NOISE", default_value_t = DEFAULT_NOISE)]
    pub noise: f64,
}

impl RmatArgs {
    fn params(self) -> Result<RmatParams, GraphStatError> {
        let weights = match self.d {
            Some(d) => QuadrantWeights::new(self.a, self.b, self.c, d)?,
            None => QuadrantWeights::from_abc(self.a, self.b, self.c)?,
        };
        RmatParams::new(weights, self.noise)
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing the histogram file failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Generation or aggregation failed.
    #[error(transparent)]
    Core(#[from] GraphStatError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Generator label as accepted on the command line.
    pub generator: &'static str,
    /// File the normalised histogram was written to.
    pub output: PathBuf,
    /// Number of histogram bins written.
    pub bins: usize,
    /// Aggregated run statistics.
    pub report: RunReport,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when configuration, aggregation, or export fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clap::Parser;
/// # use graphstat_cli::cli::{Cli, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let output = dir.path().join("degrees.txt");
/// let cli = Cli::try_parse_from([
///     "graphstat", "run", "rmat",
///     "--scale", "5", "--edge-factor", "4", "--trials", "2", "--seed", "7",
///     "--output", output.to_str().ok_or("utf-8 path")?,
/// ])?;
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.report.trials_completed(), 2);
/// assert_eq!(std::fs::read_to_string(&output)?.lines().count(), summary.bins);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(
        generator = command.generator.label(),
        seed = field::Empty,
        output = %command.output.display(),
    ),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let seed = resolve_seed(command.seed);
    Span::current().record("seed", seed);

    let generator = match command.generator {
        GeneratorArg::Rmat => GeneratorKind::Rmat(command.rmat.params()?),
        GeneratorArg::BarabasiAlbert => GeneratorKind::BarabasiAlbert,
    };
    let config = RunConfigBuilder::new()
        .with_scale(command.scale)
        .with_edge_factor(command.edge_factor)
        .with_trial_count(command.trials)
        .with_directed(command.directed)
        .with_seed(seed)
        .with_generator(generator)
        .with_count_self_loops(command.count_self_loops)
        .with_bin_width(command.bin_width)
        .build()?;

    let report = TrialAggregator::new(config, BfsAnalyzer).run()?;
    let bins = report.bins();
    bins.export(&command.output).map_err(|source| CliError::Io {
        path: command.output.clone(),
        source,
    })?;

    info!(
        output = %command.output.display(),
        bins = bins.values().len(),
        "histogram written"
    );
    Ok(ExecutionSummary {
        generator: command.generator.label(),
        output: command.output,
        bins: bins.values().len(),
        report,
    })
}

/// Returns `seed`, or a fresh entropy-derived seed that is logged so the run
/// can be repeated.
pub(super) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let drawn = rand::random::<u64>();
        info!(seed = drawn, "no seed supplied; drew one from entropy");
        drawn
    })
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let report = &summary.report;
    writeln!(writer, "generator: {}", summary.generator)?;
    writeln!(writer, "seed: {}", report.seed())?;
    writeln!(writer, "vertices: {}", report.vertex_count())?;
    writeln!(
        writer,
        "trials: {} completed, {} skipped, {} requested",
        report.trials_completed(),
        report.trials_skipped(),
        report.trials_requested()
    )?;
    writeln!(
        writer,
        "generation time: {:.3} s",
        report.generation_time().as_secs_f64()
    )?;
    writeln!(
        writer,
        "analysis time: {:.3} s",
        report.analysis_time().as_secs_f64()
    )?;
    writeln!(writer, "average diameter: {:.4}", report.average_diameter())?;
    writeln!(writer, "average distance: {:.4}", report.average_distance())?;
    writeln!(
        writer,
        "histogram: {} ({} bins)",
        summary.output.display(),
        summary.bins
    )?;
    Ok(())
}
