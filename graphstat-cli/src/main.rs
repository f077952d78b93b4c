//! `graphstat` binary.
//!
//! Runs one aggregation, prints its summary to stdout and exits non-zero on
//! failure. Failures are logged with the stable codes of the core error, so
//! log pipelines can match on them without parsing messages.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use graphstat_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use graphstat_core::AnalyzerErrorCode;
use tracing::error;

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let codes = FailureCodes::of(&err);
            error!(
                error = %format!("{err:#}"),
                code = codes.core,
                analyzer_code = codes.analyzer,
                "graphstat run failed"
            );
            ExitCode::FAILURE
        }
    }
}

fn execute() -> Result<()> {
    let summary = run_cli(Cli::parse()).context("aggregation run did not complete")?;
    let mut stdout = BufWriter::new(io::stdout().lock());
    render_summary(&summary, &mut stdout).context("failed to write the run summary")?;
    stdout.flush().context("failed to flush stdout")
}

/// Stable error codes attached to the failure event.
#[derive(Debug, Default, PartialEq, Eq)]
struct FailureCodes {
    core: Option<&'static str>,
    analyzer: Option<&'static str>,
}

impl FailureCodes {
    fn of(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<CliError>() {
            Some(CliError::Core(core)) => Self {
                core: Some(core.code().as_str()),
                analyzer: core.analyzer_code().map(AnalyzerErrorCode::as_str),
            },
            Some(CliError::Io { .. }) | None => Self::default(),
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "no subscriber exists to carry this diagnostic"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("graphstat: logging unavailable: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use graphstat_core::{AnalyzerError, GraphStatError};
    use rstest::rstest;

    #[rstest]
    #[case::analyzer(
        CliError::Core(GraphStatError::Analyzer { trial: 2, error: AnalyzerError::EmptyGraph }),
        FailureCodes { core: Some("GRAPHSTAT_ANALYZER_FAILURE"), analyzer: Some("ANALYZER_EMPTY_GRAPH") },
    )]
    #[case::no_trials(
        CliError::Core(GraphStatError::NoCompletedTrials { attempted: 3 }),
        FailureCodes { core: Some("GRAPHSTAT_NO_COMPLETED_TRIALS"), analyzer: None },
    )]
    #[case::io(
        CliError::Io {
            path: PathBuf::from("degrees.txt"),
            source: io::Error::other("disk full"),
        },
        FailureCodes::default(),
    )]
    fn failure_codes_survive_context(#[case] error: CliError, #[case] expected: FailureCodes) {
        let err = anyhow::Error::new(error).context("aggregation run did not complete");
        assert_eq!(FailureCodes::of(&err), expected);
    }
}
