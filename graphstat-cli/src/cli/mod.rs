//! Command-line interface orchestration for graphstat.
//!
//! The `run` command samples R-MAT or Barabási–Albert graphs over repeated
//! seeded trials, writes the normalised degree histogram to a file, and
//! returns a summary for rendering on stdout.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, GeneratorArg, RmatArgs, RunCommand, render_summary,
    run_cli,
};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
