//! Small helpers shared across CLI tests.
//!
//! The CLI unit tests write histograms into temporary directories and assert
//! error handling. These helpers keep the test cases concise.

use std::path::Path;

use clap::Parser;
use tempfile::TempDir;

use super::commands::run_command;
use super::{Cli, CliError, Command, RunCommand, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

/// Parses `graphstat run <args…> --output <output>` into a [`RunCommand`].
pub(super) fn parse_run(args: &[&str], output: &Path) -> RunCommand {
    let output_arg = output.to_str().expect("temp paths are UTF-8");
    let argv = ["graphstat", "run"]
        .into_iter()
        .chain(args.iter().copied())
        .chain(["--output", output_arg]);
    match Cli::try_parse_from(argv) {
        Ok(Cli {
            command: Command::Run(run),
        }) => run,
        Err(err) => panic!("arguments must parse: {err}"),
    }
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

pub(super) fn run_command_expecting_error(cmd: RunCommand, panic_msg: &str) -> CliError {
    match run_command(cmd) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
