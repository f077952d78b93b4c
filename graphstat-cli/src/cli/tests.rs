//! Unit tests for CLI parsing, execution, and summary rendering.

use super::commands::{resolve_seed, run_command};
use super::test_helpers::{
    parse_run, run_cli_expecting_error, run_command_expecting_error, temp_dir,
};
use super::{Cli, CliError, Command, GeneratorArg, render_summary};

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use graphstat_core::GraphStatError;
use rstest::rstest;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use graphstat_test_support::tracing::RecordingLayer;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const SMALL_RMAT: &[&str] = &[
    "rmat",
    "--scale",
    "6",
    "--edge-factor",
    "8",
    "--trials",
    "2",
    "--seed",
    "11",
];

fn read_values(path: &Path) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    fs::read_to_string(path)?
        .lines()
        .map(|line| line.parse::<f64>().map_err(Into::into))
        .collect()
}

#[rstest]
fn run_defaults_match_reference_scenario() {
    let cli = Cli::try_parse_from(["graphstat", "run", "rmat"]).expect("defaults must parse");
    let Command::Run(run) = cli.command;
    assert_eq!(run.generator, GeneratorArg::Rmat);
    assert_eq!(run.scale, 12);
    assert_eq!(run.edge_factor, 16);
    assert_eq!(run.trials, 10);
    assert!(!run.directed);
    assert!(run.count_self_loops);
    assert_eq!(run.bin_width, 100);
    assert_eq!(run.output, PathBuf::from("degree_histogram.txt"));
    assert_eq!(run.seed, None);
    assert_eq!(run.rmat.d, None);
}

#[rstest]
#[case::unknown_generator(&["graphstat", "run", "watts-strogatz"])]
#[case::missing_generator(&["graphstat", "run"])]
#[case::negative_scale(&["graphstat", "run", "rmat", "--scale", "-1"])]
#[case::bad_loop_flag(&["graphstat", "run", "rmat", "--count-self-loops", "maybe"])]
fn clap_rejects_malformed_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
#[case(false)]
#[case(true)]
fn count_self_loops_accepts_explicit_values(#[case] value: bool) {
    let dir = temp_dir();
    let flag = value.to_string();
    let run = parse_run(
        &["rmat", "--count-self-loops", flag.as_str()],
        &dir.path().join("out.txt"),
    );
    assert_eq!(run.count_self_loops, value);
}

#[rstest]
fn run_rmat_writes_normalised_histogram() -> TestResult {
    let dir = temp_dir();
    let output = dir.path().join("degrees.txt");
    let summary = run_command(parse_run(SMALL_RMAT, &output))?;

    assert_eq!(summary.generator, "rmat");
    assert_eq!(summary.report.seed(), 11);
    assert_eq!(summary.report.trials_completed(), 2);
    let values = read_values(&output)?;
    assert_eq!(values.len(), summary.bins);
    assert!(!values.is_empty());
    assert!((values.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    Ok(())
}

#[rstest]
fn run_is_reproducible_for_a_pinned_seed() -> TestResult {
    let dir = temp_dir();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");
    run_command(parse_run(SMALL_RMAT, &first))?;
    run_command(parse_run(SMALL_RMAT, &second))?;
    assert_eq!(fs::read_to_string(first)?, fs::read_to_string(second)?);
    Ok(())
}

#[rstest]
fn run_truncates_existing_output() -> TestResult {
    let dir = temp_dir();
    let output = dir.path().join("degrees.txt");
    fs::write(&output, "stale\n".repeat(500))?;
    let summary = run_command(parse_run(SMALL_RMAT, &output))?;
    assert_eq!(read_values(&output)?.len(), summary.bins);
    Ok(())
}

#[rstest]
#[case(false)]
#[case(true)]
fn run_barabasi_albert(#[case] directed: bool) -> TestResult {
    let dir = temp_dir();
    let output = dir.path().join("ba.txt");
    let mut args = vec![
        "barabasi-albert",
        "--scale",
        "6",
        "--edge-factor",
        "2",
        "--trials",
        "2",
        "--seed",
        "3",
        "--bin-width",
        "4",
    ];
    if directed {
        args.push("--directed");
    }
    let summary = run_command(parse_run(&args, &output))?;
    assert_eq!(summary.generator, "barabasi-albert");
    assert_eq!(summary.report.trials_completed(), 2);
    // Every vertex has degree at least 2, so the first bin covers only
    // degrees 2 and 3.
    assert!(read_values(&output)?[0] > 0.0);
    Ok(())
}

#[rstest]
fn run_rejects_zero_trials() {
    let dir = temp_dir();
    let err = run_command_expecting_error(
        parse_run(&["rmat", "--trials", "0"], &dir.path().join("out.txt")),
        "zero trials must fail",
    );
    assert!(matches!(
        err,
        CliError::Core(GraphStatError::InvalidParameter {
            parameter: "trial_count",
            ..
        })
    ));
}

#[rstest]
#[case::weights_do_not_sum(&["rmat", "--d", "0.5"], "weights")]
#[case::negative_weight(&["rmat", "--a=-0.5"], "a")]
#[case::noise_out_of_range(&["rmat", "--noise", "1.5"], "noise")]
#[case::attachments_too_many(
    &["barabasi-albert", "--scale", "2", "--edge-factor", "4"],
    "edges_per_vertex"
)]
#[case::zero_bin_width(&["rmat", "--scale", "4", "--bin-width", "0"], "bin_width")]
fn run_rejects_invalid_parameters(#[case] args: &[&str], #[case] expected: &str) {
    let dir = temp_dir();
    let err = run_command_expecting_error(
        parse_run(args, &dir.path().join("out.txt")),
        "invalid parameters must fail",
    );
    match err {
        CliError::Core(GraphStatError::InvalidParameter { parameter, .. }) => {
            assert_eq!(parameter, expected);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn run_reports_unwritable_output_path() {
    let dir = temp_dir();
    let output = dir.path().join("missing").join("degrees.txt");
    let cli = Cli {
        command: Command::Run(parse_run(SMALL_RMAT, &output)),
    };
    let err = run_cli_expecting_error(cli, "missing directory must fail");
    match err {
        CliError::Io { path, .. } => assert_eq!(path, output),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn run_command_emits_tracing_fields() -> TestResult {
    let dir = temp_dir();
    let output = dir.path().join("degrees.txt");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let command = parse_run(SMALL_RMAT, &output);
    tracing::subscriber::with_default(subscriber, || run_command(command))?;

    let execute = layer
        .span("cli.execute")
        .expect("cli.execute span must exist");
    assert_eq!(execute.fields.get("generator"), Some(&"rmat".to_owned()));
    assert_eq!(execute.fields.get("seed"), Some(&"11".to_owned()));
    assert!(layer.span("core.aggregate").is_some());

    let written = layer.events_with_message("histogram written");
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].level, Level::INFO);
    Ok(())
}

#[rstest]
fn resolve_seed_keeps_pinned_seed() {
    assert_eq!(resolve_seed(Some(777)), 777);
}

#[rstest]
fn resolve_seed_logs_drawn_seed() {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let seed = tracing::subscriber::with_default(subscriber, || resolve_seed(None));

    let events = layer.events_with_message("no seed supplied; drew one from entropy");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].fields.get("seed"), Some(&seed.to_string()));
}

#[rstest]
fn render_summary_reports_statistics() -> TestResult {
    let dir = temp_dir();
    let output = dir.path().join("degrees.txt");
    let summary = run_command(parse_run(SMALL_RMAT, &output))?;

    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    let text = String::from_utf8(buffer)?;
    assert!(text.contains("generator: rmat"));
    assert!(text.contains("seed: 11"));
    assert!(text.contains("vertices: 64"));
    assert!(text.contains("trials: 2 completed, 0 skipped, 2 requested"));
    assert!(text.contains("average diameter: "));
    assert!(text.contains(&format!("({} bins)", summary.bins)));
    Ok(())
}
