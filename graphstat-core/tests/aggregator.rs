//! Tests for the multi-trial aggregation pipeline.

mod common;

use std::sync::atomic::AtomicBool;

use common::{CancellingAnalyzer, FlakyAnalyzer};
use graphstat_core::{
    BfsAnalyzer, GeneratorKind, GraphStatError, RmatGenerator, RunConfig, RunConfigBuilder,
    RunReport, TrialAggregator, TrialSeeds,
};
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use graphstat_test_support::tracing::RecordingLayer;

#[fixture]
fn small_config() -> RunConfig {
    RunConfigBuilder::new()
        .with_scale(7)
        .with_edge_factor(8)
        .with_trial_count(3)
        .with_seed(99)
        .build()
        .expect("configuration must be valid")
}

fn run(config: RunConfig) -> RunReport {
    TrialAggregator::new(config, BfsAnalyzer)
        .run()
        .expect("run must succeed")
}

fn assert_scenario(scale: u32, trials: u64) {
    let config = RunConfigBuilder::new()
        .with_scale(scale)
        .with_edge_factor(16)
        .with_trial_count(trials)
        .with_directed(true)
        .with_seed(777)
        .build()
        .expect("configuration must be valid");
    let report = run(config);

    assert_eq!(report.trials_completed(), trials);
    assert!(report.average_diameter().is_finite() && report.average_diameter() > 0.0);
    assert!(report.average_distance().is_finite() && report.average_distance() > 0.0);

    let dir = tempfile::tempdir().expect("temp dir must be created");
    let path = dir.path().join("degrees.txt");
    report.bins().export(&path).expect("export must succeed");
    let contents = std::fs::read_to_string(&path).expect("output must be readable");
    let lines: Vec<f64> = contents
        .lines()
        .map(|line| line.parse().expect("each line must be a real number"))
        .collect();

    let vertex_count = 1_usize << scale;
    assert_eq!(lines.len(), report.histogram().len().div_ceil(100));
    assert!(lines.len() >= vertex_count.div_ceil(100));
    assert!(lines.iter().all(|value| value.is_finite() && *value >= 0.0));
    assert!((lines.iter().sum::<f64>() - 1.0).abs() < 1e-9);
}

#[test]
fn directed_scenario_at_scale_eight() {
    assert_scenario(8, 3);
}

#[test]
#[ignore = "runs ten all-pairs searches over 4096 vertices"]
fn directed_scenario_at_scale_twelve() {
    assert_scenario(12, 10);
}

#[test]
fn zero_trials_are_rejected_before_generation() {
    let err = RunConfigBuilder::new()
        .with_trial_count(0)
        .build()
        .expect_err("zero trials must be rejected");
    assert!(matches!(
        err,
        GraphStatError::InvalidParameter {
            parameter: "trial_count",
            ..
        }
    ));
}

#[rstest]
fn binned_values_conserve_histogram_mass(small_config: RunConfig) {
    let report = run(small_config);
    let scale = (report.vertex_count() * report.trials_completed()) as f64;
    let recovered: f64 = report.bins().values().iter().map(|value| value * scale).sum();
    let mass = report.histogram().total_mass();
    assert_eq!(mass, report.vertex_count() * report.trials_completed());
    assert!((recovered - mass as f64).abs() < 1e-6);
}

#[rstest]
fn adding_trials_only_adds_counts(small_config: RunConfig) {
    let mut previous: Option<RunReport> = None;
    for trials in 1..=3 {
        let config = RunConfigBuilder::new()
            .with_scale(small_config.scale())
            .with_edge_factor(small_config.edge_factor())
            .with_trial_count(trials)
            .with_seed(small_config.seed())
            .build()
            .expect("configuration must be valid");
        let report = run(config);
        if let Some(earlier) = previous {
            assert!(report.histogram().total_mass() > earlier.histogram().total_mass());
            let counts = report.histogram().counts();
            for (degree, &count) in earlier.histogram().counts().iter().enumerate() {
                assert!(counts[degree] >= count, "degree {degree} lost mass");
            }
        }
        previous = Some(report);
    }
}

#[rstest]
fn runs_are_reproducible(small_config: RunConfig) {
    let first = run(small_config);
    let second = run(small_config);
    assert_eq!(first.histogram(), second.histogram());
    assert_eq!(
        first.average_diameter().to_bits(),
        second.average_diameter().to_bits()
    );
    assert_eq!(
        first.average_distance().to_bits(),
        second.average_distance().to_bits()
    );
}

#[rstest]
fn self_loops_shift_degree_mass_by_two_per_loop(small_config: RunConfig) {
    let degree_sum = |count_self_loops: bool| {
        let config = RunConfigBuilder::new()
            .with_scale(small_config.scale())
            .with_edge_factor(small_config.edge_factor())
            .with_trial_count(small_config.trial_count().get())
            .with_seed(small_config.seed())
            .with_count_self_loops(count_self_loops)
            .build()
            .expect("configuration must be valid");
        let report = run(config);
        report
            .histogram()
            .counts()
            .iter()
            .enumerate()
            .map(|(degree, &count)| degree as u64 * count)
            .sum::<u64>()
    };

    let generator = RmatGenerator::default();
    let loops: u64 = (0..small_config.trial_count().get())
        .map(|trial| {
            let seeds = TrialSeeds::derive(small_config.seed(), trial);
            generator
                .generate(
                    small_config.scale(),
                    small_config.edge_count(),
                    seeds.seed1,
                    seeds.seed2,
                    false,
                )
                .expect("generation must succeed")
                .self_loop_count() as u64
        })
        .sum();

    assert!(loops > 0, "scale-7 R-MAT graphs contain self-loops");
    assert_eq!(degree_sum(true) - degree_sum(false), 2 * loops);
    assert_eq!(
        degree_sum(true),
        2 * small_config.edge_count() * small_config.trial_count().get()
    );
}

#[rstest]
fn analyzer_failures_skip_the_trial(small_config: RunConfig) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let report = tracing::subscriber::with_default(subscriber, || {
        TrialAggregator::new(small_config, FlakyAnalyzer::failing_on(&[1])).run()
    })
    .expect("run must succeed");

    assert_eq!(report.trials_completed(), 2);
    assert_eq!(report.trials_skipped(), 1);
    assert_eq!(report.histogram().total_mass(), 2 * report.vertex_count());
    let bins_total: f64 = report.bins().values().iter().sum();
    assert!((bins_total - 1.0).abs() < 1e-9);

    let skipped = layer.events_with_message("analysis failed; trial skipped");
    assert_eq!(skipped.len(), 1);
    let event = &skipped[0];
    assert_eq!(event.level, Level::WARN);
    assert_eq!(event.fields.get("trial"), Some(&"1".to_owned()));
    assert_eq!(
        event.fields.get("code"),
        Some(&"ANALYZER_EMPTY_GRAPH".to_owned())
    );

    let run_span = layer
        .span("core.aggregate")
        .expect("core.aggregate span must exist");
    assert_eq!(run_span.fields.get("seed"), Some(&"99".to_owned()));
    assert_eq!(run_span.fields.get("trials"), Some(&"3".to_owned()));
}

#[rstest]
fn all_failures_report_no_completed_trials(small_config: RunConfig) {
    let err = TrialAggregator::new(small_config, FlakyAnalyzer::failing_on(&[0, 1, 2]))
        .run()
        .expect_err("run must fail");
    assert_eq!(err, GraphStatError::NoCompletedTrials { attempted: 3 });
}

#[rstest]
fn cancellation_stops_at_a_trial_boundary(small_config: RunConfig) {
    let cancel = AtomicBool::new(false);
    let analyzer = CancellingAnalyzer::new(2, &cancel);
    let report = TrialAggregator::new(small_config, analyzer)
        .run_until(&cancel)
        .expect("completed trials must be reported");

    assert!(report.was_cancelled());
    assert_eq!(report.trials_attempted(), 2);
    assert_eq!(report.trials_completed(), 2);
    assert_eq!(report.histogram().total_mass(), 2 * report.vertex_count());
}

#[rstest]
fn cancellation_before_the_first_trial_completes_nothing(small_config: RunConfig) {
    let cancel = AtomicBool::new(true);
    let err = TrialAggregator::new(small_config, BfsAnalyzer)
        .run_until(&cancel)
        .expect_err("nothing completes");
    assert_eq!(err, GraphStatError::NoCompletedTrials { attempted: 0 });
}

#[rstest]
#[case(false)]
#[case(true)]
fn preferential_attachment_runs_end_to_end(#[case] directed: bool) {
    let config = RunConfigBuilder::new()
        .with_generator(GeneratorKind::BarabasiAlbert)
        .with_scale(7)
        .with_edge_factor(3)
        .with_trial_count(2)
        .with_directed(directed)
        .with_seed(5)
        .build()
        .expect("configuration must be valid");
    let report = run(config);

    assert_eq!(report.trials_completed(), 2);
    assert!(report.average_distance() > 1.0);
    // Every vertex ends with at least `m` incident edges.
    assert!(report.histogram().counts()[..3].iter().all(|&count| count == 0));
}
