//! Integration tests for run progress events.

use aq_app::{
    RunConfiguration, RunProgressEvent, RunRequest, RunResult, RunStage, Stage, run_with_progress,
};
use aq_results::BinFile;
use aq_results::writer::{encode, sample_result_set};
use aq_toolkit::fakes::{CallKind, ScriptedToolkit};

fn collect_events(
    toolkit: &ScriptedToolkit,
    config: &RunConfiguration,
) -> (RunResult, Vec<RunProgressEvent>) {
    let reader = BinFile::new();
    let input = "[END]\n".to_string();
    let request = RunRequest {
        toolkit,
        reader: &reader,
        input: &input,
        config,
    };
    let mut events = Vec::new();
    let result = run_with_progress(&request, Some(&mut |event| events.push(event)))
        .expect("run with progress should succeed");
    (result, events)
}

#[test]
fn events_bracket_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfiguration::with_prefix(dir.path().join("temp").to_string_lossy());
    let toolkit = ScriptedToolkit::new().with_output_artifact(encode(&sample_result_set(1, 2)));

    let (result, events) = collect_events(&toolkit, &config);

    assert_eq!(events.first().map(|e| e.stage), Some(RunStage::StagingInput));
    assert_eq!(events.last().map(|e| e.stage), Some(RunStage::Completed));
    assert!(events.iter().any(|e| e.stage == RunStage::CreatingProject));
    assert!(events.iter().any(|e| e.stage == RunStage::Materializing));

    let stage_events: Vec<Stage> = events
        .iter()
        .filter_map(|e| e.outcome.as_ref().map(|o| o.stage))
        .collect();
    assert_eq!(stage_events, result.stages());

    let elapsed: Vec<f64> = events.iter().map(|e| e.elapsed_wall_s).collect();
    assert!(elapsed.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn skipped_stages_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfiguration {
        fail_fast: true,
        ..RunConfiguration::with_prefix(dir.path().join("temp").to_string_lossy())
    };
    let toolkit = ScriptedToolkit::new().with_code(CallKind::Open, 302);

    let (_result, events) = collect_events(&toolkit, &config);

    let skipped: Vec<Stage> = events
        .iter()
        .filter_map(|e| e.outcome.as_ref())
        .filter(|o| o.skipped)
        .map(|o| o.stage)
        .collect();
    assert_eq!(
        skipped,
        vec![Stage::SolveHydraulics, Stage::SolveQuality, Stage::WriteReport]
    );
}
