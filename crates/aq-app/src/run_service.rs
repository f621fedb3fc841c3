//! Run execution service.

use std::time::Instant;

use aq_core::{Severity, StatusCode};
use aq_results::{
    DecodeError, ResultReader, ResultSet, RunManifest, RunStore, StageRecord, compute_run_id,
};
use aq_toolkit::Toolkit;
use tracing::{debug, error, info, warn};

use crate::config::RunConfiguration;
use crate::demand;
use crate::error::{AppError, AppResult};
use crate::input::InputSource;
use crate::paths::RunPaths;
use crate::pipeline;
use crate::progress::{RunProgressEvent, RunStage};
use crate::session::ProjectSession;
use crate::status::{Stage, StageOutcome, StatusAccumulator};

/// Request to execute a run.
pub struct RunRequest<'a, T, R: ?Sized = dyn ResultReader> {
    pub toolkit: &'a T,
    pub reader: &'a R,
    pub input: &'a dyn InputSource,
    pub config: &'a RunConfiguration,
}

/// Outcome of one run.
#[derive(Debug)]
pub struct RunResult {
    pub paths: RunPaths,
    /// Every stage in issue order, including skipped ones.
    pub outcomes: Vec<StageOutcome>,
    /// Code of the last issued stage.
    pub errcode: StatusCode,
    /// Worst code over all issued stages.
    pub overall: StatusCode,
    pub warning: bool,
    pub error: bool,
    /// False when this run did not write the output file (fatal open, fatal
    /// or skipped quality solve) or when close was fatal.
    pub results_reliable: bool,
    pub results: Result<ResultSet, DecodeError>,
    pub elapsed_s: f64,
}

impl RunResult {
    /// Stages that were actually issued, in order.
    pub fn stages(&self) -> Vec<Stage> {
        self.outcomes
            .iter()
            .filter(|o| !o.skipped)
            .map(|o| o.stage)
            .collect()
    }

    pub fn codes(&self) -> Vec<StatusCode> {
        self.outcomes
            .iter()
            .filter(|o| !o.skipped)
            .map(|o| o.status)
            .collect()
    }

    pub fn skipped(&self) -> Vec<Stage> {
        self.outcomes
            .iter()
            .filter(|o| o.skipped)
            .map(|o| o.stage)
            .collect()
    }

    pub fn result_set(&self) -> Option<&ResultSet> {
        self.results.as_ref().ok()
    }

    /// No fatal stage, output written by this run, and decoded results.
    pub fn is_success(&self) -> bool {
        !self.error && self.results_reliable && self.results.is_ok()
    }

    /// Manifest describing this run for the run store.
    pub fn manifest(
        &self,
        run_id: String,
        timestamp: String,
        toolkit: &str,
        config: &RunConfiguration,
    ) -> RunManifest {
        RunManifest {
            run_id,
            timestamp,
            toolkit: toolkit.to_string(),
            file_prefix: config.file_prefix.clone(),
            demand_mode: config.demand_mode.to_string(),
            used_hydraulics: config.use_hydraulics,
            saved_hydraulics: config.save_hydraulics,
            output_file: self.paths.output.clone(),
            stages: self
                .outcomes
                .iter()
                .map(|o| StageRecord {
                    stage: o.stage.name().to_string(),
                    code: o.status.code(),
                    severity: o.severity().as_str().to_string(),
                    skipped: o.skipped,
                })
                .collect(),
            overall_code: self.overall.code(),
            warning: self.warning,
            error: self.error,
            summary: self.result_set().map(ResultSet::summary),
            decode_error: self.results.as_ref().err().map(|e| e.to_string()),
        }
    }
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    outcome: Option<StageOutcome>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            outcome,
            ..RunProgressEvent::stage(stage, started.elapsed().as_secs_f64(), message)
        });
    }
}

fn log_outcome(outcome: &StageOutcome) {
    let stage = outcome.stage;
    let code = outcome.status.code();
    match outcome.severity() {
        Severity::Ok => debug!(%stage, "{}", stage.done_message()),
        Severity::Warning => warn!(%stage, code, "Stage returned warning code"),
        Severity::Fatal => error!(%stage, code, "Stage returned fatal code"),
    }
}

/// Execute a run.
pub fn run<T, R>(request: &RunRequest<'_, T, R>) -> AppResult<RunResult>
where
    T: Toolkit,
    R: ResultReader + ?Sized,
{
    run_with_progress(request, None)
}

/// Execute a run and stream progress events.
///
/// Stage codes never abort the run: each is recorded and the next stage is
/// issued, unless `fail_fast` is set, in which case the stages after the
/// first fatal code are recorded as skipped. Close is always issued. The
/// output file is read once, after close, whatever the codes were; a file
/// this run did not write is reported as [`DecodeError::Stale`].
pub fn run_with_progress<T, R>(
    request: &RunRequest<'_, T, R>,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResult>
where
    T: Toolkit,
    R: ResultReader + ?Sized,
{
    let started = Instant::now();
    let config = request.config;
    config.validate()?;

    let paths = RunPaths::resolve(config);
    let stages = pipeline::plan(config);
    info!(
        toolkit = request.toolkit.name(),
        prefix = %config.file_prefix,
        mode = %config.demand_mode,
        use_hydraulics = config.use_hydraulics,
        save_hydraulics = config.save_hydraulics,
        "Starting run"
    );

    emit_progress(
        &mut progress_cb,
        RunStage::StagingInput,
        started,
        Some(format!("Writing input from {}", request.input.describe())),
        None,
    );
    request
        .input
        .write_input(&paths.input)
        .map_err(|source| AppError::InputWrite {
            path: paths.input.clone(),
            source,
        })?;

    if config.use_hydraulics && !paths.hydraulics.exists() {
        return Err(AppError::MissingHydraulicsFile {
            path: paths.hydraulics.clone(),
        });
    }

    emit_progress(
        &mut progress_cb,
        RunStage::CreatingProject,
        started,
        Some(format!("Creating {} project", request.toolkit.name())),
        None,
    );
    let project = request.toolkit.create_project()?;
    let mut session = ProjectSession::new(project, paths.clone(), demand::select(config));
    let mut acc = StatusAccumulator::new();

    for stage in stages {
        if config.fail_fast && acc.error() && stage != Stage::Close {
            warn!(%stage, "Skipping stage after fatal status");
            let outcome = acc.record_skipped(stage).clone();
            emit_progress(
                &mut progress_cb,
                RunStage::Running,
                started,
                Some(format!("Skipped {stage}")),
                Some(outcome),
            );
            continue;
        }

        let stage_started = Instant::now();
        let status = session.execute(stage);
        let outcome = acc
            .record(stage, status, stage_started.elapsed().as_secs_f64())
            .clone();
        log_outcome(&outcome);
        emit_progress(
            &mut progress_cb,
            RunStage::Running,
            started,
            Some(stage.done_message().to_string()),
            Some(outcome),
        );
    }
    drop(session);

    // Run files are never deleted, so without a clean open and quality solve
    // the output file on disk belongs to an earlier run.
    let output_written = acc.history().iter().all(|o| match o.stage {
        Stage::Open | Stage::SolveQuality => !o.skipped && !o.status.is_fatal(),
        _ => true,
    });
    let close_fatal = acc
        .history()
        .iter()
        .any(|o| o.stage == Stage::Close && o.status.is_fatal());
    let results_reliable = output_written && !close_fatal;
    if !output_written {
        warn!(output = %paths.output.display(), "Output file was not written by this run");
    } else if close_fatal {
        warn!("Close failed; results may be unreliable");
    }

    emit_progress(
        &mut progress_cb,
        RunStage::Materializing,
        started,
        Some(format!("Reading {}", paths.output.display())),
        None,
    );
    let results = match request.reader.read(&paths.output) {
        Ok(_) if !output_written => Err(DecodeError::Stale {
            path: paths.output.clone(),
        }),
        other => other,
    };
    if let Err(e) = &results {
        warn!(error = %e, "Could not read results");
    }

    let errcode = acc.errcode();
    let overall = acc.overall();
    let warning = acc.warning();
    let error = acc.error();
    let elapsed_s = started.elapsed().as_secs_f64();

    info!(%overall, warning, error, elapsed_s, "Run finished");
    emit_progress(
        &mut progress_cb,
        RunStage::Completed,
        started,
        Some(format!("Run finished with status {overall}")),
        None,
    );

    Ok(RunResult {
        paths,
        outcomes: acc.into_outcomes(),
        errcode,
        overall,
        warning,
        error,
        results_reliable,
        results,
        elapsed_s,
    })
}

/// Persist a finished run in the store and return its manifest.
///
/// The run ID hashes the input file, the configuration and the timestamp.
pub fn record_run(
    store: &RunStore,
    toolkit: &str,
    config: &RunConfiguration,
    result: &RunResult,
) -> AppResult<RunManifest> {
    let input = std::fs::read(&result.paths.input)?;
    let timestamp = chrono::Utc::now().to_rfc3339();
    let run_id = compute_run_id(&input, config, &timestamp);
    let manifest = result.manifest(run_id, timestamp, toolkit, config);
    store.save_run(&manifest)?;
    debug!(run_id = %manifest.run_id, "Recorded run");
    Ok(manifest)
}
