//! Stage outcomes and their accumulation.

use aq_core::{Severity, StatusCode};
use serde::Serialize;
use std::fmt;

/// One call of the solver stage protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Open,
    LoadHydraulics,
    ConfigureDemand,
    SolveHydraulics,
    SaveHydraulics,
    SolveQuality,
    WriteReport,
    Close,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Open => "open",
            Stage::LoadHydraulics => "load_hydraulics",
            Stage::ConfigureDemand => "configure_demand",
            Stage::SolveHydraulics => "solve_hydraulics",
            Stage::SaveHydraulics => "save_hydraulics",
            Stage::SolveQuality => "solve_quality",
            Stage::WriteReport => "write_report",
            Stage::Close => "close",
        }
    }

    /// Past-tense log line for a completed stage.
    pub fn done_message(&self) -> &'static str {
        match self {
            Stage::Open => "Opened project",
            Stage::LoadHydraulics => "Loaded hydraulics",
            Stage::ConfigureDemand => "Configured demand model",
            Stage::SolveHydraulics => "Solved hydraulics",
            Stage::SaveHydraulics => "Saved hydraulics",
            Stage::SolveQuality => "Solved quality",
            Stage::WriteReport => "Wrote report",
            Stage::Close => "Completed run",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recorded result of one stage. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageOutcome {
    pub stage: Stage,
    pub status: StatusCode,
    /// Position in the run, starting at 0 with `Open`.
    pub index: usize,
    pub elapsed_s: f64,
    /// Not issued because an earlier stage was fatal and the run fails fast.
    pub skipped: bool,
}

impl StageOutcome {
    pub fn severity(&self) -> Severity {
        self.status.severity()
    }
}

/// Ordered stage history with derived warning and error flags.
#[derive(Debug, Clone, Default)]
pub struct StatusAccumulator {
    outcomes: Vec<StageOutcome>,
    warning: bool,
    error: bool,
}

impl StatusAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stage: Stage, status: StatusCode, elapsed_s: f64) -> &StageOutcome {
        match status.severity() {
            Severity::Ok => {}
            Severity::Warning => self.warning = true,
            Severity::Fatal => self.error = true,
        }
        self.push(StageOutcome {
            stage,
            status,
            index: self.outcomes.len(),
            elapsed_s,
            skipped: false,
        })
    }

    pub fn record_skipped(&mut self, stage: Stage) -> &StageOutcome {
        self.push(StageOutcome {
            stage,
            status: StatusCode::OK,
            index: self.outcomes.len(),
            elapsed_s: 0.0,
            skipped: true,
        })
    }

    fn push(&mut self, outcome: StageOutcome) -> &StageOutcome {
        self.outcomes.push(outcome);
        &self.outcomes[self.outcomes.len() - 1]
    }

    fn issued(&self) -> impl Iterator<Item = &StageOutcome> {
        self.outcomes.iter().filter(|o| !o.skipped)
    }

    /// Code of the most recently issued stage, `0` before any stage.
    pub fn errcode(&self) -> StatusCode {
        self.issued().last().map_or(StatusCode::OK, |o| o.status)
    }

    /// Worst code over the whole history.
    pub fn overall(&self) -> StatusCode {
        self.issued()
            .fold(StatusCode::OK, |worst, o| worst.worst(o.status))
    }

    /// Codes of all issued stages, in order.
    pub fn codes(&self) -> Vec<StatusCode> {
        self.issued().map(|o| o.status).collect()
    }

    pub fn history(&self) -> &[StageOutcome] {
        &self.outcomes
    }

    /// An advisory code was seen at some point.
    pub fn warning(&self) -> bool {
        self.warning
    }

    /// A fatal code was seen at some point.
    pub fn error(&self) -> bool {
        self.error
    }

    pub fn into_outcomes(self) -> Vec<StageOutcome> {
        self.outcomes
    }
}
