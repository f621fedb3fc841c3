//! Progress events streamed while a run executes.

use crate::status::StageOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    StagingInput,
    CreatingProject,
    Running,
    Materializing,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::StagingInput => "Staging input",
            RunStage::CreatingProject => "Creating project",
            RunStage::Running => "Running",
            RunStage::Materializing => "Reading results",
            RunStage::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    /// Set for events emitted right after a toolkit stage returned.
    pub outcome: Option<StageOutcome>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            outcome: None,
        }
    }
}
