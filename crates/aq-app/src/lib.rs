//! Run orchestration for aquarun.
//!
//! This crate drives one hydraulic + water quality simulation through a
//! solver toolkit: it stages the input file, opens a project, solves or
//! loads hydraulics, optionally saves them, solves quality, writes the
//! report, closes the project and finally decodes the binary output.
//! It is shared by the CLI and by library callers.

pub mod config;
pub mod demand;
pub mod error;
pub mod input;
pub mod paths;
pub mod pipeline;
pub mod progress;
pub mod run_service;
pub mod session;
pub mod status;

// Re-export key types for convenience
pub use config::{DemandMode, RunConfiguration};
pub use error::{AppError, AppResult};
pub use input::{AlreadyWritten, InpFile, InputSource};
pub use paths::RunPaths;
pub use pipeline::{STAGES, StageDescriptor, plan};
pub use progress::{RunProgressEvent, RunStage};
pub use run_service::{RunRequest, RunResult, record_run, run, run_with_progress};
pub use session::ProjectSession;
pub use status::{Stage, StageOutcome, StatusAccumulator};
