//! In-memory fake toolkit (testing only)
//!
//! [`ScriptedToolkit`] behaves like the real solver at the protocol level:
//! calls on an unopened project answer `102`, quality without hydraulics
//! answers `104`, a missing or foreign hydraulics file answers `305`/`306`.
//! Individual calls can be forced to return a given code, and every call is
//! logged so tests can assert the exact sequence that was issued.

use crate::codes;
use crate::demand::DemandModel;
use crate::error::{ToolkitError, ToolkitResult};
use crate::project::{Project, Toolkit};
use aq_core::StatusCode;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Header written into fake hydraulics files.
pub const FAKE_HYDRAULICS_HEADER: &[u8] = b"AQ-FAKE-HYD";

/// Which toolkit entry point a call went to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
    Open,
    UseHydraulicsFile,
    SetDemandModel,
    SolveHydraulics,
    SaveHydraulicsFile,
    SolveQuality,
    WriteReport,
    Close,
}

/// A logged call with its arguments and the code it returned.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolkitCall {
    Open {
        input: PathBuf,
        report: PathBuf,
        output: PathBuf,
    },
    UseHydraulicsFile(PathBuf),
    SetDemandModel(DemandModel),
    SolveHydraulics,
    SaveHydraulicsFile(PathBuf),
    SolveQuality,
    WriteReport,
    Close,
}

impl ToolkitCall {
    pub fn kind(&self) -> CallKind {
        match self {
            ToolkitCall::Open { .. } => CallKind::Open,
            ToolkitCall::UseHydraulicsFile(_) => CallKind::UseHydraulicsFile,
            ToolkitCall::SetDemandModel(_) => CallKind::SetDemandModel,
            ToolkitCall::SolveHydraulics => CallKind::SolveHydraulics,
            ToolkitCall::SaveHydraulicsFile(_) => CallKind::SaveHydraulicsFile,
            ToolkitCall::SolveQuality => CallKind::SolveQuality,
            ToolkitCall::WriteReport => CallKind::WriteReport,
            ToolkitCall::Close => CallKind::Close,
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    forced: HashMap<CallKind, i32>,
    output_artifact: Option<Vec<u8>>,
    fail_create: bool,
}

/// Scripted toolkit shared between a test and the projects it creates.
#[derive(Clone, Debug, Default)]
pub struct ScriptedToolkit {
    script: Arc<Mutex<Script>>,
    log: Arc<Mutex<Vec<(ToolkitCall, StatusCode)>>>,
    created: Arc<Mutex<usize>>,
    released: Arc<Mutex<usize>>,
}

impl ScriptedToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force every call of `kind` to return `code` without side effects.
    pub fn with_code(self, kind: CallKind, code: i32) -> Self {
        self.script.lock().unwrap().forced.insert(kind, code);
        self
    }

    /// Bytes written to the output path by a successful quality solve.
    pub fn with_output_artifact(self, bytes: Vec<u8>) -> Self {
        self.script.lock().unwrap().output_artifact = Some(bytes);
        self
    }

    /// Make `create_project` fail.
    pub fn failing_create(self) -> Self {
        self.script.lock().unwrap().fail_create = true;
        self
    }

    /// All calls issued so far, with their codes.
    pub fn calls(&self) -> Vec<(ToolkitCall, StatusCode)> {
        self.log.lock().unwrap().clone()
    }

    pub fn call_kinds(&self) -> Vec<CallKind> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|(call, _)| call.kind())
            .collect()
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.call_kinds().into_iter().filter(|k| *k == kind).count()
    }

    pub fn projects_created(&self) -> usize {
        *self.created.lock().unwrap()
    }

    pub fn projects_released(&self) -> usize {
        *self.released.lock().unwrap()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }
}

impl Toolkit for ScriptedToolkit {
    type Project = ScriptedProject;

    fn name(&self) -> &str {
        "scripted"
    }

    fn create_project(&self) -> ToolkitResult<ScriptedProject> {
        if self.script.lock().unwrap().fail_create {
            return Err(ToolkitError::CreateFailed {
                toolkit: self.name().to_string(),
                code: codes::NO_NETWORK_DATA,
            });
        }
        *self.created.lock().unwrap() += 1;
        Ok(ScriptedProject {
            toolkit: self.clone(),
            output: None,
            opened: false,
            hydraulics_ready: false,
        })
    }
}

/// Project created by [`ScriptedToolkit`].
#[derive(Debug)]
pub struct ScriptedProject {
    toolkit: ScriptedToolkit,
    output: Option<PathBuf>,
    opened: bool,
    hydraulics_ready: bool,
}

impl ScriptedProject {
    fn forced(&self, kind: CallKind) -> Option<i32> {
        self.toolkit.script.lock().unwrap().forced.get(&kind).copied()
    }

    fn record(&self, call: ToolkitCall, code: i32) -> StatusCode {
        let status = StatusCode(code);
        self.toolkit.log.lock().unwrap().push((call, status));
        status
    }

    /// Code for a call that needs an opened project, unless forced.
    fn precheck(&self, kind: CallKind) -> Option<i32> {
        if let Some(code) = self.forced(kind) {
            return Some(code);
        }
        if !self.opened {
            return Some(codes::NO_NETWORK_DATA);
        }
        None
    }
}

impl Project for ScriptedProject {
    fn open(&mut self, input: &Path, report: &Path, output: &Path) -> StatusCode {
        let code = match self.forced(CallKind::Open) {
            Some(code) => code,
            None if !input.exists() => codes::CANNOT_OPEN_INPUT,
            None => 0,
        };
        if code < 100 {
            self.opened = true;
            self.output = Some(output.to_path_buf());
        }
        self.record(
            ToolkitCall::Open {
                input: input.to_path_buf(),
                report: report.to_path_buf(),
                output: output.to_path_buf(),
            },
            code,
        )
    }

    fn use_hydraulics_file(&mut self, path: &Path) -> StatusCode {
        let code = self.precheck(CallKind::UseHydraulicsFile).unwrap_or_else(|| {
            match fs::read(path) {
                Ok(bytes) if bytes.starts_with(FAKE_HYDRAULICS_HEADER) => 0,
                Ok(_) => codes::HYDRAULICS_MISMATCH,
                Err(_) => codes::CANNOT_OPEN_HYDRAULICS,
            }
        });
        if code < 100 {
            self.hydraulics_ready = true;
        }
        self.record(ToolkitCall::UseHydraulicsFile(path.to_path_buf()), code)
    }

    fn set_demand_model(&mut self, model: &DemandModel) -> StatusCode {
        let code = self.precheck(CallKind::SetDemandModel).unwrap_or(0);
        self.record(ToolkitCall::SetDemandModel(*model), code)
    }

    fn solve_hydraulics(&mut self) -> StatusCode {
        let code = self.precheck(CallKind::SolveHydraulics).unwrap_or(0);
        if code < 100 {
            self.hydraulics_ready = true;
        }
        self.record(ToolkitCall::SolveHydraulics, code)
    }

    fn save_hydraulics_file(&mut self, path: &Path) -> StatusCode {
        let code = self
            .precheck(CallKind::SaveHydraulicsFile)
            .unwrap_or_else(|| {
                if !self.hydraulics_ready {
                    return codes::NO_HYDRAULICS;
                }
                match fs::write(path, FAKE_HYDRAULICS_HEADER) {
                    Ok(()) => 0,
                    Err(_) => codes::CANNOT_OPEN_HYDRAULICS,
                }
            });
        self.record(ToolkitCall::SaveHydraulicsFile(path.to_path_buf()), code)
    }

    fn solve_quality(&mut self) -> StatusCode {
        let code = self.precheck(CallKind::SolveQuality).unwrap_or_else(|| {
            if !self.hydraulics_ready {
                return codes::NO_HYDRAULICS;
            }
            let artifact = self.toolkit.script.lock().unwrap().output_artifact.clone();
            match (artifact, &self.output) {
                (Some(bytes), Some(out)) => match fs::write(out, bytes) {
                    Ok(()) => 0,
                    Err(_) => codes::CANNOT_OPEN_OUTPUT,
                },
                _ => 0,
            }
        });
        self.record(ToolkitCall::SolveQuality, code)
    }

    fn write_report(&mut self) -> StatusCode {
        let code = self.precheck(CallKind::WriteReport).unwrap_or(0);
        self.record(ToolkitCall::WriteReport, code)
    }

    fn close(&mut self) -> StatusCode {
        let code = self.forced(CallKind::Close).unwrap_or(0);
        self.opened = false;
        self.hydraulics_ready = false;
        self.record(ToolkitCall::Close, code)
    }
}

impl Drop for ScriptedProject {
    fn drop(&mut self) {
        if let Ok(mut released) = self.toolkit.released.lock() {
            *released += 1;
        }
    }
}
