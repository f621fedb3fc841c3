//! EPANET 2.2 shared library backend.
//!
//! Binds the thread-safe project API (`EN_*` functions taking an explicit
//! project handle) of `libepanet2`. Each [`EpanetProject`] owns exactly one
//! handle and deletes it when dropped.

use crate::codes;
use crate::demand::DemandModel;
use crate::error::{ToolkitError, ToolkitResult};
use crate::project::{Project, Toolkit};
use aq_core::StatusCode;
use std::ffi::{CString, c_char, c_double, c_int, c_void};
use std::path::Path;
use std::ptr;

#[allow(non_camel_case_types)]
type EN_Project = *mut c_void;

#[link(name = "epanet2")]
unsafe extern "C" {
    fn EN_createproject(ph: *mut EN_Project) -> c_int;
    fn EN_deleteproject(ph: EN_Project) -> c_int;
    fn EN_open(
        ph: EN_Project,
        inp_file: *const c_char,
        rpt_file: *const c_char,
        out_file: *const c_char,
    ) -> c_int;
    fn EN_usehydfile(ph: EN_Project, filename: *const c_char) -> c_int;
    fn EN_setdemandmodel(
        ph: EN_Project,
        model: c_int,
        pmin: c_double,
        preq: c_double,
        pexp: c_double,
    ) -> c_int;
    fn EN_solveH(ph: EN_Project) -> c_int;
    fn EN_savehydfile(ph: EN_Project, filename: *const c_char) -> c_int;
    fn EN_solveQ(ph: EN_Project) -> c_int;
    fn EN_report(ph: EN_Project) -> c_int;
    fn EN_close(ph: EN_Project) -> c_int;
}

fn c_path(path: &Path) -> Option<CString> {
    CString::new(path.to_string_lossy().as_bytes()).ok()
}

/// The EPANET toolkit.
#[derive(Debug, Default, Clone, Copy)]
pub struct Epanet;

impl Epanet {
    pub fn new() -> Self {
        Self
    }
}

impl Toolkit for Epanet {
    type Project = EpanetProject;

    fn name(&self) -> &str {
        "EPANET 2.2"
    }

    fn create_project(&self) -> ToolkitResult<EpanetProject> {
        let mut handle: EN_Project = ptr::null_mut();
        // SAFETY: EN_createproject writes a freshly allocated handle into `handle`.
        let code = unsafe { EN_createproject(&mut handle) };
        if code != 0 || handle.is_null() {
            return Err(ToolkitError::CreateFailed {
                toolkit: self.name().to_string(),
                code,
            });
        }
        Ok(EpanetProject { handle })
    }
}

/// A live EPANET project handle.
pub struct EpanetProject {
    handle: EN_Project,
}

impl EpanetProject {
    fn with_path(
        &mut self,
        path: &Path,
        bad_path_code: i32,
        call: unsafe extern "C" fn(EN_Project, *const c_char) -> c_int,
    ) -> StatusCode {
        let Some(c) = c_path(path) else {
            return StatusCode(bad_path_code);
        };
        // SAFETY: handle is live for the lifetime of self, `c` outlives the call.
        StatusCode(unsafe { call(self.handle, c.as_ptr()) })
    }
}

impl Project for EpanetProject {
    fn open(&mut self, input: &Path, report: &Path, output: &Path) -> StatusCode {
        let Some(inp) = c_path(input) else {
            return StatusCode(codes::CANNOT_OPEN_INPUT);
        };
        let Some(rpt) = c_path(report) else {
            return StatusCode(codes::CANNOT_OPEN_REPORT);
        };
        let Some(out) = c_path(output) else {
            return StatusCode(codes::CANNOT_OPEN_OUTPUT);
        };
        // SAFETY: all three strings are NUL terminated and live across the call.
        StatusCode(unsafe { EN_open(self.handle, inp.as_ptr(), rpt.as_ptr(), out.as_ptr()) })
    }

    fn use_hydraulics_file(&mut self, path: &Path) -> StatusCode {
        self.with_path(path, codes::CANNOT_OPEN_HYDRAULICS, EN_usehydfile)
    }

    fn set_demand_model(&mut self, model: &DemandModel) -> StatusCode {
        // SAFETY: plain value arguments on a live handle.
        StatusCode(unsafe {
            EN_setdemandmodel(
                self.handle,
                model.kind.toolkit_code(),
                model.minimum_pressure,
                model.nominal_pressure,
                model.exponent,
            )
        })
    }

    fn solve_hydraulics(&mut self) -> StatusCode {
        // SAFETY: live handle.
        StatusCode(unsafe { EN_solveH(self.handle) })
    }

    fn save_hydraulics_file(&mut self, path: &Path) -> StatusCode {
        self.with_path(path, codes::CANNOT_OPEN_HYDRAULICS, EN_savehydfile)
    }

    fn solve_quality(&mut self) -> StatusCode {
        // SAFETY: live handle.
        StatusCode(unsafe { EN_solveQ(self.handle) })
    }

    fn write_report(&mut self) -> StatusCode {
        // SAFETY: live handle.
        StatusCode(unsafe { EN_report(self.handle) })
    }

    fn close(&mut self) -> StatusCode {
        // SAFETY: live handle; EN_close tolerates an unopened project.
        StatusCode(unsafe { EN_close(self.handle) })
    }
}

impl Drop for EpanetProject {
    fn drop(&mut self) {
        // SAFETY: handle came from EN_createproject and is deleted exactly once.
        let code = unsafe { EN_deleteproject(self.handle) };
        if code != 0 {
            tracing::warn!(code, "EN_deleteproject returned non-zero");
        }
    }
}
