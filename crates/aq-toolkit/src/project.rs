//! Toolkit and project traits.

use crate::demand::DemandModel;
use crate::error::ToolkitResult;
use aq_core::StatusCode;
use std::path::Path;

/// One solver project context.
///
/// Every method is a single blocking stage call. Calls never fail in the Rust
/// sense: problems come back as non-zero status codes and the caller decides
/// what to do with them. Dropping a project releases the underlying context
/// but does not close it; closing is the caller's stage.
pub trait Project {
    /// Parse the input file and prepare report and binary output files.
    fn open(&mut self, input: &Path, report: &Path, output: &Path) -> StatusCode;

    /// Use a previously saved hydraulics file instead of solving.
    fn use_hydraulics_file(&mut self, path: &Path) -> StatusCode;

    fn set_demand_model(&mut self, model: &DemandModel) -> StatusCode;

    /// Run the full extended period hydraulic analysis.
    fn solve_hydraulics(&mut self) -> StatusCode;

    /// Copy the current hydraulics to a file for later reuse.
    fn save_hydraulics_file(&mut self, path: &Path) -> StatusCode;

    /// Run the full water quality analysis and write the binary output.
    fn solve_quality(&mut self) -> StatusCode;

    /// Write the formatted report.
    fn write_report(&mut self) -> StatusCode;

    fn close(&mut self) -> StatusCode;
}

/// Factory for project contexts.
pub trait Toolkit {
    type Project: Project;

    fn name(&self) -> &str;

    fn create_project(&self) -> ToolkitResult<Self::Project>;
}
