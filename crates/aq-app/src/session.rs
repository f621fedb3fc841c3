//! Project session: one solver project for the length of one run.

use crate::paths::RunPaths;
use crate::status::Stage;
use aq_core::StatusCode;
use aq_toolkit::{DemandModel, Project, codes};

/// Owns a solver project and guarantees it is closed exactly once.
///
/// Stages are issued through [`execute`](Self::execute). Closing happens
/// either through the `Close` stage, through [`close`](Self::close), or, if
/// neither ran (a panic unwinding through the run), when the session is
/// dropped. Once closed, the project is never called again.
pub struct ProjectSession<P: Project> {
    project: P,
    paths: RunPaths,
    demand: Option<DemandModel>,
    closed: bool,
}

impl<P: Project> ProjectSession<P> {
    pub fn new(project: P, paths: RunPaths, demand: Option<DemandModel>) -> Self {
        Self {
            project,
            paths,
            demand,
            closed: false,
        }
    }

    /// Create a session and issue the open stage.
    pub fn open(project: P, paths: RunPaths, demand: Option<DemandModel>) -> (Self, StatusCode) {
        let mut session = Self::new(project, paths, demand);
        let status = session.execute(Stage::Open);
        (session, status)
    }

    pub fn paths(&self) -> &RunPaths {
        &self.paths
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Issue one stage call and return its code.
    pub fn execute(&mut self, stage: Stage) -> StatusCode {
        if self.closed {
            return StatusCode(codes::NO_NETWORK_DATA);
        }
        match stage {
            Stage::Open => {
                let RunPaths {
                    input,
                    report,
                    output,
                    ..
                } = &self.paths;
                self.project.open(input, report, output)
            }
            Stage::LoadHydraulics => self.project.use_hydraulics_file(&self.paths.hydraulics),
            Stage::ConfigureDemand => match &self.demand {
                Some(model) => self.project.set_demand_model(model),
                None => StatusCode::OK,
            },
            Stage::SolveHydraulics => self.project.solve_hydraulics(),
            Stage::SaveHydraulics => self.project.save_hydraulics_file(&self.paths.hydraulics),
            Stage::SolveQuality => self.project.solve_quality(),
            Stage::WriteReport => self.project.write_report(),
            Stage::Close => {
                self.closed = true;
                self.project.close()
            }
        }
    }

    /// Close the project and end the session.
    pub fn close(mut self) -> StatusCode {
        self.execute(Stage::Close)
    }
}

impl<P: Project> Drop for ProjectSession<P> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            let status = self.project.close();
            tracing::error!(%status, "Project session dropped without close; closed it");
        }
    }
}
