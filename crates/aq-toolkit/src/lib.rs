//! aq-toolkit: the solver toolkit stage protocol.
//!
//! The rest of aquarun never talks to a solver directly. It creates a
//! [`Project`] through a [`Toolkit`] and drives it with a fixed set of stage
//! calls, each of which answers with an integer [`StatusCode`].
//!
//! Backends:
//! - [`native::Epanet`] binds the EPANET 2.2 C library (feature `native`)
//! - `fakes::ScriptedToolkit` is an in-memory stand-in with scripted codes
//!   (feature `test-support`)
//!
//! [`StatusCode`]: aq_core::StatusCode

pub mod demand;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod fakes;
#[cfg(feature = "native")]
pub mod native;
pub mod project;

pub use demand::{DemandModel, DemandModelKind, PRESSURE_EXPONENT};
pub use error::{ToolkitError, ToolkitResult};
pub use project::{Project, Toolkit};

/// Toolkit error codes used when a path cannot be handed to the solver.
pub mod codes {
    /// No network data available (project not opened).
    pub const NO_NETWORK_DATA: i32 = 102;
    /// No hydraulics available for a water quality analysis.
    pub const NO_HYDRAULICS: i32 = 104;
    pub const CANNOT_OPEN_INPUT: i32 = 302;
    pub const CANNOT_OPEN_REPORT: i32 = 303;
    pub const CANNOT_OPEN_OUTPUT: i32 = 304;
    pub const CANNOT_OPEN_HYDRAULICS: i32 = 305;
    /// Hydraulics file does not match network data.
    pub const HYDRAULICS_MISMATCH: i32 = 306;
}
