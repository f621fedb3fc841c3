//! aq-core: stable foundation for aquarun.
//!
//! Contains:
//! - status (toolkit return codes + severity classification)
//! - numeric (float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod status;

// Re-exports: nice ergonomics for downstream crates
pub use error::{AqError, AqResult};
pub use numeric::*;
pub use status::{Severity, StatusCode};
