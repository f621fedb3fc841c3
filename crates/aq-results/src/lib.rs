//! aq-results: binary output decoding and run history storage.

pub mod binfile;
pub mod hash;
pub mod reader;
pub mod store;
pub mod types;
#[cfg(feature = "test-support")]
pub mod writer;

pub use binfile::{BinFile, MAGIC};
pub use hash::compute_run_id;
pub use reader::ResultReader;
pub use store::{RunManifest, RunStore, StageRecord};
pub use types::*;

use std::path::PathBuf;

pub type ResultsResult<T> = Result<T, ResultsError>;

pub type DecodeResult<T> = Result<T, DecodeError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}

/// Failure to turn an output artifact into a [`ResultSet`].
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("Cannot read output file {path}: {source}")]
    Missing {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Output file truncated at byte {offset} (needed {needed} more)")]
    Truncated { offset: usize, needed: usize },

    #[error("Bad magic number {found} in {position}")]
    BadMagic { found: i32, position: &'static str },

    #[error("Invalid {what}: {value}")]
    InvalidCount { what: &'static str, value: i32 },

    #[error("Output file size mismatch: expected {expected} bytes, found {actual}")]
    SizeMismatch { expected: u128, actual: usize },

    #[error("Output file {path} was not written by this run")]
    Stale { path: PathBuf },
}
