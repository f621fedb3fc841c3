//! Result materializer seam.

use crate::DecodeResult;
use crate::types::ResultSet;
use std::path::Path;

/// Turns a solver output artifact into an in-memory [`ResultSet`].
pub trait ResultReader {
    fn read(&self, path: &Path) -> DecodeResult<ResultSet>;
}

impl<R: ResultReader + ?Sized> ResultReader for &R {
    fn read(&self, path: &Path) -> DecodeResult<ResultSet> {
        (**self).read(path)
    }
}
