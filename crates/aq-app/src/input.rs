//! Staging of the input file before a run.

use std::io;
use std::path::{Path, PathBuf};

/// Writes the network definition the solver will open.
///
/// Serializing a network model into toolkit input is outside aquarun; this
/// seam lets callers plug in whatever produces the `.inp` text.
pub trait InputSource {
    fn describe(&self) -> String;

    fn write_input(&self, path: &Path) -> io::Result<()>;
}

/// Copy an existing `.inp` file into place.
#[derive(Debug, Clone)]
pub struct InpFile {
    source: PathBuf,
}

impl InpFile {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl InputSource for InpFile {
    fn describe(&self) -> String {
        self.source.display().to_string()
    }

    fn write_input(&self, path: &Path) -> io::Result<()> {
        let same_file = match (self.source.canonicalize(), path.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        if same_file {
            return Ok(());
        }
        std::fs::copy(&self.source, path).map(|_| ())
    }
}

/// The input file is already at the run's input path.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlreadyWritten;

impl InputSource for AlreadyWritten {
    fn describe(&self) -> String {
        "existing input file".to_string()
    }

    fn write_input(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory input text.
impl InputSource for String {
    fn describe(&self) -> String {
        format!("{} bytes of input text", self.len())
    }

    fn write_input(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inp_file_copies_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("net1.inp");
        std::fs::write(&src, "[TITLE]\nnet1\n[END]\n").unwrap();
        let dst = dir.path().join("temp.inp");

        InpFile::new(&src).write_input(&dst).unwrap();
        assert_eq!(std::fs::read_to_string(&dst).unwrap(), "[TITLE]\nnet1\n[END]\n");

        // Copying onto itself is a no-op rather than a truncation.
        InpFile::new(&dst).write_input(&dst).unwrap();
        assert_eq!(std::fs::read_to_string(&dst).unwrap(), "[TITLE]\nnet1\n[END]\n");
    }

    #[test]
    fn missing_source_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = InpFile::new(dir.path().join("absent.inp"))
            .write_input(&dir.path().join("temp.inp"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn text_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("temp.inp");
        "[END]\n".to_string().write_input(&dst).unwrap();
        assert_eq!(std::fs::read_to_string(&dst).unwrap(), "[END]\n");
    }
}
