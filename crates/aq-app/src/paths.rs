//! Run file paths.

use crate::config::RunConfiguration;
use serde::Serialize;
use std::path::PathBuf;

/// The four files of one run.
///
/// Derived from the file prefix unless individually overridden. The
/// orchestrator never deletes any of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunPaths {
    pub input: PathBuf,
    pub report: PathBuf,
    pub output: PathBuf,
    pub hydraulics: PathBuf,
}

impl RunPaths {
    /// `<prefix>.inp`, `<prefix>.rpt`, `<prefix>.bin`, `<prefix>.hyd`.
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            input: PathBuf::from(format!("{prefix}.inp")),
            report: PathBuf::from(format!("{prefix}.rpt")),
            output: PathBuf::from(format!("{prefix}.bin")),
            hydraulics: PathBuf::from(format!("{prefix}.hyd")),
        }
    }

    /// Prefix-derived paths with the configuration's overrides applied.
    pub fn resolve(config: &RunConfiguration) -> Self {
        let derived = Self::from_prefix(&config.file_prefix);
        Self {
            input: config.input_file.clone().unwrap_or(derived.input),
            report: config.report_file.clone().unwrap_or(derived.report),
            output: config.output_file.clone().unwrap_or(derived.output),
            hydraulics: config.hydraulics_file.clone().unwrap_or(derived.hydraulics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_from_prefix() {
        let paths = RunPaths::from_prefix("temp");
        assert_eq!(paths.input, PathBuf::from("temp.inp"));
        assert_eq!(paths.report, PathBuf::from("temp.rpt"));
        assert_eq!(paths.output, PathBuf::from("temp.bin"));
        assert_eq!(paths.hydraulics, PathBuf::from("temp.hyd"));
    }

    #[test]
    fn prefix_may_contain_directories_and_dots() {
        let paths = RunPaths::from_prefix("runs/net.v2");
        assert_eq!(paths.input, PathBuf::from("runs/net.v2.inp"));
        assert_eq!(paths.hydraulics, PathBuf::from("runs/net.v2.hyd"));
    }

    #[test]
    fn overrides_replace_single_paths() {
        let config = RunConfiguration {
            file_prefix: "temp".to_string(),
            hydraulics_file: Some(PathBuf::from("shared/base.hyd")),
            output_file: Some(PathBuf::from("out/results.out")),
            ..RunConfiguration::default()
        };
        let paths = RunPaths::resolve(&config);
        assert_eq!(paths.input, PathBuf::from("temp.inp"));
        assert_eq!(paths.report, PathBuf::from("temp.rpt"));
        assert_eq!(paths.output, PathBuf::from("out/results.out"));
        assert_eq!(paths.hydraulics, PathBuf::from("shared/base.hyd"));
    }
}
