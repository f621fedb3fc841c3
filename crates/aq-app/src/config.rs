//! Run configuration.

use crate::error::{AppError, AppResult};
use aq_core::{ensure_finite, ensure_non_negative};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_FILE_PREFIX: &str = "temp";
pub const DEFAULT_MINIMUM_PRESSURE: f64 = 17.75;
pub const DEFAULT_NOMINAL_PRESSURE: f64 = 21.96;

/// How the solver treats nodal demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DemandMode {
    /// Demands are met regardless of pressure.
    #[default]
    #[serde(rename = "DD", alias = "DDA", alias = "demand_driven")]
    DemandDriven,
    /// Delivered demand depends on pressure.
    #[serde(rename = "PDD", alias = "PDA", alias = "pressure_dependent")]
    PressureDependent,
}

impl DemandMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemandMode::DemandDriven => "DD",
            DemandMode::PressureDependent => "PDD",
        }
    }
}

impl fmt::Display for DemandMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemandMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DD" | "DDA" => Ok(DemandMode::DemandDriven),
            "PDD" | "PDA" => Ok(DemandMode::PressureDependent),
            other => Err(AppError::InvalidConfig(format!(
                "unknown demand mode '{other}' (expected DD or PDD)"
            ))),
        }
    }
}

/// Settings for one run. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfiguration {
    /// Prefix for the `.inp`, `.rpt`, `.bin` and `.hyd` files.
    pub file_prefix: String,
    pub demand_mode: DemandMode,
    pub minimum_pressure: f64,
    pub nominal_pressure: f64,
    /// Load hydraulics from the hydraulics file instead of solving them.
    pub use_hydraulics: bool,
    /// Save hydraulics to the hydraulics file after the hydraulics stage.
    pub save_hydraulics: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hydraulics_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    /// Skip the remaining stages (except close) after the first fatal code.
    pub fail_fast: bool,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            demand_mode: DemandMode::default(),
            minimum_pressure: DEFAULT_MINIMUM_PRESSURE,
            nominal_pressure: DEFAULT_NOMINAL_PRESSURE,
            use_hydraulics: false,
            save_hydraulics: false,
            hydraulics_file: None,
            input_file: None,
            report_file: None,
            output_file: None,
            fail_fast: false,
        }
    }
}

impl RunConfiguration {
    pub fn with_prefix(file_prefix: impl Into<String>) -> Self {
        Self {
            file_prefix: file_prefix.into(),
            ..Self::default()
        }
    }

    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let config: RunConfiguration = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_yaml(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Check the numeric and naming invariants.
    pub fn validate(&self) -> AppResult<()> {
        if self.file_prefix.trim().is_empty() {
            return Err(AppError::InvalidConfig(
                "file_prefix must not be empty".to_string(),
            ));
        }
        let pmin = ensure_non_negative(self.minimum_pressure, "minimum_pressure")?;
        let pnom = ensure_finite(self.nominal_pressure, "nominal_pressure")?;
        if pnom < pmin {
            return Err(AppError::InvalidConfig(format!(
                "nominal_pressure ({pnom}) must be >= minimum_pressure ({pmin})"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_run_parameter_surface() {
        let config = RunConfiguration::default();
        assert_eq!(config.file_prefix, "temp");
        assert_eq!(config.demand_mode, DemandMode::DemandDriven);
        assert_eq!(config.minimum_pressure, 17.75);
        assert_eq!(config.nominal_pressure, 21.96);
        assert!(!config.use_hydraulics);
        assert!(!config.save_hydraulics);
        assert!(!config.fail_fast);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn yaml_fills_defaults() {
        let config = RunConfiguration::from_yaml_str(
            "file_prefix: net1\ndemand_mode: PDD\nsave_hydraulics: true\n",
        )
        .unwrap();
        assert_eq!(config.file_prefix, "net1");
        assert_eq!(config.demand_mode, DemandMode::PressureDependent);
        assert!(config.save_hydraulics);
        assert_eq!(config.minimum_pressure, 17.75);
        assert_eq!(config.hydraulics_file, None);
    }

    #[test]
    fn yaml_accepts_mode_aliases() {
        let config = RunConfiguration::from_yaml_str("demand_mode: pressure_dependent\n").unwrap();
        assert_eq!(config.demand_mode, DemandMode::PressureDependent);
        let config = RunConfiguration::from_yaml_str("demand_mode: DDA\n").unwrap();
        assert_eq!(config.demand_mode, DemandMode::DemandDriven);
    }

    #[test]
    fn nominal_below_minimum_is_rejected() {
        let config = RunConfiguration {
            minimum_pressure: 30.0,
            nominal_pressure: 20.0,
            ..RunConfiguration::default()
        };
        assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn negative_minimum_is_rejected() {
        let config = RunConfiguration {
            minimum_pressure: -1.0,
            ..RunConfiguration::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn equal_pressures_are_allowed() {
        let config = RunConfiguration {
            minimum_pressure: 20.0,
            nominal_pressure: 20.0,
            ..RunConfiguration::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn demand_mode_parses_case_insensitively() {
        assert_eq!("pdd".parse::<DemandMode>().unwrap(), DemandMode::PressureDependent);
        assert_eq!("DD".parse::<DemandMode>().unwrap(), DemandMode::DemandDriven);
        assert!("weird".parse::<DemandMode>().is_err());
    }
}
