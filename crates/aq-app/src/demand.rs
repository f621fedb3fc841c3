//! Demand model selection.

use crate::config::{DemandMode, RunConfiguration};
use aq_toolkit::DemandModel;

/// Demand model call to issue before solving hydraulics, if any.
///
/// Demand driven runs rely on the toolkit default and issue nothing. The
/// exponent is fixed at [`aq_toolkit::PRESSURE_EXPONENT`].
pub fn select(config: &RunConfiguration) -> Option<DemandModel> {
    match config.demand_mode {
        DemandMode::DemandDriven => None,
        DemandMode::PressureDependent => Some(DemandModel::pressure_driven(
            config.minimum_pressure,
            config.nominal_pressure,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_toolkit::DemandModelKind;

    #[test]
    fn demand_driven_issues_nothing() {
        assert_eq!(select(&RunConfiguration::default()), None);
    }

    #[test]
    fn pressure_dependent_carries_configured_pressures() {
        let config = RunConfiguration {
            demand_mode: DemandMode::PressureDependent,
            minimum_pressure: 10.0,
            nominal_pressure: 30.0,
            ..RunConfiguration::default()
        };
        let model = select(&config).unwrap();
        assert_eq!(model.kind, DemandModelKind::PressureDriven);
        assert_eq!(model.minimum_pressure, 10.0);
        assert_eq!(model.nominal_pressure, 30.0);
        assert_eq!(model.exponent, 0.5);
    }
}
