//! Demand model settings passed to the toolkit.

/// Pressure exponent used for pressure dependent demand.
pub const PRESSURE_EXPONENT: f64 = 0.5;

/// Demand handling mode understood by the toolkit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DemandModelKind {
    /// Demands are always met in full (toolkit default).
    DemandDriven,
    /// Delivered demand scales with pressure between minimum and nominal.
    PressureDriven,
}

impl DemandModelKind {
    /// Integer code of this mode in the toolkit API (`EN_DDA` / `EN_PDA`).
    pub fn toolkit_code(self) -> i32 {
        match self {
            DemandModelKind::DemandDriven => 0,
            DemandModelKind::PressureDriven => 1,
        }
    }
}

/// Arguments of a `set_demand_model` stage call.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemandModel {
    pub kind: DemandModelKind,
    /// Pressure below which no demand is delivered.
    pub minimum_pressure: f64,
    /// Pressure at which the full demand is delivered.
    pub nominal_pressure: f64,
    pub exponent: f64,
}

impl DemandModel {
    /// Pressure dependent demand with the fixed exponent.
    pub fn pressure_driven(minimum_pressure: f64, nominal_pressure: f64) -> Self {
        Self {
            kind: DemandModelKind::PressureDriven,
            minimum_pressure,
            nominal_pressure,
            exponent: PRESSURE_EXPONENT,
        }
    }
}
