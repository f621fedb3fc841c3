//! The fixed stage pipeline.
//!
//! A run is the [`STAGES`] table filtered by each descriptor's applicability
//! predicate. Order never changes and no stage is retried:
//!
//! ```text
//! Open -> [LoadHydraulics | ConfigureDemand -> SolveHydraulics]
//!      -> [SaveHydraulics] -> SolveQuality -> WriteReport -> Close
//! ```

use crate::config::RunConfiguration;
use crate::demand;
use crate::status::Stage;

/// A stage and the rule deciding whether a run issues it.
#[derive(Debug, Clone, Copy)]
pub struct StageDescriptor {
    pub stage: Stage,
    pub applies: fn(&RunConfiguration) -> bool,
}

fn always(_: &RunConfiguration) -> bool {
    true
}

fn loads_hydraulics(config: &RunConfiguration) -> bool {
    config.use_hydraulics
}

fn configures_demand(config: &RunConfiguration) -> bool {
    !config.use_hydraulics && demand::select(config).is_some()
}

fn solves_hydraulics(config: &RunConfiguration) -> bool {
    !config.use_hydraulics
}

fn saves_hydraulics(config: &RunConfiguration) -> bool {
    config.save_hydraulics
}

pub const STAGES: [StageDescriptor; 8] = [
    StageDescriptor {
        stage: Stage::Open,
        applies: always,
    },
    StageDescriptor {
        stage: Stage::LoadHydraulics,
        applies: loads_hydraulics,
    },
    StageDescriptor {
        stage: Stage::ConfigureDemand,
        applies: configures_demand,
    },
    StageDescriptor {
        stage: Stage::SolveHydraulics,
        applies: solves_hydraulics,
    },
    StageDescriptor {
        stage: Stage::SaveHydraulics,
        applies: saves_hydraulics,
    },
    StageDescriptor {
        stage: Stage::SolveQuality,
        applies: always,
    },
    StageDescriptor {
        stage: Stage::WriteReport,
        applies: always,
    },
    StageDescriptor {
        stage: Stage::Close,
        applies: always,
    },
];

/// Stages a run with this configuration issues, in order.
pub fn plan(config: &RunConfiguration) -> Vec<Stage> {
    STAGES
        .iter()
        .filter(|d| (d.applies)(config))
        .map(|d| d.stage)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DemandMode;
    use proptest::prelude::*;

    fn config(mode: DemandMode, use_hyd: bool, save_hyd: bool) -> RunConfiguration {
        RunConfiguration {
            demand_mode: mode,
            use_hydraulics: use_hyd,
            save_hydraulics: save_hyd,
            ..RunConfiguration::default()
        }
    }

    #[test]
    fn fresh_demand_driven() {
        assert_eq!(
            plan(&config(DemandMode::DemandDriven, false, false)),
            vec![
                Stage::Open,
                Stage::SolveHydraulics,
                Stage::SolveQuality,
                Stage::WriteReport,
                Stage::Close
            ]
        );
    }

    #[test]
    fn fresh_pressure_dependent_with_save() {
        assert_eq!(
            plan(&config(DemandMode::PressureDependent, false, true)),
            vec![
                Stage::Open,
                Stage::ConfigureDemand,
                Stage::SolveHydraulics,
                Stage::SaveHydraulics,
                Stage::SolveQuality,
                Stage::WriteReport,
                Stage::Close
            ]
        );
    }

    #[test]
    fn load_then_save() {
        assert_eq!(
            plan(&config(DemandMode::PressureDependent, true, true)),
            vec![
                Stage::Open,
                Stage::LoadHydraulics,
                Stage::SaveHydraulics,
                Stage::SolveQuality,
                Stage::WriteReport,
                Stage::Close
            ]
        );
    }

    fn mode_strategy() -> impl Strategy<Value = DemandMode> {
        prop_oneof![
            Just(DemandMode::DemandDriven),
            Just(DemandMode::PressureDependent)
        ]
    }

    proptest! {
        #[test]
        fn plan_is_bracketed_by_open_and_close(
            mode in mode_strategy(),
            use_hyd in any::<bool>(),
            save_hyd in any::<bool>(),
        ) {
            let stages = plan(&config(mode, use_hyd, save_hyd));
            prop_assert_eq!(stages.first(), Some(&Stage::Open));
            prop_assert_eq!(stages.last(), Some(&Stage::Close));
            prop_assert_eq!(stages.iter().filter(|s| **s == Stage::Close).count(), 1);
            prop_assert_eq!(stages.iter().filter(|s| **s == Stage::Open).count(), 1);
        }

        #[test]
        fn load_and_solve_are_exclusive(
            mode in mode_strategy(),
            use_hyd in any::<bool>(),
            save_hyd in any::<bool>(),
        ) {
            let stages = plan(&config(mode, use_hyd, save_hyd));
            let loads = stages.contains(&Stage::LoadHydraulics);
            let solves = stages.contains(&Stage::SolveHydraulics);
            prop_assert!(loads != solves);
            prop_assert_eq!(loads, use_hyd);
            if use_hyd {
                prop_assert!(!stages.contains(&Stage::ConfigureDemand));
            }
            prop_assert_eq!(stages.contains(&Stage::SaveHydraulics), save_hyd);
        }

        #[test]
        fn stages_follow_table_order(
            mode in mode_strategy(),
            use_hyd in any::<bool>(),
            save_hyd in any::<bool>(),
        ) {
            let stages = plan(&config(mode, use_hyd, save_hyd));
            let order: Vec<usize> = stages
                .iter()
                .map(|s| STAGES.iter().position(|d| d.stage == *s).unwrap())
                .collect();
            prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
