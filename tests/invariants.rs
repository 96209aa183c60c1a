mod common;

use proptest::prelude::*;

use geopolitics_sim::simulation::GamePhase;
use geopolitics_sim::simulation::constants::{MAX_AGGRESSION, MAX_POLITICAL_CAPITAL, STAT_MAX};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn nation_figures_stay_in_range(seed in any::<u64>()) {
        let mut simulation = common::seeded(seed, "410");

        for _ in 0..60 {
            simulation.tick();
            if simulation.phase() != GamePhase::Playing {
                break;
            }
        }

        for nation in simulation.nations().iter() {
            prop_assert!((0.0..=MAX_POLITICAL_CAPITAL).contains(&nation.political_capital));
            prop_assert!((0.0..=MAX_AGGRESSION).contains(&nation.aggression));
            for stat in [
                nation.stats.economy,
                nation.stats.technology,
                nation.stats.diplomacy,
                nation.stats.resources,
            ] {
                prop_assert!((0.0..=STAT_MAX).contains(&stat), "{} stat {stat}", nation.name);
            }
            prop_assert!(nation.military.army >= 0.0);
            prop_assert!(nation.military.navy >= 0.0);
            prop_assert!(nation.military.airforce >= 0.0);
            prop_assert!(nation.gdp >= 0.0);

            if nation.is_eliminated {
                prop_assert!(nation.at_war_with.is_empty());
                prop_assert!(nation.occupied.is_empty());
            } else if nation.auto_manage_budget {
                let total = nation.civilian_allocation.total();
                prop_assert!((total - 100.0).abs() < 1e-6, "{} allocates {total}", nation.name);
            }
        }
    }
}
