//! Automatic defense and civilian budget management.

use bevy_ecs::prelude::*;
use tracing::debug;

use crate::simulation::constants::*;
use crate::simulation::{AllocationWeights, CivilianAllocation, Nation, NationTable, SimulationConfig};

fn wartime_plan(nation: &mut Nation) {
    nation.defense_budget_ratio =
        (nation.defense_budget_ratio + 0.5).min(20.0).max(8.0).min(MAX_DEFENSE_BUDGET_RATIO_HARD_CAP);

    let plan = &mut nation.civilian_allocation;
    let mut remaining = 100.0;
    plan.technology = (plan.technology + 1.0).clamp(20.0, 40.0);
    remaining -= plan.technology;
    plan.resources = (plan.resources + 0.5).clamp(15.0, 30.0);
    remaining -= plan.resources;
    plan.economy = (remaining * 0.6).clamp(10.0, 30.0);
    remaining -= plan.economy;
    plan.diplomacy = remaining.max(5.0);
}

fn peacetime_plan(nation: &mut Nation, weights: &AllocationWeights) {
    nation.defense_budget_ratio = (nation.defense_budget_ratio - 0.2).min(DEFAULT_DEFENSE_BUDGET_RATIO).max(3.0);

    let stats = nation.stats;
    let mut plan = nation.civilian_allocation;
    if stats.technology < stats.economy * 0.8 && stats.technology < 700.0 {
        plan.technology = (plan.technology + 2.0).min(40.0);
    } else if plan.technology > 25.0 {
        plan.technology -= 1.0;
    }
    if stats.resources < 300.0 {
        plan.resources = (plan.resources + 2.0).min(35.0);
    } else if plan.resources > 20.0 {
        plan.resources -= 1.0;
    }
    if stats.diplomacy < 400.0 {
        plan.diplomacy = (plan.diplomacy + 1.0).min(30.0);
    } else if plan.diplomacy > 15.0 {
        plan.diplomacy -= 0.5;
    }

    let total = plan.total();
    if total != 100.0 {
        let gap = 100.0 - total;
        plan.economy = (plan.economy + gap * weights.economy).max(10.0);
        plan.technology = (plan.technology + gap * weights.technology).max(10.0);
        plan.diplomacy = (plan.diplomacy + gap * weights.diplomacy).max(5.0);
        plan.resources = (plan.resources + gap * weights.resources).max(5.0);

        let total = plan.total();
        if total > 0.0 && total != 100.0 {
            let scale = 100.0 / total;
            plan.economy *= scale;
            plan.technology *= scale;
            plan.diplomacy *= scale;
            plan.resources *= scale;
        } else if total == 0.0 {
            debug!(nation = %nation.id, "civilian plan collapsed, restoring defaults");
            plan = CivilianAllocation::default();
        }
    }
    nation.civilian_allocation = plan;
}

/// Rounds every bucket to a whole percent and pushes the rounding error
/// into the economy bucket.
pub fn settle_allocation(plan: &mut CivilianAllocation) {
    plan.economy = plan.economy.round();
    plan.technology = plan.technology.round();
    plan.diplomacy = plan.diplomacy.round();
    plan.resources = plan.resources.round();
    let sum = plan.total();
    if sum > 0.0 && sum != 100.0 {
        plan.economy += 100.0 - sum;
    } else if sum == 0.0 {
        *plan = CivilianAllocation::default();
    }
}

/// Re-plans the budget of an AI nation, or of the player while automation
/// is on, then refreshes the defense budget from GDP.
pub fn manage_budget(nation: &mut Nation, weights: &AllocationWeights) {
    if nation.auto_manage_budget || !nation.is_player {
        if nation.is_at_war() {
            wartime_plan(nation);
        } else {
            peacetime_plan(nation, weights);
        }
        settle_allocation(&mut nation.civilian_allocation);
    }
    nation.defense_budget = nation.gdp * nation.defense_budget_ratio / 100.0;
}

pub fn budget_system(mut nations: ResMut<NationTable>, config: Res<SimulationConfig>) {
    for nation in nations.0.values_mut().filter(|n| !n.is_eliminated) {
        manage_budget(nation, &config.allocation_weights);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{NationId, country};

    fn nation(id: &str) -> Nation {
        Nation::from_record(country(id).unwrap())
    }

    #[test]
    fn wartime_raises_defense_and_favours_technology() {
        let mut korea = nation("410");
        korea.at_war_with.insert(NationId::from("408"));
        korea.defense_budget_ratio = 5.0;

        manage_budget(&mut korea, &AllocationWeights::default());

        assert_eq!(korea.defense_budget_ratio, 8.0);
        let plan = korea.civilian_allocation;
        assert_eq!(plan.technology, 31.0);
        assert_eq!(plan.resources, 21.0);
        assert_eq!(plan.economy, 29.0);
        assert_eq!(plan.diplomacy, 19.0);
        assert_eq!(plan.total(), 100.0);
        assert!((korea.defense_budget / korea.gdp - 0.08).abs() < 1e-12);
    }

    #[test]
    fn peacetime_ratio_settles_toward_the_default() {
        let mut korea = nation("410");
        korea.defense_budget_ratio = 9.0;
        manage_budget(&mut korea, &AllocationWeights::default());
        assert_eq!(korea.defense_budget_ratio, DEFAULT_DEFENSE_BUDGET_RATIO);

        korea.defense_budget_ratio = 4.0;
        manage_budget(&mut korea, &AllocationWeights::default());
        assert!((korea.defense_budget_ratio - 3.8).abs() < 1e-9);
        assert_eq!(korea.civilian_allocation.total(), 100.0);
    }

    #[test]
    fn manual_player_budgets_are_left_alone() {
        let mut korea = nation("410");
        korea.is_player = true;
        korea.auto_manage_budget = false;
        korea.defense_budget_ratio = 12.0;
        let plan = CivilianAllocation {
            economy: 70.0,
            technology: 10.0,
            diplomacy: 10.0,
            resources: 10.0,
        };
        korea.civilian_allocation = plan;

        manage_budget(&mut korea, &AllocationWeights::default());

        assert_eq!(korea.defense_budget_ratio, 12.0);
        assert_eq!(korea.civilian_allocation, plan);
        assert!((korea.defense_budget / korea.gdp - 0.12).abs() < 1e-12);
    }

    #[test]
    fn settling_moves_rounding_error_into_economy() {
        let mut plan = CivilianAllocation {
            economy: 33.4,
            technology: 33.4,
            diplomacy: 16.6,
            resources: 16.6,
        };
        settle_allocation(&mut plan);
        assert_eq!(plan.economy, 33.0);
        assert_eq!(plan.technology, 33.0);
        assert_eq!(plan.diplomacy, 17.0);
        assert_eq!(plan.resources, 17.0);

        let mut empty = CivilianAllocation {
            economy: 0.2,
            technology: 0.2,
            diplomacy: 0.0,
            resources: 0.0,
        };
        settle_allocation(&mut empty);
        assert_eq!(empty, CivilianAllocation::default());
    }
}
