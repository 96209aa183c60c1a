//! Peacetime rebuilding of military branches toward the nation's current
//! ceiling, which widens with every held foreign region.

use bevy_ecs::prelude::*;

use crate::simulation::constants::*;
use crate::simulation::{GameSpeed, ModifierKey, Nation, NationTable};

/// Budget cost multipliers per branch: army, navy, airforce.
const BRANCH_COST: [f64; 3] = [1.0, 1.8, 1.4];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Military points a nation can rebuild this tick, before the split
/// across branches.
pub fn recovery_potential(nation: &Nation, speed: GameSpeed) -> f64 {
    let econ = nation.stats.economy / STAT_MAX;
    let resources = nation.stats.resources / STAT_MAX;
    let tech = 1.0 + nation.stats.technology / RECOVERY_TECH_BONUS_SCALE;
    let budget = (nation.defense_budget_ratio / 100.0 / RECOVERY_BUDGET_ALLOCATION_EFFECT_SCALE).min(1.0);
    let manpower = (nation.population as f64 / RECOVERY_MANPOWER_AVAILABILITY_SCALE).min(1.0);
    let bonus = nation.modifier(ModifierKey::MilitaryRecoveryEfficiency);

    BASE_RECOVERY_POINTS_PER_TICK * econ * resources * tech * budget * manpower * (1.0 + bonus)
        * speed.recovery_factor()
}

/// Rebuilds a nation at peace, paying from the defense budget and the
/// population. A branch that cannot be paid for skips the tick.
pub fn recover_military(nation: &mut Nation, speed: GameSpeed) {
    if nation.is_eliminated || nation.is_at_war() {
        return;
    }
    let potential = recovery_potential(nation, speed);
    let caps = nation.max_military;
    let shares = nation.baseline.military;
    let share_total = shares.army.max(1.0) + shares.navy.max(1.0) + shares.airforce.max(1.0);

    let forces = &mut nation.military;
    let branches = [
        (&mut forces.army, caps.army, shares.army),
        (&mut forces.navy, caps.navy, shares.navy),
        (&mut forces.airforce, caps.airforce, shares.airforce),
    ];
    for ((current, cap, share), cost_factor) in branches.into_iter().zip(BRANCH_COST) {
        if *current >= cap {
            continue;
        }
        let deficit = cap - *current;
        let mut amount = (potential * share / share_total).min(deficit);
        if amount < MIN_RECOVERY_STEP {
            amount = MIN_RECOVERY_STEP;
        }

        let budget_cost = amount * RECOVERY_COST_BUDGET_PER_UNIT * cost_factor;
        let population_cost = amount * RECOVERY_COST_POP_PER_UNIT;
        if nation.defense_budget < budget_cost || (nation.population as f64) < population_cost {
            continue;
        }
        *current = round2(*current + amount).min(cap);
        nation.defense_budget -= budget_cost;
        nation.population = nation.population.saturating_sub(population_cost.round() as u64);
    }

    nation.military.army = round2(nation.military.army);
    nation.military.navy = round2(nation.military.navy);
    nation.military.airforce = round2(nation.military.airforce);
}

pub fn recovery_system(mut nations: ResMut<NationTable>, speed: Res<GameSpeed>) {
    for nation in nations.0.values_mut() {
        recover_military(nation, *speed);
    }
}
