//! Political capital, GDP and stat growth, with the occupation sub-engine.

use bevy_ecs::prelude::*;
use rand::Rng;

use super::occupation::{occupied_income, update_occupation};
use crate::simulation::constants::*;
use crate::simulation::{GameDate, GameLog, LogCategory, ModifierKey, Nation, NationTable, SimRng, WorldTime};

/// Per-tick growth rates before they are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthRates {
    pub gdp: f64,
    pub technology: f64,
    pub diplomacy: f64,
    pub resources: f64,
}

const MIN_GDP_GROWTH_RATE: f64 = 0.00001;
const MIN_POINT_GAIN: f64 = 0.001;

/// Growth rates from the civilian allocation and modifiers, minus the
/// opportunity cost of a defense budget above the soft cap.
pub fn growth_rates(nation: &Nation) -> GrowthRates {
    let plan = nation.civilian_allocation;
    let mut rates = GrowthRates {
        gdp: BASE_GDP_GROWTH_RATE_PER_TICK * (1.0 + plan.economy / BUDGET_ECONOMY_EFFECT_SCALE)
            + nation.modifier(ModifierKey::GdpGrowthRate),
        technology: BASE_TECH_POINTS_PER_TICK * (1.0 + plan.technology / BUDGET_TECHNOLOGY_EFFECT_SCALE)
            + nation.modifier(ModifierKey::TechPointsPerTick),
        diplomacy: BASE_DIPLOMACY_POINTS_PER_TICK * (1.0 + plan.diplomacy / BUDGET_DIPLOMACY_EFFECT_SCALE)
            + nation.modifier(ModifierKey::DiplomacyPointsPerTick),
        resources: BASE_RESOURCE_POINTS_PER_TICK * (1.0 + plan.resources / BUDGET_RESOURCES_EFFECT_SCALE)
            + nation.modifier(ModifierKey::ResourcePointsPerTick),
    };

    let excess = nation.defense_budget_ratio - MAX_DEFENSE_BUDGET_RATIO_SOFT_CAP;
    if excess > 0.0 {
        rates.gdp -= excess * DEFENSE_SPENDING_PENALTY_GDP_FACTOR;
        rates.resources -= excess * DEFENSE_SPENDING_PENALTY_RESOURCE_FACTOR;
        rates.diplomacy -= excess * DEFENSE_SPENDING_PENALTY_DIPLOMACY_FACTOR;
    }

    GrowthRates {
        gdp: rates.gdp.max(MIN_GDP_GROWTH_RATE),
        technology: rates.technology.max(MIN_POINT_GAIN),
        diplomacy: rates.diplomacy.max(MIN_POINT_GAIN),
        resources: rates.resources.max(MIN_POINT_GAIN),
    }
}

/// Economy stat derived from GDP.
pub fn economy_stat(gdp: f64) -> f64 {
    (gdp / 1e12 * ECONOMY_STAT_PER_TRILLION).round().clamp(ECONOMY_STAT_FLOOR, STAT_MAX)
}

/// One tick of growth for a single live nation.
pub fn grow_nation<R: Rng + ?Sized>(nation: &mut Nation, rng: &mut R, log: &mut GameLog, date: &GameDate, tick: u64) {
    let pc_growth = BASE_POLITICAL_CAPITAL_PER_TICK
        + nation.stats.diplomacy / POLITICAL_CAPITAL_FROM_DIPLOMACY_SCALE
        + nation.modifier(ModifierKey::PoliticalCapitalPerTick);
    nation.add_political_capital(pc_growth);

    update_occupation(nation, rng, log, date);

    let rates = growth_rates(nation);
    if nation.is_player
        && nation.defense_budget_ratio > MAX_DEFENSE_BUDGET_RATIO_SOFT_CAP
        && tick % OVERSPEND_WARNING_INTERVAL == 0
    {
        log.push(
            LogCategory::Budget,
            Some(date),
            format!(
                "{}: excessive defense spending ({:.1}% of GDP) is straining the economy, resources and diplomacy!",
                nation.name, nation.defense_budget_ratio
            ),
        );
    }

    let mut gdp = nation.gdp;
    if !nation.is_at_war() {
        gdp *= 1.0 + rates.gdp;
    }
    let (occupied_gdp, occupied_resources) = occupied_income(nation);

    nation.gdp = (gdp + occupied_gdp).max(1.0);
    nation.stats.resources = (nation.stats.resources + rates.resources + occupied_resources).clamp(0.0, STAT_MAX);
    nation.stats.technology = (nation.stats.technology + rates.technology).clamp(0.0, STAT_MAX);
    nation.stats.diplomacy = (nation.stats.diplomacy + rates.diplomacy).clamp(0.0, STAT_MAX);
    nation.stats.economy = economy_stat(nation.gdp);
}

pub fn economy_system(
    mut nations: ResMut<NationTable>,
    mut rng: ResMut<SimRng>,
    mut log: ResMut<GameLog>,
    date: Res<GameDate>,
    time: Res<WorldTime>,
) {
    for nation in nations.0.values_mut().filter(|n| !n.is_eliminated) {
        grow_nation(nation, &mut *rng, &mut log, &date, time.tick);
    }
}
