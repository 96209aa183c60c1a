//! Resistance, rebellion and garrison fighting in occupied regions.

use rand::Rng;
use tracing::debug;

use crate::simulation::constants::*;
use crate::simulation::{GameDate, GameLog, LogCategory, ModifierKey, Nation, RegionId, country};

fn region_name(region: &RegionId) -> String {
    country(region.as_str())
        .map(|record| record.name.to_string())
        .unwrap_or_else(|| format!("territory {region}"))
}

/// Advances every region `nation` occupies by one tick.
pub fn update_occupation<R: Rng + ?Sized>(nation: &mut Nation, rng: &mut R, log: &mut GameLog, date: &GameDate) {
    if nation.occupied.is_empty() {
        return;
    }
    let resistance_bonus = nation.modifier(ModifierKey::ResistanceGrowthRate);
    let risk_bonus = nation.modifier(ModifierKey::RebellionRiskChangeRate);
    let penalty_bonus = nation.modifier(ModifierKey::RebellionEventPenalty);
    let suppression = nation.modifier(ModifierKey::RebelSuppression);
    let garrison_bonus = nation.modifier(ModifierKey::GarrisonEffectiveness);
    let technology = nation.stats.technology;
    let occupier = nation.name.clone();

    for (region, territory) in nation.occupied.iter_mut() {
        territory.production_disruption_ticks = territory.production_disruption_ticks.saturating_sub(1);

        let resistance_change = RESISTANCE_GROWTH_PER_TICK * (1.0 + resistance_bonus);
        territory.resistance_level = (territory.resistance_level + resistance_change).clamp(0.0, MAX_RESISTANCE_LEVEL);

        let mut risk_change = if territory.resistance_level > MIN_RESISTANCE_FOR_RISK_GROWTH {
            territory.resistance_level / MAX_RESISTANCE_LEVEL * (1.0 / REBELLION_RISK_FROM_RESISTANCE_SCALE) * 0.5
        } else {
            -REBELLION_RISK_DECAY_PER_TICK
        };
        risk_change *= 1.0 + risk_bonus;
        territory.rebellion_risk = (territory.rebellion_risk + risk_change).clamp(0.0, MAX_REBELLION_RISK);

        let name = region_name(region);

        if territory.rebellion_risk >= REBELLION_RISK_THRESHOLD
            && territory.production_disruption_ticks == 0
            && rng.gen_range(0.0..1.0) < territory.rebellion_risk / REBELLION_CHANCE_DIVISOR
        {
            let pc_penalty = REBELLION_PC_PENALTY_BASE * (1.0 + penalty_bonus);
            nation.political_capital = (nation.political_capital - pc_penalty).max(0.0);
            let jitter = (rng.gen_range(0.0..1.0) * REBELLION_DISRUPTION_JITTER).floor() as u32;
            territory.production_disruption_ticks = REBELLION_PRODUCTION_DISRUPTION_TICKS_BASE + jitter;
            log.push(
                LogCategory::Occupation,
                Some(date),
                format!(
                    "Rebellion in {occupier}'s occupied {name}! Political capital -{pc_penalty:.1}, production disrupted for {} ticks.",
                    territory.production_disruption_ticks
                ),
            );

            let strength = territory.rebellion_risk
                * REBEL_GENERATION_SCALE_FROM_RISK
                * (1.0 - technology / REBEL_GENERATION_TECH_SUPPRESSION_FACTOR).max(0.1)
                * (1.0 - suppression).max(0.1);
            territory.rebel_strength = strength.round().max(MIN_REBEL_STRENGTH);
            log.push(
                LogCategory::Occupation,
                Some(date),
                format!("Rebels rise in {name} (strength {:.0}).", territory.rebel_strength),
            );
            territory.rebellion_risk = (territory.rebellion_risk - REBELLION_POST_EVENT_RISK_REDUCTION).max(0.0);
            territory.resistance_level =
                (territory.resistance_level - REBELLION_POST_EVENT_RESISTANCE_REDUCTION).max(0.0);
        }

        if territory.rebel_strength > 0.0 {
            let garrison = GARRISON_BASE_EFFECTIVENESS * (1.0 + technology / 1000.0) * (1.0 + garrison_bonus);
            let rebels = territory.rebel_strength;
            let rebel_losses =
                rebels * (garrison / (garrison + rebels)) * REBEL_VS_GARRISON_ATTRITION_FACTOR * (1.0 + suppression);
            let casualties = (garrison * (rebels / (garrison + rebels))
                * REBEL_VS_GARRISON_ATTRITION_FACTOR
                * GARRISON_LOSS_FACTOR_VS_REBELS)
                .round()
                .clamp(0.0, nation.military.army.max(0.0));

            territory.rebel_strength = (rebels - rebel_losses).round().max(0.0);
            nation.military.army = (nation.military.army - casualties).max(0.0);
            if casualties > 0.0 {
                log.push(
                    LogCategory::Occupation,
                    Some(date),
                    format!(
                        "{occupier}'s garrison clashed with rebels in {name}: {casualties:.0} casualties, {:.0} rebels remain.",
                        territory.rebel_strength
                    ),
                );
            }

            if territory.rebel_strength <= 0.0 {
                territory.rebel_strength = 0.0;
                log.push(
                    LogCategory::Occupation,
                    Some(date),
                    format!("The rebels in {name} were suppressed by the garrison."),
                );
                territory.rebellion_risk = (territory.rebellion_risk
                    - REBELLION_POST_EVENT_RISK_REDUCTION * SUPPRESSION_REDUCTION_MULTIPLIER)
                    .max(0.0);
                territory.resistance_level = (territory.resistance_level
                    - REBELLION_POST_EVENT_RESISTANCE_REDUCTION * SUPPRESSION_REDUCTION_MULTIPLIER)
                    .max(0.0);
            }
            if territory.rebel_strength > REBEL_STRENGTH_DISRUPTION_THRESHOLD
                && territory.production_disruption_ticks == 0
            {
                debug!(%region, "rebel activity disrupts production");
                territory.production_disruption_ticks = 1;
            }
        }
    }
}

/// GDP and resource income of all occupied regions after the resistance
/// penalty and the policy income bonus.
pub fn occupied_income(nation: &Nation) -> (f64, f64) {
    let income_bonus = nation.modifier(ModifierKey::OccupiedTerritoryIncome);
    nation.occupied.values().fold((0.0, 0.0), |(gdp, resources), territory| {
        let mut penalty = territory.resistance_level / MAX_RESISTANCE_LEVEL * RESISTANCE_INCOME_PENALTY_FACTOR;
        if territory.is_disrupted() {
            penalty = penalty.max(DISRUPTED_INCOME_PENALTY);
        }
        let share = (1.0 - penalty) * (1.0 + income_bonus);
        (
            gdp + territory.base_gdp_contribution * share,
            resources + territory.base_resource_contribution * share,
        )
    })
}
