//! Daily attrition between belligerents and the resolution of finished wars.

use std::collections::BTreeSet;

use bevy_ecs::prelude::*;
use rand::Rng;
use tracing::{debug, info};

use crate::simulation::constants::*;
use crate::simulation::{
    ActiveWars, GameDate, GameLog, LogCategory, MilitaryForces, ModifierKey, Nation, NationTable,
    OccupiedTerritory, SimRng, WarDetails, WorldTime,
};

/// Siege timer for a new war: the base duration shifted by up to five ticks
/// either way.
pub fn roll_war_duration<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    let jitter = (rng.gen_range(0.0..1.0) * f64::from(WAR_DURATION_JITTER)).floor() as u32;
    WAR_TICKS_DURATION - WAR_DURATION_JITTER / 2 + jitter.min(WAR_DURATION_JITTER - 1)
}

/// Puts both sides on a war footing, drops any offers still queued between
/// them, and lists the war.
pub fn begin_war(nations: &mut NationTable, wars: &mut ActiveWars, war: WarDetails) {
    if let Some((attacker, defender)) = nations.pair_mut(&war.attacker, &war.defender) {
        attacker.at_war_with.insert(defender.id.clone());
        defender.at_war_with.insert(attacker.id.clone());
        attacker.pending_proposals.retain(|pending| pending.from != defender.id);
        defender.pending_proposals.retain(|pending| pending.from != attacker.id);
    }
    wars.0.push(war);
}

/// Share of each branch lost this tick, before per-branch rounding.
pub fn casualty_rate(draw: f64, tech_edge: f64, own_defense: f64, enemy_attrition: f64) -> f64 {
    let rate = (0.005 + draw * 0.01)
        * (1.0 - tech_edge / NORM_TECH * TECH_EDGE_CASUALTY_FACTOR)
        * (1.0 - own_defense)
        * (1.0 + enemy_attrition);
    rate.clamp(MIN_CASUALTY_RATE, MAX_CASUALTY_RATE)
}

fn branch_loss(units: f64, rate: f64) -> f64 {
    if units <= 0.0 {
        return 0.0;
    }
    let raw = units * rate;
    if raw > 0.0 && raw < 1.0 { 1.0 } else { raw.round() }
}

/// Applies one day of losses to `nation` and returns the units lost.
fn suffer_losses(nation: &mut Nation, rate: f64) -> f64 {
    let forces = nation.military;
    let losses = MilitaryForces {
        army: branch_loss(forces.army, rate),
        navy: branch_loss(forces.navy, rate * NAVY_CASUALTY_FACTOR),
        airforce: branch_loss(forces.airforce, rate),
    };
    nation.military = MilitaryForces {
        army: (forces.army - losses.army).max(0.0),
        navy: (forces.navy - losses.navy).max(0.0),
        airforce: (forces.airforce - losses.airforce).max(0.0),
    };
    let lost = losses.total();

    let population = nation.population as f64;
    nation.population = (population - lost * POPULATION_LOSS_PER_UNIT - population * POPULATION_WAR_DRAIN)
        .round()
        .max(0.0) as u64;

    let baseline = nation.baseline.military;
    let baseline_total = baseline.army.max(1.0) + baseline.navy.max(1.0) + baseline.airforce.max(1.0);
    let gdp_loss = (BASE_GDP_WAR_LOSS + lost / baseline_total * 0.005).min(MAX_GDP_WAR_LOSS);
    nation.gdp = (nation.gdp * (1.0 - gdp_loss)).max(0.0);

    if rate > HEAVY_CASUALTY_RATE {
        nation.stats.technology = (nation.stats.technology * WAR_TECH_DECAY).round().max(WAR_STAT_FLOOR);
    }

    let drain_rate = (RESOURCE_DRAIN_BASE + nation.military.total() / RESOURCE_DRAIN_MILITARY_SCALE)
        .min(MAX_RESOURCE_DRAIN_RATE);
    let drain = (nation.stats.resources * drain_rate).max(MIN_RESOURCE_DRAIN);
    nation.stats.resources = (nation.stats.resources - drain).max(0.0);

    lost
}

/// One exchange of fire. The attacker's rate is drawn first.
fn exchange_fire<R: Rng + ?Sized>(attacker: &mut Nation, defender: &mut Nation, rng: &mut R) {
    let tech_edge = attacker.stats.technology - defender.stats.technology;
    let attacker_rate = casualty_rate(
        rng.gen_range(0.0..1.0),
        tech_edge,
        attacker.modifier(ModifierKey::DefenseEffectiveness),
        defender.modifier(ModifierKey::EnemyAttrition),
    );
    let defender_rate = casualty_rate(
        rng.gen_range(0.0..1.0),
        -tech_edge,
        defender.modifier(ModifierKey::DefenseEffectiveness),
        attacker.modifier(ModifierKey::EnemyAttrition),
    );

    suffer_losses(attacker, attacker_rate);
    suffer_losses(defender, defender_rate);

    if attacker.at_war_with.len() > 1 {
        attacker.stats.diplomacy = (attacker.stats.diplomacy * WAR_DIPLOMACY_DECAY).round().max(WAR_STAT_FLOOR);
    }
}

/// Weighted strength used when the siege timer runs out.
pub fn battle_power(nation: &Nation) -> f64 {
    let forces = nation.military;
    (forces.army + forces.airforce * 1.2 + forces.navy * 0.8) * (1.0 + nation.stats.technology / 1500.0)
}

/// Hands everything `loser` held before the battle to `winner`. The loser's
/// homeland and conquests become fresh occupations; its existing occupation
/// records carry over for any region not otherwise claimed.
pub fn conquer(winner: &mut Nation, loser: &Nation) {
    let region_count = loser.territories.len().max(1) as f64;
    let gdp_share = loser.gdp.max(1.0) / region_count;
    let resource_share = loser.stats.resources.max(1.0) / region_count;

    for region in &loser.territories {
        if !winner.territories.contains(region) {
            winner.occupied.insert(
                region.clone(),
                OccupiedTerritory::fresh(loser.id.clone(), gdp_share, resource_share),
            );
        }
    }
    for (region, record) in &loser.occupied {
        if !winner.territories.contains(region) && !winner.occupied.contains_key(region) {
            winner.occupied.insert(region.clone(), record.clone());
        }
    }

    winner.population += loser.population;
    winner.stats.technology =
        (winner.stats.technology + (loser.stats.technology * CONQUEST_TECH_SHARE).round()).min(STAT_MAX);
    winner.territories.extend(loser.territories.iter().cloned());
    winner.at_war_with.remove(&loser.id);
    winner.recompute_max_military();
}

fn fall(loser: &mut Nation, tick: u64) {
    loser.eliminate(tick);
    loser.territories.clear();
}

/// Drops a war whose side has already fallen elsewhere.
fn discard(nations: &mut NationTable, war: &WarDetails) {
    debug!(war = %war.id, "discarding war with a fallen belligerent");
    if let Some(attacker) = nations.get_mut(&war.attacker) {
        attacker.at_war_with.remove(&war.defender);
    }
    if let Some(defender) = nations.get_mut(&war.defender) {
        defender.at_war_with.remove(&war.attacker);
    }
}

/// Fights one day of `war`. Returns true once the war is over.
fn fight_round<R: Rng + ?Sized>(
    nations: &mut NationTable,
    war: &mut WarDetails,
    rng: &mut R,
    log: &mut GameLog,
    date: &GameDate,
    tick: u64,
) -> bool {
    let attacker_alive = nations.active(&war.attacker).is_some();
    let defender_before = nations.active(&war.defender).cloned();
    let Some(defender_before) = defender_before.filter(|_| attacker_alive) else {
        discard(nations, war);
        return true;
    };
    let Some((attacker, defender)) = nations.pair_mut(&war.attacker, &war.defender) else {
        discard(nations, war);
        return true;
    };

    exchange_fire(attacker, defender, rng);

    if defender.military.total() <= 0.0 {
        let message = format!(
            "{} annihilated the forces of {} and occupied it outright!",
            attacker.name, defender.name
        );
        conquer(attacker, &defender_before);
        attacker.add_aggression(-AGGRESSION_RELIEF_ANNIHILATION);
        fall(defender, tick);
        info!(war = %war.id, winner = %war.attacker, "defender annihilated");
        log.headline(LogCategory::War, Some(date), message);
        return true;
    }

    if attacker.military.total() <= 0.0 {
        let message = format!(
            "{}'s offensive collapsed with its forces wiped out. {} held firm.",
            attacker.name, defender.name
        );
        attacker.add_aggression(-AGGRESSION_RELIEF_FAILED_OFFENSIVE);
        attacker.military = MilitaryForces::default();
        attacker.eliminate(tick);
        defender.at_war_with.remove(&war.attacker);
        defender.add_aggression(-AGGRESSION_RELIEF_HELD_AGAINST_ANNIHILATION);
        info!(war = %war.id, winner = %war.defender, "attacker annihilated");
        log.headline(LogCategory::War, Some(date), message);
        return true;
    }

    war.ticks_to_resolution = war.ticks_to_resolution.saturating_sub(1);
    if war.ticks_to_resolution > 0 {
        return false;
    }

    let attack = battle_power(attacker) * (0.7 + rng.gen_range(0.0..1.0) * 0.6);
    let defense = battle_power(defender) * (0.7 + rng.gen_range(0.0..1.0) * 0.5);
    let message = if attack > defense {
        let message = format!(
            "{} won the war against {}! {} has been conquered.",
            attacker.name, defender.name, defender.name
        );
        conquer(attacker, &defender_before);
        attacker.add_aggression(-AGGRESSION_RELIEF_CONQUEST);
        fall(defender, tick);
        info!(war = %war.id, winner = %war.attacker, "conquest");
        message
    } else {
        attacker.at_war_with.remove(&war.defender);
        defender.at_war_with.remove(&war.attacker);
        attacker.add_aggression(-AGGRESSION_RELIEF_REPELLED_ATTACKER);
        defender.add_aggression(-AGGRESSION_RELIEF_REPELLED_DEFENDER);
        info!(war = %war.id, winner = %war.defender, "offensive repelled");
        format!("{} successfully repelled the attack of {}.", defender.name, attacker.name)
    };
    log.headline(LogCategory::War, Some(date), message);
    true
}

/// Advances every listed war by one day, newest first, and drops the ones
/// that ended.
pub fn resolve_wars<R: Rng + ?Sized>(
    nations: &mut NationTable,
    wars: &mut ActiveWars,
    rng: &mut R,
    log: &mut GameLog,
    date: &GameDate,
    tick: u64,
) {
    let mut ended = BTreeSet::new();
    for war in wars.0.iter_mut().rev() {
        if fight_round(nations, war, rng, log, date, tick) {
            ended.insert(war.id.clone());
        }
    }
    wars.0.retain(|war| !ended.contains(&war.id));
}

pub fn warfare_system(
    mut nations: ResMut<NationTable>,
    mut wars: ResMut<ActiveWars>,
    mut rng: ResMut<SimRng>,
    mut log: ResMut<GameLog>,
    date: Res<GameDate>,
    time: Res<WorldTime>,
) {
    resolve_wars(&mut nations, &mut wars, &mut *rng, &mut log, &date, time.tick);
}
