//! Aggression drift, AI war declarations, and the delegated opportunistic
//! wars fought on the player's behalf.

use bevy_ecs::prelude::*;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

use super::warfare::{begin_war, roll_war_duration};
use crate::simulation::constants::*;
use crate::simulation::{
    ActiveWars, Delegation, GameDate, GameLog, GameSpeed, LogCategory, ModifierKey, Nation, NationId,
    NationTable, SimRng, WarDetails, WorldTime,
};

/// Moves aggression by the peacetime build-up minus the decay.
pub fn update_aggression(nation: &mut Nation, speed: GameSpeed) {
    let build_up = (0.10
        + nation.stats.economy / 10_000.0
        + (nation.military.army + nation.military.airforce) / 2_000_000.0)
        * speed.aggression_factor();
    let decay = BASE_AGGRESSION_DECAY_PER_TICK * (1.0 + nation.modifier(ModifierKey::AggressionDecayRate));
    nation.add_aggression(build_up - decay);
}

/// Nations `actor` could attack this tick.
pub fn war_targets(nations: &NationTable, actor: &Nation, tick: u64) -> Vec<NationId> {
    nations
        .iter()
        .filter(|target| {
            !target.is_eliminated
                && target.id != actor.id
                && !target.is_at_war()
                && !target.territories.contains(&actor.id)
                && !actor.territories.contains(&target.id)
                && !actor.allies.contains(&target.id)
                && !actor.has_truce_with(&target.id, tick)
        })
        .map(|target| target.id.clone())
        .collect()
}

fn muster_score(nation: &Nation) -> f64 {
    nation.stats.economy + nation.baseline.military.army
}

/// Lets a fully wound-up AI nation pick a victim, usually the weakest one.
fn declare_out_of_aggression<R: Rng + ?Sized>(
    nations: &mut NationTable,
    wars: &mut ActiveWars,
    actor_id: &NationId,
    rng: &mut R,
    log: &mut GameLog,
    date: &GameDate,
    tick: u64,
) {
    let Some(actor) = nations.active(actor_id) else {
        return;
    };
    let threshold = MAX_AGGRESSION * (0.9 + rng.gen_range(0.0..1.0) * 0.1);
    if actor.is_player || actor.aggression < threshold {
        return;
    }
    let mut targets = war_targets(nations, actor, tick);
    let Some(mut target) = targets.choose(rng).cloned() else {
        return;
    };
    targets.sort_by(|a, b| {
        let score = |id: &NationId| nations.get(id).map_or(0.0, muster_score);
        score(a).total_cmp(&score(b))
    });
    if rng.gen_range(0.0..1.0) < WEAK_TARGET_PREFERENCE {
        if let Some(weakest) = targets.first() {
            target = weakest.clone();
        }
    }

    let Some(actor) = nations.get_mut(actor_id) else {
        return;
    };
    actor.add_aggression(-AGGRESSION_RELIEF_DECLARATION);
    if wars.has_pair(actor_id, &target) {
        return;
    }
    let war = WarDetails {
        id: format!("{actor_id}_vs_{target}_{}-{}-{tick}", date.year, date.day),
        attacker: actor_id.clone(),
        defender: target.clone(),
        start_date: date.clone(),
        ticks_to_resolution: roll_war_duration(rng),
    };
    let message = format!(
        "{} declared war on {}! (driven by aggression)",
        nations.name_of(actor_id),
        nations.name_of(&target)
    );
    info!(war = %war.id, "aggression boiled over");
    begin_war(nations, wars, war);
    log.headline(LogCategory::War, Some(date), message);
}

/// The player's delegated diplomats pounce on a weaker AI neighbour.
fn delegated_war<R: Rng + ?Sized>(
    nations: &mut NationTable,
    wars: &mut ActiveWars,
    victim_id: &NationId,
    rng: &mut R,
    log: &mut GameLog,
    date: &GameDate,
    tick: u64,
) {
    let (Some(victim), Some(player)) = (nations.active(victim_id), nations.player()) else {
        return;
    };
    let player_id = player.id.clone();
    if victim.is_player
        || player.is_eliminated
        || victim.is_at_war()
        || victim.allies.contains(&player_id)
        || victim.has_truce_with(&player_id, tick)
        || player.at_war_with.contains(victim_id)
        || player.has_truce_with(victim_id, tick)
    {
        return;
    }
    let margin = 0.8 + rng.gen_range(0.0..1.0) * 0.3;
    if victim.military.total() >= player.military.total() * margin {
        return;
    }
    if player.political_capital < PC_COST_DECLARE_WAR || rng.gen_range(0.0..1.0) >= DELEGATED_WAR_CHANCE {
        return;
    }
    if wars.has_pair(&player_id, victim_id) {
        return;
    }

    let Some(player) = nations.get_mut(&player_id) else {
        return;
    };
    player.political_capital -= PC_COST_DECLARE_WAR;
    player.add_aggression(AGGRESSION_HIT_DECLARE_WAR * DELEGATED_WAR_AGGRESSION_FACTOR);

    let war = WarDetails {
        id: format!("player_{player_id}_vs_ai_{victim_id}_{}-{}-{tick}", date.year, date.day),
        attacker: player_id.clone(),
        defender: victim_id.clone(),
        start_date: date.clone(),
        ticks_to_resolution: roll_war_duration(rng),
    };
    let message = format!(
        "[Diplomacy delegated] {} declared war on the weaker {}!",
        nations.name_of(&player_id),
        nations.name_of(victim_id)
    );
    info!(war = %war.id, "delegated war declared");
    begin_war(nations, wars, war);
    log.headline(LogCategory::War, Some(date), message);
}

/// Aggression and declarations for every nation at peace, in id order.
/// Each nation sees the declarations made by the ones before it.
#[allow(clippy::too_many_arguments)]
pub fn run_aggression<R: Rng + ?Sized>(
    nations: &mut NationTable,
    wars: &mut ActiveWars,
    rng: &mut R,
    log: &mut GameLog,
    date: &GameDate,
    tick: u64,
    speed: GameSpeed,
    delegate_diplomacy: bool,
) {
    for id in nations.ids() {
        let Some(nation) = nations.get_mut(&id) else {
            continue;
        };
        if nation.is_eliminated || nation.is_at_war() {
            continue;
        }
        update_aggression(nation, speed);

        declare_out_of_aggression(nations, wars, &id, rng, log, date, tick);
        if delegate_diplomacy {
            delegated_war(nations, wars, &id, rng, log, date, tick);
        }
    }
}

pub fn aggression_system(
    mut nations: ResMut<NationTable>,
    mut wars: ResMut<ActiveWars>,
    mut rng: ResMut<SimRng>,
    mut log: ResMut<GameLog>,
    date: Res<GameDate>,
    time: Res<WorldTime>,
    speed: Res<GameSpeed>,
    delegation: Res<Delegation>,
) {
    run_aggression(
        &mut nations,
        &mut wars,
        &mut *rng,
        &mut log,
        &date,
        time.tick,
        *speed,
        delegation.auto_delegate_diplomacy,
    );
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::simulation::testing::WorldBuilder;

    fn id(raw: &str) -> NationId {
        NationId::from(raw)
    }

    #[test]
    fn aggression_builds_with_speed_and_decays_with_policy() {
        let mut nation = Nation::from_record(crate::simulation::country("410").unwrap());
        nation.aggression = 10.0;
        update_aggression(&mut nation, GameSpeed::Normal);
        let build_up = (0.10 + 60.0 / 10_000.0 + 648.0 / 2_000_000.0) * 2.0;
        assert!((nation.aggression - (10.0 + build_up - BASE_AGGRESSION_DECAY_PER_TICK)).abs() < 1e-9);

        nation.aggression = 0.0;
        nation.policy_modifiers.0.insert(ModifierKey::AggressionDecayRate, 100.0);
        update_aggression(&mut nation, GameSpeed::Paused);
        assert_eq!(nation.aggression, 0.0);
    }

    #[test]
    fn targets_exclude_allies_truces_and_belligerents() {
        let fixture = WorldBuilder::new()
            .with_country("410")
            .with_country("392")
            .with_country("408")
            .with_country("156")
            .with_country("840")
            .allied("410", "392")
            .at_war("156", "840")
            .with_nation("410", |n| {
                n.truces.push(crate::simulation::Truce {
                    target: NationId::from("408"),
                    end_tick: 50,
                });
            })
            .build_fixture();
        let korea = fixture.nations.get(&id("410")).unwrap();

        assert!(war_targets(&fixture.nations, korea, 10).is_empty());
        assert_eq!(war_targets(&fixture.nations, korea, 50), vec![id("408")]);
    }

    #[test]
    fn maxed_aggression_declares_on_the_weakest_target() {
        let mut fixture = WorldBuilder::new()
            .with_country("156")
            .with_country("392")
            .with_country("408")
            .with_nation("156", |n| n.aggression = MAX_AGGRESSION)
            .at_tick(12)
            .build_fixture();

        run_aggression(
            &mut fixture.nations,
            &mut fixture.wars,
            &mut StepRng::new(0, 0),
            &mut fixture.log,
            &fixture.date,
            12,
            GameSpeed::Normal,
            false,
        );

        assert_eq!(fixture.wars.0.len(), 1);
        let war = &fixture.wars.0[0];
        assert_eq!(war.attacker, id("156"));
        assert_eq!(war.defender, id("408"));
        assert_eq!(war.id, "156_vs_408_1-1-12");
        let china = fixture.nations.get(&id("156")).unwrap();
        assert!(china.aggression < 40.0);
        assert!(china.at_war_with.contains(&id("408")));
        assert_eq!(
            fixture.log.status_message(),
            "China declared war on North Korea! (driven by aggression)"
        );
    }

    #[test]
    fn the_player_still_rolls_the_declaration_threshold() {
        let mut fixture = WorldBuilder::new()
            .with_country("410")
            .with_country("408")
            .player("410")
            .with_nation("410", |n| n.aggression = MAX_AGGRESSION)
            .build_fixture();
        let mut rng = StepRng::new(0, 1);

        declare_out_of_aggression(
            &mut fixture.nations,
            &mut fixture.wars,
            &id("410"),
            &mut rng,
            &mut fixture.log,
            &fixture.date,
            1,
        );

        assert!(fixture.wars.0.is_empty());
        assert_eq!(rand::RngCore::next_u64(&mut rng), 1);
    }

    #[test]
    fn delegated_diplomacy_attacks_a_weaker_neighbour() {
        let mut fixture = WorldBuilder::new()
            .with_country("840")
            .with_country("408")
            .player("840")
            .with_nation("840", |n| n.political_capital = 80.0)
            .at_tick(3)
            .build_fixture();

        run_aggression(
            &mut fixture.nations,
            &mut fixture.wars,
            &mut StepRng::new(0, 0),
            &mut fixture.log,
            &fixture.date,
            3,
            GameSpeed::Normal,
            true,
        );

        assert_eq!(fixture.wars.0.len(), 1);
        let war = &fixture.wars.0[0];
        assert_eq!(war.id, "player_840_vs_ai_408_1-1-3");
        let usa = fixture.nations.get(&id("840")).unwrap();
        assert_eq!(usa.political_capital, 80.0 - PC_COST_DECLARE_WAR);
        assert!(usa.at_war_with.contains(&id("408")));
        assert!(fixture.log.status_message().starts_with("[Diplomacy delegated]"));
    }

    #[test]
    fn delegation_off_means_no_opportunistic_war() {
        let mut fixture = WorldBuilder::new()
            .with_country("840")
            .with_country("408")
            .player("840")
            .build_fixture();

        run_aggression(
            &mut fixture.nations,
            &mut fixture.wars,
            &mut StepRng::new(0, 0),
            &mut fixture.log,
            &fixture.date,
            1,
            GameSpeed::Normal,
            false,
        );
        assert!(fixture.wars.0.is_empty());
    }
}
