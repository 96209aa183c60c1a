mod common;

use std::collections::BTreeSet;

use rand::rngs::mock::StepRng;

use common::{edit, id, resumed, table, war};
use geopolitics_sim::simulation::constants::*;
use geopolitics_sim::simulation::systems::economy::growth_rates;
use geopolitics_sim::simulation::systems::warfare::resolve_wars;
use geopolitics_sim::simulation::{
    ActionError, ActiveWars, GameDate, GameLog, GamePhase, LogCategory, MilitaryForces, OccupiedTerritory, Truce,
};

#[test]
fn peacetime_tick_grows_the_player_economy() {
    let mut nations = table(&["410", "392"]);
    edit(&mut nations, "410", |n| {
        n.is_player = true;
        n.gdp = 1e12;
        n.stats.technology = 500.0;
        n.defense_budget_ratio = 5.0;
        n.auto_manage_budget = false;
    });
    let before = nations.get(&id("410")).cloned().expect("korea");
    let rates = growth_rates(&before);
    let mut simulation = resumed(nations, ActiveWars::default());
    assert!(!simulation.delegation().auto_enact_policies);
    assert!(!simulation.delegation().auto_delegate_diplomacy);

    simulation.tick();

    let korea = simulation.nations().get(&id("410")).expect("korea");
    assert!((korea.gdp - 1e12 * (1.0 + rates.gdp)).abs() < 1.0);
    assert!((korea.stats.technology - (500.0 + rates.technology)).abs() < 1e-9);
    assert_eq!(korea.stats.economy, 35.0);
    assert_eq!(simulation.history().0.len(), 1);
    assert_eq!(simulation.current_tick(), 1);
}

#[test]
fn an_attack_without_forces_eliminates_the_attacker() {
    let mut nations = table(&["410", "408", "392"]);
    let mut wars = ActiveWars::default();
    war(&mut nations, &mut wars, "408", "410", WAR_TICKS_DURATION);
    edit(&mut nations, "408", |n| n.military = MilitaryForces::default());
    let mut simulation = resumed(nations, wars);

    simulation.tick();

    let north = simulation.nations().get(&id("408")).expect("north korea");
    let south = simulation.nations().get(&id("410")).expect("south korea");
    assert!(north.is_eliminated);
    assert!(north.at_war_with.is_empty());
    assert!(!south.is_eliminated);
    assert!(south.at_war_with.is_empty());
    assert!(simulation.wars().0.is_empty());
    assert_eq!(simulation.phase(), GamePhase::Playing);
}

#[test]
fn rebellion_in_an_occupied_region_costs_political_capital() {
    let mut nations = table(&["410", "392"]);
    edit(&mut nations, "410", |n| {
        let mut territory = OccupiedTerritory::fresh(id("408"), 3.0e10, 520.0);
        territory.rebellion_risk = 70.0;
        territory.resistance_level = 50.0;
        territory.production_disruption_ticks = 0;
        n.occupied.insert(id("408"), territory);
        n.recompute_max_military();
    });
    let before = nations.get(&id("410")).cloned().expect("korea");
    let mut simulation = resumed(nations, ActiveWars::default());

    simulation.tick();

    let korea = simulation.nations().get(&id("410")).expect("korea");
    let growth = BASE_POLITICAL_CAPITAL_PER_TICK + before.stats.diplomacy / POLITICAL_CAPITAL_FROM_DIPLOMACY_SCALE;
    assert!((korea.political_capital - (before.political_capital + growth - REBELLION_PC_PENALTY_BASE)).abs() < 1e-9);
    let region = &korea.occupied[&id("408")];
    assert!(region.production_disruption_ticks > 0);
    assert!(region.rebel_strength >= MIN_REBEL_STRENGTH);
    assert!(
        simulation
            .log()
            .entries()
            .any(|entry| entry.category == LogCategory::Occupation && entry.message.starts_with("Rebellion in"))
    );
}

#[test]
fn alliance_offers_need_warm_relations() {
    let mut nations = table(&["410", "392"]);
    edit(&mut nations, "410", |n| n.is_player = true);
    let mut simulation = resumed(nations, ActiveWars::default());

    let result = simulation.propose_alliance(&id("410"), &id("392"));

    assert!(matches!(result, Err(ActionError::RelationTooLow { .. })));
    let latest = simulation.log().latest().expect("rejection logged");
    assert_eq!(latest.category, LogCategory::Rejection);
    let japan = simulation.nations().get(&id("392")).expect("japan");
    assert!(japan.pending_proposals.is_empty());
}

#[test]
fn accepted_truce_removes_the_war_for_both_sides() {
    let mut nations = table(&["410", "392"]);
    let mut wars = ActiveWars::default();
    war(&mut nations, &mut wars, "410", "392", WAR_TICKS_DURATION);
    let mut simulation = resumed(nations, wars);

    simulation.offer_truce(&id("392"), &id("410")).expect("truce offered");
    simulation
        .respond_to_proposal(&id("410"), "truce_392_410_0", true)
        .expect("truce accepted");

    assert!(simulation.wars().0.is_empty());
    for (nation, other) in [("410", "392"), ("392", "410")] {
        let nation = simulation.nations().get(&id(nation)).expect("belligerent");
        assert!(nation.at_war_with.is_empty());
        assert_eq!(
            nation.truces,
            vec![Truce {
                target: id(other),
                end_tick: DEFAULT_TRUCE_DURATION_TICKS,
            }]
        );
    }
}

#[test]
fn an_undefended_nation_falls_before_the_timer_runs_out() {
    let mut nations = table(&["408", "410", "392"]);
    let mut wars = ActiveWars::default();
    war(&mut nations, &mut wars, "408", "410", WAR_TICKS_DURATION);
    edit(&mut nations, "410", |n| n.military = MilitaryForces::default());
    let mut simulation = resumed(nations, wars);

    simulation.tick();

    let winner = simulation.nations().get(&id("408")).expect("north korea");
    let loser = simulation.nations().get(&id("410")).expect("south korea");
    assert!(loser.is_eliminated);
    assert!(loser.territories.is_empty());
    assert!(winner.territories.contains(&id("408")));
    assert!(winner.territories.contains(&id("410")));
    assert!(winner.occupied.contains_key(&id("410")));
    assert!(winner.at_war_with.is_empty());
    assert!(simulation.wars().0.is_empty());
}

#[test]
fn conquest_hands_over_the_pre_battle_population_and_every_region() {
    let mut nations = table(&["408", "410", "392"]);
    let mut wars = ActiveWars::default();
    war(&mut nations, &mut wars, "408", "410", WAR_TICKS_DURATION);
    edit(&mut nations, "408", |n| n.military = MilitaryForces::default());
    edit(&mut nations, "410", |n| {
        n.military = MilitaryForces::default();
        n.territories.insert(id("392"));
    });
    let attacker = nations.get(&id("408")).cloned().expect("north korea");
    let defender = nations.get(&id("410")).cloned().expect("south korea");
    // Without units to lose the attacker only pays the flat war drain.
    let population = attacker.population as f64;
    let after_exchange = (population - population * POPULATION_WAR_DRAIN).round() as u64;

    resolve_wars(
        &mut nations,
        &mut wars,
        &mut StepRng::new(0, 0),
        &mut GameLog::default(),
        &GameDate::start("era_early"),
        1,
    );

    let winner = nations.get(&id("408")).expect("north korea");
    assert!(nations.get(&id("410")).is_some_and(|n| n.is_eliminated));
    assert_eq!(winner.population, after_exchange + defender.population);
    let expected: BTreeSet<_> = attacker.territories.union(&defender.territories).cloned().collect();
    assert_eq!(winner.territories, expected);
    assert!(wars.0.is_empty());
}

#[test]
fn war_timers_count_down_until_the_war_ends() {
    let mut nations = table(&["840", "156"]);
    let mut wars = ActiveWars::default();
    war(&mut nations, &mut wars, "840", "156", 5);
    let mut simulation = resumed(nations, wars);

    let mut last = 5;
    let mut ticks = 0;
    while let Some(active) = simulation.wars().0.first() {
        assert!(active.ticks_to_resolution <= last);
        last = active.ticks_to_resolution;
        simulation.tick();
        ticks += 1;
        if let Some(still) = simulation.wars().0.first() {
            assert!(still.ticks_to_resolution < last);
        }
        assert!(ticks <= 5);
    }

    assert_eq!(ticks, 5);
    let usa = simulation.nations().get(&id("840")).expect("usa");
    let china = simulation.nations().get(&id("156")).expect("china");
    assert!(!usa.at_war_with.contains(&id("156")));
    assert!(!china.at_war_with.contains(&id("840")));
}

#[test]
fn losing_the_homeland_ends_the_game() {
    let mut nations = table(&["410", "408", "392"]);
    let mut wars = ActiveWars::default();
    war(&mut nations, &mut wars, "408", "410", WAR_TICKS_DURATION);
    edit(&mut nations, "410", |n| {
        n.is_player = true;
        n.military = MilitaryForces::default();
    });
    let mut simulation = resumed(nations, wars);

    simulation.tick();

    assert_eq!(simulation.phase(), GamePhase::GameOver);
    let outcome = simulation.outcome().expect("outcome recorded");
    assert!(!outcome.player_won);
    assert_eq!(outcome.winner_name, "North Korea");
    assert_eq!(outcome.ranking.last().map(|r| r.id.clone()), Some(id("410")));
    let latest = simulation.log().latest().expect("game over logged");
    assert_eq!(latest.category, LogCategory::GameOver);
    assert_eq!(latest.message, "South Korea was conquered by North Korea. Game over.");

    let tick = simulation.current_tick();
    simulation.tick();
    assert_eq!(simulation.current_tick(), tick);
    assert!(matches!(
        simulation.improve_relations(&id("410"), &id("392")),
        Err(ActionError::NoGame)
    ));

    let snapshot = simulation.observer();
    let snapshot = snapshot.read().expect("observer lock");
    assert_eq!(snapshot.phase, GamePhase::GameOver);
    assert!(snapshot.outcome.is_some());
}
