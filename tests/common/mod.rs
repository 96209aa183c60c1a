#![allow(dead_code)]

use rand::rngs::mock::StepRng;

use geopolitics_sim::simulation::{
    ActiveWars, Catalog, GameDate, Nation, NationId, NationTable, SimulationConfig, SimulationWorld, WarDetails,
    country,
};

pub fn id(raw: &str) -> NationId {
    NationId::from(raw)
}

/// Nations at their baseline figures.
pub fn table(ids: &[&str]) -> NationTable {
    let mut nations = NationTable::default();
    for raw in ids {
        nations.insert(Nation::from_record(country(raw).expect("known country")));
    }
    nations
}

pub fn edit(nations: &mut NationTable, raw: &str, change: impl FnOnce(&mut Nation)) {
    change(nations.get_mut(&id(raw)).expect("nation in table"));
}

/// Lists a war and puts both sides on a war footing.
pub fn war(nations: &mut NationTable, wars: &mut ActiveWars, attacker: &str, defender: &str, ticks: u32) {
    edit(nations, attacker, |n| {
        n.at_war_with.insert(id(defender));
    });
    edit(nations, defender, |n| {
        n.at_war_with.insert(id(attacker));
    });
    wars.0.push(WarDetails {
        id: format!("{attacker}_vs_{defender}_1-1-0"),
        attacker: id(attacker),
        defender: id(defender),
        start_date: GameDate::start("era_early"),
        ticks_to_resolution: ticks,
    });
}

/// A world resumed from `nations` where every draw is zero and nothing is
/// delegated.
pub fn resumed(nations: NationTable, wars: ActiveWars) -> SimulationWorld {
    let catalog = Catalog::builtin().expect("builtin catalog");
    let mut simulation = SimulationWorld::new(SimulationConfig::default(), catalog);
    simulation.set_rng(StepRng::new(0, 0));
    simulation.resume(nations, wars, 0);
    assert_eq!(simulation.toggle_auto_enact_policies(), Ok(false));
    assert_eq!(simulation.toggle_auto_delegate_diplomacy(), Ok(false));
    simulation
}

pub fn seeded(seed: u64, player: &str) -> SimulationWorld {
    let config = SimulationConfig {
        seed: Some(seed),
        ..SimulationConfig::default()
    };
    let mut simulation = SimulationWorld::new(config, Catalog::builtin().expect("builtin catalog"));
    simulation.start_game(&id(player)).expect("known player");
    simulation
}
