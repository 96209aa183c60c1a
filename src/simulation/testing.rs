//! Fixture builders for engine tests.

use rand::RngCore;

use crate::simulation::actions::ActionContext;
use crate::simulation::constants::{PLAYER_STARTING_POLITICAL_CAPITAL, WAR_TICKS_DURATION};
use crate::simulation::systems::warfare::begin_war;
use crate::simulation::{
    ActiveWars, Catalog, GameDate, GameLog, Nation, NationId, NationTable, OccupiedTerritory, WarDetails,
    country,
};

/// World state a test can hand to engine functions directly.
pub struct Fixture {
    pub nations: NationTable,
    pub wars: ActiveWars,
    pub log: GameLog,
    pub catalog: Catalog,
    pub date: GameDate,
    pub tick: u64,
}

impl Fixture {
    pub fn context<'a>(&'a mut self, rng: &'a mut dyn RngCore) -> ActionContext<'a> {
        ActionContext {
            nations: &mut self.nations,
            wars: &mut self.wars,
            log: &mut self.log,
            rng,
            catalog: &self.catalog,
            date: &self.date,
            tick: self.tick,
        }
    }
}

/// Chained setup steps, applied in call order.
pub struct WorldBuilder {
    fixture: Fixture,
}

impl WorldBuilder {
    pub fn new() -> Self {
        let catalog = Catalog::builtin().expect("builtin catalog parses");
        let date = GameDate::start(catalog.initial_era().id.clone());
        Self {
            fixture: Fixture {
                nations: NationTable::default(),
                wars: ActiveWars::default(),
                log: GameLog::default(),
                catalog,
                date,
                tick: 0,
            },
        }
    }

    /// Adds a nation at its baseline figures.
    pub fn with_country(mut self, id: &str) -> Self {
        let record = country(id).unwrap_or_else(|| panic!("no baseline for {id}"));
        self.fixture.nations.insert(Nation::from_record(record));
        self
    }

    pub fn with_nation(mut self, id: &str, edit: impl FnOnce(&mut Nation)) -> Self {
        let nation = self
            .fixture
            .nations
            .get_mut(&NationId::from(id))
            .unwrap_or_else(|| panic!("{id} was not added"));
        edit(nation);
        self
    }

    /// Hands `region` to `owner` as a freshly occupied territory.
    pub fn with_occupation(mut self, owner: &str, region: &str, edit: impl FnOnce(&mut OccupiedTerritory)) -> Self {
        let record = country(region).unwrap_or_else(|| panic!("no baseline for {region}"));
        let region_id = NationId::from(region);
        let mut territory = OccupiedTerritory::fresh(region_id.clone(), record.gdp, record.resources);
        edit(&mut territory);
        self.with_nation(owner, |nation| {
            nation.territories.insert(region_id.clone());
            nation.occupied.insert(region_id, territory);
            nation.recompute_max_military();
        })
    }

    pub fn player(self, id: &str) -> Self {
        self.with_nation(id, |nation| {
            nation.is_player = true;
            nation.political_capital = PLAYER_STARTING_POLITICAL_CAPITAL;
        })
    }

    pub fn era(mut self, era_id: &str) -> Self {
        self.fixture.date.era_id = era_id.to_string();
        self
    }

    pub fn at_tick(mut self, tick: u64) -> Self {
        self.fixture.tick = tick;
        self
    }

    pub fn at_war(mut self, attacker: &str, defender: &str) -> Self {
        let war = WarDetails {
            id: format!("{attacker}_vs_{defender}_1-1-{}", self.fixture.tick),
            attacker: NationId::from(attacker),
            defender: NationId::from(defender),
            start_date: self.fixture.date.clone(),
            ticks_to_resolution: WAR_TICKS_DURATION,
        };
        begin_war(&mut self.fixture.nations, &mut self.fixture.wars, war);
        self
    }

    pub fn allied(self, a: &str, b: &str) -> Self {
        self.with_nation(a, |nation| {
            nation.allies.insert(NationId::from(b));
        })
        .with_nation(b, |nation| {
            nation.allies.insert(NationId::from(a));
        })
    }

    pub fn build_fixture(self) -> Fixture {
        self.fixture
    }
}

impl Default for WorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}
