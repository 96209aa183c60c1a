//! Read-only view of the world shared with the runner and the console.

use serde::Serialize;

use crate::simulation::{
    ActiveWars, CoreStats, GameDate, GameLog, GameOutcome, GamePhase, GameSpeed, Nation, NationId, NationTable,
    StatHistory, StatHistoryEntry, WarDetails,
};

/// Log lines carried by a snapshot, newest first.
const SNAPSHOT_LOG_LINES: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct NationSummary {
    pub id: NationId,
    pub name: String,
    pub is_player: bool,
    pub is_eliminated: bool,
    pub population: u64,
    pub gdp: f64,
    pub stats: CoreStats,
    pub military: f64,
    pub max_military: f64,
    pub political_capital: f64,
    pub aggression: f64,
    pub territories: usize,
    pub occupied: usize,
    pub at_war_with: Vec<NationId>,
    pub allies: Vec<NationId>,
}

impl From<&Nation> for NationSummary {
    fn from(nation: &Nation) -> Self {
        Self {
            id: nation.id.clone(),
            name: nation.name.clone(),
            is_player: nation.is_player,
            is_eliminated: nation.is_eliminated,
            population: nation.population,
            gdp: nation.gdp,
            stats: nation.stats,
            military: nation.military.total(),
            max_military: nation.max_military.total(),
            political_capital: nation.political_capital,
            aggression: nation.aggression,
            territories: nation.territories.len(),
            occupied: nation.occupied.len(),
            at_war_with: nation.at_war_with.iter().cloned().collect(),
            allies: nation.allies.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ObserverSnapshot {
    pub tick: u64,
    pub date: Option<GameDate>,
    pub era_name: String,
    pub phase: GamePhase,
    pub speed: GameSpeed,
    pub player: Option<NationId>,
    pub nations: Vec<NationSummary>,
    pub wars: Vec<WarDetails>,
    pub log: Vec<String>,
    pub status_message: String,
    pub latest_stats: Option<StatHistoryEntry>,
    pub outcome: Option<GameOutcome>,
}

/// Borrowed world state a snapshot is taken from.
pub struct SnapshotSource<'a> {
    pub tick: u64,
    pub date: &'a GameDate,
    pub era_name: &'a str,
    pub phase: GamePhase,
    pub speed: GameSpeed,
    pub player: Option<&'a NationId>,
    pub nations: &'a NationTable,
    pub wars: &'a ActiveWars,
    pub log: &'a GameLog,
    pub history: &'a StatHistory,
    pub outcome: Option<&'a GameOutcome>,
}

impl ObserverSnapshot {
    pub fn update(&mut self, source: SnapshotSource<'_>) {
        self.tick = source.tick;
        self.date = Some(source.date.clone());
        self.era_name = source.era_name.to_string();
        self.phase = source.phase;
        self.speed = source.speed;
        self.player = source.player.cloned();
        self.nations = source.nations.iter().map(NationSummary::from).collect();
        self.wars = source.wars.0.clone();
        self.log = source.log.lines(SNAPSHOT_LOG_LINES);
        self.status_message = source.log.status_message().to_string();
        self.latest_stats = source.history.0.last().copied();
        self.outcome = source.outcome.cloned();
    }

    pub fn player_summary(&self) -> Option<&NationSummary> {
        let player = self.player.as_ref()?;
        self.nations.iter().find(|nation| &nation.id == player)
    }
}
