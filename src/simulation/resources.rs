//! Shared resources and world-level data structures.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use bevy_ecs::prelude::Resource;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::simulation::{Nation, NationId};

/// The authoritative nation table. Ordered by id so every phase visits
/// nations in the same sequence.
#[derive(Debug, Clone, Default, Resource, Serialize, Deserialize)]
pub struct NationTable(pub BTreeMap<NationId, Nation>);

impl NationTable {
    pub fn get(&self, id: &NationId) -> Option<&Nation> {
        self.0.get(id)
    }

    pub fn get_mut(&mut self, id: &NationId) -> Option<&mut Nation> {
        self.0.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Nation> {
        self.0.values()
    }

    pub fn ids(&self) -> Vec<NationId> {
        self.0.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, nation: Nation) {
        self.0.insert(nation.id.clone(), nation);
    }

    /// Live nation by id; eliminated entries read as absent.
    pub fn active(&self, id: &NationId) -> Option<&Nation> {
        self.0.get(id).filter(|nation| !nation.is_eliminated)
    }

    pub fn active_count(&self) -> usize {
        self.0.values().filter(|nation| !nation.is_eliminated).count()
    }

    pub fn player(&self) -> Option<&Nation> {
        self.0.values().find(|nation| nation.is_player)
    }

    pub fn name_of(&self, id: &NationId) -> String {
        self.0
            .get(id)
            .map(|nation| nation.name.clone())
            .unwrap_or_else(|| format!("unknown nation {id}"))
    }

    /// Two distinct entries borrowed mutably at once.
    pub fn pair_mut(&mut self, a: &NationId, b: &NationId) -> Option<(&mut Nation, &mut Nation)> {
        if a == b {
            return None;
        }
        let mut first = None;
        let mut second = None;
        for (id, nation) in self.0.iter_mut() {
            if id == a {
                first = Some(nation);
            } else if id == b {
                second = Some(nation);
            }
        }
        Some((first?, second?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarDetails {
    pub id: String,
    pub attacker: NationId,
    pub defender: NationId,
    pub start_date: GameDate,
    pub ticks_to_resolution: u32,
}

impl WarDetails {
    /// True when the war is fought between `a` and `b`, in either role.
    pub fn involves_pair(&self, a: &NationId, b: &NationId) -> bool {
        (&self.attacker == a && &self.defender == b) || (&self.attacker == b && &self.defender == a)
    }

    pub fn involves(&self, id: &NationId) -> bool {
        &self.attacker == id || &self.defender == id
    }
}

#[derive(Debug, Clone, Default, Resource, Serialize, Deserialize)]
pub struct ActiveWars(pub Vec<WarDetails>);

impl ActiveWars {
    pub fn has_pair(&self, a: &NationId, b: &NationId) -> bool {
        self.0.iter().any(|war| war.involves_pair(a, b))
    }

    pub fn remove_pair(&mut self, a: &NationId, b: &NationId) {
        self.0.retain(|war| !war.involves_pair(a, b));
    }
}

#[derive(Debug, Clone, Resource, Serialize, Deserialize, Default)]
pub struct WorldTime {
    pub tick: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Resource, Serialize, Deserialize)]
pub struct GameDate {
    pub year: u32,
    pub day: u32,
    pub era_id: String,
}

impl GameDate {
    pub fn start(era_id: impl Into<String>) -> Self {
        Self {
            year: 1,
            day: 1,
            era_id: era_id.into(),
        }
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Year {}, Day {}", self.year, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Resource, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameSpeed {
    Paused,
    Slow,
    #[default]
    Normal,
    Fast,
}

impl GameSpeed {
    pub fn ticks_per_second(&self) -> u32 {
        match self {
            GameSpeed::Paused => 0,
            GameSpeed::Slow => 1,
            GameSpeed::Normal => 4,
            GameSpeed::Fast => 8,
        }
    }

    /// Wall-clock pause between ticks; `None` while paused.
    pub fn interval(&self) -> Option<Duration> {
        match self.ticks_per_second() {
            0 => None,
            tps => Some(Duration::from_millis(1000 / u64::from(tps))),
        }
    }

    pub fn recovery_factor(&self) -> f64 {
        let tps = f64::from(self.ticks_per_second());
        if tps > 1.0 { tps / 2.0 } else { 1.0 }
    }

    pub fn aggression_factor(&self) -> f64 {
        let tps = f64::from(self.ticks_per_second());
        if tps > 0.0 { tps / 2.0 } else { 0.5 }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameSpeed::Paused => "paused",
            GameSpeed::Slow => "slow",
            GameSpeed::Normal => "normal",
            GameSpeed::Fast => "fast",
        }
    }
}

impl FromStr for GameSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paused" | "pause" | "0" => Ok(GameSpeed::Paused),
            "slow" | "1" => Ok(GameSpeed::Slow),
            "normal" | "4" => Ok(GameSpeed::Normal),
            "fast" | "8" => Ok(GameSpeed::Fast),
            other => Err(format!("unknown game speed '{other}'")),
        }
    }
}

/// Share of a civilian allocation surplus or deficit absorbed by each bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationWeights {
    pub economy: f64,
    pub technology: f64,
    pub diplomacy: f64,
    pub resources: f64,
}

impl Default for AllocationWeights {
    fn default() -> Self {
        Self {
            economy: 0.4,
            technology: 0.3,
            diplomacy: 0.15,
            resources: 0.15,
        }
    }
}

#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// `None` seeds from entropy.
    pub seed: Option<u64>,
    pub player: String,
    pub speed: GameSpeed,
    pub allocation_weights: AllocationWeights,
    pub catalog_path: Option<PathBuf>,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            player: "410".to_string(),
            speed: GameSpeed::Normal,
            allocation_weights: AllocationWeights::default(),
            catalog_path: None,
            snapshot_path: None,
        }
    }
}

/// The single random source of the engine.
#[derive(Resource)]
pub struct SimRng(Box<dyn RngCore + Send + Sync>);

impl SimRng {
    pub fn new(rng: impl RngCore + Send + Sync + 'static) -> Self {
        Self(Box::new(rng))
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(SmallRng::seed_from_u64(seed)),
            None => Self::new(SmallRng::from_entropy()),
        }
    }
}

impl RngCore for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

/// Player automation switches.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct Delegation {
    pub auto_enact_policies: bool,
    pub auto_delegate_diplomacy: bool,
}

impl Default for Delegation {
    fn default() -> Self {
        Self {
            auto_enact_policies: true,
            auto_delegate_diplomacy: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Setup,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Default, Resource, Serialize, Deserialize)]
pub struct Session {
    pub player: Option<NationId>,
    pub phase: GamePhase,
    pub outcome: Option<GameOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedNation {
    pub id: NationId,
    pub country_name: String,
    pub rank: usize,
    pub eliminated_tick: Option<u64>,
    pub is_player: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub player_won: bool,
    pub winner_name: String,
    pub ranking: Vec<RankedNation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatHistoryEntry {
    pub tick: u64,
    pub economy: f64,
    pub technology: f64,
    pub diplomacy: f64,
    pub resources: f64,
}

#[derive(Debug, Clone, Default, Resource, Serialize, Deserialize)]
pub struct StatHistory(pub Vec<StatHistoryEntry>);

impl StatHistory {
    /// Appends unless the tick was already recorded.
    pub fn record(&mut self, entry: StatHistoryEntry) {
        if self.0.last().is_some_and(|last| last.tick == entry.tick) {
            return;
        }
        self.0.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Nation, country};

    #[test]
    fn speed_factors_follow_ticks_per_second() {
        assert_eq!(GameSpeed::Paused.interval(), None);
        assert_eq!(GameSpeed::Normal.interval(), Some(Duration::from_millis(250)));
        assert_eq!(GameSpeed::Slow.recovery_factor(), 1.0);
        assert_eq!(GameSpeed::Fast.recovery_factor(), 4.0);
        assert_eq!(GameSpeed::Paused.aggression_factor(), 0.5);
        assert_eq!(GameSpeed::Normal.aggression_factor(), 2.0);
        assert_eq!("Fast".parse::<GameSpeed>(), Ok(GameSpeed::Fast));
        assert!("warp".parse::<GameSpeed>().is_err());
    }

    #[test]
    fn pair_mut_rejects_same_or_missing_ids() {
        let mut table = NationTable::default();
        table.insert(Nation::from_record(country("410").unwrap()));
        table.insert(Nation::from_record(country("392").unwrap()));

        let korea = NationId::from("410");
        let japan = NationId::from("392");
        assert!(table.pair_mut(&korea, &korea).is_none());
        assert!(table.pair_mut(&korea, &NationId::from("999")).is_none());

        let (a, b) = table.pair_mut(&korea, &japan).unwrap();
        assert_eq!(a.id, korea);
        assert_eq!(b.id, japan);
    }

    #[test]
    fn history_records_each_tick_once() {
        let mut history = StatHistory::default();
        let entry = StatHistoryEntry {
            tick: 3,
            economy: 1.0,
            technology: 2.0,
            diplomacy: 3.0,
            resources: 4.0,
        };
        history.record(entry);
        history.record(entry);
        assert_eq!(history.0.len(), 1);
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config: SimulationConfig = serde_json::from_str(r#"{ "seed": 7, "speed": "fast" }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.player, "410");
        assert_eq!(config.speed, GameSpeed::Fast);
        assert_eq!(config.allocation_weights, AllocationWeights::default());
    }
}
