use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use colored::Color;
use serde::{Deserialize, Serialize};

use crate::simulation::constants::*;
use crate::simulation::{Catalog, CountryRecord, EffectModifiers, ModifierKey, NationBaseline, resolve_modifiers};

/// Stable country id. Region ids share the namespace: every nation's homeland
/// region carries the nation's own id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NationId(String);

pub type RegionId = NationId;

impl NationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MilitaryForces {
    pub army: f64,
    pub navy: f64,
    pub airforce: f64,
}

impl MilitaryForces {
    pub fn total(&self) -> f64 {
        self.army + self.navy + self.airforce
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            army: self.army * factor,
            navy: self.navy * factor,
            airforce: self.airforce * factor,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreStats {
    pub economy: f64,
    pub technology: f64,
    pub diplomacy: f64,
    pub resources: f64,
}

/// Civilian budget split in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CivilianAllocation {
    pub economy: f64,
    pub technology: f64,
    pub diplomacy: f64,
    pub resources: f64,
}

impl Default for CivilianAllocation {
    fn default() -> Self {
        Self {
            economy: 30.0,
            technology: 30.0,
            diplomacy: 20.0,
            resources: 20.0,
        }
    }
}

impl CivilianAllocation {
    pub fn total(&self) -> f64 {
        self.economy + self.technology + self.diplomacy + self.resources
    }

    fn buckets(&self) -> [f64; 4] {
        [self.economy, self.technology, self.diplomacy, self.resources]
    }

    /// Manual allocations must be finite, non-negative and sum to 100.
    pub fn is_well_formed(&self) -> bool {
        self.buckets().iter().all(|v| v.is_finite() && *v >= 0.0)
            && (self.total() - 100.0).abs() < 0.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truce {
    pub target: NationId,
    pub end_tick: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupiedTerritory {
    pub original_owner: NationId,
    pub resistance_level: f64,
    pub rebellion_risk: f64,
    pub production_disruption_ticks: u32,
    pub rebel_strength: f64,
    pub base_gdp_contribution: f64,
    pub base_resource_contribution: f64,
}

impl OccupiedTerritory {
    pub fn fresh(original_owner: NationId, gdp_share: f64, resource_share: f64) -> Self {
        Self {
            original_owner,
            resistance_level: INITIAL_RESISTANCE_LEVEL,
            rebellion_risk: INITIAL_REBELLION_RISK,
            production_disruption_ticks: 0,
            rebel_strength: 0.0,
            base_gdp_contribution: gdp_share,
            base_resource_contribution: resource_share,
        }
    }

    pub fn is_disrupted(&self) -> bool {
        self.production_disruption_ticks > 0
            || self.rebel_strength > REBEL_STRENGTH_DISRUPTION_THRESHOLD
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalKind {
    AllianceOffer,
    TruceOffer,
}

impl ProposalKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProposalKind::AllianceOffer => "alliance",
            ProposalKind::TruceOffer => "truce",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            ProposalKind::AllianceOffer => Color::BrightGreen,
            ProposalKind::TruceOffer => Color::BrightYellow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiplomaticProposal {
    pub id: String,
    pub kind: ProposalKind,
    pub from: NationId,
    pub to: NationId,
    pub expires_tick: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nation {
    pub id: NationId,
    pub name: String,
    pub baseline: NationBaseline,
    pub is_player: bool,

    pub population: u64,
    pub gdp: f64,
    pub defense_budget: f64,
    pub stats: CoreStats,

    pub military: MilitaryForces,
    pub max_military: MilitaryForces,

    pub political_capital: f64,
    pub active_policies: BTreeSet<String>,
    pub policy_modifiers: EffectModifiers,
    pub national_spirits: BTreeSet<String>,
    pub spirit_modifiers: EffectModifiers,

    pub territories: BTreeSet<RegionId>,
    pub occupied: BTreeMap<RegionId, OccupiedTerritory>,
    pub is_eliminated: bool,
    pub eliminated_tick: Option<u64>,

    pub aggression: f64,
    pub at_war_with: BTreeSet<NationId>,
    pub truces: Vec<Truce>,
    pub allies: BTreeSet<NationId>,
    pub relations: BTreeMap<NationId, f64>,
    pub pending_proposals: Vec<DiplomaticProposal>,

    pub defense_budget_ratio: f64,
    pub civilian_allocation: CivilianAllocation,
    pub auto_manage_budget: bool,
}

impl Nation {
    /// A nation at its reference figures, not yet assigned a seat or posture.
    pub fn from_record(record: &CountryRecord) -> Self {
        let baseline = record.baseline();
        let id = NationId::new(record.id);
        let gdp = baseline.gdp;
        Self {
            territories: BTreeSet::from([id.clone()]),
            id,
            name: record.name.to_string(),
            is_player: false,
            population: baseline.population,
            gdp,
            defense_budget: gdp * DEFAULT_DEFENSE_BUDGET_RATIO / 100.0,
            stats: baseline.stats,
            military: baseline.military,
            max_military: baseline.military,
            political_capital: AI_STARTING_POLITICAL_CAPITAL,
            active_policies: BTreeSet::new(),
            policy_modifiers: EffectModifiers::default(),
            national_spirits: BTreeSet::new(),
            spirit_modifiers: EffectModifiers::default(),
            occupied: BTreeMap::new(),
            is_eliminated: false,
            eliminated_tick: None,
            aggression: 0.0,
            at_war_with: BTreeSet::new(),
            truces: Vec::new(),
            allies: BTreeSet::new(),
            relations: BTreeMap::new(),
            pending_proposals: Vec::new(),
            defense_budget_ratio: DEFAULT_DEFENSE_BUDGET_RATIO,
            civilian_allocation: CivilianAllocation::default(),
            auto_manage_budget: true,
            baseline,
        }
    }

    /// Policy and spirit bonus for `key` combined.
    pub fn modifier(&self, key: ModifierKey) -> f64 {
        self.policy_modifiers.get(key) + self.spirit_modifiers.get(key)
    }

    pub fn refresh_modifiers(&mut self, catalog: &Catalog) {
        self.policy_modifiers = resolve_modifiers(&self.active_policies, &catalog.policies);
        self.spirit_modifiers = resolve_modifiers(&self.national_spirits, &catalog.spirits);
    }

    pub fn is_at_war(&self) -> bool {
        !self.at_war_with.is_empty()
    }

    pub fn has_truce_with(&self, other: &NationId, tick: u64) -> bool {
        self.truces
            .iter()
            .any(|truce| &truce.target == other && truce.end_tick > tick)
    }

    pub fn relation_with(&self, other: &NationId) -> f64 {
        self.relations.get(other).copied().unwrap_or(RELATIONS_INITIAL_DEFAULT)
    }

    pub fn shift_relation(&mut self, other: &NationId, delta: f64) {
        let next = (self.relation_with(other) + delta).clamp(RELATIONS_MIN, RELATIONS_MAX);
        self.relations.insert(other.clone(), next);
    }

    pub fn add_political_capital(&mut self, delta: f64) {
        self.political_capital = (self.political_capital + delta).clamp(0.0, MAX_POLITICAL_CAPITAL);
    }

    pub fn add_aggression(&mut self, delta: f64) {
        self.aggression = (self.aggression + delta).clamp(0.0, MAX_AGGRESSION);
    }

    /// Ceiling for standing forces, widened by every held foreign region.
    pub fn recompute_max_military(&mut self) {
        let bonus = 1.0 + OCCUPIED_TERRITORY_MAX_MILITARY_BONUS_FACTOR * self.occupied.len() as f64;
        self.max_military = self.baseline.military.scaled(bonus);
    }

    /// Terminal state: the nation keeps its name and ranking record only.
    pub fn eliminate(&mut self, tick: u64) {
        self.is_eliminated = true;
        self.eliminated_tick.get_or_insert(tick);
        self.military = MilitaryForces::default();
        self.at_war_with.clear();
        self.occupied.clear();
        self.pending_proposals.clear();
    }
}
