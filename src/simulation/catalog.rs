//! Read-only policy, national spirit and era tables.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// Keys of ongoing effects, accumulated into a nation's modifier caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModifierKey {
    #[serde(rename = "gdp_growth_rate_perc_bonus")]
    GdpGrowthRate,
    #[serde(rename = "tech_points_per_tick_flat_bonus")]
    TechPointsPerTick,
    #[serde(rename = "diplomacy_points_per_tick_flat_bonus")]
    DiplomacyPointsPerTick,
    #[serde(rename = "resource_points_per_tick_flat_bonus")]
    ResourcePointsPerTick,
    #[serde(rename = "political_capital_per_tick_flat_bonus")]
    PoliticalCapitalPerTick,
    #[serde(rename = "military_recovery_efficiency_bonus_perc_bonus")]
    MilitaryRecoveryEfficiency,
    #[serde(rename = "aggression_decay_rate_perc_bonus")]
    AggressionDecayRate,
    #[serde(rename = "defense_effectiveness_perc_bonus")]
    DefenseEffectiveness,
    #[serde(rename = "enemy_attrition_perc_bonus")]
    EnemyAttrition,
    #[serde(rename = "resistance_growth_rate_perc_bonus")]
    ResistanceGrowthRate,
    #[serde(rename = "occupied_territory_income_perc_bonus")]
    OccupiedTerritoryIncome,
    #[serde(rename = "rebellion_risk_change_rate_perc_bonus")]
    RebellionRiskChangeRate,
    #[serde(rename = "rebellion_event_penalty_modifier_perc")]
    RebellionEventPenalty,
    #[serde(rename = "garrison_effectiveness_perc_bonus")]
    GarrisonEffectiveness,
    #[serde(rename = "rebel_suppression_bonus_perc")]
    RebelSuppression,
}

/// Stats touched once, at enactment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneTimeStat {
    GdpAbsFlat,
    TechPointsFlat,
    DiplomacyPointsFlat,
    ResourcePointsFlat,
    PoliticalCapitalFlat,
    DefenseBudgetAbsFlat,
    ResistanceLevelFlat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTarget {
    #[default]
    #[serde(rename = "self")]
    Owner,
    OccupiedTerritories,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    OneTime {
        stat: OneTimeStat,
        value: f64,
        #[serde(default)]
        target: EffectTarget,
    },
    GrantSpirit {
        spirit: String,
    },
    Ongoing {
        stat: ModifierKey,
        value: f64,
        #[serde(default)]
        target: EffectTarget,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyCost {
    #[serde(default)]
    pub political_capital: f64,
    #[serde(default)]
    pub gdp_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyPrerequisites {
    #[serde(default)]
    pub tech_level: Option<f64>,
    #[serde(default)]
    pub era: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub name: String,
    pub category: String,
    pub cost: PolicyCost,
    #[serde(default)]
    pub prerequisites: PolicyPrerequisites,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalSpirit {
    pub id: String,
    pub name: String,
    pub category: String,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Era {
    pub id: String,
    pub name: String,
    pub start_year_threshold: u32,
}

/// Anything carrying a list of effects can feed the modifier resolver.
pub trait EffectSource {
    fn effects(&self) -> &[Effect];
}

impl EffectSource for Policy {
    fn effects(&self) -> &[Effect] {
        &self.effects
    }
}

impl EffectSource for NationalSpirit {
    fn effects(&self) -> &[Effect] {
        &self.effects
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    eras: Vec<Era>,
    policies: Vec<Policy>,
    spirits: Vec<NationalSpirit>,
}

#[derive(Debug, Clone, Resource)]
pub struct Catalog {
    pub policies: BTreeMap<String, Policy>,
    pub spirits: BTreeMap<String, NationalSpirit>,
    /// Sorted by ascending start year.
    pub eras: Vec<Era>,
}

impl Catalog {
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_json_str(BUILTIN_CATALOG).context("embedded catalog is malformed")
    }

    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        let mut eras = file.eras;
        eras.sort_by_key(|era| era.start_year_threshold);
        anyhow::ensure!(!eras.is_empty(), "catalog defines no eras");

        let policies = file
            .policies
            .into_iter()
            .map(|policy| (policy.id.clone(), policy))
            .collect();
        let spirits = file
            .spirits
            .into_iter()
            .map(|spirit| (spirit.id.clone(), spirit))
            .collect();

        Ok(Self {
            policies,
            spirits,
            eras,
        })
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("parsing catalog {}", path.display()))
    }

    pub fn initial_era(&self) -> &Era {
        &self.eras[0]
    }

    pub fn era(&self, id: &str) -> Option<&Era> {
        self.eras.iter().find(|era| era.id == id)
    }

    pub fn era_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.era(id).map(|era| era.name.as_str()).unwrap_or(id)
    }

    /// The era following `id`, if any.
    pub fn next_era(&self, id: &str) -> Option<&Era> {
        let index = self.eras.iter().position(|era| era.id == id)?;
        self.eras.get(index + 1)
    }

    pub fn policy(&self, id: &str) -> Option<&Policy> {
        self.policies.get(id)
    }

    pub fn spirit(&self, id: &str) -> Option<&NationalSpirit> {
        self.spirits.get(id)
    }

    pub fn spirit_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.spirit(id).map(|spirit| spirit.name.as_str()).unwrap_or(id)
    }
}
