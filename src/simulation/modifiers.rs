use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::simulation::{Effect, EffectSource, ModifierKey};

/// Accumulated ongoing bonuses keyed by stat. Missing keys read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectModifiers(pub BTreeMap<ModifierKey, f64>);

impl EffectModifiers {
    pub fn get(&self, key: ModifierKey) -> f64 {
        self.0.get(&key).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Sums every ongoing numeric effect of the active ids found in `catalog`.
/// Ids missing from the catalog and spirit grants contribute nothing.
pub fn resolve_modifiers<S: EffectSource>(
    active: &BTreeSet<String>,
    catalog: &BTreeMap<String, S>,
) -> EffectModifiers {
    let mut modifiers = BTreeMap::new();
    for source in active.iter().filter_map(|id| catalog.get(id)) {
        for effect in source.effects() {
            if let Effect::Ongoing { stat, value, .. } = effect {
                *modifiers.entry(*stat).or_insert(0.0) += value;
            }
        }
    }
    EffectModifiers(modifiers)
}
