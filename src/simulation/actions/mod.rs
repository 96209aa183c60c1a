//! Validated state changes requested by the player, the delegation
//! automation, or AI logic. Each handler re-checks its preconditions and
//! leaves the world untouched when they fail.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::simulation::{
    ActionError, ActiveWars, Catalog, CivilianAllocation, GameDate, GameLog, GameSpeed, LogCategory,
    Nation, NationId, NationTable,
};

mod budget;
mod diplomacy;
mod policy;

/// Borrowed view of the world state an action may touch.
pub struct ActionContext<'a> {
    pub nations: &'a mut NationTable,
    pub wars: &'a mut ActiveWars,
    pub log: &'a mut GameLog,
    pub rng: &'a mut dyn RngCore,
    pub catalog: &'a Catalog,
    pub date: &'a GameDate,
    /// Last completed tick.
    pub tick: u64,
}

impl<'a> ActionContext<'a> {
    fn active(&self, id: &NationId) -> Result<&Nation, ActionError> {
        let nation = self
            .nations
            .get(id)
            .ok_or_else(|| ActionError::UnknownNation(id.clone()))?;
        if nation.is_eliminated {
            return Err(ActionError::Eliminated(nation.name.clone()));
        }
        Ok(nation)
    }

    fn active_pair(&self, source: &NationId, target: &NationId) -> Result<(&Nation, &Nation), ActionError> {
        let from = self.active(source)?;
        let to = self.active(target)?;
        if source == target {
            return Err(ActionError::SelfTarget(from.name.clone()));
        }
        Ok((from, to))
    }

    fn reject(&mut self, error: ActionError) -> ActionError {
        warn!(%error, "action rejected");
        self.log
            .push(LogCategory::Rejection, Some(self.date), error.to_string());
        error
    }

    fn record(&mut self, category: LogCategory, message: String) {
        self.log.push(category, Some(self.date), message);
    }
}

/// Requests the player can queue between ticks. Targets are nation ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlayerAction {
    EnactPolicy { policy: String },
    SetDefenseBudgetRatio { ratio: f64 },
    SetCivilianAllocation { allocation: CivilianAllocation },
    ToggleAutoManageBudget,
    ToggleAutoEnactPolicies,
    ToggleAutoDelegateDiplomacy,
    ImproveRelations { target: NationId },
    HarmRelations { target: NationId },
    ProposeAlliance { target: NationId },
    BreakAlliance { target: NationId },
    OfferTruce { target: NationId },
    DeclareWar { target: NationId },
    RespondToProposal { proposal: String, accept: bool },
    SetSpeed { speed: GameSpeed },
}
