use super::ActionContext;
use crate::simulation::constants::MAX_DEFENSE_BUDGET_RATIO_HARD_CAP;
use crate::simulation::{ActionError, CivilianAllocation, LogCategory, NationId};

impl<'a> ActionContext<'a> {
    fn manual_budget(&self, country: &NationId) -> Result<(), ActionError> {
        let nation = self.active(country)?;
        if nation.auto_manage_budget {
            return Err(ActionError::ManualBudgetRequired {
                nation: nation.name.clone(),
            });
        }
        Ok(())
    }

    /// Sets the defense share of GDP, clamped to the hard cap.
    pub fn update_defense_budget_ratio(&mut self, country: &NationId, ratio: f64) -> Result<(), ActionError> {
        if let Err(error) = self.manual_budget(country) {
            return Err(self.reject(error));
        }
        let ratio = if ratio.is_finite() {
            ratio.clamp(0.0, MAX_DEFENSE_BUDGET_RATIO_HARD_CAP)
        } else {
            0.0
        };
        let Some(nation) = self.nations.get_mut(country) else {
            return Err(ActionError::UnknownNation(country.clone()));
        };
        nation.defense_budget_ratio = ratio;
        nation.defense_budget = nation.gdp * ratio / 100.0;
        let message = format!("{} set defense spending to {ratio:.1}% of GDP.", nation.name);
        self.record(LogCategory::Budget, message);
        Ok(())
    }

    pub fn update_civilian_allocation(
        &mut self,
        country: &NationId,
        allocation: CivilianAllocation,
    ) -> Result<(), ActionError> {
        if let Err(error) = self.manual_budget(country) {
            return Err(self.reject(error));
        }
        if !allocation.is_well_formed() {
            let error = ActionError::MalformedAllocation {
                nation: self.nations.name_of(country),
                total: allocation.total(),
            };
            return Err(self.reject(error));
        }
        let Some(nation) = self.nations.get_mut(country) else {
            return Err(ActionError::UnknownNation(country.clone()));
        };
        nation.civilian_allocation = allocation;
        let message = format!(
            "{} reallocated civilian spending: economy {:.0}%, technology {:.0}%, diplomacy {:.0}%, resources {:.0}%.",
            nation.name, allocation.economy, allocation.technology, allocation.diplomacy, allocation.resources
        );
        self.record(LogCategory::Budget, message);
        Ok(())
    }

    /// Flips automatic budget management; only the player may hand it back.
    pub fn toggle_auto_manage_budget(&mut self, country: &NationId) -> Result<bool, ActionError> {
        let checked = self.active(country).and_then(|nation| {
            if nation.is_player {
                Ok(())
            } else {
                Err(ActionError::NotPlayer {
                    nation: nation.name.clone(),
                })
            }
        });
        if let Err(error) = checked {
            return Err(self.reject(error));
        }
        let Some(nation) = self.nations.get_mut(country) else {
            return Err(ActionError::UnknownNation(country.clone()));
        };
        nation.auto_manage_budget = !nation.auto_manage_budget;
        let enabled = nation.auto_manage_budget;
        let state = if enabled { "enabled" } else { "disabled" };
        let message = format!("{}: automatic budget management {state}.", nation.name);
        self.record(LogCategory::Budget, message);
        Ok(enabled)
    }
}
