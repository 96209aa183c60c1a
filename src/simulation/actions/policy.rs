use rand::seq::SliceRandom;
use tracing::info;

use super::ActionContext;
use crate::simulation::constants::*;
use crate::simulation::{ActionError, Effect, EffectTarget, LogCategory, NationId, OneTimeStat, Policy};

impl<'a> ActionContext<'a> {
    /// Checks in order: nation, policy, not yet active, era, technology, political capital.
    pub fn check_policy(&self, country: &NationId, policy_id: &str) -> Result<&'a Policy, ActionError> {
        let catalog = self.catalog;
        let nation = self.active(country)?;
        let policy = catalog
            .policy(policy_id)
            .ok_or_else(|| ActionError::UnknownPolicy(policy_id.to_string()))?;

        if nation.active_policies.contains(&policy.id) {
            return Err(ActionError::AlreadyActive {
                nation: nation.name.clone(),
                policy: policy.name.clone(),
            });
        }
        if let Some(era) = &policy.prerequisites.era {
            if era != &self.date.era_id {
                return Err(ActionError::WrongEra {
                    nation: nation.name.clone(),
                    policy: policy.name.clone(),
                    era: catalog.era_name(era).to_string(),
                });
            }
        }
        if let Some(required) = policy.prerequisites.tech_level {
            if nation.stats.technology < required {
                return Err(ActionError::InsufficientTechnology {
                    nation: nation.name.clone(),
                    policy: policy.name.clone(),
                    required,
                    current: nation.stats.technology,
                });
            }
        }
        if nation.political_capital < policy.cost.political_capital {
            return Err(ActionError::InsufficientPoliticalCapital {
                nation: nation.name.clone(),
                required: policy.cost.political_capital,
                available: nation.political_capital,
            });
        }
        Ok(policy)
    }

    pub fn enact_policy(&mut self, country: &NationId, policy_id: &str, is_ai: bool) -> Result<(), ActionError> {
        let policy = match self.check_policy(country, policy_id) {
            Ok(policy) => policy,
            Err(error) if is_ai => return Err(error),
            Err(error) => return Err(self.reject(error)),
        };
        let catalog = self.catalog;
        let Some(nation) = self.nations.get_mut(country) else {
            return Err(ActionError::UnknownNation(country.clone()));
        };

        nation.political_capital -= policy.cost.political_capital;
        nation.gdp -= nation.gdp * policy.cost.gdp_factor;

        let mut granted = Vec::new();
        for effect in &policy.effects {
            match effect {
                Effect::OneTime { stat, value, target } => match stat {
                    OneTimeStat::GdpAbsFlat => nation.gdp = (nation.gdp + value).max(1.0),
                    OneTimeStat::TechPointsFlat => {
                        nation.stats.technology = (nation.stats.technology + value).clamp(0.0, STAT_MAX)
                    }
                    OneTimeStat::DiplomacyPointsFlat => {
                        nation.stats.diplomacy = (nation.stats.diplomacy + value).clamp(0.0, STAT_MAX)
                    }
                    OneTimeStat::ResourcePointsFlat => {
                        nation.stats.resources = (nation.stats.resources + value).clamp(0.0, STAT_MAX)
                    }
                    OneTimeStat::PoliticalCapitalFlat => nation.add_political_capital(*value),
                    OneTimeStat::DefenseBudgetAbsFlat => {
                        nation.defense_budget += value;
                        if nation.gdp > 0.0 {
                            nation.defense_budget_ratio = (nation.defense_budget / nation.gdp * 100.0)
                                .clamp(0.0, MAX_DEFENSE_BUDGET_RATIO_HARD_CAP);
                        }
                    }
                    OneTimeStat::ResistanceLevelFlat => {
                        if *target == EffectTarget::OccupiedTerritories {
                            for territory in nation.occupied.values_mut() {
                                territory.resistance_level =
                                    (territory.resistance_level + value).clamp(0.0, MAX_RESISTANCE_LEVEL);
                            }
                        }
                    }
                },
                Effect::GrantSpirit { spirit } => {
                    if nation.national_spirits.insert(spirit.clone()) {
                        granted.push(spirit.as_str());
                    }
                }
                Effect::Ongoing { .. } => {}
            }
        }

        nation.active_policies.insert(policy.id.clone());
        nation.refresh_modifiers(catalog);
        let name = nation.name.clone();

        for spirit in granted {
            self.record(
                LogCategory::Policy,
                format!(
                    "{name} gained the national spirit \"{}\" (policy: {}).",
                    catalog.spirit_name(spirit),
                    policy.name
                ),
            );
        }
        let tag = if is_ai { " [AI delegated]" } else { "" };
        info!(nation = %country, policy = %policy.id, is_ai, "policy enacted");
        self.record(
            LogCategory::Policy,
            format!("{name} enacted the \"{}\" policy.{tag}", policy.name),
        );
        Ok(())
    }

    /// Enacts the cheapest policy `country` currently qualifies for, picking
    /// uniformly among equally cheap ones.
    pub fn auto_enact_policy(&mut self, country: &NationId) -> Option<String> {
        let catalog = self.catalog;
        let eligible: Vec<&Policy> = catalog
            .policies
            .values()
            .filter(|policy| self.check_policy(country, &policy.id).is_ok())
            .collect();
        let cheapest = eligible
            .iter()
            .map(|policy| policy.cost.political_capital)
            .fold(f64::INFINITY, f64::min);
        let tied: Vec<&Policy> = eligible
            .into_iter()
            .filter(|policy| policy.cost.political_capital == cheapest)
            .collect();
        let chosen = tied.choose(&mut *self.rng)?.id.clone();
        self.enact_policy(country, &chosen, true).ok()?;
        Some(chosen)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use crate::simulation::testing::WorldBuilder;
    use crate::simulation::*;

    fn korea() -> NationId {
        NationId::from("410")
    }

    #[test]
    fn enactment_debits_costs_and_refreshes_modifiers() {
        let mut fixture = WorldBuilder::new()
            .with_country("410")
            .with_nation("410", |n| {
                n.political_capital = 60.0;
                n.stats.technology = 400.0;
                n.gdp = 2.0e12;
            })
            .build_fixture();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = fixture.context(&mut rng);

        ctx.enact_policy(&korea(), "industrial_investment", false).unwrap();

        let nation = fixture.nations.get(&korea()).unwrap();
        assert_eq!(nation.political_capital, 40.0);
        assert!((nation.gdp - 1.99e12).abs() < 1.0);
        assert!(nation.active_policies.contains("industrial_investment"));
        assert_eq!(nation.modifier(ModifierKey::GdpGrowthRate), 0.0002);
        assert!(fixture.log.latest().unwrap().message.contains("Industrial Investment"));
    }

    #[test]
    fn validation_follows_the_documented_order() {
        let mut fixture = WorldBuilder::new()
            .with_country("410")
            .with_nation("410", |n| {
                n.political_capital = 5.0;
                n.stats.technology = 50.0;
            })
            .build_fixture();
        let mut rng = StepRng::new(0, 0);
        let ctx = fixture.context(&mut rng);

        assert!(matches!(
            ctx.check_policy(&korea(), "resource_exploration"),
            Err(ActionError::WrongEra { .. })
        ));
        assert!(matches!(
            ctx.check_policy(&korea(), "industrial_investment"),
            Err(ActionError::InsufficientTechnology { .. })
        ));
        assert!(matches!(
            ctx.check_policy(&korea(), "propaganda_campaign"),
            Err(ActionError::InsufficientPoliticalCapital { .. })
        ));
        assert!(matches!(
            ctx.check_policy(&korea(), "no_such_policy"),
            Err(ActionError::UnknownPolicy(_))
        ));
    }

    #[test]
    fn ai_rejections_leave_no_log_line() {
        let mut fixture = WorldBuilder::new()
            .with_country("410")
            .with_nation("410", |n| n.political_capital = 0.0)
            .build_fixture();
        let before = fixture.log.len();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = fixture.context(&mut rng);

        assert!(ctx.enact_policy(&korea(), "martial_law", true).is_err());
        assert_eq!(fixture.log.len(), before);
    }

    #[test]
    fn martial_law_applies_one_time_effects() {
        let mut fixture = WorldBuilder::new()
            .with_country("410")
            .with_country("408")
            .with_occupation("410", "408", |t| t.resistance_level = 15.0)
            .with_nation("410", |n| n.political_capital = 100.0)
            .build_fixture();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = fixture.context(&mut rng);

        ctx.enact_policy(&korea(), "martial_law", false).unwrap();

        let nation = fixture.nations.get(&korea()).unwrap();
        assert_eq!(nation.political_capital, 60.0);
        assert_eq!(nation.occupied[&NationId::from("408")].resistance_level, 0.0);
        assert_eq!(nation.modifier(ModifierKey::GarrisonEffectiveness), 0.2);
    }

    #[test]
    fn austerity_recomputes_the_defense_ratio() {
        let mut fixture = WorldBuilder::new()
            .with_country("410")
            .with_nation("410", |n| {
                n.gdp = 1.0e12;
                n.defense_budget = 5.0e10;
                n.political_capital = 50.0;
            })
            .build_fixture();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = fixture.context(&mut rng);

        ctx.enact_policy(&korea(), "austerity_measures", false).unwrap();

        let nation = fixture.nations.get(&korea()).unwrap();
        assert_eq!(nation.defense_budget, 1.0e11);
        assert!((nation.defense_budget_ratio - 10.0).abs() < 1e-9);
    }

    #[test]
    fn grant_effects_add_the_spirit_once() {
        let mut fixture = WorldBuilder::new()
            .era("era_modern")
            .with_country("410")
            .with_nation("410", |n| {
                n.political_capital = 150.0;
                n.stats.technology = 600.0;
            })
            .build_fixture();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = fixture.context(&mut rng);

        ctx.enact_policy(&korea(), "grant_awakened_giant_spirit", false).unwrap();

        let nation = fixture.nations.get(&korea()).unwrap();
        assert!(nation.national_spirits.contains("awakened_giant"));
        assert_eq!(nation.modifier(ModifierKey::PoliticalCapitalPerTick), 0.25);
        assert_eq!(nation.political_capital, 50.0);
    }

    #[test]
    fn automation_picks_the_cheapest_eligible_policy() {
        let mut fixture = WorldBuilder::new()
            .with_country("410")
            .with_nation("410", |n| {
                n.political_capital = 12.0;
                n.stats.technology = 50.0;
            })
            .build_fixture();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = fixture.context(&mut rng);

        // austerity_measures and harsh_repression both cost 10 in the early era.
        let chosen = ctx.auto_enact_policy(&korea()).unwrap();
        assert_eq!(chosen, "austerity_measures");
        assert!(fixture.log.latest().unwrap().message.ends_with("[AI delegated]"));
    }
}
