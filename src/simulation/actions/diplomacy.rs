use tracing::info;

use super::ActionContext;
use crate::simulation::constants::*;
use crate::simulation::systems::warfare::{begin_war, roll_war_duration};
use crate::simulation::{
    ActionError, DiplomaticProposal, LogCategory, Nation, NationId, ProposalKind, Truce, WarDetails,
};

/// Standing between two live nations that blocks alliance offers and war.
fn blocking_relation(from: &Nation, to: &Nation, tick: u64) -> Option<ActionError> {
    let (nation, other) = (from.name.clone(), to.name.clone());
    if from.allies.contains(&to.id) {
        Some(ActionError::AlreadyAllied { nation, other })
    } else if from.at_war_with.contains(&to.id) {
        Some(ActionError::AtWar { nation, other })
    } else if from.has_truce_with(&to.id, tick) {
        Some(ActionError::UnderTruce { nation, other })
    } else {
        None
    }
}

fn require_capital(nation: &Nation, required: f64) -> Result<(), ActionError> {
    if nation.political_capital < required {
        return Err(ActionError::InsufficientPoliticalCapital {
            nation: nation.name.clone(),
            required,
            available: nation.political_capital,
        });
    }
    Ok(())
}

impl<'a> ActionContext<'a> {
    pub fn improve_relations(&mut self, source: &NationId, target: &NationId) -> Result<(), ActionError> {
        let checked = self.active_pair(source, target).and_then(|(from, to)| {
            if from.allies.contains(target) {
                return Err(ActionError::AlreadyAllied {
                    nation: from.name.clone(),
                    other: to.name.clone(),
                });
            }
            require_capital(from, PC_COST_IMPROVE_RELATIONS)
        });
        if let Err(error) = checked {
            return Err(self.reject(error));
        }
        self.adjust_relations(source, target, PC_COST_IMPROVE_RELATIONS, RELATION_IMPROVEMENT_PER_ACTION, "improved");
        Ok(())
    }

    pub fn harm_relations(&mut self, source: &NationId, target: &NationId) -> Result<(), ActionError> {
        let checked = self
            .active_pair(source, target)
            .and_then(|(from, _)| require_capital(from, PC_COST_HARM_RELATIONS));
        if let Err(error) = checked {
            return Err(self.reject(error));
        }
        self.adjust_relations(source, target, PC_COST_HARM_RELATIONS, RELATION_HARM_PER_ACTION, "soured");
        Ok(())
    }

    fn adjust_relations(&mut self, source: &NationId, target: &NationId, cost: f64, delta: f64, verb: &str) {
        let Some((from, to)) = self.nations.pair_mut(source, target) else {
            return;
        };
        from.political_capital -= cost;
        from.shift_relation(target, delta);
        to.shift_relation(source, delta);
        let message = format!(
            "{} {verb} relations with {} (now {:.0}).",
            from.name,
            to.name,
            from.relation_with(target)
        );
        self.record(LogCategory::Diplomacy, message);
    }

    pub fn propose_alliance(&mut self, source: &NationId, target: &NationId) -> Result<(), ActionError> {
        let tick = self.tick;
        let checked = self.active_pair(source, target).and_then(|(from, to)| {
            require_capital(from, PC_COST_PROPOSE_ALLIANCE)?;
            let relation = from.relation_with(target);
            if relation < ALLIANCE_RELATION_THRESHOLD {
                return Err(ActionError::RelationTooLow {
                    nation: from.name.clone(),
                    other: to.name.clone(),
                    relation,
                    threshold: ALLIANCE_RELATION_THRESHOLD,
                });
            }
            blocking_relation(from, to, tick).map_or(Ok(()), Err)
        });
        if let Err(error) = checked {
            return Err(self.reject(error));
        }
        self.send_proposal(source, target, ProposalKind::AllianceOffer, PC_COST_PROPOSE_ALLIANCE);
        Ok(())
    }

    pub fn offer_truce(&mut self, source: &NationId, target: &NationId) -> Result<(), ActionError> {
        let checked = self.active_pair(source, target).and_then(|(from, to)| {
            if !from.at_war_with.contains(target) {
                return Err(ActionError::NotAtWar {
                    nation: from.name.clone(),
                    other: to.name.clone(),
                });
            }
            require_capital(from, PC_COST_OFFER_TRUCE)
        });
        if let Err(error) = checked {
            return Err(self.reject(error));
        }
        self.send_proposal(source, target, ProposalKind::TruceOffer, PC_COST_OFFER_TRUCE);
        Ok(())
    }

    fn send_proposal(&mut self, source: &NationId, target: &NationId, kind: ProposalKind, cost: f64) {
        let (prefix, ttl) = match kind {
            ProposalKind::AllianceOffer => ("alliance", ALLIANCE_PROPOSAL_TTL_TICKS),
            ProposalKind::TruceOffer => ("truce", TRUCE_PROPOSAL_TTL_TICKS),
        };
        let proposal = DiplomaticProposal {
            id: format!("{prefix}_{source}_{target}_{}", self.tick),
            kind,
            from: source.clone(),
            to: target.clone(),
            expires_tick: self.tick + ttl,
        };
        let Some((from, to)) = self.nations.pair_mut(source, target) else {
            return;
        };
        from.political_capital -= cost;
        to.pending_proposals.push(proposal);
        let message = match kind {
            ProposalKind::AllianceOffer => format!("{} proposed an alliance to {}.", from.name, to.name),
            ProposalKind::TruceOffer => format!("{} offered {} a truce.", from.name, to.name),
        };
        self.record(LogCategory::Diplomacy, message);
    }

    pub fn break_alliance(&mut self, source: &NationId, ally: &NationId) -> Result<(), ActionError> {
        let checked = self.active_pair(source, ally).and_then(|(from, to)| {
            if from.allies.contains(ally) {
                Ok(())
            } else {
                Err(ActionError::NotAllied {
                    nation: from.name.clone(),
                    other: to.name.clone(),
                })
            }
        });
        if let Err(error) = checked {
            return Err(self.reject(error));
        }
        let Some((from, to)) = self.nations.pair_mut(source, ally) else {
            return Err(ActionError::UnknownNation(ally.clone()));
        };
        from.political_capital = (from.political_capital - PC_COST_BREAK_ALLIANCE_PENALTY).max(0.0);
        from.add_aggression(AGGRESSION_HIT_BREAK_ALLIANCE);
        from.shift_relation(ally, RELATION_HIT_BREAK_ALLIANCE_WITH_ALLY);
        to.shift_relation(source, RELATION_HIT_BREAK_ALLIANCE_WITH_ALLY);
        from.allies.remove(ally);
        to.allies.remove(source);
        let message = format!("{} broke its alliance with {}.", from.name, to.name);
        self.record(LogCategory::Diplomacy, message);
        Ok(())
    }

    pub fn declare_war(&mut self, attacker: &NationId, defender: &NationId) -> Result<(), ActionError> {
        let tick = self.tick;
        let checked = self.active_pair(attacker, defender).and_then(|(from, to)| {
            require_capital(from, PC_COST_DECLARE_WAR)?;
            blocking_relation(from, to, tick).map_or(Ok(()), Err)
        });
        if let Err(error) = checked {
            return Err(self.reject(error));
        }

        let Some((from, to)) = self.nations.pair_mut(attacker, defender) else {
            return Err(ActionError::UnknownNation(defender.clone()));
        };
        from.political_capital -= PC_COST_DECLARE_WAR;
        from.add_aggression(AGGRESSION_HIT_DECLARE_WAR);
        from.relations.insert(defender.clone(), RELATION_HIT_DECLARE_WAR);
        to.relations.insert(attacker.clone(), RELATION_HIT_DECLARE_WAR);
        from.truces.retain(|truce| &truce.target != defender);
        to.truces.retain(|truce| &truce.target != attacker);
        let message = format!("{} declared war on {}!", from.name, to.name);

        let war = WarDetails {
            id: format!("{attacker}_vs_{defender}_{}-{}-{tick}", self.date.year, self.date.day),
            attacker: attacker.clone(),
            defender: defender.clone(),
            start_date: self.date.clone(),
            ticks_to_resolution: roll_war_duration(&mut *self.rng),
        };
        info!(war = %war.id, ticks = war.ticks_to_resolution, "war declared");
        begin_war(self.nations, self.wars, war);
        self.log.headline(LogCategory::War, Some(self.date), message);
        Ok(())
    }

    fn discard_proposal(&mut self, country: &NationId, proposal_id: &str) {
        if let Some(responder) = self.nations.get_mut(country) {
            responder.pending_proposals.retain(|pending| pending.id != proposal_id);
        }
    }

    /// Standing that changed since the offer was queued and now forbids it.
    fn acceptance_blocker(&self, country: &NationId, proposal: &DiplomaticProposal) -> Option<ActionError> {
        let responder = self.nations.get(country)?;
        let proposer = self.nations.get(&proposal.from)?;
        match proposal.kind {
            ProposalKind::AllianceOffer => blocking_relation(responder, proposer, self.tick),
            ProposalKind::TruceOffer if !responder.at_war_with.contains(&proposer.id) => {
                Some(ActionError::NotAtWar {
                    nation: responder.name.clone(),
                    other: proposer.name.clone(),
                })
            }
            ProposalKind::TruceOffer => None,
        }
    }

    /// Resolves a queued proposal addressed to `country`.
    pub fn respond_to_proposal(
        &mut self,
        country: &NationId,
        proposal_id: &str,
        accepted: bool,
    ) -> Result<(), ActionError> {
        let found = self.active(country).and_then(|nation| {
            nation
                .pending_proposals
                .iter()
                .find(|proposal| proposal.id == proposal_id)
                .cloned()
                .ok_or_else(|| ActionError::ProposalNotFound {
                    nation: nation.name.clone(),
                    proposal: proposal_id.to_string(),
                })
        });
        let proposal = match found {
            Ok(proposal) => proposal,
            Err(error) => return Err(self.reject(error)),
        };

        if self.nations.active(&proposal.from).is_none() {
            self.discard_proposal(country, &proposal.id);
            let error = ActionError::StaleProposal {
                proposal: proposal.id,
                from: proposal.from,
            };
            return Err(self.reject(error));
        }
        if accepted {
            if let Some(error) = self.acceptance_blocker(country, &proposal) {
                return Err(self.reject(error));
            }
        }
        self.discard_proposal(country, &proposal.id);

        let tick = self.tick;
        let Some((responder, proposer)) = self.nations.pair_mut(country, &proposal.from) else {
            return Err(ActionError::SelfTarget(self.nations.name_of(country)));
        };
        let message = match (accepted, proposal.kind) {
            (true, ProposalKind::AllianceOffer) => {
                responder.allies.insert(proposer.id.clone());
                proposer.allies.insert(responder.id.clone());
                responder.shift_relation(&proposer.id, ALLIANCE_ACCEPT_RELATION_BONUS);
                proposer.shift_relation(&responder.id, ALLIANCE_ACCEPT_RELATION_BONUS);
                format!("{} accepted the alliance offer from {}.", responder.name, proposer.name)
            }
            (true, ProposalKind::TruceOffer) => {
                responder.at_war_with.remove(&proposer.id);
                proposer.at_war_with.remove(&responder.id);
                let end_tick = tick + DEFAULT_TRUCE_DURATION_TICKS;
                responder.truces.push(Truce {
                    target: proposer.id.clone(),
                    end_tick,
                });
                proposer.truces.push(Truce {
                    target: responder.id.clone(),
                    end_tick,
                });
                responder.shift_relation(&proposer.id, TRUCE_RELATION_IMPROVEMENT_ON_ACCEPT);
                proposer.shift_relation(&responder.id, TRUCE_RELATION_IMPROVEMENT_ON_ACCEPT);
                self.wars.remove_pair(country, &proposal.from);
                format!(
                    "{} accepted the truce offered by {}. Hostilities cease for {} years.",
                    responder.name,
                    proposer.name,
                    DEFAULT_TRUCE_DURATION_TICKS.div_ceil(u64::from(DAYS_IN_YEAR))
                )
            }
            (false, kind) => {
                responder.shift_relation(&proposer.id, -PROPOSAL_REJECT_RELATION_PENALTY);
                proposer.shift_relation(&responder.id, -PROPOSAL_REJECT_RELATION_PENALTY);
                format!(
                    "{} rejected the {} offer from {}.",
                    responder.name,
                    kind.label(),
                    proposer.name
                )
            }
        };
        self.record(LogCategory::Diplomacy, message);
        Ok(())
    }
}
