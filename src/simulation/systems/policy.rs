use bevy_ecs::prelude::*;
use tracing::debug;

use crate::simulation::actions::ActionContext;
use crate::simulation::{ActiveWars, Catalog, Delegation, GameDate, GameLog, NationTable, SimRng, WorldTime};

/// Lets the delegation automation enact one policy for the player per tick.
pub fn policy_automation_system(
    mut nations: ResMut<NationTable>,
    mut wars: ResMut<ActiveWars>,
    mut log: ResMut<GameLog>,
    mut rng: ResMut<SimRng>,
    catalog: Res<Catalog>,
    date: Res<GameDate>,
    time: Res<WorldTime>,
    delegation: Res<Delegation>,
) {
    if !delegation.auto_enact_policies {
        return;
    }
    let Some(player) = nations.player().filter(|n| !n.is_eliminated).map(|n| n.id.clone()) else {
        return;
    };

    let mut ctx = ActionContext {
        nations: &mut nations,
        wars: &mut wars,
        log: &mut log,
        rng: &mut *rng,
        catalog: &catalog,
        date: &date,
        tick: time.tick,
    };
    if let Some(policy) = ctx.auto_enact_policy(&player) {
        debug!(%player, %policy, "delegated policy enacted");
    }
}
