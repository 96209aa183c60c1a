use bevy_ecs::prelude::*;

use crate::simulation::{NationTable, StatHistory, StatHistoryEntry, WorldTime};

/// Appends the player's core stats for `tick` while the player survives.
pub fn record_player_stats(nations: &NationTable, history: &mut StatHistory, tick: u64) {
    let Some(player) = nations.player().filter(|p| !p.is_eliminated) else {
        return;
    };
    history.record(StatHistoryEntry {
        tick,
        economy: player.stats.economy,
        technology: player.stats.technology,
        diplomacy: player.stats.diplomacy,
        resources: player.stats.resources,
    });
}

pub fn history_system(nations: Res<NationTable>, mut history: ResMut<StatHistory>, time: Res<WorldTime>) {
    record_player_stats(&nations, &mut history, time.tick);
}
