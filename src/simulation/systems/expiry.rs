use bevy_ecs::prelude::*;

use crate::simulation::{GameDate, GameLog, LogCategory, NationId, NationTable, WorldTime};

/// Drops truces and proposals whose end tick has been reached. Each side of
/// a lapsed truce logs its own expiry; proposals lapse silently.
pub fn expire_agreements(nations: &mut NationTable, log: &mut GameLog, date: &GameDate, tick: u64) {
    let names: Vec<_> = nations.iter().map(|n| (n.id.clone(), n.name.clone())).collect();
    let name_of = |id: &NationId| -> String {
        names
            .iter()
            .find(|(known, _)| known == id)
            .map_or_else(|| "an unknown nation".to_string(), |(_, name)| name.clone())
    };

    for nation in nations.0.values_mut().filter(|n| !n.is_eliminated) {
        let (expired, kept): (Vec<_>, Vec<_>) = nation.truces.drain(..).partition(|t| t.end_tick <= tick);
        nation.truces = kept;
        for truce in expired {
            log.push(
                LogCategory::Diplomacy,
                Some(date),
                format!("Truce between {} and {} has expired.", nation.name, name_of(&truce.target)),
            );
        }
        nation.pending_proposals.retain(|p| p.expires_tick > tick);
    }
}

pub fn expiry_system(
    mut nations: ResMut<NationTable>,
    mut log: ResMut<GameLog>,
    date: Res<GameDate>,
    time: Res<WorldTime>,
) {
    expire_agreements(&mut nations, &mut log, &date, time.tick);
}
