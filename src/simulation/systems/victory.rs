//! Game-over detection and the final ranking.

use bevy_ecs::prelude::*;
use tracing::info;

use crate::simulation::{
    GameDate, GameLog, GameOutcome, GamePhase, LogCategory, NationTable, RankedNation, Session,
};

/// Live nations first in table order, then the fallen, most recent first.
pub fn rank_nations(nations: &NationTable) -> Vec<RankedNation> {
    let mut order: Vec<_> = nations.iter().collect();
    order.sort_by(|a, b| match (a.is_eliminated, b.is_eliminated) {
        (false, true) => std::cmp::Ordering::Less,
        (true, false) => std::cmp::Ordering::Greater,
        (false, false) => std::cmp::Ordering::Equal,
        (true, true) => b.eliminated_tick.unwrap_or(0).cmp(&a.eliminated_tick.unwrap_or(0)),
    });
    order
        .into_iter()
        .enumerate()
        .map(|(index, nation)| RankedNation {
            id: nation.id.clone(),
            country_name: nation.name.clone(),
            rank: index + 1,
            eliminated_tick: nation.eliminated_tick,
            is_player: nation.is_player,
        })
        .collect()
}

/// Checks the end conditions in order: fallen player, sole survivor,
/// nobody left.
pub fn evaluate_game_over(nations: &NationTable, log: &mut GameLog, date: &GameDate) -> Option<GameOutcome> {
    let active: Vec<_> = nations.iter().filter(|n| !n.is_eliminated).collect();
    let fallen_player = nations.player().filter(|p| p.is_eliminated);

    let (player_won, winner_name, message) = if let Some(player) = fallen_player {
        let winner = active
            .iter()
            .find(|n| n.territories.contains(&player.id))
            .map_or_else(|| "Unknown conqueror".to_string(), |n| n.name.clone());
        let message = format!("{} was conquered by {}. Game over.", player.name, winner);
        (false, winner, message)
    } else if let [survivor] = active.as_slice() {
        let message = format!("{} has conquered the world! Game over.", survivor.name);
        (survivor.is_player, survivor.name.clone(), message)
    } else if active.is_empty() {
        (
            false,
            "None (all destroyed)".to_string(),
            "Every nation has been destroyed. It's a draw! Game over.".to_string(),
        )
    } else {
        return None;
    };

    info!(%winner_name, player_won, "game over");
    log.headline(LogCategory::GameOver, Some(date), message);
    Some(GameOutcome {
        player_won,
        winner_name,
        ranking: rank_nations(nations),
    })
}

pub fn game_over_system(
    nations: Res<NationTable>,
    mut session: ResMut<Session>,
    mut log: ResMut<GameLog>,
    date: Res<GameDate>,
) {
    if session.phase != GamePhase::Playing {
        return;
    }
    if let Some(outcome) = evaluate_game_over(&nations, &mut log, &date) {
        session.phase = GamePhase::GameOver;
        session.outcome = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::NationId;
    use crate::simulation::testing::WorldBuilder;

    fn id(raw: &str) -> NationId {
        NationId::from(raw)
    }

    #[test]
    fn a_crowded_world_keeps_playing() {
        let mut fixture = WorldBuilder::new()
            .with_country("410")
            .with_country("392")
            .player("410")
            .build_fixture();
        assert!(evaluate_game_over(&fixture.nations, &mut fixture.log, &fixture.date).is_none());
    }

    #[test]
    fn a_conquered_player_loses_to_the_holder_of_its_homeland() {
        let mut fixture = WorldBuilder::new()
            .with_country("410")
            .with_country("392")
            .with_country("408")
            .player("410")
            .with_nation("410", |n| n.eliminate(40))
            .with_nation("392", |n| {
                n.territories.insert(NationId::from("410"));
            })
            .build_fixture();

        let outcome = evaluate_game_over(&fixture.nations, &mut fixture.log, &fixture.date).unwrap();
        assert!(!outcome.player_won);
        assert_eq!(outcome.winner_name, "Japan");
        assert_eq!(fixture.log.status_message(), "South Korea was conquered by Japan. Game over.");

        let ranks: Vec<_> = outcome.ranking.iter().map(|r| (r.id.clone(), r.rank)).collect();
        assert_eq!(ranks, vec![(id("392"), 1), (id("408"), 2), (id("410"), 3)]);
        assert!(outcome.ranking[2].is_player);
    }

    #[test]
    fn the_last_nation_standing_wins() {
        let mut fixture = WorldBuilder::new()
            .with_country("410")
            .with_country("392")
            .with_country("408")
            .player("410")
            .with_nation("392", |n| n.eliminate(5))
            .with_nation("408", |n| n.eliminate(9))
            .build_fixture();

        let outcome = evaluate_game_over(&fixture.nations, &mut fixture.log, &fixture.date).unwrap();
        assert!(outcome.player_won);
        assert_eq!(outcome.winner_name, "South Korea");
        let order: Vec<_> = outcome.ranking.iter().map(|r| r.country_name.as_str()).collect();
        assert_eq!(order, vec!["South Korea", "North Korea", "Japan"]);
        assert_eq!(outcome.ranking[1].eliminated_tick, Some(9));
    }

    #[test]
    fn mutual_destruction_is_a_draw() {
        let mut fixture = WorldBuilder::new()
            .with_country("392")
            .with_country("408")
            .with_nation("392", |n| n.eliminate(5))
            .with_nation("408", |n| n.eliminate(5))
            .build_fixture();

        let outcome = evaluate_game_over(&fixture.nations, &mut fixture.log, &fixture.date).unwrap();
        assert!(!outcome.player_won);
        assert_eq!(outcome.winner_name, "None (all destroyed)");
    }
}
