//! Colorized log pulse for quick CLI scanning.

use bevy_ecs::prelude::*;
use colored::{Color, Colorize};
use tracing::info;

use crate::simulation::{ActiveWars, Catalog, GameDate, GameLog, LogEntry, Nation, NationTable, WorldTime};

/// Quiet ticks between two status headers.
const PULSE_HEADER_INTERVAL: u64 = 30;

fn badge(label: &str, color: Color) -> String {
    format!("[{label}]").color(color).to_string()
}

/// `1.72e12` reads as `$1.72T`.
pub fn format_money(value: f64) -> String {
    let (scaled, suffix) = match value.abs() {
        v if v >= 1e12 => (value / 1e12, "T"),
        v if v >= 1e9 => (value / 1e9, "B"),
        v if v >= 1e6 => (value / 1e6, "M"),
        _ => (value, ""),
    };
    format!("${scaled:.2}{suffix}")
}

fn format_entry_line(entry: &LogEntry) -> String {
    let category = badge(entry.category.label(), entry.category.color());
    match &entry.date {
        Some(date) => format!("{} {} {}", category, badge(&date.to_string(), Color::BrightBlack), entry.message),
        None => format!("{} {}", category, entry.message),
    }
}

fn format_player_line(player: &Nation) -> String {
    let name = player.name.color(Color::BrightWhite).bold().to_string();
    let posture = if player.is_at_war() {
        badge("At war", Color::Red)
    } else {
        badge("Peace", Color::BrightGreen)
    };
    format!(
        "{} {} GDP {} | military {:.0}/{:.0} | PC {:.1} | aggression {:.0}",
        name,
        posture,
        format_money(player.gdp),
        player.military.total(),
        player.max_military.total(),
        player.political_capital,
        player.aggression,
    )
}

pub fn logging_system(
    time: Res<WorldTime>,
    date: Res<GameDate>,
    catalog: Res<Catalog>,
    nations: Res<NationTable>,
    wars: Res<ActiveWars>,
    mut log: ResMut<GameLog>,
) {
    let fresh = log.drain_fresh();
    if fresh.is_empty() && time.tick % PULSE_HEADER_INTERVAL != 0 {
        return;
    }

    let mut lines = vec![format!(
        "{} {} {} {} {}",
        badge("World", Color::BrightWhite),
        badge(&format!("Tick {}", time.tick), Color::BrightBlack),
        badge(&date.to_string(), Color::BrightBlue),
        badge(catalog.era_name(&date.era_id), Color::BrightCyan),
        badge(
            &format!("{} wars | {} nations", wars.0.len(), nations.active_count()),
            Color::Yellow
        ),
    )];
    if let Some(player) = nations.player() {
        lines.push(format_player_line(player));
    }
    // Oldest first so the console reads chronologically.
    lines.extend(fresh.iter().map(format_entry_line));

    info!("\n{}", lines.join("\n"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_uses_the_largest_fitting_suffix() {
        assert_eq!(format_money(1.72e12), "$1.72T");
        assert_eq!(format_money(3.0e10), "$30.00B");
        assert_eq!(format_money(4_500_000.0), "$4.50M");
        assert_eq!(format_money(12.0), "$12.00");
    }
}
