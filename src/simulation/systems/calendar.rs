use bevy_ecs::prelude::*;
use tracing::info;

use crate::simulation::constants::DAYS_IN_YEAR;
use crate::simulation::{Catalog, GameDate, GameLog, LogCategory};

/// Moves the date forward one day and steps into the next era once its
/// threshold year is reached. Returns true when the era changed.
pub fn advance_date(date: &mut GameDate, catalog: &Catalog, log: &mut GameLog) -> bool {
    date.day += 1;
    if date.day > DAYS_IN_YEAR {
        date.day = 1;
        date.year += 1;
    }

    let Some(next) = catalog.next_era(&date.era_id) else {
        return false;
    };
    if date.year < next.start_year_threshold {
        return false;
    }
    date.era_id = next.id.clone();
    info!(era = %next.id, year = date.year, "era advanced");
    log.push(LogCategory::Era, Some(&*date), format!("{} has arrived!", next.name));
    true
}

pub fn calendar_system(mut date: ResMut<GameDate>, catalog: Res<Catalog>, mut log: ResMut<GameLog>) {
    advance_date(&mut date, &catalog, &mut log);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_rolls_over_after_the_last_day() {
        let catalog = Catalog::builtin().unwrap();
        let mut log = GameLog::default();
        let mut date = GameDate {
            year: 3,
            day: DAYS_IN_YEAR,
            era_id: "era_early".to_string(),
        };
        assert!(!advance_date(&mut date, &catalog, &mut log));
        assert_eq!((date.year, date.day), (4, 1));
        assert!(log.is_empty());
    }

    #[test]
    fn threshold_year_opens_the_next_era() {
        let catalog = Catalog::builtin().unwrap();
        let mut log = GameLog::default();
        let mut date = GameDate {
            year: 29,
            day: DAYS_IN_YEAR,
            era_id: "era_early".to_string(),
        };
        assert!(advance_date(&mut date, &catalog, &mut log));
        assert_eq!(date.era_id, "era_industrial");
        assert_eq!(log.latest().unwrap().to_string(), "[Year 30, Day 1] Industrial Era has arrived!");
    }

    #[test]
    fn the_last_era_is_final() {
        let catalog = Catalog::builtin().unwrap();
        let mut log = GameLog::default();
        let mut date = GameDate {
            year: 400,
            day: 10,
            era_id: "era_future".to_string(),
        };
        assert!(!advance_date(&mut date, &catalog, &mut log));
        assert_eq!(date.era_id, "era_future");
    }
}
