//! Static starting data for every playable country.

use serde::{Deserialize, Serialize};

use crate::simulation::{CoreStats, MilitaryForces};

/// Raw reference figures for one country.
#[derive(Debug, Clone, Copy)]
pub struct CountryRecord {
    pub id: &'static str,
    pub name: &'static str,
    pub population: u64,
    pub gdp: f64,
    pub defense_budget: f64,
    pub military_rank: u32,
    /// Army, navy, airforce share of total military points.
    pub branch_split: (f64, f64, f64),
    pub technology: f64,
    pub diplomacy: f64,
    pub resources: f64,
}

const DEFAULT_SPLIT: (f64, f64, f64) = (0.34, 0.33, 0.33);

const fn record(
    id: &'static str,
    name: &'static str,
    population: u64,
    gdp: f64,
    defense_budget: f64,
    military_rank: u32,
    branch_split: (f64, f64, f64),
    (technology, diplomacy, resources): (f64, f64, f64),
) -> CountryRecord {
    CountryRecord {
        id,
        name,
        population,
        gdp,
        defense_budget,
        military_rank,
        branch_split,
        technology,
        diplomacy,
        resources,
    }
}

pub const COUNTRIES: [CountryRecord; 24] = [
    record("840", "United States", 339_900_000, 2.695e13, 8.77e11, 1, (0.33, 0.34, 0.33), (950.0, 900.0, 750.0)),
    record("410", "South Korea", 51_800_000, 1.72e12, 4.6e10, 5, (0.35, 0.30, 0.35), (900.0, 650.0, 250.0)),
    record("156", "China", 1_425_000_000, 1.77e13, 2.92e11, 3, (0.38, 0.30, 0.32), (850.0, 800.0, 700.0)),
    record("392", "Japan", 123_300_000, 4.23e12, 4.8e10, 7, (0.28, 0.38, 0.34), (920.0, 700.0, 300.0)),
    record("643", "Russia", 144_400_000, 1.86e12, 8.6e10, 2, (0.35, 0.30, 0.35), (750.0, 650.0, 920.0)),
    record("356", "India", 1_428_000_000, 3.73e12, 8.14e10, 4, (0.35, 0.28, 0.37), (720.0, 730.0, 550.0)),
    record("826", "United Kingdom", 67_700_000, 3.13e12, 6.85e10, 6, (0.28, 0.37, 0.35), (830.0, 740.0, 450.0)),
    record("250", "France", 64_800_000, 2.92e12, 5.66e10, 11, (0.32, 0.36, 0.32), (810.0, 720.0, 400.0)),
    record("276", "Germany", 83_200_000, 4.43e12, 5.58e10, 19, (0.34, 0.26, 0.40), (880.0, 780.0, 350.0)),
    record("076", "Brazil", 216_400_000, 2.08e12, 2.0e10, 12, (0.40, 0.27, 0.33), (600.0, 620.0, 850.0)),
    record("124", "Canada", 38_700_000, 2.14e12, 2.69e10, 27, DEFAULT_SPLIT, (800.0, 750.0, 900.0)),
    record("036", "Australia", 26_400_000, 1.7e12, 3.23e10, 16, (0.30, 0.35, 0.35), (780.0, 700.0, 800.0)),
    record("484", "Mexico", 128_500_000, 1.41e12, 1.18e10, 31, DEFAULT_SPLIT, (550.0, 600.0, 650.0)),
    record("032", "Argentina", 45_800_000, 6.3e11, 4.0e9, 26, DEFAULT_SPLIT, (500.0, 520.0, 700.0)),
    record("818", "Egypt", 109_300_000, 3.94e11, 9.0e9, 14, (0.40, 0.25, 0.35), (450.0, 580.0, 500.0)),
    record("792", "Turkey", 85_300_000, 1.15e12, 1.6e10, 8, (0.36, 0.28, 0.36), (680.0, 710.0, 400.0)),
    record("360", "Indonesia", 277_500_000, 1.32e12, 2.5e10, 13, (0.38, 0.32, 0.30), (520.0, 630.0, 720.0)),
    record("682", "Saudi Arabia", 36_400_000, 1.1e12, 7.5e10, 23, (0.33, 0.27, 0.40), (650.0, 760.0, 950.0)),
    record("566", "Nigeria", 223_800_000, 4.7e11, 2.6e9, 36, DEFAULT_SPLIT, (350.0, 450.0, 750.0)),
    record("710", "South Africa", 60_400_000, 3.99e11, 3.0e9, 33, DEFAULT_SPLIT, (580.0, 550.0, 680.0)),
    record("408", "North Korea", 26_100_000, 3.0e10, 4.5e9, 36, (0.60, 0.15, 0.25), (400.0, 150.0, 520.0)),
    record("704", "Vietnam", 99_500_000, 4.3e11, 7.0e9, 22, (0.38, 0.32, 0.30), (620.0, 580.0, 600.0)),
    record("380", "Italy", 58_800_000, 2.17e12, 3.16e10, 10, (0.30, 0.38, 0.32), (860.0, 820.0, 320.0)),
    record("616", "Poland", 37_700_000, 8.42e11, 2.8e10, 21, (0.45, 0.20, 0.35), (750.0, 680.0, 480.0)),
];

/// Starting figures a nation keeps for its whole life: recovery targets and
/// the denominators of war losses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationBaseline {
    pub population: u64,
    pub gdp: f64,
    pub defense_budget: f64,
    pub military: MilitaryForces,
    pub stats: CoreStats,
}

impl CountryRecord {
    pub fn baseline(&self) -> NationBaseline {
        let total_points = (1050.0 - f64::from(self.military_rank) * 25.0).round().max(150.0);
        let (army, navy, airforce) = self.branch_split;
        NationBaseline {
            population: self.population,
            gdp: self.gdp,
            defense_budget: self.defense_budget,
            military: MilitaryForces {
                army: (total_points * army).round(),
                navy: (total_points * navy).round(),
                airforce: (total_points * airforce).round(),
            },
            stats: CoreStats {
                economy: (self.gdp / 1e12 * 35.0).round().clamp(50.0, 1000.0),
                technology: self.technology,
                diplomacy: self.diplomacy,
                resources: self.resources,
            },
        }
    }
}

pub fn country(id: &str) -> Option<&'static CountryRecord> {
    COUNTRIES.iter().find(|record| record.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = COUNTRIES.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), COUNTRIES.len());
    }

    #[test]
    fn baseline_derives_economy_and_military_points() {
        let usa = country("840").unwrap().baseline();
        assert_eq!(usa.stats.economy, 943.0);
        assert_eq!(usa.military.army, 338.0);
        assert_eq!(usa.military.navy, 349.0);
        assert_eq!(usa.military.airforce, 338.0);

        let korea = country("410").unwrap().baseline();
        assert_eq!(korea.stats.economy, 60.0);
        assert_eq!(korea.military.total(), 926.0);
    }

    #[test]
    fn low_ranked_countries_get_the_minimum_force() {
        let nigeria = country("566").unwrap().baseline();
        assert_eq!(nigeria.military.army, 51.0);
        assert_eq!(nigeria.military.navy, 50.0);
        assert_eq!(nigeria.military.airforce, 50.0);
        assert_eq!(nigeria.stats.economy, 50.0);
    }
}
