//! Tuning constants of the tick engine.

pub const DAYS_IN_YEAR: u32 = 365;
pub const MAX_LOG_ENTRIES: usize = 200;

// Political capital and growth
pub const BASE_POLITICAL_CAPITAL_PER_TICK: f64 = 0.05;
pub const POLITICAL_CAPITAL_FROM_DIPLOMACY_SCALE: f64 = 500.0;
pub const MAX_POLITICAL_CAPITAL: f64 = 200.0;
pub const PLAYER_STARTING_POLITICAL_CAPITAL: f64 = 75.0;
pub const AI_STARTING_POLITICAL_CAPITAL: f64 = 50.0;

pub const BASE_GDP_GROWTH_RATE_PER_TICK: f64 = 0.0001;
pub const BASE_TECH_POINTS_PER_TICK: f64 = 0.1;
pub const BASE_DIPLOMACY_POINTS_PER_TICK: f64 = 0.02;
pub const BASE_RESOURCE_POINTS_PER_TICK: f64 = 0.01;

pub const BUDGET_ECONOMY_EFFECT_SCALE: f64 = 70.0;
pub const BUDGET_TECHNOLOGY_EFFECT_SCALE: f64 = 170.0;
pub const BUDGET_DIPLOMACY_EFFECT_SCALE: f64 = 180.0;
pub const BUDGET_RESOURCES_EFFECT_SCALE: f64 = 180.0;

pub const STAT_MAX: f64 = 1000.0;
pub const ECONOMY_STAT_FLOOR: f64 = 10.0;
pub const ECONOMY_STAT_PER_TRILLION: f64 = 35.0;

// Budget
pub const DEFAULT_DEFENSE_BUDGET_RATIO: f64 = 5.0;
pub const MAX_DEFENSE_BUDGET_RATIO_SOFT_CAP: f64 = 15.0;
pub const MAX_DEFENSE_BUDGET_RATIO_HARD_CAP: f64 = 50.0;
pub const DEFENSE_SPENDING_PENALTY_GDP_FACTOR: f64 = 0.000015;
pub const DEFENSE_SPENDING_PENALTY_RESOURCE_FACTOR: f64 = 0.0007;
pub const DEFENSE_SPENDING_PENALTY_DIPLOMACY_FACTOR: f64 = 0.0003;
pub const OVERSPEND_WARNING_INTERVAL: u64 = 10;

// Aggression and war
pub const BASE_AGGRESSION_DECAY_PER_TICK: f64 = 0.05;
pub const MAX_AGGRESSION: f64 = 100.0;
pub const WAR_TICKS_DURATION: u32 = 20;
pub const WAR_DURATION_JITTER: u32 = 10;
pub const WEAK_TARGET_PREFERENCE: f64 = 0.7;
pub const DELEGATED_WAR_CHANCE: f64 = 0.005;

// Occupation
pub const INITIAL_RESISTANCE_LEVEL: f64 = 10.0;
pub const RESISTANCE_GROWTH_PER_TICK: f64 = 0.05;
pub const MAX_RESISTANCE_LEVEL: f64 = 100.0;
pub const RESISTANCE_INCOME_PENALTY_FACTOR: f64 = 0.75;
pub const DISRUPTED_INCOME_PENALTY: f64 = 0.9;
pub const OCCUPIED_TERRITORY_MAX_MILITARY_BONUS_FACTOR: f64 = 0.1;

// Rebellion
pub const INITIAL_REBELLION_RISK: f64 = 0.0;
pub const MAX_REBELLION_RISK: f64 = 100.0;
pub const REBELLION_RISK_FROM_RESISTANCE_SCALE: f64 = 2.0;
pub const MIN_RESISTANCE_FOR_RISK_GROWTH: f64 = 30.0;
pub const REBELLION_RISK_DECAY_PER_TICK: f64 = 0.02;
pub const REBELLION_RISK_THRESHOLD: f64 = 70.0;
pub const REBELLION_CHANCE_DIVISOR: f64 = 2000.0;
pub const REBELLION_PC_PENALTY_BASE: f64 = 20.0;
pub const REBELLION_PRODUCTION_DISRUPTION_TICKS_BASE: u32 = 10;
pub const REBELLION_DISRUPTION_JITTER: f64 = 5.0;
pub const REBELLION_POST_EVENT_RISK_REDUCTION: f64 = 50.0;
pub const REBELLION_POST_EVENT_RESISTANCE_REDUCTION: f64 = 15.0;
pub const REBEL_GENERATION_SCALE_FROM_RISK: f64 = 5.0;
pub const REBEL_GENERATION_TECH_SUPPRESSION_FACTOR: f64 = 1500.0;
pub const MIN_REBEL_STRENGTH: f64 = 10.0;
pub const GARRISON_BASE_EFFECTIVENESS: f64 = 0.2;
pub const REBEL_VS_GARRISON_ATTRITION_FACTOR: f64 = 0.1;
pub const GARRISON_LOSS_FACTOR_VS_REBELS: f64 = 0.25;
pub const REBEL_STRENGTH_DISRUPTION_THRESHOLD: f64 = 10.0;
pub const SUPPRESSION_REDUCTION_MULTIPLIER: f64 = 1.5;

// Military recovery
pub const RECOVERY_TECH_BONUS_SCALE: f64 = 2000.0;
pub const RECOVERY_BUDGET_ALLOCATION_EFFECT_SCALE: f64 = 0.05;
pub const RECOVERY_MANPOWER_AVAILABILITY_SCALE: f64 = 50_000_000.0;
pub const BASE_RECOVERY_POINTS_PER_TICK: f64 = 0.5;
pub const RECOVERY_COST_BUDGET_PER_UNIT: f64 = 250_000_000.0;
pub const RECOVERY_COST_POP_PER_UNIT: f64 = 300.0;
pub const MIN_RECOVERY_STEP: f64 = 0.01;

// War attrition
pub const NORM_TECH: f64 = 500.0;
pub const MIN_CASUALTY_RATE: f64 = 0.001;
pub const MAX_CASUALTY_RATE: f64 = 0.03;
pub const HEAVY_CASUALTY_RATE: f64 = 0.02;
pub const NAVY_CASUALTY_FACTOR: f64 = 0.7;
pub const POPULATION_LOSS_PER_UNIT: f64 = 0.75;
pub const POPULATION_WAR_DRAIN: f64 = 0.00002;
pub const BASE_GDP_WAR_LOSS: f64 = 0.00035;
pub const MAX_GDP_WAR_LOSS: f64 = 0.015;
pub const CONQUEST_TECH_SHARE: f64 = 0.15;
pub const TECH_EDGE_CASUALTY_FACTOR: f64 = 0.1;
pub const WAR_TECH_DECAY: f64 = 0.9995;
pub const WAR_DIPLOMACY_DECAY: f64 = 0.9998;
pub const WAR_STAT_FLOOR: f64 = 10.0;
pub const RESOURCE_DRAIN_BASE: f64 = 0.0002;
pub const RESOURCE_DRAIN_MILITARY_SCALE: f64 = 25_000_000.0;
pub const MAX_RESOURCE_DRAIN_RATE: f64 = 0.008;
pub const MIN_RESOURCE_DRAIN: f64 = 0.01;

// Aggression relief when a war ends
pub const AGGRESSION_RELIEF_ANNIHILATION: f64 = 60.0;
pub const AGGRESSION_RELIEF_CONQUEST: f64 = 50.0;
pub const AGGRESSION_RELIEF_FAILED_OFFENSIVE: f64 = 30.0;
pub const AGGRESSION_RELIEF_HELD_AGAINST_ANNIHILATION: f64 = 15.0;
pub const AGGRESSION_RELIEF_REPELLED_ATTACKER: f64 = 15.0;
pub const AGGRESSION_RELIEF_REPELLED_DEFENDER: f64 = 10.0;
pub const AGGRESSION_RELIEF_DECLARATION: f64 = 70.0;

// Diplomacy
pub const RELATIONS_MAX: f64 = 100.0;
pub const RELATIONS_MIN: f64 = -100.0;
pub const RELATIONS_INITIAL_DEFAULT: f64 = 0.0;
pub const ALLIANCE_RELATION_THRESHOLD: f64 = 50.0;
pub const ALLIANCE_ACCEPT_RELATION_BONUS: f64 = 10.0;
pub const PROPOSAL_REJECT_RELATION_PENALTY: f64 = 5.0;
pub const TRUCE_RELATION_IMPROVEMENT_ON_ACCEPT: f64 = 10.0;
pub const DEFAULT_TRUCE_DURATION_TICKS: u64 = 365 * 5;
pub const RELATION_IMPROVEMENT_PER_ACTION: f64 = 15.0;
pub const RELATION_HARM_PER_ACTION: f64 = -15.0;
pub const RELATION_HIT_BREAK_ALLIANCE_WITH_ALLY: f64 = -50.0;
pub const RELATION_HIT_DECLARE_WAR: f64 = -75.0;

pub const PC_COST_IMPROVE_RELATIONS: f64 = 10.0;
pub const PC_COST_HARM_RELATIONS: f64 = 5.0;
pub const PC_COST_PROPOSE_ALLIANCE: f64 = 20.0;
pub const PC_COST_BREAK_ALLIANCE_PENALTY: f64 = 30.0;
pub const PC_COST_OFFER_TRUCE: f64 = 10.0;
pub const PC_COST_DECLARE_WAR: f64 = 25.0;

pub const AGGRESSION_HIT_BREAK_ALLIANCE: f64 = 20.0;
pub const AGGRESSION_HIT_DECLARE_WAR: f64 = 15.0;
pub const DELEGATED_WAR_AGGRESSION_FACTOR: f64 = 0.5;

/// Half a year, rounded up to whole ticks.
pub const ALLIANCE_PROPOSAL_TTL_TICKS: u64 = 183;
/// A quarter year, rounded up to whole ticks.
pub const TRUCE_PROPOSAL_TTL_TICKS: u64 = 92;
