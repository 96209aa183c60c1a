use std::sync::{Arc, RwLock};

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::{ExecutorKind, Schedule};
use bevy_ecs::system::SystemState;
use rand::{Rng, RngCore};
use tracing::info;

pub mod actions;
pub mod baseline;
pub mod catalog;
pub mod constants;
pub mod error;
pub mod events;
pub mod modifiers;
pub mod nation;
pub mod observer;
pub mod resources;
pub mod systems;
#[cfg(test)]
pub mod testing;

pub use actions::{ActionContext, PlayerAction};
pub use baseline::*;
pub use catalog::*;
pub use error::*;
pub use events::*;
pub use modifiers::*;
pub use nation::*;
pub use observer::*;
pub use resources::*;

use constants::{AI_STARTING_POLITICAL_CAPITAL, DEFAULT_DEFENSE_BUDGET_RATIO, PLAYER_STARTING_POLITICAL_CAPITAL};

type ActionState = SystemState<(
    ResMut<'static, NationTable>,
    ResMut<'static, ActiveWars>,
    ResMut<'static, GameLog>,
    ResMut<'static, SimRng>,
    Res<'static, Catalog>,
    Res<'static, GameDate>,
    Res<'static, WorldTime>,
)>;

/// Owns the world and the tick schedule. The only writer of game state.
pub struct SimulationWorld {
    world: World,
    schedule: Schedule,
    observer: Arc<RwLock<ObserverSnapshot>>,
}

impl SimulationWorld {
    pub fn new(config: SimulationConfig, catalog: Catalog) -> Self {
        Self::with_observer(config, catalog, Arc::new(RwLock::new(ObserverSnapshot::default())))
    }

    pub fn with_observer(
        config: SimulationConfig,
        catalog: Catalog,
        observer: Arc<RwLock<ObserverSnapshot>>,
    ) -> Self {
        let mut world = World::default();
        world.insert_resource(SimRng::from_seed(config.seed));
        world.insert_resource(config.speed);
        world.insert_resource(GameDate::start(catalog.initial_era().id.clone()));
        world.insert_resource(config);
        world.insert_resource(catalog);
        world.insert_resource(NationTable::default());
        world.insert_resource(ActiveWars::default());
        world.insert_resource(GameLog::default());
        world.insert_resource(WorldTime::default());
        world.insert_resource(Delegation::default());
        world.insert_resource(Session::default());
        world.insert_resource(StatHistory::default());

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                systems::calendar_system,
                systems::expiry_system,
                systems::budget_system,
                systems::economy_system,
                systems::policy_automation_system,
                systems::warfare_system,
                systems::recovery_system,
                systems::aggression_system,
                systems::history_system,
                systems::game_over_system,
                systems::logging_system,
            )
                .chain(),
        );

        let mut simulation = Self {
            world,
            schedule,
            observer,
        };
        simulation.refresh_observer_snapshot();
        simulation
    }

    /// Replaces the random source, e.g. with a fixed sequence in tests.
    pub fn set_rng(&mut self, rng: impl RngCore + Send + Sync + 'static) {
        self.world.insert_resource(SimRng::new(rng));
    }

    /// Seats the player and resets every nation to its baseline figures.
    pub fn start_game(&mut self, player: &NationId) -> Result<(), ActionError> {
        let Some(seat) = country(player.as_str()) else {
            return Err(ActionError::UnknownNation(player.clone()));
        };

        let mut nations = NationTable::default();
        {
            let mut rng = self.world.resource_mut::<SimRng>();
            for record in COUNTRIES.iter() {
                let mut nation = Nation::from_record(record);
                nation.aggression = (rng.gen_range(0.0f64..1.0) * 30.0).floor() + 5.0;
                if nation.id == *player {
                    nation.is_player = true;
                    nation.political_capital = PLAYER_STARTING_POLITICAL_CAPITAL;
                    nation.defense_budget_ratio = DEFAULT_DEFENSE_BUDGET_RATIO;
                } else {
                    nation.political_capital = AI_STARTING_POLITICAL_CAPITAL;
                    nation.defense_budget_ratio = (rng.gen_range(0.0f64..1.0) * 5.0).floor() + 3.0;
                }
                nation.defense_budget = nation.gdp * nation.defense_budget_ratio / 100.0;
                nations.insert(nation);
            }
        }

        let era = self.world.resource::<Catalog>().initial_era().id.clone();
        let mut log = GameLog::default();
        log.push(LogCategory::System, None, format!("Simulation started as {}.", seat.name));

        self.world.insert_resource(nations);
        self.world.insert_resource(ActiveWars::default());
        self.world.insert_resource(GameDate::start(era));
        self.world.insert_resource(WorldTime::default());
        self.world.insert_resource(StatHistory::default());
        self.world.insert_resource(Delegation::default());
        self.world.insert_resource(log);
        self.world.insert_resource(Session {
            player: Some(player.clone()),
            phase: GamePhase::Playing,
            outcome: None,
        });

        info!(player = %player, "game started");
        self.refresh_observer_snapshot();
        Ok(())
    }

    /// Resumes play from a saved or hand-built nation table. The player is
    /// whichever nation carries the player flag. The calendar, log and
    /// delegation flags start over as they do for a new game.
    pub fn resume(&mut self, nations: NationTable, wars: ActiveWars, tick: u64) {
        let player = nations.player().map(|nation| nation.id.clone());
        let era = self.world.resource::<Catalog>().initial_era().id.clone();
        self.world.insert_resource(nations);
        self.world.insert_resource(wars);
        self.world.insert_resource(GameDate::start(era));
        self.world.insert_resource(WorldTime { tick });
        self.world.insert_resource(StatHistory::default());
        self.world.insert_resource(Delegation::default());
        self.world.insert_resource(GameLog::default());
        self.world.insert_resource(Session {
            player,
            phase: GamePhase::Playing,
            outcome: None,
        });
        self.refresh_observer_snapshot();
    }

    /// Advances one tick. Does nothing outside of play.
    pub fn tick(&mut self) {
        if self.phase() != GamePhase::Playing {
            return;
        }
        {
            let mut time = self.world.resource_mut::<WorldTime>();
            time.tick += 1;
        }

        self.schedule.run(&mut self.world);
        self.refresh_observer_snapshot();
    }

    pub fn set_speed(&mut self, speed: GameSpeed) {
        let previous = std::mem::replace(&mut *self.world.resource_mut::<GameSpeed>(), speed);
        if self.phase() == GamePhase::Playing && previous != speed {
            let mut log = self.world.resource_mut::<GameLog>();
            if speed == GameSpeed::Paused {
                log.push(LogCategory::System, None, "Game paused.");
            } else if previous == GameSpeed::Paused {
                log.push(LogCategory::System, None, "Game resumed.");
            }
        }
        self.refresh_observer_snapshot();
    }

    pub fn toggle_auto_enact_policies(&mut self) -> Result<bool, ActionError> {
        self.toggle_delegation(|delegation| &mut delegation.auto_enact_policies, "Automatic policy enactment")
    }

    pub fn toggle_auto_delegate_diplomacy(&mut self) -> Result<bool, ActionError> {
        self.toggle_delegation(|delegation| &mut delegation.auto_delegate_diplomacy, "Diplomacy delegation")
    }

    fn toggle_delegation(
        &mut self,
        flag: impl FnOnce(&mut Delegation) -> &mut bool,
        label: &str,
    ) -> Result<bool, ActionError> {
        if self.phase() != GamePhase::Playing {
            return Err(ActionError::NoGame);
        }
        let enabled = {
            let mut delegation = self.world.resource_mut::<Delegation>();
            let flag = flag(&mut delegation);
            *flag = !*flag;
            *flag
        };
        let state = if enabled { "enabled" } else { "disabled" };
        self.world
            .resource_mut::<GameLog>()
            .push(LogCategory::System, None, format!("{label} {state}."));
        self.refresh_observer_snapshot();
        Ok(enabled)
    }

    /// Runs one validated action against the live state.
    fn act<T>(
        &mut self,
        action: impl FnOnce(&mut ActionContext<'_>) -> Result<T, ActionError>,
    ) -> Result<T, ActionError> {
        if self.phase() != GamePhase::Playing {
            return Err(ActionError::NoGame);
        }
        let mut state: ActionState = SystemState::new(&mut self.world);
        let result = {
            let (mut nations, mut wars, mut log, mut rng, catalog, date, time) = state.get_mut(&mut self.world);
            let mut ctx = ActionContext {
                nations: &mut nations,
                wars: &mut wars,
                log: &mut log,
                rng: &mut *rng,
                catalog: &catalog,
                date: &date,
                tick: time.tick,
            };
            action(&mut ctx)
        };
        self.refresh_observer_snapshot();
        result
    }

    pub fn enact_policy(&mut self, country: &NationId, policy: &str) -> Result<(), ActionError> {
        self.act(|ctx| ctx.enact_policy(country, policy, false))
    }

    pub fn update_defense_budget_ratio(&mut self, country: &NationId, ratio: f64) -> Result<(), ActionError> {
        self.act(|ctx| ctx.update_defense_budget_ratio(country, ratio))
    }

    pub fn update_civilian_allocation(
        &mut self,
        country: &NationId,
        allocation: CivilianAllocation,
    ) -> Result<(), ActionError> {
        self.act(|ctx| ctx.update_civilian_allocation(country, allocation))
    }

    pub fn toggle_auto_manage_budget(&mut self, country: &NationId) -> Result<bool, ActionError> {
        self.act(|ctx| ctx.toggle_auto_manage_budget(country))
    }

    pub fn improve_relations(&mut self, source: &NationId, target: &NationId) -> Result<(), ActionError> {
        self.act(|ctx| ctx.improve_relations(source, target))
    }

    pub fn harm_relations(&mut self, source: &NationId, target: &NationId) -> Result<(), ActionError> {
        self.act(|ctx| ctx.harm_relations(source, target))
    }

    pub fn propose_alliance(&mut self, source: &NationId, target: &NationId) -> Result<(), ActionError> {
        self.act(|ctx| ctx.propose_alliance(source, target))
    }

    pub fn break_alliance(&mut self, source: &NationId, ally: &NationId) -> Result<(), ActionError> {
        self.act(|ctx| ctx.break_alliance(source, ally))
    }

    pub fn offer_truce(&mut self, source: &NationId, target: &NationId) -> Result<(), ActionError> {
        self.act(|ctx| ctx.offer_truce(source, target))
    }

    pub fn declare_war(&mut self, attacker: &NationId, defender: &NationId) -> Result<(), ActionError> {
        self.act(|ctx| ctx.declare_war(attacker, defender))
    }

    pub fn respond_to_proposal(
        &mut self,
        country: &NationId,
        proposal: &str,
        accepted: bool,
    ) -> Result<(), ActionError> {
        self.act(|ctx| ctx.respond_to_proposal(country, proposal, accepted))
    }

    /// Applies a queued request on behalf of the player nation.
    pub fn apply(&mut self, action: PlayerAction) -> Result<(), ActionError> {
        if let PlayerAction::SetSpeed { speed } = action {
            self.set_speed(speed);
            return Ok(());
        }
        let player = self.player_id().cloned().ok_or(ActionError::NoGame)?;
        match action {
            PlayerAction::EnactPolicy { policy } => self.enact_policy(&player, &policy),
            PlayerAction::SetDefenseBudgetRatio { ratio } => self.update_defense_budget_ratio(&player, ratio),
            PlayerAction::SetCivilianAllocation { allocation } => {
                self.update_civilian_allocation(&player, allocation)
            }
            PlayerAction::ToggleAutoManageBudget => self.toggle_auto_manage_budget(&player).map(drop),
            PlayerAction::ToggleAutoEnactPolicies => self.toggle_auto_enact_policies().map(drop),
            PlayerAction::ToggleAutoDelegateDiplomacy => self.toggle_auto_delegate_diplomacy().map(drop),
            PlayerAction::ImproveRelations { target } => self.improve_relations(&player, &target),
            PlayerAction::HarmRelations { target } => self.harm_relations(&player, &target),
            PlayerAction::ProposeAlliance { target } => self.propose_alliance(&player, &target),
            PlayerAction::BreakAlliance { target } => self.break_alliance(&player, &target),
            PlayerAction::OfferTruce { target } => self.offer_truce(&player, &target),
            PlayerAction::DeclareWar { target } => self.declare_war(&player, &target),
            PlayerAction::RespondToProposal { proposal, accept } => {
                self.respond_to_proposal(&player, &proposal, accept)
            }
            PlayerAction::SetSpeed { .. } => Ok(()),
        }
    }

    pub fn nations(&self) -> &NationTable {
        self.world.resource::<NationTable>()
    }

    pub fn wars(&self) -> &ActiveWars {
        self.world.resource::<ActiveWars>()
    }

    pub fn log(&self) -> &GameLog {
        self.world.resource::<GameLog>()
    }

    pub fn history(&self) -> &StatHistory {
        self.world.resource::<StatHistory>()
    }

    pub fn catalog(&self) -> &Catalog {
        self.world.resource::<Catalog>()
    }

    pub fn date(&self) -> &GameDate {
        self.world.resource::<GameDate>()
    }

    pub fn current_tick(&self) -> u64 {
        self.world.resource::<WorldTime>().tick
    }

    pub fn speed(&self) -> GameSpeed {
        *self.world.resource::<GameSpeed>()
    }

    pub fn delegation(&self) -> &Delegation {
        self.world.resource::<Delegation>()
    }

    pub fn phase(&self) -> GamePhase {
        self.world.resource::<Session>().phase
    }

    pub fn player_id(&self) -> Option<&NationId> {
        self.world.resource::<Session>().player.as_ref()
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.world.resource::<Session>().outcome.as_ref()
    }

    pub fn observer(&self) -> Arc<RwLock<ObserverSnapshot>> {
        self.observer.clone()
    }

    fn refresh_observer_snapshot(&mut self) {
        let session = self.world.resource::<Session>();
        let date = self.world.resource::<GameDate>();
        let source = SnapshotSource {
            tick: self.world.resource::<WorldTime>().tick,
            date,
            era_name: self.world.resource::<Catalog>().era_name(&date.era_id),
            phase: session.phase,
            speed: *self.world.resource::<GameSpeed>(),
            player: session.player.as_ref(),
            nations: self.world.resource::<NationTable>(),
            wars: self.world.resource::<ActiveWars>(),
            log: self.world.resource::<GameLog>(),
            history: self.world.resource::<StatHistory>(),
            outcome: session.outcome.as_ref(),
        };
        if let Ok(mut snapshot) = self.observer.write() {
            snapshot.update(source);
        }
    }
}
