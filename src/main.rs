use std::env;
use std::io::BufRead;
use std::sync::{Arc, RwLock};

use anyhow::Context;
use tokio::sync::{Notify, mpsc, watch};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use geopolitics_sim::console::{self, ConsoleCommand};
use geopolitics_sim::simulation::{
    Catalog, GamePhase, GameSpeed, NationId, ObserverSnapshot, PlayerAction, SimulationConfig, SimulationWorld,
};

fn load_config() -> anyhow::Result<SimulationConfig> {
    let mut config = match env::var_os("GEOSIM_CONFIG") {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path.to_string_lossy()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.to_string_lossy()))?
        }
        None => SimulationConfig::default(),
    };
    if let Ok(seed) = env::var("GEOSIM_SEED") {
        config.seed = Some(seed.parse().with_context(|| format!("GEOSIM_SEED is not an integer: {seed}"))?);
    }
    if let Ok(player) = env::var("GEOSIM_PLAYER") {
        config.player = player;
    }
    if let Ok(speed) = env::var("GEOSIM_SPEED") {
        config.speed = speed.parse().map_err(anyhow::Error::msg)?;
    }
    Ok(config)
}

fn interval_for(speed: GameSpeed) -> Option<Interval> {
    speed.interval().map(|period| {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    })
}

/// Resolves on the next tick, or never while paused.
async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Reads stdin on a plain thread so a blocked read never holds up shutdown.
fn spawn_console(
    commands: mpsc::Sender<PlayerAction>,
    speed: watch::Sender<GameSpeed>,
    observer: Arc<RwLock<ObserverSnapshot>>,
    shutdown: Arc<Notify>,
) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match console::parse_command(&line) {
                Ok(ConsoleCommand::Quit) => {
                    shutdown.notify_one();
                    break;
                }
                Ok(ConsoleCommand::Help) => println!("{}", console::HELP),
                Ok(ConsoleCommand::Status) => match observer.read() {
                    Ok(snapshot) => println!("{}", console::render_status(&snapshot)),
                    Err(_) => warn!("observer lock poisoned"),
                },
                Ok(ConsoleCommand::Action(PlayerAction::SetSpeed { speed: next })) => {
                    speed.send_replace(next);
                }
                Ok(ConsoleCommand::Action(action)) => {
                    if commands.blocking_send(action).is_err() {
                        break;
                    }
                }
                Err(error) => println!("{error}"),
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin()?,
    };
    let player = NationId::new(config.player.clone());
    let snapshot_path = config.snapshot_path.clone();
    let initial_speed = config.speed;

    let observer = Arc::new(RwLock::new(ObserverSnapshot::default()));
    let shutdown_notify = Arc::new(Notify::new());
    let mut simulation = SimulationWorld::with_observer(config, catalog, observer.clone());
    simulation
        .start_game(&player)
        .with_context(|| format!("cannot start as {player}"))?;

    let (speed_tx, mut speed_rx) = watch::channel(initial_speed);
    let (command_tx, mut command_rx) = mpsc::channel::<PlayerAction>(64);
    spawn_console(command_tx, speed_tx, observer.clone(), shutdown_notify.clone());

    let notify_for_simulation = shutdown_notify.clone();
    let simulation_task = tokio::spawn(async move {
        let mut interval = interval_for(initial_speed);
        let mut console_open = true;
        loop {
            tokio::select! {
                _ = next_tick(&mut interval) => {
                    simulation.tick();
                    if simulation.phase() == GamePhase::GameOver {
                        break;
                    }
                },
                Some(action) = command_rx.recv() => {
                    if let Err(error) = simulation.apply(action) {
                        debug!(%error, "player action refused");
                    }
                },
                result = speed_rx.changed(), if console_open => {
                    if result.is_err() {
                        console_open = false;
                        continue;
                    }
                    let speed = *speed_rx.borrow_and_update();
                    simulation.set_speed(speed);
                    interval = interval_for(speed);
                },
                _ = notify_for_simulation.notified() => break,
            }
        }
        simulation
    });
    let ctrlc_notify = shutdown_notify.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrlc_notify.notify_one();
        }
    });

    let simulation = simulation_task.await?;
    match simulation.outcome() {
        Some(outcome) => info!(winner = %outcome.winner_name, player_won = outcome.player_won, "game finished"),
        None => info!(tick = simulation.current_tick(), "simulation stopped"),
    }

    if let Some(path) = snapshot_path {
        let snapshot = observer
            .read()
            .map_err(|_| anyhow::anyhow!("observer lock poisoned"))?
            .clone();
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&path, json).with_context(|| format!("writing snapshot {}", path.display()))?;
        info!(path = %path.display(), "snapshot written");
    }

    Ok(())
}
