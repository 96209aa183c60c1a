//! Line-oriented command parsing for the headless runner.

use std::fmt::Write as _;

use colored::{Color, Colorize};
use thiserror::Error;

use crate::simulation::systems::logging::format_money;
use crate::simulation::{CivilianAllocation, GameSpeed, NationId, ObserverSnapshot, PlayerAction};

pub const HELP: &str = "\
commands:
  status                         show the player nation and active wars
  speed <paused|slow|normal|fast>
  pause | resume
  policy <policy id>             enact a policy
  budget <percent>               set the defense budget ratio
  allocate <econ> <tech> <dipl> <res>
  auto <budget|policies|diplomacy>
  improve | harm | ally | unally | truce | war <nation id>
  accept | decline <proposal id>
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Action(PlayerAction),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("'{command}' needs {argument}")]
    MissingArgument { command: String, argument: &'static str },
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error("{0}")]
    InvalidSpeed(String),
}

fn number(raw: &str) -> Result<f64, ParseError> {
    raw.parse::<f64>().map_err(|_| ParseError::InvalidNumber(raw.to_string()))
}

pub fn parse_command(line: &str) -> Result<ConsoleCommand, ParseError> {
    let mut words = line.split_whitespace();
    let command = words.next().ok_or(ParseError::Empty)?.to_ascii_lowercase();
    let mut argument = |name: &'static str| {
        words.next().ok_or_else(|| ParseError::MissingArgument {
            command: command.clone(),
            argument: name,
        })
    };

    let action = match command.as_str() {
        "quit" | "exit" => return Ok(ConsoleCommand::Quit),
        "status" => return Ok(ConsoleCommand::Status),
        "help" | "?" => return Ok(ConsoleCommand::Help),
        "pause" => PlayerAction::SetSpeed {
            speed: GameSpeed::Paused,
        },
        "resume" => PlayerAction::SetSpeed {
            speed: GameSpeed::Normal,
        },
        "speed" => PlayerAction::SetSpeed {
            speed: argument("a speed")?.parse().map_err(ParseError::InvalidSpeed)?,
        },
        "policy" => PlayerAction::EnactPolicy {
            policy: argument("a policy id")?.to_string(),
        },
        "budget" => PlayerAction::SetDefenseBudgetRatio {
            ratio: number(argument("a percentage")?)?,
        },
        "allocate" => PlayerAction::SetCivilianAllocation {
            allocation: CivilianAllocation {
                economy: number(argument("four percentages")?)?,
                technology: number(argument("four percentages")?)?,
                diplomacy: number(argument("four percentages")?)?,
                resources: number(argument("four percentages")?)?,
            },
        },
        "auto" => match argument("budget, policies or diplomacy")? {
            "budget" => PlayerAction::ToggleAutoManageBudget,
            "policies" => PlayerAction::ToggleAutoEnactPolicies,
            "diplomacy" => PlayerAction::ToggleAutoDelegateDiplomacy,
            other => return Err(ParseError::UnknownCommand(format!("auto {other}"))),
        },
        "improve" | "harm" | "ally" | "unally" | "truce" | "war" => {
            let target = NationId::from(argument("a nation id")?);
            match command.as_str() {
                "improve" => PlayerAction::ImproveRelations { target },
                "harm" => PlayerAction::HarmRelations { target },
                "ally" => PlayerAction::ProposeAlliance { target },
                "unally" => PlayerAction::BreakAlliance { target },
                "truce" => PlayerAction::OfferTruce { target },
                _ => PlayerAction::DeclareWar { target },
            }
        }
        "accept" | "decline" => PlayerAction::RespondToProposal {
            proposal: argument("a proposal id")?.to_string(),
            accept: command == "accept",
        },
        _ => return Err(ParseError::UnknownCommand(command)),
    };
    Ok(ConsoleCommand::Action(action))
}

/// Multi-line summary of the player's position.
pub fn render_status(snapshot: &ObserverSnapshot) -> String {
    let mut out = String::new();
    let date = snapshot.date.as_ref().map(ToString::to_string).unwrap_or_default();
    let _ = writeln!(
        out,
        "{} tick {} | {} | {} | speed {}",
        "[Status]".color(Color::BrightWhite),
        snapshot.tick,
        date,
        snapshot.era_name,
        snapshot.speed.label()
    );

    match snapshot.player_summary() {
        Some(player) => {
            let _ = writeln!(
                out,
                "{} ({}) GDP {} | pop {} | military {:.0}/{:.0} | PC {:.1}",
                player.name.bold(),
                player.id,
                format_money(player.gdp),
                player.population,
                player.military,
                player.max_military,
                player.political_capital
            );
            let _ = writeln!(
                out,
                "economy {:.0} | technology {:.0} | diplomacy {:.0} | resources {:.0} | regions {} ({} occupied)",
                player.stats.economy,
                player.stats.technology,
                player.stats.diplomacy,
                player.stats.resources,
                player.territories,
                player.occupied
            );
        }
        None => {
            let _ = writeln!(out, "no player nation");
        }
    }

    for war in &snapshot.wars {
        let _ = writeln!(
            out,
            "{} {} vs {} ({} ticks left)",
            "[War]".color(Color::Red),
            war.attacker,
            war.defender,
            war.ticks_to_resolution
        );
    }
    if !snapshot.status_message.is_empty() {
        let _ = write!(out, "{}", snapshot.status_message.color(Color::Yellow));
    }
    out
}
