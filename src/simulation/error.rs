use thiserror::Error;

use crate::simulation::NationId;

/// Why an action was refused. The display text doubles as the log line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("unknown nation {0}")]
    UnknownNation(NationId),
    #[error("{0} has been eliminated")]
    Eliminated(String),
    #[error("{0} cannot act on itself")]
    SelfTarget(String),
    #[error("unknown policy {0}")]
    UnknownPolicy(String),
    #[error("{nation}: not enough political capital ({required} required, {available:.1} available)")]
    InsufficientPoliticalCapital {
        nation: String,
        required: f64,
        available: f64,
    },
    #[error("{nation}: \"{policy}\" requires the {era} era")]
    WrongEra {
        nation: String,
        policy: String,
        era: String,
    },
    #[error("{nation}: \"{policy}\" requires technology {required} (current {current:.0})")]
    InsufficientTechnology {
        nation: String,
        policy: String,
        required: f64,
        current: f64,
    },
    #[error("{nation}: \"{policy}\" is already active")]
    AlreadyActive { nation: String, policy: String },
    #[error("{nation}: already allied with {other}")]
    AlreadyAllied { nation: String, other: String },
    #[error("{nation}: not allied with {other}")]
    NotAllied { nation: String, other: String },
    #[error("{nation}: already at war with {other}")]
    AtWar { nation: String, other: String },
    #[error("{nation}: not at war with {other}")]
    NotAtWar { nation: String, other: String },
    #[error("{nation}: a truce with {other} is still in force")]
    UnderTruce { nation: String, other: String },
    #[error("{nation}: relation with {other} ({relation:.0}) is below the alliance threshold ({threshold})")]
    RelationTooLow {
        nation: String,
        other: String,
        relation: f64,
        threshold: f64,
    },
    #[error("{nation}: no pending proposal {proposal}")]
    ProposalNotFound { nation: String, proposal: String },
    #[error("proposal {proposal} was discarded: proposer {from} no longer exists")]
    StaleProposal { proposal: String, from: NationId },
    #[error("{nation}: civilian allocation must be non-negative and sum to 100% (got {total:.1})")]
    MalformedAllocation { nation: String, total: f64 },
    #[error("{nation}: budget is under automatic management")]
    ManualBudgetRequired { nation: String },
    #[error("{nation} is not the player nation")]
    NotPlayer { nation: String },
    #[error("no game in progress")]
    NoGame,
}
