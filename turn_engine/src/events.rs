//! Commands into the engine and events out of it.
//!
//! The DM's decision to start or end a fight arrives as an explicit
//! [`CombatCommand`]; how the narrative layer arrived at it is not this
//! crate's concern. [`TurnEvent`]s describe observable transitions for the
//! UI and log collaborators.

use game_rules::{Actor, CombatParticipant, DieRoller, EncounterId, GameState, SessionConfig};
use serde::{Deserialize, Serialize};

use crate::combat::{end_combat, start_combat, CombatError, CombatSummary};
use crate::turn_queue::TurnStep;

/// A combat-control command issued by the DM.
///
/// Tool-call JSON form: `{"command": "start_combat", "participants": [...]}`
/// or `{"command": "end_combat"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CombatCommand {
    StartCombat { participants: Vec<CombatParticipant> },
    EndCombat,
}

impl CombatCommand {
    /// Parse a command from tool-call arguments.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Observable transitions of the turn engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TurnEvent {
    CombatStarted {
        encounter_id: Option<EncounterId>,
        initiative_order: Vec<Actor>,
    },
    CombatEnded {
        summary: CombatSummary,
    },
    RoundStarted {
        round: u32,
    },
    TurnPassed {
        actor: Actor,
    },
    ExchangeComplete,
}

impl From<TurnStep> for TurnEvent {
    fn from(step: TurnStep) -> Self {
        match step {
            TurnStep::Continue(actor) | TurnStep::Wrapped(actor) => TurnEvent::TurnPassed { actor },
            TurnStep::RoundStarted { round, .. } => TurnEvent::RoundStarted { round },
            TurnStep::ExchangeComplete => TurnEvent::ExchangeComplete,
        }
    }
}

/// Apply a DM command to the session.
pub fn apply_command<R>(
    state: &mut GameState,
    command: CombatCommand,
    roller: &mut R,
    config: &SessionConfig,
) -> Result<TurnEvent, CombatError>
where
    R: DieRoller + ?Sized,
{
    match command {
        CombatCommand::StartCombat { participants } => {
            let combat = start_combat(state, &participants, roller, config)?;
            Ok(TurnEvent::CombatStarted {
                encounter_id: combat.encounter_id,
                initiative_order: combat.initiative_order.clone(),
            })
        }
        CombatCommand::EndCombat => {
            let summary = end_combat(state)?;
            Ok(TurnEvent::CombatEnded { summary })
        }
    }
}
