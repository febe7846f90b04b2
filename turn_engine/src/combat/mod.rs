//! Combat State Manager - owns the lifecycle of an encounter.
//!
//! `start_combat` and `end_combat` are the only operations that create or
//! destroy a [`CombatState`]. Both do all fallible work before touching the
//! session, so a rejected call leaves the state exactly as it was.

mod npc_tools;

pub use npc_tools::*;

use game_rules::{
    order_initiative, roll_initiative, Actor, CombatParticipant, CombatState, DieRoller,
    EncounterId, GameState, InitiativeRoll, NpcProfile, RollError, SessionConfig, DM_ID,
    NPC_PREFIX,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::turn_queue::validate_turn_queue;

/// Errors from combat lifecycle and DM tool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("no combat profile for NPC '{0}'")]
    UnknownNpc(String),

    #[error("initiative roll failed for {actor}: {source}")]
    Roll {
        actor: String,
        #[source]
        source: RollError,
    },
}

/// What `end_combat` hands back to the narrative layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatSummary {
    pub encounter_id: Option<EncounterId>,
    /// Round in progress when combat ended.
    pub rounds: u32,
    pub defeated_npcs: Vec<String>,
    pub surviving_npcs: Vec<String>,
}

/// Guard for callers that may trigger resolution twice.
pub fn is_combat_active(state: &GameState) -> bool {
    state.combat_state.active
}

/// Start an encounter.
///
/// Rolls initiative for every PC in the turn queue (modifier from their
/// sheet) and then for every participant, in the order given. The resulting
/// order is the DM bookend followed by everyone else sorted by initiative.
pub fn start_combat<'s, R>(
    state: &'s mut GameState,
    participants: &[CombatParticipant],
    roller: &mut R,
    config: &SessionConfig,
) -> Result<&'s CombatState, CombatError>
where
    R: DieRoller + ?Sized,
{
    if state.combat_state.active {
        return Err(CombatError::InvalidState(
            "combat is already active".to_string(),
        ));
    }
    validate_turn_queue(&state.turn_queue)
        .map_err(|err| CombatError::InvalidState(format!("turn queue is malformed: {}", err)))?;
    validate_participants(state, participants)?;

    let mut rolls: Vec<(Actor, InitiativeRoll)> =
        Vec::with_capacity(state.turn_queue.len() + participants.len());

    for actor in state.players() {
        let modifier = match actor.player_id().and_then(|id| state.character_sheet(id)) {
            Some(sheet) => sheet.initiative_modifier,
            None => {
                debug!(actor = %actor, "no character sheet, rolling initiative with +0");
                0
            }
        };
        rolls.push((actor.clone(), roll_for(actor, modifier, roller, config)?));
    }

    for participant in participants {
        let actor = Actor::npc(participant.name.clone());
        let roll = roll_for(&actor, participant.initiative_modifier, roller, config)?;
        rolls.push((actor, roll));
    }

    order_initiative(&mut rolls);

    let mut initiative_order = Vec::with_capacity(rolls.len() + 1);
    initiative_order.push(Actor::DungeonMaster);
    initiative_order.extend(rolls.iter().map(|(actor, _)| actor.clone()));

    let encounter_id = EncounterId::new();
    let combat = CombatState {
        active: true,
        encounter_id: Some(encounter_id),
        round_number: 1,
        initiative_order,
        initiative_rolls: rolls
            .into_iter()
            .map(|(actor, roll)| (actor.as_string(), roll))
            .collect(),
        original_turn_queue: state.turn_queue.clone(),
        npc_profiles: participants
            .iter()
            .map(|p| (p.name.clone(), NpcProfile::from(p)))
            .collect(),
    };

    info!(
        %encounter_id,
        order = ?combat.initiative_order.iter().map(Actor::as_string).collect::<Vec<_>>(),
        "combat started"
    );

    state.current_turn = Actor::DungeonMaster;
    state.combat_state = combat;
    Ok(&state.combat_state)
}

/// End the active encounter and restore the exploration queue.
///
/// Fails without mutating anything if no combat is active, so a second call
/// in a row is an error rather than a silent no-op.
pub fn end_combat(state: &mut GameState) -> Result<CombatSummary, CombatError> {
    if !state.combat_state.active {
        return Err(CombatError::InvalidState("no combat is active".to_string()));
    }

    // Queue first, then clear: the two never disagree.
    state.turn_queue = state.combat_state.original_turn_queue.clone();
    let combat = std::mem::take(&mut state.combat_state);
    state.current_turn = Actor::DungeonMaster;

    let (defeated, surviving): (Vec<_>, Vec<_>) =
        combat.npc_profiles.values().partition(|p| p.is_defeated());

    let summary = CombatSummary {
        encounter_id: combat.encounter_id,
        rounds: combat.round_number,
        defeated_npcs: defeated.into_iter().map(|p| p.name.clone()).collect(),
        surviving_npcs: surviving.into_iter().map(|p| p.name.clone()).collect(),
    };

    info!(
        encounter_id = ?summary.encounter_id,
        rounds = summary.rounds,
        defeated = summary.defeated_npcs.len(),
        "combat ended"
    );

    Ok(summary)
}

fn roll_for<R>(
    actor: &Actor,
    modifier: i32,
    roller: &mut R,
    config: &SessionConfig,
) -> Result<InitiativeRoll, CombatError>
where
    R: DieRoller + ?Sized,
{
    let roll = roll_initiative(modifier, config.initiative_die, roller).map_err(|source| {
        CombatError::Roll {
            actor: actor.as_string(),
            source,
        }
    })?;
    debug!(
        actor = %actor,
        natural = roll.natural,
        modifier = roll.modifier,
        total = roll.total,
        "initiative rolled"
    );
    Ok(roll)
}

fn validate_participants(
    state: &GameState,
    participants: &[CombatParticipant],
) -> Result<(), CombatError> {
    let mut seen = HashSet::with_capacity(participants.len());

    for participant in participants {
        let name = participant.name.as_str();

        if name.trim().is_empty() {
            return Err(CombatError::Validation(
                "participant name must not be empty".to_string(),
            ));
        }
        if name == DM_ID || name.starts_with(NPC_PREFIX) {
            return Err(CombatError::Validation(format!(
                "participant name '{}' collides with the DM identifier",
                name
            )));
        }
        if name.contains(':') {
            return Err(CombatError::Validation(format!(
                "participant name '{}' must not contain ':'",
                name
            )));
        }
        let slot = Actor::npc(name).as_string();
        let is_pc = state.players().any(|a| a.player_id() == Some(name))
            || state.character_sheets.contains_key(name)
            || state.character_sheets.contains_key(&slot);
        if is_pc {
            return Err(CombatError::Validation(format!(
                "participant name '{}' collides with a player character",
                name
            )));
        }
        if !seen.insert(name) {
            return Err(CombatError::Validation(format!(
                "duplicate participant name '{}'",
                name
            )));
        }
    }

    Ok(())
}
