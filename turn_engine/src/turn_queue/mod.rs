//! Turn Queue Lifecycle - the exploration queue and the per-step turn loop.
//!
//! The exploration queue is what combat freezes and restores. This module
//! also carries the helpers an orchestrator calls once per completed action:
//! [`advance_turn`] to move the turn on, [`complete_turn`] to check for a
//! decided encounter, and [`resolve_combat`] to act on one.

use game_rules::{validate_player_id, Actor, CharacterSheet, GameState, SessionConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::combat::{end_combat, CombatError, CombatSummary};
use crate::context::{resolution_directive, TurnContext};
use crate::evaluator::{check_combat_end_conditions, EndCondition};
use crate::router::{route_with_config, NextTurn};

/// Errors from exploration queue maintenance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("turn queue has no DM entry")]
    MissingDungeonMaster,

    #[error("turn queue has more than one DM entry")]
    DuplicateDungeonMaster,

    #[error("'{0}' appears more than once in the turn queue")]
    DuplicateActor(String),

    #[error("NPC slot '{0}' does not belong in the exploration queue")]
    NpcInQueue(String),

    #[error("'{0}' is not a valid player character identifier")]
    InvalidIdentifier(String),

    #[error("'{0}' is not in the turn queue")]
    NotInQueue(String),

    #[error("the turn queue is frozen while combat is active")]
    CombatActive,
}

/// Build an exploration queue: the DM followed by each PC once, in order.
pub fn build_turn_queue<I, S>(players: I) -> Result<Vec<Actor>, QueueError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut queue = vec![Actor::DungeonMaster];
    for id in players {
        let id = id.into();
        check_player_id(&id)?;
        let actor = Actor::player(id);
        if !queue.contains(&actor) {
            queue.push(actor);
        }
    }
    Ok(queue)
}

fn check_player_id(id: &str) -> Result<(), QueueError> {
    validate_player_id(id).map_err(|_| QueueError::InvalidIdentifier(id.to_string()))
}

/// Check the exploration queue invariant: one DM, unique PCs with valid ids,
/// no NPC slots.
pub fn validate_turn_queue(queue: &[Actor]) -> Result<(), QueueError> {
    let mut seen = HashSet::with_capacity(queue.len());
    let mut dm_entries = 0;

    for actor in queue {
        match actor {
            Actor::DungeonMaster => dm_entries += 1,
            Actor::DungeonMasterAsNpc(_) => return Err(QueueError::NpcInQueue(actor.as_string())),
            Actor::PlayerCharacter(id) => {
                check_player_id(id)?;
                if !seen.insert(actor) {
                    return Err(QueueError::DuplicateActor(actor.as_string()));
                }
            }
        }
    }

    match dm_entries {
        0 => Err(QueueError::MissingDungeonMaster),
        1 => Ok(()),
        _ => Err(QueueError::DuplicateDungeonMaster),
    }
}

/// Add a PC to the session: sheet plus queue entry at the end.
pub fn add_player(
    state: &mut GameState,
    id: impl Into<String>,
    sheet: CharacterSheet,
) -> Result<(), QueueError> {
    if state.combat_state.active {
        return Err(QueueError::CombatActive);
    }

    let id = id.into();
    check_player_id(&id)?;
    let actor = Actor::player(id.clone());
    if state.turn_queue.contains(&actor) {
        return Err(QueueError::DuplicateActor(id));
    }

    debug!(player = %actor, "player joined the turn queue");
    state.turn_queue.push(actor);
    state.character_sheets.insert(id, sheet);
    Ok(())
}

/// Remove a PC from the queue. Returns their sheet, if one was stored.
///
/// If it was their turn, the turn passes to the DM.
pub fn remove_player(state: &mut GameState, id: &str) -> Result<Option<CharacterSheet>, QueueError> {
    if state.combat_state.active {
        return Err(QueueError::CombatActive);
    }

    let actor = Actor::player(id);
    let position = state
        .turn_queue
        .iter()
        .position(|a| *a == actor)
        .ok_or_else(|| QueueError::NotInQueue(id.to_string()))?;

    state.turn_queue.remove(position);
    if state.current_turn == actor {
        state.current_turn = Actor::DungeonMaster;
    }

    debug!(player = %actor, "player left the turn queue");
    Ok(state.character_sheets.remove(id))
}

/// Outcome of one [`advance_turn`] step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStep {
    /// The turn moved on to this actor.
    Continue(Actor),
    /// Combat round complete; a new round begins with the bookend.
    RoundStarted { round: u32, actor: Actor },
    /// Exploration wrapped back to the first queue entry.
    Wrapped(Actor),
    /// Exploration exchange complete and looping is disabled.
    /// `current_turn` is left unchanged.
    ExchangeComplete,
}

impl TurnStep {
    /// The actor now holding the turn, if the turn moved.
    pub fn actor(&self) -> Option<&Actor> {
        match self {
            TurnStep::Continue(actor)
            | TurnStep::RoundStarted { actor, .. }
            | TurnStep::Wrapped(actor) => Some(actor),
            TurnStep::ExchangeComplete => None,
        }
    }
}

/// Move the turn on by one step and record it in `current_turn`.
pub fn advance_turn(state: &mut GameState, config: &SessionConfig) -> TurnStep {
    match route_with_config(state, config) {
        NextTurn::Actor(actor) => {
            state.current_turn = actor.clone();
            TurnStep::Continue(actor)
        }
        NextTurn::EndOfOrder if state.combat_state.active => {
            let combat = &mut state.combat_state;
            combat.round_number += 1;
            let bookend = combat
                .initiative_order
                .first()
                .cloned()
                .unwrap_or(Actor::DungeonMaster);
            info!(
                encounter_id = ?combat.encounter_id,
                round = combat.round_number,
                "combat round started"
            );
            state.current_turn = bookend.clone();
            TurnStep::RoundStarted {
                round: state.combat_state.round_number,
                actor: bookend,
            }
        }
        NextTurn::EndOfOrder if config.loop_exploration => {
            let first = state
                .turn_queue
                .first()
                .cloned()
                .unwrap_or(Actor::DungeonMaster);
            state.current_turn = first.clone();
            TurnStep::Wrapped(first)
        }
        NextTurn::EndOfOrder => TurnStep::ExchangeComplete,
    }
}

/// Run after every completed turn. Reports a decided encounter, if any.
pub fn complete_turn(state: &GameState) -> Option<EndCondition> {
    let condition = check_combat_end_conditions(state)?;
    info!(
        encounter_id = ?state.combat_state.encounter_id,
        ?condition,
        "combat end condition reached"
    );
    Some(condition)
}

/// A forced DM turn that narrates the end of an encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionTurn {
    pub condition: EndCondition,
    pub directive: String,
    pub context: TurnContext,
}

/// Hand the turn to the DM with a resolution directive, without ending combat.
///
/// For orchestrators that want the narration produced before calling
/// [`end_combat`]. [`resolve_combat`] does both.
pub fn force_resolution_turn(
    state: &mut GameState,
    condition: EndCondition,
) -> Result<ResolutionTurn, CombatError> {
    if !state.combat_state.active {
        return Err(CombatError::InvalidState("no combat is active".to_string()));
    }

    state.current_turn = Actor::DungeonMaster;
    let directive = resolution_directive(condition).to_string();
    let context = TurnContext::for_actor(state, &Actor::DungeonMaster).with_directive(&directive);

    Ok(ResolutionTurn {
        condition,
        directive,
        context,
    })
}

/// Force the resolution turn and then end combat.
pub fn resolve_combat(
    state: &mut GameState,
    condition: EndCondition,
) -> Result<(ResolutionTurn, CombatSummary), CombatError> {
    let turn = force_resolution_turn(state, condition)?;
    let summary = end_combat(state)?;
    Ok((turn, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::start_combat;
    use game_rules::{CombatParticipant, ScriptedRoller};

    fn party_state() -> GameState {
        GameState::with_party([
            ("aldric", CharacterSheet::new("Aldric", 24).with_initiative_modifier(2)),
            ("elara", CharacterSheet::new("Elara", 18)),
        ])
        .unwrap()
    }

    fn basic_encounter() -> GameState {
        let mut state = party_state();
        let mut roller = ScriptedRoller::new([15, 10, 15]);
        start_combat(
            &mut state,
            &[CombatParticipant::new("goblin_1", 7).with_initiative_modifier(2)],
            &mut roller,
            &SessionConfig::default(),
        )
        .unwrap();
        state
    }

    #[test]
    fn test_build_turn_queue() {
        let queue = build_turn_queue(["aldric", "elara", "aldric"]).unwrap();
        assert_eq!(
            queue,
            vec![
                Actor::DungeonMaster,
                Actor::player("aldric"),
                Actor::player("elara"),
            ]
        );
        assert_eq!(validate_turn_queue(&queue), Ok(()));
    }

    #[test]
    fn test_reserved_ids_never_enter_the_queue() {
        assert_eq!(
            build_turn_queue(["dm"]),
            Err(QueueError::InvalidIdentifier("dm".to_string()))
        );
        assert_eq!(
            build_turn_queue(["aldric", "dm:goblin_1"]),
            Err(QueueError::InvalidIdentifier("dm:goblin_1".to_string()))
        );

        // A hand-built queue with a second "dm" is still caught.
        assert_eq!(
            validate_turn_queue(&[Actor::DungeonMaster, Actor::player("dm")]),
            Err(QueueError::InvalidIdentifier("dm".to_string()))
        );
        assert_eq!(
            validate_turn_queue(&[Actor::DungeonMaster, Actor::player("orc:chief")]),
            Err(QueueError::InvalidIdentifier("orc:chief".to_string()))
        );
    }

    #[test]
    fn test_validate_turn_queue() {
        assert_eq!(
            validate_turn_queue(&[Actor::player("aldric")]),
            Err(QueueError::MissingDungeonMaster)
        );
        assert_eq!(
            validate_turn_queue(&[Actor::DungeonMaster, Actor::DungeonMaster]),
            Err(QueueError::DuplicateDungeonMaster)
        );
        assert_eq!(
            validate_turn_queue(&[
                Actor::DungeonMaster,
                Actor::player("elara"),
                Actor::player("elara"),
            ]),
            Err(QueueError::DuplicateActor("elara".to_string()))
        );
        assert_eq!(
            validate_turn_queue(&[Actor::DungeonMaster, Actor::npc("goblin_1")]),
            Err(QueueError::NpcInQueue("dm:goblin_1".to_string()))
        );
    }

    #[test]
    fn test_add_and_remove_player() {
        let mut state = party_state();

        add_player(&mut state, "brom", CharacterSheet::new("Brom", 30)).unwrap();
        assert_eq!(state.turn_queue.last(), Some(&Actor::player("brom")));
        assert!(state.character_sheet("brom").is_some());

        assert_eq!(
            add_player(&mut state, "brom", CharacterSheet::new("Brom", 30)),
            Err(QueueError::DuplicateActor("brom".to_string()))
        );
        assert!(matches!(
            add_player(&mut state, "dm", CharacterSheet::new("DM", 1)),
            Err(QueueError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            add_player(&mut state, "dm:imp", CharacterSheet::new("Imp", 1)),
            Err(QueueError::InvalidIdentifier(_))
        ));

        state.current_turn = Actor::player("brom");
        let sheet = remove_player(&mut state, "brom").unwrap();
        assert_eq!(sheet.unwrap().name, "Brom");
        assert_eq!(state.current_turn, Actor::DungeonMaster);
        assert_eq!(validate_turn_queue(&state.turn_queue), Ok(()));

        assert_eq!(
            remove_player(&mut state, "brom"),
            Err(QueueError::NotInQueue("brom".to_string()))
        );
    }

    #[test]
    fn test_queue_frozen_during_combat() {
        let mut state = basic_encounter();
        assert_eq!(
            add_player(&mut state, "brom", CharacterSheet::new("Brom", 30)),
            Err(QueueError::CombatActive)
        );
        assert_eq!(
            remove_player(&mut state, "elara"),
            Err(QueueError::CombatActive)
        );
    }

    #[test]
    fn test_advance_exploration_wraps() {
        let mut state = party_state();
        let config = SessionConfig::default();

        assert_eq!(
            advance_turn(&mut state, &config),
            TurnStep::Continue(Actor::player("aldric"))
        );
        assert_eq!(
            advance_turn(&mut state, &config),
            TurnStep::Continue(Actor::player("elara"))
        );
        assert_eq!(
            advance_turn(&mut state, &config),
            TurnStep::Wrapped(Actor::DungeonMaster)
        );
        assert_eq!(state.current_turn, Actor::DungeonMaster);
    }

    #[test]
    fn test_advance_exploration_without_loop() {
        let mut state = party_state();
        state.current_turn = Actor::player("elara");
        let config = SessionConfig {
            loop_exploration: false,
            ..Default::default()
        };

        assert_eq!(advance_turn(&mut state, &config), TurnStep::ExchangeComplete);
        assert_eq!(state.current_turn, Actor::player("elara"));
    }

    #[test]
    fn test_advance_combat_rounds() {
        let mut state = basic_encounter();
        let config = SessionConfig::default();

        let mut actors = Vec::new();
        for _ in 0..4 {
            let step = advance_turn(&mut state, &config);
            actors.push(step.actor().cloned().unwrap());
        }

        assert_eq!(
            actors,
            vec![
                Actor::player("aldric"),
                Actor::npc("goblin_1"),
                Actor::player("elara"),
                Actor::DungeonMaster,
            ]
        );
        assert_eq!(state.combat_state.round_number, 2);
        assert_eq!(
            advance_turn(&mut state, &config),
            TurnStep::Continue(Actor::player("aldric"))
        );
    }

    #[test]
    fn test_round_started_step() {
        let mut state = basic_encounter();
        state.current_turn = Actor::player("elara");
        assert_eq!(
            advance_turn(&mut state, &SessionConfig::default()),
            TurnStep::RoundStarted {
                round: 2,
                actor: Actor::DungeonMaster,
            }
        );
    }

    #[test]
    fn test_complete_turn() {
        let mut state = basic_encounter();
        assert_eq!(complete_turn(&state), None);

        state.character_sheet_mut("aldric").unwrap().hp_current = 0;
        state.character_sheet_mut("elara").unwrap().hp_current = -2;
        assert_eq!(complete_turn(&state), Some(EndCondition::PartyDefeated));
    }

    #[test]
    fn test_resolve_combat() {
        let mut state = basic_encounter();
        let original_queue = state.combat_state.original_turn_queue.clone();
        state.current_turn = Actor::player("elara");

        let (turn, summary) = resolve_combat(&mut state, EndCondition::PartyDefeated).unwrap();

        assert_eq!(turn.condition, EndCondition::PartyDefeated);
        assert_eq!(turn.context.actor, Actor::DungeonMaster);
        assert_eq!(turn.context.directive.as_deref(), Some(turn.directive.as_str()));
        assert!(turn.directive.contains("capture"));
        assert_eq!(summary.surviving_npcs, vec!["goblin_1".to_string()]);
        assert_eq!(state.turn_queue, original_queue);
        assert!(!state.combat_state.active);

        // A second trigger is rejected rather than ending twice.
        assert!(matches!(
            resolve_combat(&mut state, EndCondition::PartyDefeated),
            Err(CombatError::InvalidState(_))
        ));
    }

    #[test]
    fn test_force_resolution_keeps_combat_open() {
        let mut state = basic_encounter();
        let turn = force_resolution_turn(&mut state, EndCondition::EnemiesDefeated).unwrap();

        assert!(state.combat_state.active);
        assert_eq!(state.current_turn, Actor::DungeonMaster);
        assert!(turn.context.in_combat);
    }
}
