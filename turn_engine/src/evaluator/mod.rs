//! Combat End Evaluator - detects when an encounter is decided.
//!
//! Detection only. Acting on a condition (forced resolution narration, then
//! `end_combat`) belongs to the caller; see [`crate::turn_queue::resolve_combat`].

use game_rules::{Actor, GameState};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How an encounter was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndCondition {
    /// Every PC is at 0 HP or below.
    PartyDefeated,
    /// Every NPC combatant is at 0 HP or below.
    EnemiesDefeated,
}

/// Whether an actor is down.
///
/// PCs are read from their character sheet, NPC slots from their combat
/// profile. A missing sheet or profile counts as still standing. The DM is
/// never incapacitated.
pub fn is_incapacitated(state: &GameState, actor: &Actor) -> bool {
    match actor {
        Actor::PlayerCharacter(id) => state
            .character_sheet(id)
            .map(|sheet| sheet.is_incapacitated())
            .unwrap_or(false),
        Actor::DungeonMasterAsNpc(name) => state
            .combat_state
            .npc_profile(name)
            .map(|profile| profile.is_defeated())
            .unwrap_or(false),
        Actor::DungeonMaster => false,
    }
}

/// Check whether the active encounter has been decided.
///
/// Party defeat is checked before enemy defeat. Returns `None` outside
/// combat, or when a side has no members at all.
pub fn check_combat_end_conditions(state: &GameState) -> Option<EndCondition> {
    let combat = &state.combat_state;
    if !combat.active {
        return None;
    }

    if all_down(state, combat.party()) {
        debug!(round = combat.round_number, "every party member is down");
        return Some(EndCondition::PartyDefeated);
    }

    if all_down(state, combat.npc_actors()) {
        debug!(round = combat.round_number, "every enemy is down");
        return Some(EndCondition::EnemiesDefeated);
    }

    None
}

fn all_down<'a>(state: &GameState, mut actors: impl Iterator<Item = &'a Actor>) -> bool {
    let mut any = false;
    let all = actors.all(|actor| {
        any = true;
        is_incapacitated(state, actor)
    });
    any && all
}
