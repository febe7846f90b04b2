//! Turn Router - picks who acts next.
//!
//! Routing is a pure read of the session: outside combat it walks the
//! exploration queue, during combat the initiative order. It never fails; a
//! `current_turn` missing from the active order falls back to the DM.

use game_rules::{Actor, GameState, NpcProfile, SessionConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::evaluator::is_incapacitated;

/// Result of routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextTurn {
    /// This actor acts next.
    Actor(Actor),
    /// The current actor was the last one eligible in the order.
    ///
    /// During combat this means the round is complete; outside combat the
    /// exchange is complete and the caller decides whether to loop.
    EndOfOrder,
}

impl NextTurn {
    pub fn actor(&self) -> Option<&Actor> {
        match self {
            NextTurn::Actor(actor) => Some(actor),
            NextTurn::EndOfOrder => None,
        }
    }
}

/// Route with the default session configuration.
pub fn route_to_next_agent(state: &GameState) -> NextTurn {
    route_with_config(state, &SessionConfig::default())
}

/// Decide who acts after `state.current_turn`.
pub fn route_with_config(state: &GameState, config: &SessionConfig) -> NextTurn {
    let in_combat = state.combat_state.active;
    let order = state.active_order();

    let Some(position) = order.iter().position(|a| *a == state.current_turn) else {
        warn!(
            current_turn = %state.current_turn,
            in_combat,
            "current turn is not in the active order, routing to DM"
        );
        return NextTurn::Actor(Actor::DungeonMaster);
    };

    for candidate in &order[position + 1..] {
        if in_combat && should_skip(state, candidate, config) {
            debug!(actor = %candidate, "skipping incapacitated combatant");
            continue;
        }
        return NextTurn::Actor(candidate.clone());
    }

    NextTurn::EndOfOrder
}

fn should_skip(state: &GameState, actor: &Actor, config: &SessionConfig) -> bool {
    let enabled = match actor {
        Actor::PlayerCharacter(_) => config.skip_incapacitated,
        Actor::DungeonMasterAsNpc(_) => config.skip_defeated_npcs,
        Actor::DungeonMaster => false,
    };
    enabled && is_incapacitated(state, actor)
}

/// The NPC a routed turn stands for, if it is a DM-as-NPC slot.
///
/// The turn still goes to the DM; the profile is the framing it plays with.
pub fn npc_profile_for<'s>(state: &'s GameState, actor: &Actor) -> Option<&'s NpcProfile> {
    actor
        .npc_name()
        .and_then(|name| state.combat_state.npc_profile(name))
}
