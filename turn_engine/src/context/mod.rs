//! Turn context - what the narrative layer needs to frame a turn.
//!
//! The router only names the next actor. When that actor is a `dm:<npc>` slot
//! the DM must play it with the NPC's profile instead of generic DM context;
//! this module assembles that framing, the forced resolution directives, and
//! the turn-order rows the UI displays.

mod initiative_display;

pub use initiative_display::*;

use game_rules::{Actor, GameState, NpcProfile};
use serde::{Deserialize, Serialize};

use crate::evaluator::EndCondition;

/// Directive for the DM turn forced by a total party defeat.
pub const PARTY_DEFEATED_DIRECTIVE: &str = "The entire party has fallen. Resolve the encounter now: \
     decide whether the enemies capture, kill, or release the party, and narrate the outcome. \
     Then end combat.";

/// Directive for the DM turn forced by the defeat of every enemy.
pub const ENEMIES_DEFEATED_DIRECTIVE: &str = "Every enemy has been defeated. Narrate the aftermath \
     of the battle and what the party finds. Then end combat.";

/// Resolution directive for a decided encounter.
pub fn resolution_directive(condition: EndCondition) -> &'static str {
    match condition {
        EndCondition::PartyDefeated => PARTY_DEFEATED_DIRECTIVE,
        EndCondition::EnemiesDefeated => ENEMIES_DEFEATED_DIRECTIVE,
    }
}

/// The NPC the DM is playing this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcFraming {
    pub name: String,
    pub hp_current: i32,
    pub hp_max: i32,
    pub ac: i32,
    pub personality: String,
    pub tactics: String,
    /// DM-only knowledge.
    pub secret: Option<String>,
    pub conditions: Vec<String>,
}

impl From<&NpcProfile> for NpcFraming {
    fn from(profile: &NpcProfile) -> Self {
        Self {
            name: profile.name.clone(),
            hp_current: profile.hp_current,
            hp_max: profile.hp_max,
            ac: profile.ac,
            personality: profile.personality.clone(),
            tactics: profile.tactics.clone(),
            secret: profile.secret.clone(),
            conditions: profile.conditions.clone(),
        }
    }
}

/// Everything needed to frame one turn for the acting agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnContext {
    /// The routed actor, possibly an NPC slot.
    pub actor: Actor,

    /// The agent that actually acts (the DM for NPC slots).
    pub controller: Actor,

    pub in_combat: bool,

    pub round_number: Option<u32>,

    /// Set when the DM is playing a specific NPC.
    pub npc: Option<NpcFraming>,

    /// Turn order as displayed to players.
    pub turn_order: Vec<InitiativeRow>,

    /// Forced instruction for this turn, if any.
    pub directive: Option<String>,
}

impl TurnContext {
    /// Assemble the context for `actor` taking its turn in `state`.
    pub fn for_actor(state: &GameState, actor: &Actor) -> Self {
        let combat = &state.combat_state;
        let npc = actor
            .npc_name()
            .and_then(|name| combat.npc_profile(name))
            .map(NpcFraming::from);

        Self {
            actor: actor.clone(),
            controller: actor.controller(),
            in_combat: combat.active,
            round_number: combat.active.then_some(combat.round_number),
            npc,
            turn_order: initiative_display(state),
            directive: None,
        }
    }

    /// Attach a forced directive.
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = Some(directive.into());
        self
    }

    /// Format the context as a prompt section.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::new();

        if self.in_combat {
            prompt.push_str(&format!(
                "## Combat - Round {}\n",
                self.round_number.unwrap_or(1)
            ));
        } else {
            prompt.push_str("## Exploration\n");
        }
        prompt.push_str(&format!("Acting: {}\n\n", self.actor));

        if let Some(npc) = &self.npc {
            prompt.push_str(&format!("## You are playing {}\n", npc.name));
            prompt.push_str(&format!(
                "HP {}/{}, AC {}\n",
                npc.hp_current, npc.hp_max, npc.ac
            ));
            if !npc.personality.is_empty() {
                prompt.push_str(&format!("Personality: {}\n", npc.personality));
            }
            if !npc.tactics.is_empty() {
                prompt.push_str(&format!("Tactics: {}\n", npc.tactics));
            }
            if let Some(secret) = &npc.secret {
                prompt.push_str(&format!("Secret (never reveal directly): {}\n", secret));
            }
            if !npc.conditions.is_empty() {
                prompt.push_str(&format!("Conditions: {}\n", npc.conditions.join(", ")));
            }
            prompt.push('\n');
        }

        if self.in_combat && !self.turn_order.is_empty() {
            prompt.push_str("## Initiative Order\n");
            for row in &self.turn_order {
                prompt.push_str(&row.to_line());
                prompt.push('\n');
            }
            prompt.push('\n');
        }

        if let Some(directive) = &self.directive {
            prompt.push_str("## Directive\n");
            prompt.push_str(directive);
            prompt.push_str("\n\n");
        }

        prompt
    }
}
