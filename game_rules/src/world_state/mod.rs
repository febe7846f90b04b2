//! Session state - the value every turn-engine operation reads and mutates.

mod combat;

pub use combat::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entities::{validate_player_id, Actor, ActorParseError, CharacterSheet};
use crate::error::RulesError;

/// The complete sequencing state of one game session.
///
/// There is no global session: each session owns its own `GameState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Exploration order: the DM plus one entry per active PC.
    pub turn_queue: Vec<Actor>,

    /// Whose turn it is right now.
    pub current_turn: Actor,

    /// Inactive default when no combat is in progress.
    #[serde(default)]
    pub combat_state: CombatState,

    /// Character identifier -> sheet. Owned by the surrounding system.
    #[serde(default)]
    pub character_sheets: HashMap<String, CharacterSheet>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            turn_queue: vec![Actor::DungeonMaster],
            current_turn: Actor::DungeonMaster,
            combat_state: CombatState::default(),
            character_sheets: HashMap::new(),
        }
    }
}

impl GameState {
    /// Create a session with only the DM in the queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with the DM followed by the given party, in order.
    ///
    /// Each entry is `(character id, sheet)`. Fails on an id reserved for
    /// the DM or NPC slots.
    pub fn with_party<I, S>(party: I) -> Result<Self, ActorParseError>
    where
        I: IntoIterator<Item = (S, CharacterSheet)>,
        S: Into<String>,
    {
        let mut state = Self::new();
        for (id, sheet) in party {
            let id = id.into();
            validate_player_id(&id)?;
            let actor = Actor::player(id.clone());
            if !state.turn_queue.contains(&actor) {
                state.turn_queue.push(actor);
            }
            state.character_sheets.insert(id, sheet);
        }
        Ok(state)
    }

    /// Get a character sheet by character id.
    pub fn character_sheet(&self, id: &str) -> Option<&CharacterSheet> {
        self.character_sheets.get(id)
    }

    /// Get a mutable character sheet by character id.
    pub fn character_sheet_mut(&mut self, id: &str) -> Option<&mut CharacterSheet> {
        self.character_sheets.get_mut(id)
    }

    /// Player characters currently in the exploration queue.
    pub fn players(&self) -> impl Iterator<Item = &Actor> {
        self.turn_queue.iter().filter(|a| a.is_player())
    }

    pub fn is_combat_active(&self) -> bool {
        self.combat_state.active
    }

    /// The order routing runs over: initiative during combat, the queue otherwise.
    pub fn active_order(&self) -> &[Actor] {
        if self.combat_state.active {
            &self.combat_state.initiative_order
        } else {
            &self.turn_queue
        }
    }

    /// Serialize the full state for the persistence layer.
    pub fn to_json(&self) -> Result<String, RulesError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a state saved with [`GameState::to_json`].
    ///
    /// Rejects snapshots whose player ids would not survive the next save
    /// and load unchanged.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let state: Self = serde_json::from_str(json)?;
        state.check_player_ids()?;
        Ok(state)
    }

    fn check_player_ids(&self) -> Result<(), ActorParseError> {
        let combat = &self.combat_state;
        let actors = self
            .turn_queue
            .iter()
            .chain(&combat.original_turn_queue)
            .chain(&combat.initiative_order)
            .chain(std::iter::once(&self.current_turn));

        for id in actors
            .filter_map(Actor::player_id)
            .chain(self.character_sheets.keys().map(String::as_str))
        {
            validate_player_id(id)?;
        }
        Ok(())
    }
}
