//! Actor identifiers and the per-character data the turn engine reads.

mod character;
mod npc;

pub use character::*;
pub use npc::*;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Canonical identifier of the Dungeon Master.
pub const DM_ID: &str = "dm";

/// Prefix marking a DM-controlled NPC turn slot (`dm:<npc_name>`).
pub const NPC_PREFIX: &str = "dm:";

/// Anyone who can hold the turn.
///
/// Serialized as its canonical string (`"aldric"`, `"dm"`, `"dm:goblin_1"`)
/// so persisted queues and initiative orders round-trip verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Actor {
    /// A player character, by character identifier.
    PlayerCharacter(String),

    /// The Dungeon Master narrating as itself. Also the combat bookend.
    DungeonMaster,

    /// The Dungeon Master acting as one specific NPC during combat.
    DungeonMasterAsNpc(String),
}

impl Actor {
    /// Create a player character actor.
    pub fn player(id: impl Into<String>) -> Self {
        Actor::PlayerCharacter(id.into())
    }

    /// Create a DM-as-NPC actor.
    pub fn npc(name: impl Into<String>) -> Self {
        Actor::DungeonMasterAsNpc(name.into())
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Actor::PlayerCharacter(_))
    }

    pub fn is_npc(&self) -> bool {
        matches!(self, Actor::DungeonMasterAsNpc(_))
    }

    /// True for both the plain DM and DM-as-NPC turns.
    pub fn is_dm_controlled(&self) -> bool {
        !self.is_player()
    }

    pub fn player_id(&self) -> Option<&str> {
        match self {
            Actor::PlayerCharacter(id) => Some(id),
            _ => None,
        }
    }

    pub fn npc_name(&self) -> Option<&str> {
        match self {
            Actor::DungeonMasterAsNpc(name) => Some(name),
            _ => None,
        }
    }

    /// The agent that actually takes this turn.
    ///
    /// NPC slots are played by the DM; the NPC identity is framing only.
    pub fn controller(&self) -> Actor {
        match self {
            Actor::PlayerCharacter(id) => Actor::PlayerCharacter(id.clone()),
            Actor::DungeonMaster | Actor::DungeonMasterAsNpc(_) => Actor::DungeonMaster,
        }
    }

    fn variant_rank(&self) -> u8 {
        match self {
            Actor::PlayerCharacter(_) => 0,
            Actor::DungeonMaster => 1,
            Actor::DungeonMasterAsNpc(_) => 2,
        }
    }

    /// Convert the actor to its canonical string representation.
    pub fn as_string(&self) -> String {
        match self {
            Actor::PlayerCharacter(id) => id.clone(),
            Actor::DungeonMaster => DM_ID.to_string(),
            Actor::DungeonMasterAsNpc(name) => format!("{}{}", NPC_PREFIX, name),
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::PlayerCharacter(id) => f.write_str(id),
            Actor::DungeonMaster => f.write_str(DM_ID),
            Actor::DungeonMasterAsNpc(name) => write!(f, "{}{}", NPC_PREFIX, name),
        }
    }
}

/// Errors from parsing an actor identifier string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActorParseError {
    #[error("actor identifier is empty")]
    Empty,

    #[error("NPC identifier '{0}' has no name after the prefix")]
    EmptyNpcName(String),

    #[error("'{0}' is reserved for the DM and cannot name a player character")]
    ReservedPlayerId(String),
}

/// Check that `id` can name a player character.
///
/// Player ids live in the same string namespace as `dm` and `dm:<npc>`, so
/// they must not be `dm` and must not contain `:`.
pub fn validate_player_id(id: &str) -> Result<(), ActorParseError> {
    if id.trim().is_empty() {
        return Err(ActorParseError::Empty);
    }
    if id == DM_ID || id.contains(':') {
        return Err(ActorParseError::ReservedPlayerId(id.to_string()));
    }
    Ok(())
}

impl FromStr for Actor {
    type Err = ActorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ActorParseError::Empty);
        }
        if s == DM_ID {
            return Ok(Actor::DungeonMaster);
        }
        match s.strip_prefix(NPC_PREFIX) {
            Some("") => Err(ActorParseError::EmptyNpcName(s.to_string())),
            Some(name) => Ok(Actor::npc(name)),
            None => Ok(Actor::player(s)),
        }
    }
}

impl TryFrom<String> for Actor {
    type Error = ActorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Actor> for String {
    fn from(actor: Actor) -> Self {
        actor.as_string()
    }
}

// Ordered by canonical string; this is the final initiative tie-break.
// The variant breaks ties between a malformed player id and an NPC slot
// that print the same.
impl PartialOrd for Actor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Actor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_string()
            .cmp(&other.as_string())
            .then_with(|| self.variant_rank().cmp(&other.variant_rank()))
    }
}
