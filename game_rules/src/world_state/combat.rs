//! Combat encounter state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::entities::{Actor, NpcProfile};
use crate::mechanics::InitiativeRoll;

/// Unique identifier for a combat encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncounterId(pub Uuid);

impl EncounterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EncounterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EncounterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of an active encounter. The default value is "no combat".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatState {
    pub active: bool,

    pub encounter_id: Option<EncounterId>,

    /// Starts at 1; incremented each time the order cycles back to the bookend.
    pub round_number: u32,

    /// DM bookend first, then PCs and `dm:<npc>` slots in initiative order.
    pub initiative_order: Vec<Actor>,

    /// Actor identifier -> resolved roll. Display only once the order is fixed.
    pub initiative_rolls: BTreeMap<String, InitiativeRoll>,

    /// Exploration queue at combat start, restored verbatim on end.
    pub original_turn_queue: Vec<Actor>,

    /// NPC name -> live combat profile.
    pub npc_profiles: BTreeMap<String, NpcProfile>,
}

impl CombatState {
    /// Get an NPC profile by name.
    pub fn npc_profile(&self, name: &str) -> Option<&NpcProfile> {
        self.npc_profiles.get(name)
    }

    /// Get a mutable NPC profile by name.
    pub fn npc_profile_mut(&mut self, name: &str) -> Option<&mut NpcProfile> {
        self.npc_profiles.get_mut(name)
    }

    /// The resolved roll for an actor, if it rolled.
    pub fn roll_for(&self, actor: &Actor) -> Option<&InitiativeRoll> {
        self.initiative_rolls.get(&actor.as_string())
    }

    /// NPC slots in the initiative order.
    pub fn npc_actors(&self) -> impl Iterator<Item = &Actor> {
        self.initiative_order.iter().filter(|a| a.is_npc())
    }

    /// Player characters that were in the party when combat started.
    pub fn party(&self) -> impl Iterator<Item = &Actor> {
        self.original_turn_queue.iter().filter(|a| a.is_player())
    }

    pub fn position_of(&self, actor: &Actor) -> Option<usize> {
        self.initiative_order.iter().position(|a| a == actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::CombatParticipant;

    #[test]
    fn test_default_is_inactive() {
        let combat = CombatState::default();
        assert!(!combat.active);
        assert_eq!(combat.round_number, 0);
        assert!(combat.encounter_id.is_none());
        assert!(combat.initiative_order.is_empty());
    }

    #[test]
    fn test_lookups() {
        let mut combat = CombatState {
            active: true,
            round_number: 1,
            initiative_order: vec![
                Actor::DungeonMaster,
                Actor::npc("goblin_1"),
                Actor::player("aldric"),
            ],
            original_turn_queue: vec![Actor::DungeonMaster, Actor::player("aldric")],
            ..Default::default()
        };
        combat.npc_profiles.insert(
            "goblin_1".to_string(),
            NpcProfile::from(&CombatParticipant::new("goblin_1", 7)),
        );

        assert_eq!(combat.position_of(&Actor::player("aldric")), Some(2));
        assert_eq!(combat.npc_actors().count(), 1);
        assert_eq!(combat.party().collect::<Vec<_>>(), vec![&Actor::player("aldric")]);
        assert!(combat.npc_profile("goblin_1").is_some());
        assert!(combat.npc_profile("goblin_2").is_none());

        combat.npc_profile_mut("goblin_1").unwrap().apply_damage(3);
        assert_eq!(combat.npc_profile("goblin_1").unwrap().hp_current, 4);
    }
}
