//! Character sheet data read by the turn engine.

use serde::{Deserialize, Serialize};

/// The slice of a player character's sheet that sequencing depends on.
///
/// Owned and mutated by the surrounding system (DM tool calls adjust hit
/// points); the turn engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub name: String,
    pub hp_current: i32,
    pub hp_max: i32,
    pub armor_class: i32,
    pub initiative_modifier: i32,
}

impl CharacterSheet {
    /// Create a sheet at full health with no initiative modifier.
    pub fn new(name: impl Into<String>, hp_max: i32) -> Self {
        Self {
            name: name.into(),
            hp_current: hp_max,
            hp_max,
            armor_class: 10,
            initiative_modifier: 0,
        }
    }

    pub fn with_initiative_modifier(mut self, modifier: i32) -> Self {
        self.initiative_modifier = modifier;
        self
    }

    pub fn with_hp_current(mut self, hp: i32) -> Self {
        self.hp_current = hp;
        self
    }

    /// Check if the character is down (0 HP or below).
    pub fn is_incapacitated(&self) -> bool {
        self.hp_current <= 0
    }
}
