//! NPC combat participants and their transient profiles.

use serde::{Deserialize, Serialize};

/// An NPC as declared by the DM when starting combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatParticipant {
    pub name: String,
    #[serde(default)]
    pub initiative_modifier: i32,
    pub hp: i32,
    #[serde(default = "default_ac")]
    pub ac: i32,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub tactics: String,
    #[serde(default)]
    pub secret: Option<String>,
}

fn default_ac() -> i32 {
    10
}

impl CombatParticipant {
    pub fn new(name: impl Into<String>, hp: i32) -> Self {
        Self {
            name: name.into(),
            initiative_modifier: 0,
            hp,
            ac: default_ac(),
            personality: String::new(),
            tactics: String::new(),
            secret: None,
        }
    }

    pub fn with_initiative_modifier(mut self, modifier: i32) -> Self {
        self.initiative_modifier = modifier;
        self
    }

    pub fn with_ac(mut self, ac: i32) -> Self {
        self.ac = ac;
        self
    }

    pub fn with_personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = personality.into();
        self
    }

    pub fn with_tactics(mut self, tactics: impl Into<String>) -> Self {
        self.tactics = tactics.into();
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }
}

/// Live combat profile of an NPC. Discarded when combat ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcProfile {
    pub name: String,
    pub hp_current: i32,
    pub hp_max: i32,
    pub ac: i32,
    pub initiative_modifier: i32,
    pub personality: String,
    pub tactics: String,
    pub secret: Option<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl NpcProfile {
    pub fn is_defeated(&self) -> bool {
        self.hp_current <= 0
    }

    /// Apply damage. HP does not go below zero.
    pub fn apply_damage(&mut self, amount: u32) {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.hp_current = self.hp_current.saturating_sub(amount).max(0);
    }

    /// Restore HP, capped at maximum.
    pub fn heal(&mut self, amount: u32) {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.hp_current = self.hp_current.saturating_add(amount).min(self.hp_max);
    }

    /// Add a condition; no-op if already present.
    pub fn add_condition(&mut self, condition: impl Into<String>) -> bool {
        let condition = condition.into();
        if self.conditions.iter().any(|c| c.eq_ignore_ascii_case(&condition)) {
            return false;
        }
        self.conditions.push(condition);
        true
    }

    pub fn remove_condition(&mut self, condition: &str) -> bool {
        let before = self.conditions.len();
        self.conditions.retain(|c| !c.eq_ignore_ascii_case(condition));
        self.conditions.len() != before
    }
}

impl From<&CombatParticipant> for NpcProfile {
    fn from(participant: &CombatParticipant) -> Self {
        Self {
            name: participant.name.clone(),
            hp_current: participant.hp,
            hp_max: participant.hp,
            ac: participant.ac,
            initiative_modifier: participant.initiative_modifier,
            personality: participant.personality.clone(),
            tactics: participant.tactics.clone(),
            secret: participant.secret.clone(),
            conditions: Vec::new(),
        }
    }
}
