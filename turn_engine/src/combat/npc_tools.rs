//! DM tool operations on NPC combat profiles.

use game_rules::{GameState, NpcProfile};
use tracing::debug;

use super::CombatError;

fn profile_mut<'s>(state: &'s mut GameState, name: &str) -> Result<&'s mut NpcProfile, CombatError> {
    if !state.combat_state.active {
        return Err(CombatError::InvalidState("no combat is active".to_string()));
    }
    state
        .combat_state
        .npc_profile_mut(name)
        .ok_or_else(|| CombatError::UnknownNpc(name.to_string()))
}

/// Deal damage to an NPC. Returns the updated profile.
pub fn damage_npc<'s>(
    state: &'s mut GameState,
    name: &str,
    amount: u32,
) -> Result<&'s NpcProfile, CombatError> {
    let profile = profile_mut(state, name)?;
    profile.apply_damage(amount);
    debug!(npc = name, amount, hp = profile.hp_current, "npc damaged");
    Ok(profile)
}

/// Heal an NPC, capped at its maximum HP.
pub fn heal_npc<'s>(
    state: &'s mut GameState,
    name: &str,
    amount: u32,
) -> Result<&'s NpcProfile, CombatError> {
    let profile = profile_mut(state, name)?;
    profile.heal(amount);
    debug!(npc = name, amount, hp = profile.hp_current, "npc healed");
    Ok(profile)
}

/// Returns false if the NPC already had the condition.
pub fn add_npc_condition(
    state: &mut GameState,
    name: &str,
    condition: &str,
) -> Result<bool, CombatError> {
    Ok(profile_mut(state, name)?.add_condition(condition))
}

/// Returns false if the NPC did not have the condition.
pub fn remove_npc_condition(
    state: &mut GameState,
    name: &str,
    condition: &str,
) -> Result<bool, CombatError> {
    Ok(profile_mut(state, name)?.remove_condition(condition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::start_combat;
    use game_rules::{CombatParticipant, ScriptedRoller, SessionConfig};

    fn state_in_combat() -> GameState {
        let mut state = GameState::new();
        let mut roller = ScriptedRoller::new([12]);
        start_combat(
            &mut state,
            &[CombatParticipant::new("ogre", 30)],
            &mut roller,
            &SessionConfig::default(),
        )
        .unwrap();
        state
    }

    #[test]
    fn test_damage_and_heal() {
        let mut state = state_in_combat();

        assert_eq!(damage_npc(&mut state, "ogre", 12).unwrap().hp_current, 18);
        assert_eq!(heal_npc(&mut state, "ogre", 50).unwrap().hp_current, 30);
        assert!(damage_npc(&mut state, "ogre", 45).unwrap().is_defeated());
    }

    #[test]
    fn test_unknown_npc() {
        let mut state = state_in_combat();
        assert_eq!(
            damage_npc(&mut state, "troll", 5).unwrap_err(),
            CombatError::UnknownNpc("troll".to_string())
        );
    }

    #[test]
    fn test_requires_active_combat() {
        let mut state = GameState::new();
        assert!(matches!(
            heal_npc(&mut state, "ogre", 5),
            Err(CombatError::InvalidState(_))
        ));
        assert!(matches!(
            add_npc_condition(&mut state, "ogre", "prone"),
            Err(CombatError::InvalidState(_))
        ));
    }

    #[test]
    fn test_conditions() {
        let mut state = state_in_combat();
        assert!(add_npc_condition(&mut state, "ogre", "Grappled").unwrap());
        assert!(!add_npc_condition(&mut state, "ogre", "grappled").unwrap());
        assert!(remove_npc_condition(&mut state, "ogre", "Grappled").unwrap());
        assert!(state.combat_state.npc_profile("ogre").unwrap().conditions.is_empty());
    }
}
