//! Turn-order rows for the UI.

use game_rules::{Actor, GameState};
use serde::{Deserialize, Serialize};

use crate::evaluator::is_incapacitated;

/// One entry of the displayed turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeRow {
    pub actor: Actor,
    /// Character name, NPC name, or "Dungeon Master".
    pub label: String,
    /// Resolved initiative; `None` for the bookend and outside combat.
    pub roll_total: Option<i32>,
    pub is_current: bool,
    pub incapacitated: bool,
}

impl InitiativeRow {
    /// Single display line, e.g. `> Aldric (17)` or `  Elara (10) [down]`.
    pub fn to_line(&self) -> String {
        let mut line = String::new();
        line.push_str(if self.is_current { "> " } else { "  " });
        line.push_str(&self.label);
        if let Some(total) = self.roll_total {
            line.push_str(&format!(" ({})", total));
        }
        if self.incapacitated {
            line.push_str(" [down]");
        }
        line
    }
}

/// The active order as display rows: initiative during combat, the
/// exploration queue otherwise.
pub fn initiative_display(state: &GameState) -> Vec<InitiativeRow> {
    let combat = &state.combat_state;

    state
        .active_order()
        .iter()
        .map(|actor| InitiativeRow {
            actor: actor.clone(),
            label: label_for(state, actor),
            roll_total: if combat.active {
                combat.roll_for(actor).map(|roll| roll.total)
            } else {
                None
            },
            is_current: *actor == state.current_turn,
            incapacitated: combat.active && is_incapacitated(state, actor),
        })
        .collect()
}

fn label_for(state: &GameState, actor: &Actor) -> String {
    match actor {
        Actor::DungeonMaster => "Dungeon Master".to_string(),
        Actor::PlayerCharacter(id) => state
            .character_sheet(id)
            .map(|sheet| sheet.name.clone())
            .unwrap_or_else(|| id.clone()),
        Actor::DungeonMasterAsNpc(name) => name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::start_combat;
    use game_rules::{CharacterSheet, CombatParticipant, ScriptedRoller, SessionConfig};

    fn party_state() -> GameState {
        GameState::with_party([
            ("aldric", CharacterSheet::new("Aldric", 24).with_initiative_modifier(2)),
            ("elara", CharacterSheet::new("Elara", 18)),
        ])
        .unwrap()
    }

    #[test]
    fn test_exploration_rows() {
        let state = party_state();
        let rows = initiative_display(&state);

        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Dungeon Master", "Aldric", "Elara"]);
        assert!(rows[0].is_current);
        assert!(rows.iter().all(|r| r.roll_total.is_none()));
    }

    #[test]
    fn test_combat_rows() {
        let mut state = party_state();
        let mut roller = ScriptedRoller::new([15, 10, 15]);
        start_combat(
            &mut state,
            &[CombatParticipant::new("goblin_1", 7).with_initiative_modifier(2)],
            &mut roller,
            &SessionConfig::default(),
        )
        .unwrap();
        state.character_sheet_mut("elara").unwrap().hp_current = 0;
        state.current_turn = Actor::player("aldric");

        let rows = initiative_display(&state);
        let lines: Vec<_> = rows.iter().map(InitiativeRow::to_line).collect();

        assert_eq!(
            lines,
            vec![
                "  Dungeon Master",
                "> Aldric (17)",
                "  goblin_1 (17)",
                "  Elara (10) [down]",
            ]
        );
    }
}
