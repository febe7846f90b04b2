//! Initiative rolls and ordering.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::DieRoller;
use crate::entities::Actor;

/// Standard initiative die.
pub const DEFAULT_INITIATIVE_DIE: u32 = 20;

/// A resolved initiative roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeRoll {
    /// Face shown on the die.
    pub natural: u32,
    pub modifier: i32,
    /// `natural + modifier`; the primary ordering key.
    pub total: i32,
}

/// Errors that can occur while rolling initiative.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RollError {
    #[error("a die needs at least two sides, got {0}")]
    InvalidDie(u32),

    #[error("rolled {rolled} on a d{sides}")]
    OutOfRange { rolled: u32, sides: u32 },

    #[error("initiative total overflows: {natural} + {modifier}")]
    Overflow { natural: u32, modifier: i32 },
}

/// Roll initiative: one die plus modifier.
pub fn roll_initiative<R: DieRoller + ?Sized>(
    modifier: i32,
    sides: u32,
    roller: &mut R,
) -> Result<InitiativeRoll, RollError> {
    if sides < 2 {
        return Err(RollError::InvalidDie(sides));
    }

    let natural = roller.roll(sides);
    if natural == 0 || natural > sides {
        return Err(RollError::OutOfRange {
            rolled: natural,
            sides,
        });
    }

    let total = i32::try_from(natural)
        .ok()
        .and_then(|n| n.checked_add(modifier))
        .ok_or(RollError::Overflow { natural, modifier })?;

    Ok(InitiativeRoll {
        natural,
        modifier,
        total,
    })
}

/// Initiative comparison: total descending, then modifier descending, then
/// actor identifier ascending. Total even under full ties.
pub fn compare_initiative(a: (&Actor, &InitiativeRoll), b: (&Actor, &InitiativeRoll)) -> Ordering {
    b.1.total
        .cmp(&a.1.total)
        .then_with(|| b.1.modifier.cmp(&a.1.modifier))
        .then_with(|| a.0.cmp(b.0))
}

/// Sort rolled combatants into initiative order.
pub fn order_initiative(entries: &mut [(Actor, InitiativeRoll)]) {
    entries.sort_by(|a, b| compare_initiative((&a.0, &a.1), (&b.0, &b.1)));
}
