//! Dice sources.
//!
//! Rolling goes through [`DieRoller`] so callers can swap the live RNG for a
//! seeded or scripted one (tests, replays).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// A source of die results.
pub trait DieRoller {
    /// Roll one die with `sides` faces. Expected range is `1..=sides`.
    fn roll(&mut self, sides: u32) -> u32;
}

impl<R: DieRoller + ?Sized> DieRoller for &mut R {
    fn roll(&mut self, sides: u32) -> u32 {
        (**self).roll(sides)
    }
}

/// Uniform dice backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct RandomRoller {
    rng: StdRng,
}

impl RandomRoller {
    /// Seed from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic roller for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomRoller {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl DieRoller for RandomRoller {
    fn roll(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        self.rng.gen_range(1..=sides)
    }
}

/// Replays a fixed list of results in order.
///
/// Once the script runs out every roll returns 0, which initiative rolling
/// rejects as out of range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    script: VecDeque<u32>,
}

impl ScriptedRoller {
    pub fn new(results: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: results.into_iter().collect(),
        }
    }

    /// Number of results not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DieRoller for ScriptedRoller {
    fn roll(&mut self, _sides: u32) -> u32 {
        self.script.pop_front().unwrap_or(0)
    }
}
