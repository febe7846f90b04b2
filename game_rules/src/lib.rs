//! # Game Rules
//!
//! Data and mechanics for an autodungeon session: actor identifiers,
//! character sheets, NPC combat profiles, dice, initiative, and the
//! `GameState` value the turn engine operates on.
//! This crate is the single source of truth for session state and contains
//! no sequencing logic.

pub mod config;
pub mod entities;
pub mod error;
pub mod mechanics;
pub mod world_state;

pub use config::*;
pub use entities::*;
pub use error::*;
pub use mechanics::*;
pub use world_state::*;
