//! # Turn Engine
//!
//! Decides who acts next in an autodungeon session. This crate operates on
//! `game_rules::GameState` values and owns the sequencing behaviour: free
//! exploration order, initiative-ordered combat, and the transition between
//! them.
//!
//! ## Core Components
//!
//! - **combat**: Combat State Manager - start/end encounters, NPC tool calls
//! - **router**: Turn Router - the next actor for the current state
//! - **evaluator**: Combat End Evaluator - party wipe and victory detection
//! - **turn_queue**: exploration queue upkeep and the per-step turn loop
//! - **context**: per-turn framing for the narrative layer and UI
//! - **events**: DM commands in, observable transitions out
//!
//! ## Design Philosophy
//!
//! - **Explicit state**: every operation takes the session state it works on; there is no global session
//! - **All or nothing**: a rejected operation leaves the state untouched
//! - **Never stall**: routing glitches fall back to the DM instead of failing

pub mod combat;
pub mod context;
pub mod evaluator;
pub mod events;
pub mod router;
pub mod turn_queue;

pub use combat::*;
pub use context::*;
pub use evaluator::*;
pub use events::*;
pub use router::*;
pub use turn_queue::*;
