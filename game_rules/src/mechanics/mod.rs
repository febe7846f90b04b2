//! Game mechanics: dice and initiative.

mod dice;
mod initiative;

pub use dice::*;
pub use initiative::*;
