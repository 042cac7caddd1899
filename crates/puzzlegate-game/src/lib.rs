//! Play sessions for the four puzzle games.
//!
//! Each game wraps a generated puzzle and the player's state on top of it:
//!
//! - [`KeenGame`]: cell values and pencil notes.
//! - [`BridgesGame`]: bridges between islands.
//! - [`MapGame`]: region colours, with clued regions fixed.
//! - [`UntangleGame`]: node positions.
//!
//! Player mutations return an [`InputOperation`] describing what changed, or a
//! [`GameError`] when the input is rejected. Rejections are expected during play
//! and leave the state untouched. Every game can [`verify`](PuzzleGame::verify)
//! its current state, and a [`Round`] turns verification, bypass and forfeit into
//! a single completion report for a [`ProgressSink`].

pub use self::{
    bridges::*, error::*, input::*, keen::*, map::*, round::*, untangle::*, verification::*,
};

mod bridges;
mod error;
mod input;
mod keen;
mod map;
mod round;
mod untangle;
mod verification;
